// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Per packet metadata carried alongside the packet bytes.

use crate::eth::Eth;
use crate::eth::ethtype::EthType;
use crate::interface::InterfaceIndex;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// A routing decision bound to a packet: where it leaves and who receives it next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dst {
    oif: InterfaceIndex,
    gateway: Option<Ipv4Addr>,
}

impl Dst {
    /// Create a new [`Dst`].
    #[must_use]
    pub fn new(oif: InterfaceIndex, gateway: Option<Ipv4Addr>) -> Dst {
        Dst { oif, gateway }
    }

    /// Output interface
    #[must_use]
    pub fn oif(&self) -> InterfaceIndex {
        self.oif
    }

    /// Gateway, if the destination is not directly connected.
    #[must_use]
    pub fn gateway(&self) -> Option<Ipv4Addr> {
        self.gateway
    }

    /// The address whose link layer address must be resolved to reach `destination`.
    #[must_use]
    pub fn next_hop(&self, destination: Ipv4Addr) -> Ipv4Addr {
        self.gateway.unwrap_or(destination)
    }
}

/// A connection tracking entry owned by the host stack.
#[derive(Debug, PartialEq, Eq)]
pub struct ConnEntry {
    id: u64,
}

impl ConnEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(id: u64) -> ConnEntry {
        ConnEntry { id }
    }

    /// The id of the tracked connection.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Connection tracking state of a packet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Conntrack {
    /// Not yet seen by connection tracking.
    #[default]
    None,
    /// Associated with a tracked connection.
    Tracked(Arc<ConnEntry>),
    /// Explicitly excluded from connection tracking.
    Untracked,
}

impl Conntrack {
    /// Returns true if the packet holds a reference to a tracked connection.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        matches!(self, Conntrack::Tracked(_))
    }
}

/// Link layer state of a packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkLayer {
    /// The packet arrived (or was forwarded) with this ethernet header.
    AlreadyFramed(Eth),
    /// The packet was generated locally and has no ethernet header yet.
    Unframed,
}

/// Packet metadata
#[derive(Debug, Clone, Default)]
pub struct PacketMeta {
    /// The interface the packet is bound to leave through, if known.
    pub oif: Option<InterfaceIndex>,
    /// Link layer protocol tag of the packet.
    pub protocol: EthType,
    /// Routing decision bound to the packet.
    pub dst: Option<Dst>,
    /// Connection tracking state.
    pub conntrack: Conntrack,
    /// Set once an outer header has been prepended.
    pub encapsulation: bool,
    /// Set on copies produced by the mirror engine so they are never mirrored again.
    pub mirrored: bool,
}
