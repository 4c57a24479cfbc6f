// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Route lookup requests

use crate::fib::RouteScope;
use bitflags::bitflags;
use std::net::Ipv4Addr;

bitflags! {
    /// Modifiers of a route lookup
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RequestFlags: u8 {
        /// The caller intends to send to the destination itself: local routes do not qualify.
        const KNOWN_NEXTHOP = 0b0000_0001;
    }
}

/// The key of a route lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequest {
    pub destination: Ipv4Addr,
    pub tos: u8,
    pub scope: RouteScope,
    pub flags: RequestFlags,
}

impl RouteRequest {
    /// Bits of the TOS byte taking part in route selection.
    pub const TOS_MASK: u8 = 0x1e;

    /// A lookup for `destination` with TOS 0, universe scope and no flags.
    #[must_use]
    pub fn new(destination: Ipv4Addr) -> Self {
        Self {
            destination,
            tos: 0,
            scope: RouteScope::Universe,
            flags: RequestFlags::empty(),
        }
    }
    #[must_use]
    pub fn with_tos(mut self, tos: u8) -> Self {
        self.tos = tos & Self::TOS_MASK;
        self
    }
    #[must_use]
    pub fn with_scope(mut self, scope: RouteScope) -> Self {
        self.scope = scope;
        self
    }
    #[must_use]
    pub fn with_flags(mut self, flags: RequestFlags) -> Self {
        self.flags = flags;
        self
    }
}
