// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Mirror engine errors

use crate::output::TxError;
use net::buffer::{BufferAllocationError, NotEnoughHeadRoom};
use net::interface::InterfaceIndex;
use net::ipv4::HeaderError;
use net::parse::{LengthError, ParseError};
use net::rmirror::RmirrorHeaderError;
use routing::RouteError;
use std::net::Ipv4Addr;

/// Failures while building the encapsulated copy
#[derive(Debug, thiserror::Error)]
pub enum EncapError {
    /// Growing the headroom of the copy failed.
    #[error(transparent)]
    Allocation(#[from] BufferAllocationError),
    /// An unframed packet has no interface to take a link layer source from.
    #[error("no output interface for unframed packet to {0}")]
    NoEgressInterface(Ipv4Addr),
    /// The output interface is unknown or has no MAC.
    #[error("interface {0} has no link layer address")]
    NoInterfaceMac(InterfaceIndex),
    /// The encapsulated copy is longer than an IPv4 total length can express.
    #[error("packet of {0} bytes does not fit an IPv4 datagram")]
    TooLong(usize),
    #[allow(missing_docs)]
    #[error(transparent)]
    Headroom(#[from] NotEnoughHeadRoom),
    #[allow(missing_docs)]
    #[error(transparent)]
    Header(#[from] LengthError),
}

/// Reasons a packet was not mirrored.
///
/// None of these affect the original packet.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// The worker is inside the output call of a previous copy.
    #[error("worker is already emitting a mirror copy")]
    Reentrant,
    /// Copies are never mirrored again.
    #[error("packet is a mirror copy")]
    AlreadyMirrored,
    /// The copy could not be allocated.
    #[error(transparent)]
    Allocation(#[from] BufferAllocationError),
    /// The packet does not start with an IPv4 header.
    #[error("packet is not IPv4: {0}")]
    NotIpv4(ParseError<HeaderError>),
    #[allow(missing_docs)]
    #[error(transparent)]
    Encap(#[from] EncapError),
    /// No usable route towards the collector.
    #[error("mirror destination unreachable: {0}")]
    RouteUnreachable(#[from] RouteError),
    /// The output interface has no address to use as outer source.
    #[error("interface {0} has no local address to source mirror copies from")]
    NoLocalAddress(InterfaceIndex),
    #[allow(missing_docs)]
    #[error(transparent)]
    Header(#[from] RmirrorHeaderError),
    /// The output path refused the copy.
    #[error(transparent)]
    Transmit(#[from] TxError),
}

impl MirrorError {
    /// True if the failure is a memory shortage, wherever it happened.
    #[must_use]
    pub fn is_allocation(&self) -> bool {
        matches!(
            self,
            MirrorError::Allocation(_) | MirrorError::Encap(EncapError::Allocation(_))
        )
    }
}
