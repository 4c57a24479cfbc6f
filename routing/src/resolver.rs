// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The queries packet workers make against host routing state.

use crate::errors::RouteError;
use crate::fib::request::RouteRequest;
use net::eth::mac::Mac;
use net::interface::InterfaceIndex;
use net::packet::meta::Dst;
use std::net::Ipv4Addr;

/// Resolve a destination to a routing decision.
pub trait RouteResolver {
    /// Find the route for `request` and bind it to an output interface.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] if there is no usable route.
    fn route(&self, request: &RouteRequest) -> Result<Dst, RouteError>;
}

/// Resolve the link layer address of the next hop of a routing decision.
pub trait NeighborResolver {
    /// The mac of the next hop towards `destination` along `dst`, if known.
    fn neighbor(&self, dst: &Dst, destination: Ipv4Addr) -> Option<Mac>;
}

/// Query interface properties.
pub trait InterfaceResolver {
    /// Link layer address of an interface.
    fn interface_mac(&self, ifindex: InterfaceIndex) -> Option<Mac>;

    /// First IPv4 address assigned to an interface.
    fn primary_address(&self, ifindex: InterfaceIndex) -> Option<Ipv4Addr>;
}

/// Everything the mirror engine needs from the host.
pub trait HostStack: RouteResolver + NeighborResolver + InterfaceResolver {}
impl<T> HostStack for T where T: RouteResolver + NeighborResolver + InterfaceResolver {}
