// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The error results used by this library.

use ipnet::Ipv4Net;
use net::interface::InterfaceIndex;
use std::net::Ipv4Addr;
use thiserror::Error;

/// Errors when updating routing state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("An interface with ifindex {0} already exists")]
    InterfaceExists(InterfaceIndex),

    #[error("No interface with ifindex {0} exists")]
    NoSuchInterface(InterfaceIndex),

    #[error("Route to {0} needs an output interface")]
    MissingInterface(Ipv4Net),

    #[error("No route to {0} matches")]
    NoSuchRoute(Ipv4Net),
}

/// Errors when resolving a route.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route to host {0}")]
    NoRoute(Ipv4Addr),

    #[error("destination {0} is blackholed")]
    Blackhole(Ipv4Addr),

    #[error("destination {0} is unreachable")]
    Unreachable(Ipv4Addr),

    #[error("destination {0} is administratively prohibited")]
    Prohibited(Ipv4Addr),

    #[error("destination {0} is a local address")]
    LocalDestination(Ipv4Addr),

    #[error("output interface {0} does not exist")]
    NoSuchInterface(InterfaceIndex),

    #[error("output interface {0} is down")]
    InterfaceDown(InterfaceIndex),
}
