// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Host routing state consulted by the mirror engine: interfaces, a FIB and an adjacency
//! table, published to packet workers through a lock free snapshot.

#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::similar_names,
    clippy::struct_field_names,
    clippy::missing_errors_doc
)]

mod adjacency;
mod errors;
mod fib;
mod interfaces;
mod resolver;
mod router;

// re-exports
pub use adjacency::{Adjacency, AdjacencyTable};
pub use errors::{RouteError, RouterError};
pub use fib::request::{RequestFlags, RouteRequest};
pub use fib::{Fib, Route, RouteScope, RouteType};
pub use interfaces::iftable::IfTable;
pub use interfaces::interface::{IfState, Interface, RouterInterfaceConfig};
pub use resolver::{HostStack, InterfaceResolver, NeighborResolver, RouteResolver};
pub use router::{Router, RouterParams, RouterParamsBuilder, RouterReader, RoutingTables};
