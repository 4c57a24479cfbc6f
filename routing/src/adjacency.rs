// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! State objects to keep adjacency information

use ahash::RandomState;
use net::eth::mac::Mac;
use net::interface::InterfaceIndex;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use tracing::debug;

/// A resolved neighbor: an address reachable over an interface at some mac.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacency {
    address: Ipv4Addr,
    ifindex: InterfaceIndex,
    mac: Mac,
}

impl Adjacency {
    #[must_use]
    pub fn new(address: Ipv4Addr, ifindex: InterfaceIndex, mac: Mac) -> Self {
        Self {
            address,
            ifindex,
            mac,
        }
    }
    #[must_use]
    pub fn address(&self) -> Ipv4Addr {
        self.address
    }
    #[must_use]
    pub fn ifindex(&self) -> InterfaceIndex {
        self.ifindex
    }
    #[must_use]
    pub fn mac(&self) -> Mac {
        self.mac
    }
}

#[derive(Debug, Clone)]
pub struct AdjacencyTable(HashMap<(InterfaceIndex, Ipv4Addr), Adjacency, RandomState>);

impl Default for AdjacencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AdjacencyTable {
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::with_hasher(RandomState::with_seed(0)))
    }
    pub fn add_adjacency(&mut self, adjacency: Adjacency) {
        debug!(
            "Adding adjacency {} -> {} on {}",
            adjacency.address, adjacency.mac, adjacency.ifindex
        );
        self.0
            .insert((adjacency.ifindex, adjacency.address), adjacency);
    }
    pub fn del_adjacency(&mut self, address: Ipv4Addr, ifindex: InterfaceIndex) {
        self.0.remove(&(ifindex, address));
    }
    #[must_use]
    pub fn get_adjacency(&self, address: Ipv4Addr, ifindex: InterfaceIndex) -> Option<&Adjacency> {
        self.0.get(&(ifindex, address))
    }
    pub fn iter(&self) -> impl Iterator<Item = &Adjacency> {
        self.0.values()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
