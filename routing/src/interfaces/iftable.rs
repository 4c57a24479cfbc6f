// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Interfaces known to the host, keyed by ifindex.

use crate::errors::RouterError;
use crate::interfaces::interface::{IfState, Interface, RouterInterfaceConfig};
use ahash::RandomState;
use ipnet::Ipv4Net;
use net::interface::InterfaceIndex;
use std::collections::HashMap;
use tracing::{debug, warn};

/// The set of interfaces a route may egress through and mirror copies may be sourced from.
#[derive(Clone, Debug)]
pub struct IfTable(HashMap<InterfaceIndex, Interface, RandomState>);

impl Default for IfTable {
    fn default() -> Self {
        Self::new()
    }
}

impl IfTable {
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::with_hasher(RandomState::with_seed(0)))
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    #[must_use]
    pub fn contains(&self, ifindex: InterfaceIndex) -> bool {
        self.0.contains_key(&ifindex)
    }
    #[must_use]
    pub fn get_interface(&self, ifindex: InterfaceIndex) -> Option<&Interface> {
        self.0.get(&ifindex)
    }

    fn get_mut(&mut self, ifindex: InterfaceIndex) -> Result<&mut Interface, RouterError> {
        self.0
            .get_mut(&ifindex)
            .ok_or(RouterError::NoSuchInterface(ifindex))
    }

    //////////////////////////////////////////////////////////////////
    /// Register an interface. Its operational state starts out unknown.
    //////////////////////////////////////////////////////////////////
    pub fn add_interface(&mut self, config: &RouterInterfaceConfig) -> Result<(), RouterError> {
        let ifindex = config.ifindex;
        if self.contains(ifindex) {
            warn!("Refusing to register {} as ifindex {ifindex}: index in use", config.name);
            return Err(RouterError::InterfaceExists(ifindex));
        }
        self.0.insert(ifindex, Interface::new(config));
        debug!("Registered interface {} (ifindex {ifindex}, mac {})", config.name, config.mac);
        Ok(())
    }

    /// Forget an interface. Unknown indices are ignored.
    pub fn del_interface(&mut self, ifindex: InterfaceIndex) {
        if let Some(iface) = self.0.remove(&ifindex) {
            debug!("Unregistered interface {}", iface.name);
        }
    }

    //////////////////////////////////////////////////////////////////
    /// Assign an address. The first address assigned to an interface
    /// is the source of the mirror copies leaving through it.
    //////////////////////////////////////////////////////////////////
    pub fn add_ifaddr(&mut self, ifindex: InterfaceIndex, ifaddr: Ipv4Net) -> Result<(), RouterError> {
        self.get_mut(ifindex)?.add_ifaddr(ifaddr);
        debug!("Assigned {ifaddr} to ifindex {ifindex}");
        Ok(())
    }

    pub fn del_ifaddr(&mut self, ifindex: InterfaceIndex, ifaddr: &Ipv4Net) {
        if let Ok(iface) = self.get_mut(ifindex) {
            iface.del_ifaddr(ifaddr);
        }
    }

    pub fn set_oper_state(&mut self, ifindex: InterfaceIndex, state: IfState) -> Result<(), RouterError> {
        self.get_mut(ifindex)?.set_oper_state(state);
        Ok(())
    }
}
