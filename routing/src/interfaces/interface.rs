// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Network interface model

use ipnet::Ipv4Net;
use net::eth::mac::Mac;
use net::interface::InterfaceIndex;
use std::net::Ipv4Addr;

#[allow(unused)]
use tracing::{debug, error, info};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum IfState {
    #[default]
    Unknown = 0,
    Down = 1,
    Up = 2,
}

/// An object representing the configuration for an [`Interface`]
#[derive(Clone, Debug, PartialEq)]
pub struct RouterInterfaceConfig {
    pub ifindex: InterfaceIndex, /* ifindex of kernel interface (key) */
    pub name: String,            /* name of interface */
    pub mac: Mac,                /* link layer address */
    pub admin_state: IfState,    /* admin state */
}
impl RouterInterfaceConfig {
    #[must_use]
    pub fn new(name: &str, ifindex: InterfaceIndex, mac: Mac) -> Self {
        Self {
            ifindex,
            name: name.to_owned(),
            mac,
            admin_state: IfState::Up,
        }
    }
    pub fn set_admin_state(&mut self, state: IfState) {
        self.admin_state = state;
    }
}

#[derive(Debug, Clone)]
/// An object representing a network interface and its state
pub struct Interface {
    pub name: String,
    pub ifindex: InterfaceIndex,
    pub mac: Mac,
    pub admin_state: IfState,
    /* -- state -- */
    pub oper_state: IfState,
    /// Addresses in the order they were assigned. The first one is the primary address.
    pub addresses: Vec<Ipv4Net>,
}

impl Interface {
    //////////////////////////////////////////////////////////////////
    /// Create an [`Interface`] object from [`RouterInterfaceConfig`]
    //////////////////////////////////////////////////////////////////
    #[must_use]
    pub fn new(config: &RouterInterfaceConfig) -> Self {
        Interface {
            name: config.name.clone(),
            ifindex: config.ifindex,
            mac: config.mac,
            admin_state: config.admin_state,
            oper_state: IfState::Unknown,
            addresses: Vec::new(),
        }
    }

    //////////////////////////////////////////////////////////////////
    /// An interface can carry traffic if it is administratively up and
    /// not known to be operationally down.
    //////////////////////////////////////////////////////////////////
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.admin_state == IfState::Up && self.oper_state != IfState::Down
    }

    pub fn set_oper_state(&mut self, state: IfState) {
        if self.oper_state != state {
            debug!(
                "Interface {} changed oper state {:?} -> {:?}",
                self.name, self.oper_state, state
            );
            self.oper_state = state;
        }
    }

    /// The first address assigned to the interface.
    #[must_use]
    pub fn primary_address(&self) -> Option<Ipv4Addr> {
        self.addresses.first().map(Ipv4Net::addr)
    }

    pub fn add_ifaddr(&mut self, ifaddr: Ipv4Net) {
        if !self.addresses.contains(&ifaddr) {
            self.addresses.push(ifaddr);
        }
    }

    pub fn del_ifaddr(&mut self, ifaddr: &Ipv4Net) {
        self.addresses.retain(|a| a != ifaddr);
    }
}
