// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Module that implements a router instance

use crate::adjacency::{Adjacency, AdjacencyTable};
use crate::errors::{RouteError, RouterError};
use crate::fib::request::{RequestFlags, RouteRequest};
use crate::fib::{Fib, Route, RouteType};
use crate::interfaces::iftable::IfTable;
use crate::interfaces::interface::{IfState, RouterInterfaceConfig};
use crate::resolver::{InterfaceResolver, NeighborResolver, RouteResolver};
use arc_swap::{ArcSwap, Guard};
use derive_builder::Builder;
use ipnet::Ipv4Net;
use net::eth::mac::Mac;
use net::interface::InterfaceIndex;
use net::packet::meta::Dst;
use std::fmt::Display;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, info};

/// The routing state of the host: interfaces, routes and neighbors.
#[derive(Debug, Clone, Default)]
pub struct RoutingTables {
    iftable: IfTable,
    fib: Fib,
    atable: AdjacencyTable,
}

impl RoutingTables {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn iftable(&self) -> &IfTable {
        &self.iftable
    }
    #[must_use]
    pub fn fib(&self) -> &Fib {
        &self.fib
    }
    #[must_use]
    pub fn atable(&self) -> &AdjacencyTable {
        &self.atable
    }

    pub fn add_interface(&mut self, config: &RouterInterfaceConfig) -> Result<(), RouterError> {
        self.iftable.add_interface(config)
    }

    //////////////////////////////////////////////////////////////////
    /// Remove an interface, along with the routes and neighbors that
    /// use it.
    //////////////////////////////////////////////////////////////////
    pub fn del_interface(&mut self, ifindex: InterfaceIndex) {
        let stale: Vec<Ipv4Net> = self
            .fib
            .iter()
            .filter(|r| r.oif == Some(ifindex))
            .map(|r| r.prefix)
            .collect();
        for prefix in stale {
            let _ = self.fib.del_route(prefix, Some(ifindex));
        }
        let neighbors: Vec<Ipv4Addr> = self
            .atable
            .iter()
            .filter(|a| a.ifindex() == ifindex)
            .map(Adjacency::address)
            .collect();
        for address in neighbors {
            self.atable.del_adjacency(address, ifindex);
        }
        self.iftable.del_interface(ifindex);
    }

    //////////////////////////////////////////////////////////////////
    /// Assign an address to an interface. This installs a local host
    /// route for the address and a connected route for its subnet.
    //////////////////////////////////////////////////////////////////
    pub fn add_ifaddr(&mut self, ifindex: InterfaceIndex, ifaddr: Ipv4Net) -> Result<(), RouterError> {
        self.iftable.add_ifaddr(ifindex, ifaddr)?;
        self.fib.add_route(Route::local(ifaddr.addr(), ifindex))?;
        if ifaddr.prefix_len() < 32 {
            self.fib
                .add_route(Route::unicast(ifaddr.trunc(), ifindex, None))?;
        }
        Ok(())
    }

    pub fn del_ifaddr(&mut self, ifindex: InterfaceIndex, ifaddr: Ipv4Net) {
        self.iftable.del_ifaddr(ifindex, &ifaddr);
        let _ = self.fib.del_route(Ipv4Net::from(ifaddr.addr()), Some(ifindex));
        if ifaddr.prefix_len() < 32 {
            let _ = self.fib.del_route(ifaddr.trunc(), Some(ifindex));
        }
    }

    pub fn set_oper_state(&mut self, ifindex: InterfaceIndex, state: IfState) -> Result<(), RouterError> {
        self.iftable.set_oper_state(ifindex, state)
    }

    pub fn add_route(&mut self, route: Route) -> Result<(), RouterError> {
        self.fib.add_route(route)
    }

    pub fn del_route(&mut self, prefix: Ipv4Net, oif: Option<InterfaceIndex>) -> Result<(), RouterError> {
        self.fib.del_route(prefix, oif)
    }

    pub fn add_adjacency(&mut self, adjacency: Adjacency) {
        self.atable.add_adjacency(adjacency);
    }

    pub fn del_adjacency(&mut self, address: Ipv4Addr, ifindex: InterfaceIndex) {
        self.atable.del_adjacency(address, ifindex);
    }
}

impl RouteResolver for RoutingTables {
    fn route(&self, request: &RouteRequest) -> Result<Dst, RouteError> {
        let destination = request.destination;
        let route = self.fib.lookup(request)?;
        match route.rtype {
            RouteType::Unicast => {}
            RouteType::Local => {
                if request.flags.contains(RequestFlags::KNOWN_NEXTHOP) {
                    return Err(RouteError::LocalDestination(destination));
                }
            }
            RouteType::Blackhole => return Err(RouteError::Blackhole(destination)),
            RouteType::Unreachable => return Err(RouteError::Unreachable(destination)),
            RouteType::Prohibit => return Err(RouteError::Prohibited(destination)),
        }
        let Some(oif) = route.oif else {
            return Err(RouteError::NoRoute(destination));
        };
        let iface = self
            .iftable
            .get_interface(oif)
            .ok_or(RouteError::NoSuchInterface(oif))?;
        if !iface.is_up() {
            return Err(RouteError::InterfaceDown(oif));
        }
        Ok(Dst::new(oif, route.gateway))
    }
}

impl NeighborResolver for RoutingTables {
    fn neighbor(&self, dst: &Dst, destination: Ipv4Addr) -> Option<Mac> {
        self.atable
            .get_adjacency(dst.next_hop(destination), dst.oif())
            .map(Adjacency::mac)
    }
}

impl InterfaceResolver for RoutingTables {
    fn interface_mac(&self, ifindex: InterfaceIndex) -> Option<Mac> {
        self.iftable.get_interface(ifindex).map(|iface| iface.mac)
    }

    fn primary_address(&self, ifindex: InterfaceIndex) -> Option<Ipv4Addr> {
        self.iftable
            .get_interface(ifindex)
            .and_then(|iface| iface.primary_address())
    }
}

/// Struct to configure router object. N.B we derive a builder type `RouterParamsBuilder`
/// and provide defaults for each field.
#[derive(Builder, Debug)]
pub struct RouterParams {
    #[builder(setter(into), default = "router".to_string())]
    name: String,

    /// Routing state published when the router starts.
    #[builder(default)]
    tables: RoutingTables,
}

impl Display for RouterParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        writeln!(f, "Router config")?;
        writeln!(f, "  name         : {}", self.name)?;
        writeln!(f, "  interfaces   : {}", self.tables.iftable.len())?;
        writeln!(f, "  routes       : {}", self.tables.fib.len())?;
        writeln!(f, "  adjacencies  : {}", self.tables.atable.len())?;
        Ok(())
    }
}

/// The writer of routing state.
///
/// Each update builds a new snapshot and publishes it atomically; readers never block and
/// never observe a partial update.
pub struct Router {
    name: String,
    tables: Arc<ArcSwap<RoutingTables>>,
}

impl Router {
    #[must_use]
    pub fn new(params: RouterParams) -> Router {
        info!("Starting router with params:\n{params}");
        Router {
            name: params.name,
            tables: Arc::new(ArcSwap::from_pointee(params.tables)),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A handle for packet workers.
    #[must_use]
    pub fn reader(&self) -> RouterReader {
        RouterReader {
            tables: self.tables.clone(),
        }
    }

    /// Apply `f` to a copy of the current state and publish the result.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut RoutingTables) -> R) -> R {
        let mut next = RoutingTables::clone(&self.tables.load());
        let result = f(&mut next);
        self.tables.store(Arc::new(next));
        debug!("Router '{}' published new routing state", self.name);
        result
    }
}

/// Read access to the routing state published by a [`Router`].
#[derive(Clone, Debug)]
pub struct RouterReader {
    tables: Arc<ArcSwap<RoutingTables>>,
}

impl RouterReader {
    /// The current snapshot.
    #[must_use]
    pub fn load(&self) -> Guard<Arc<RoutingTables>> {
        self.tables.load()
    }
}

impl RouteResolver for RouterReader {
    fn route(&self, request: &RouteRequest) -> Result<Dst, RouteError> {
        self.load().route(request)
    }
}

impl NeighborResolver for RouterReader {
    fn neighbor(&self, dst: &Dst, destination: Ipv4Addr) -> Option<Mac> {
        self.load().neighbor(dst, destination)
    }
}

impl InterfaceResolver for RouterReader {
    fn interface_mac(&self, ifindex: InterfaceIndex) -> Option<Mac> {
        self.load().interface_mac(ifindex)
    }

    fn primary_address(&self, ifindex: InterfaceIndex) -> Option<Ipv4Addr> {
        self.load().primary_address(ifindex)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fib::RouteScope;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    fn idx(n: u32) -> InterfaceIndex {
        InterfaceIndex::try_new(n).unwrap()
    }

    fn tables() -> RoutingTables {
        let mut tables = RoutingTables::new();
        tables
            .add_interface(&RouterInterfaceConfig::new("eth0", idx(1), Mac([2, 0, 0, 0, 0, 1])))
            .unwrap();
        tables
            .add_ifaddr(idx(1), "10.0.0.1/24".parse().unwrap())
            .unwrap();
        tables
            .add_route(Route::unicast(
                "172.16.0.0/12".parse().unwrap(),
                idx(1),
                Some(Ipv4Addr::new(10, 0, 0, 254)),
            ))
            .unwrap();
        tables
            .add_route(Route::reject("192.0.2.0/24".parse().unwrap(), RouteType::Blackhole))
            .unwrap();
        tables
            .add_route(Route::reject("198.51.100.0/24".parse().unwrap(), RouteType::Prohibit))
            .unwrap();
        tables.add_adjacency(Adjacency::new(
            Ipv4Addr::new(10, 0, 0, 254),
            idx(1),
            Mac([0x66, 0, 0, 0, 0, 0xfe]),
        ));
        tables
    }

    fn mirror_request(destination: Ipv4Addr) -> RouteRequest {
        RouteRequest::new(destination)
            .with_scope(RouteScope::Universe)
            .with_flags(RequestFlags::KNOWN_NEXTHOP)
    }

    #[test]
    #[traced_test]
    fn connected_and_gateway_routes() {
        let tables = tables();
        let dst = tables.route(&mirror_request(Ipv4Addr::new(10, 0, 0, 5))).unwrap();
        assert_eq!(dst, Dst::new(idx(1), None));
        let dst = tables.route(&mirror_request(Ipv4Addr::new(172, 16, 3, 4))).unwrap();
        assert_eq!(dst, Dst::new(idx(1), Some(Ipv4Addr::new(10, 0, 0, 254))));
        assert_eq!(
            tables.neighbor(&dst, Ipv4Addr::new(172, 16, 3, 4)),
            Some(Mac([0x66, 0, 0, 0, 0, 0xfe]))
        );
        assert_eq!(tables.primary_address(idx(1)), Some(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(tables.interface_mac(idx(1)), Some(Mac([2, 0, 0, 0, 0, 1])));
    }

    #[test]
    #[traced_test]
    fn rejected_destinations() {
        let tables = tables();
        let local = Ipv4Addr::new(10, 0, 0, 1);
        assert_eq!(
            tables.route(&mirror_request(local)),
            Err(RouteError::LocalDestination(local))
        );
        assert_eq!(
            tables.route(&RouteRequest::new(local)),
            Ok(Dst::new(idx(1), None))
        );
        let sink = Ipv4Addr::new(192, 0, 2, 9);
        assert_eq!(tables.route(&mirror_request(sink)), Err(RouteError::Blackhole(sink)));
        let denied = Ipv4Addr::new(198, 51, 100, 9);
        assert_eq!(
            tables.route(&mirror_request(denied)),
            Err(RouteError::Prohibited(denied))
        );
        let nowhere = Ipv4Addr::new(8, 8, 8, 8);
        assert_eq!(tables.route(&mirror_request(nowhere)), Err(RouteError::NoRoute(nowhere)));
    }

    #[test]
    #[traced_test]
    fn down_interface_not_used() {
        let mut tables = tables();
        tables.set_oper_state(idx(1), IfState::Down).unwrap();
        assert_eq!(
            tables.route(&mirror_request(Ipv4Addr::new(10, 0, 0, 5))),
            Err(RouteError::InterfaceDown(idx(1)))
        );
    }

    #[test]
    #[traced_test]
    fn readers_see_published_updates() {
        let mut router = Router::new(
            RouterParamsBuilder::default()
                .name("test-router")
                .tables(tables())
                .build()
                .unwrap(),
        );
        let reader = router.reader();
        let before = reader.load();
        router.update(|t| t.del_interface(idx(1)));
        assert_eq!(
            reader.route(&mirror_request(Ipv4Addr::new(10, 0, 0, 5))),
            Err(RouteError::NoRoute(Ipv4Addr::new(10, 0, 0, 5)))
        );
        // snapshot taken earlier is untouched
        assert!(before.iftable().contains(idx(1)));
        assert_eq!(router.name(), "test-router");
    }

    #[test]
    #[traced_test]
    fn del_ifaddr_removes_routes() {
        let mut tables = tables();
        tables.del_ifaddr(idx(1), "10.0.0.1/24".parse().unwrap());
        assert_eq!(tables.primary_address(idx(1)), None);
        assert_eq!(
            tables.route(&mirror_request(Ipv4Addr::new(10, 0, 0, 5))),
            Err(RouteError::NoRoute(Ipv4Addr::new(10, 0, 0, 5)))
        );
    }
}
