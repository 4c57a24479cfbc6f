// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Forwarding information base

pub mod request;

use crate::errors::{RouteError, RouterError};
use crate::fib::request::RouteRequest;
use ipnet::Ipv4Net;
use net::interface::InterfaceIndex;
use prefix_trie::PrefixMap;
use std::fmt::Display;
use std::net::Ipv4Addr;
use tracing::{debug, trace};

/// How far away a route's destination is.
///
/// A lookup only considers routes whose scope is at least as narrow as the scope requested.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RouteScope {
    #[default]
    Universe = 0,
    Site = 200,
    Link = 253,
    Host = 254,
    Nowhere = 255,
}

/// What happens to traffic matching a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RouteType {
    #[default]
    Unicast,
    Local,
    Blackhole,
    Unreachable,
    Prohibit,
}

impl RouteType {
    /// Types which send traffic out of an interface.
    #[must_use]
    pub fn needs_interface(self) -> bool {
        matches!(self, RouteType::Unicast | RouteType::Local)
    }
}

/// A route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub prefix: Ipv4Net,
    pub rtype: RouteType,
    pub scope: RouteScope,
    pub oif: Option<InterfaceIndex>,
    pub gateway: Option<Ipv4Addr>,
    /// Only match lookups with this TOS, if set.
    pub tos: Option<u8>,
    pub metric: u32,
}

impl Route {
    /// A unicast route out of `oif`, via `gateway` when set.
    #[must_use]
    pub fn unicast(prefix: Ipv4Net, oif: InterfaceIndex, gateway: Option<Ipv4Addr>) -> Self {
        let scope = if gateway.is_some() {
            RouteScope::Universe
        } else {
            RouteScope::Link
        };
        Self {
            prefix: prefix.trunc(),
            rtype: RouteType::Unicast,
            scope,
            oif: Some(oif),
            gateway,
            tos: None,
            metric: 0,
        }
    }

    /// A host route for an address owned by `oif`.
    #[must_use]
    pub fn local(address: Ipv4Addr, oif: InterfaceIndex) -> Self {
        Self {
            prefix: Ipv4Net::from(address),
            rtype: RouteType::Local,
            scope: RouteScope::Host,
            oif: Some(oif),
            gateway: None,
            tos: None,
            metric: 0,
        }
    }

    /// A route which does not forward: blackhole, unreachable or prohibit.
    #[must_use]
    pub fn reject(prefix: Ipv4Net, rtype: RouteType) -> Self {
        Self {
            prefix: prefix.trunc(),
            rtype,
            scope: RouteScope::Universe,
            oif: None,
            gateway: None,
            tos: None,
            metric: 0,
        }
    }

    #[must_use]
    pub fn with_tos(mut self, tos: u8) -> Self {
        self.tos = Some(tos & RouteRequest::TOS_MASK);
        self
    }

    #[must_use]
    pub fn with_metric(mut self, metric: u32) -> Self {
        self.metric = metric;
        self
    }

    fn matches(&self, request: &RouteRequest) -> bool {
        self.scope >= request.scope && self.tos.is_none_or(|tos| tos == request.tos)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?} scope {:?}", self.prefix, self.rtype, self.scope)?;
        if let Some(gateway) = self.gateway {
            write!(f, " via {gateway}")?;
        }
        if let Some(oif) = self.oif {
            write!(f, " dev {oif}")?;
        }
        if let Some(tos) = self.tos {
            write!(f, " tos {tos:#04x}")?;
        }
        write!(f, " metric {}", self.metric)
    }
}

/// Routes keyed by prefix. Several routes may share a prefix; TOS specific routes are kept
/// ahead of the others, then ordering is by metric.
#[derive(Clone, Default)]
pub struct Fib {
    routes: PrefixMap<Ipv4Net, Vec<Route>>,
}

impl std::fmt::Debug for Fib {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Fib {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    //////////////////////////////////////////////////////////////////
    /// Add a route. A route with an identical prefix, type, tos and
    /// output interface is replaced.
    //////////////////////////////////////////////////////////////////
    pub fn add_route(&mut self, route: Route) -> Result<(), RouterError> {
        if route.rtype.needs_interface() && route.oif.is_none() {
            return Err(RouterError::MissingInterface(route.prefix));
        }
        debug!("Adding route {route}");
        let prefix = route.prefix.trunc();
        if let Some(routes) = self.routes.get_mut(&prefix) {
            routes.retain(|r| {
                !(r.rtype == route.rtype && r.tos == route.tos && r.oif == route.oif)
            });
            routes.push(route);
            routes.sort_by_key(|r| (r.tos.is_none(), r.metric));
        } else {
            self.routes.insert(prefix, vec![route]);
        }
        Ok(())
    }

    //////////////////////////////////////////////////////////////////
    /// Remove the routes for `prefix` out of `oif` (all of them if
    /// `oif` is `None`).
    //////////////////////////////////////////////////////////////////
    pub fn del_route(
        &mut self,
        prefix: Ipv4Net,
        oif: Option<InterfaceIndex>,
    ) -> Result<(), RouterError> {
        let prefix = prefix.trunc();
        let Some(routes) = self.routes.get_mut(&prefix) else {
            return Err(RouterError::NoSuchRoute(prefix));
        };
        let before = routes.len();
        routes.retain(|r| oif.is_some_and(|oif| r.oif != Some(oif)));
        if routes.len() == before {
            return Err(RouterError::NoSuchRoute(prefix));
        }
        if routes.is_empty() {
            self.routes.remove(&prefix);
        }
        debug!("Removed route(s) to {prefix}");
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.iter().map(|(_, routes)| routes.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().flat_map(|(_, routes)| routes.iter())
    }

    //////////////////////////////////////////////////////////////////
    /// Longest prefix match. If no route of the most specific prefix
    /// qualifies (scope, tos), less specific prefixes are tried.
    //////////////////////////////////////////////////////////////////
    pub fn lookup(&self, request: &RouteRequest) -> Result<&Route, RouteError> {
        let destination = request.destination;
        let mut probe = Ipv4Net::from(destination);
        while let Some((prefix, routes)) = self.routes.get_lpm(&probe) {
            if let Some(route) = routes.iter().find(|r| r.matches(request)) {
                trace!("Lookup for {destination} matched {route}");
                return Ok(route);
            }
            let Some(shorter) = prefix.prefix_len().checked_sub(1) else {
                break;
            };
            probe = Ipv4Net::new(destination, shorter)
                .map_err(|_| RouteError::NoRoute(destination))?
                .trunc();
        }
        Err(RouteError::NoRoute(destination))
    }
}
