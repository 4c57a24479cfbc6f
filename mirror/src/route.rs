// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Routing of mirror copies and outer source selection

use crate::errors::MirrorError;
use net::buffer::PacketBufferMut;
use net::eth::ethtype::EthType;
use net::interface::InterfaceIndex;
use net::packet::Packet;
use net::packet::meta::Dst;
use net::rmirror::{RmirrorHeader, RmirrorHeaderError};
use routing::{
    InterfaceResolver, RequestFlags, RouteError, RouteRequest, RouteResolver, RouteScope,
};
use std::net::Ipv4Addr;
use tracing::trace;

/// Route `destination` and bind the result to `packet`.
///
/// The lookup uses universe scope and requires a next hop the host can send to, so local
/// destinations are refused. On success the packet's route and output interface are replaced
/// and its link protocol becomes transparent ethernet bridging.
pub(crate) fn bind_route<Buf, H>(
    packet: &mut Packet<Buf>,
    host: &H,
    destination: Ipv4Addr,
    tos: u8,
) -> Result<Dst, RouteError>
where
    Buf: PacketBufferMut,
    H: RouteResolver + ?Sized,
{
    let request = RouteRequest::new(destination)
        .with_tos(tos)
        .with_scope(RouteScope::Universe)
        .with_flags(RequestFlags::KNOWN_NEXTHOP);
    let dst = host.route(&request)?;
    let meta = packet.get_meta_mut();
    meta.dst = Some(dst);
    meta.oif = Some(dst.oif());
    meta.protocol = EthType::TEB;
    trace!(
        "{destination} routed via {oif}, gateway {gw:?}",
        oif = dst.oif(),
        gw = dst.gateway()
    );
    Ok(dst)
}

/// Set the outer IPv4 source of an encapsulated copy to the primary address of `oif`,
/// refreshing the checksum.
pub(crate) fn set_outer_source<Buf, H>(
    packet: &mut Packet<Buf>,
    host: &H,
    oif: InterfaceIndex,
) -> Result<Ipv4Addr, MirrorError>
where
    Buf: PacketBufferMut,
    H: InterfaceResolver + ?Sized,
{
    let source = host
        .primary_address(oif)
        .ok_or(MirrorError::NoLocalAddress(oif))?;
    let offset = packet.offsets().network.unwrap_or(0);
    let outer = packet.data_mut().get_mut(offset..).unwrap_or_default();
    let mut header = RmirrorHeader::decode(outer)?;
    header.ip_mut().set_source(source);
    header
        .encode_into(outer)
        .map_err(RmirrorHeaderError::from)?;
    Ok(source)
}
