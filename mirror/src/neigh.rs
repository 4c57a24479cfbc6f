// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Inner destination MAC of synthesized ethernet headers

use net::buffer::PacketBufferMut;
use net::eth::mac::Mac;
use net::packet::Packet;
use net::packet::meta::Dst;
use routing::NeighborResolver;
use std::net::Ipv4Addr;
use tracing::debug;

/// The link layer address the original datagram would have been sent to.
///
/// `dst` is the route bound to the packet when its ethernet header was synthesized.
/// Returns `None` if there is no such route or its next hop is not resolved.
pub(crate) fn resolve_inner_destination<H>(
    host: &H,
    dst: Option<&Dst>,
    destination: Ipv4Addr,
) -> Option<Mac>
where
    H: NeighborResolver + ?Sized,
{
    let mac = dst.and_then(|dst| host.neighbor(dst, destination));
    if mac.is_none() {
        debug!("no neighbor for inner destination {destination}");
    }
    mac
}

/// Write `mac` as destination of the inner ethernet header.
///
/// Bytes removed by trimming are not written back.
pub(crate) fn rewrite_inner_destination<Buf: PacketBufferMut>(packet: &mut Packet<Buf>, mac: Mac) {
    let Some(offset) = packet.offsets().inner_mac else {
        return;
    };
    let data = packet.data_mut();
    let end = offset.saturating_add(mac.0.len()).min(data.len());
    if let Some(field) = data.get_mut(offset..end) {
        let len = field.len();
        field.copy_from_slice(&mac.0[..len]);
    }
}
