// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Connection tracking bypass for mirror copies

use net::buffer::PacketBufferMut;
use net::packet::Packet;
use net::packet::meta::Conntrack;
use tracing::trace;

/// Detach `packet` from any tracked connection and mark it untracked.
///
/// The copy then neither holds a reference on the original's connection entry nor creates a
/// new one when it traverses the output path.
pub(crate) fn bypass<Buf: PacketBufferMut>(packet: &mut Packet<Buf>) {
    let meta = packet.get_meta_mut();
    if let Conntrack::Tracked(entry) = &meta.conntrack {
        trace!("releasing conntrack entry {} of mirror copy", entry.id());
    }
    meta.conntrack = Conntrack::Untracked;
}
