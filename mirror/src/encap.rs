// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! GRE encapsulation of mirror copies

use crate::errors::EncapError;
use crate::ident::IdentGenerator;
use crate::route::bind_route;
use crate::target::MirrorTarget;
use net::buffer::PacketBufferMut;
use net::eth::Eth;
use net::eth::ethtype::EthType;
use net::eth::mac::Mac;
use net::interface::InterfaceIndex;
use net::ipv4::Ipv4;
use net::packet::Packet;
use net::packet::meta::LinkLayer;
use net::parse::{DeParse, DeParseError, LengthError};
use net::rmirror::RmirrorHeader;
use routing::{InterfaceResolver, RouteResolver};
use std::convert::Infallible;
use std::net::Ipv4Addr;
use tracing::{debug, trace};

#[allow(clippy::cast_possible_truncation)]
const ETH_LEN: u16 = Eth::LEN as u16;
#[allow(clippy::cast_possible_truncation)]
const OUTER_LEN: u16 = RmirrorHeader::LEN as u16;

/// A copy wrapped in its outer header
pub(crate) struct Encapsulated<Buf: PacketBufferMut> {
    pub(crate) packet: Packet<Buf>,
    /// The inner ethernet header was synthesized with a zero destination, which must be filled
    /// in once the inner destination's neighbor is known.
    pub(crate) pending_link_rewrite: bool,
}

/// Wrap `packet` as `outer IPv4 | GRE | ethernet | original datagram`.
///
/// `inner_destination` is the destination of the original datagram.
/// A packet received with an ethernet header keeps it as inner ethernet header. A locally
/// generated one gets a synthesized header, sourced from the MAC of its output interface,
/// which is looked up first if the packet has none.
/// Everything but the IPv4 source of the outer header is filled in, with a valid checksum.
pub(crate) fn encapsulate<Buf, H>(
    mut packet: Packet<Buf>,
    target: &MirrorTarget,
    inner_destination: Ipv4Addr,
    host: &H,
    idents: &IdentGenerator,
) -> Result<Encapsulated<Buf>, EncapError>
where
    Buf: PacketBufferMut,
    H: RouteResolver + InterfaceResolver + ?Sized,
{
    let (eth, pending_link_rewrite) = match packet.link() {
        LinkLayer::AlreadyFramed(eth) => (eth.clone(), false),
        LinkLayer::Unframed => {
            let oif = match packet.get_meta().oif {
                Some(oif) => oif,
                None => provisional_oif(&mut packet, inner_destination, host)?,
            };
            let mac = host
                .interface_mac(oif)
                .ok_or(EncapError::NoInterfaceMac(oif))?;
            (Eth::new(mac, Mac::ZERO, EthType::IPV4), true)
        }
    };

    let mut packet = packet.ensure_headroom(ETH_LEN + OUTER_LEN)?;
    eth.write(packet.push(ETH_LEN)?).map_err(length_only)?;
    // the ethernet header is payload from here on, the outer packet is a plain datagram
    packet.set_link(LinkLayer::Unframed);

    packet.get_meta_mut().encapsulation = true;
    packet.reset_inner_headers();
    packet.push(OUTER_LEN)?;

    let trim_length = target.trim_length();
    if trim_length > 0 {
        let keep = usize::try_from(trim_length).unwrap_or(usize::MAX);
        packet.trim(RmirrorHeader::LEN.saturating_add(keep));
    }

    let total_len = u16::try_from(packet.len()).map_err(|_| EncapError::TooLong(packet.len()))?;
    let identification = idents.next(target.destination(), Ipv4::PROTO_GRE);
    RmirrorHeader::new(target.destination(), total_len, identification)
        .encode_into(packet.data_mut())?;
    packet.reset_network_header();
    trace!(
        "encapsulated {total_len} bytes towards {dst}, ident {identification:#06x}",
        dst = target.destination()
    );
    Ok(Encapsulated {
        packet,
        pending_link_rewrite,
    })
}

/// Route the inner destination to find the interface an unframed packet would leave through.
fn provisional_oif<Buf, H>(
    packet: &mut Packet<Buf>,
    inner_destination: Ipv4Addr,
    host: &H,
) -> Result<InterfaceIndex, EncapError>
where
    Buf: PacketBufferMut,
    H: RouteResolver + ?Sized,
{
    let tos = packet.ipv4().map_or(0, |ip| ip.tos());
    match bind_route(packet, host, inner_destination, tos) {
        Ok(dst) => Ok(dst.oif()),
        Err(e) => {
            debug!("no provisional route for unframed packet: {e}");
            Err(EncapError::NoEgressInterface(inner_destination))
        }
    }
}

fn length_only(e: DeParseError<Infallible>) -> LengthError {
    match e {
        DeParseError::Length(e) => e,
        DeParseError::Invalid(never) => match never {},
    }
}
