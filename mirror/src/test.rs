// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Mirror engine scenarios

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::context::WorkerContext;
use crate::engine::Rmirror;
use crate::nf::MirrorStage;
use crate::output::{LocalOut, PktQueue, TxError};
use crate::stats::MirrorStatsSnapshot;
use crate::target::MirrorTarget;
use net::buffer::{
    Append, BufferAllocationError, DuplicateBuffer, GrowHeadroom, HeapBuffer, Headroom,
    NotEnoughHeadRoom, Prepend, Tailroom, TrimFromEnd, TrimFromStart,
};
use net::eth::Eth;
use net::eth::ethtype::EthType;
use net::eth::mac::Mac;
use net::interface::InterfaceIndex;
use net::packet::Packet;
use net::packet::meta::{ConnEntry, Conntrack, Dst, LinkLayer};
use net::packet::test_utils::{
    build_test_datagram_packet, build_test_framed_packet, build_test_ipv4_datagram,
    ones_complement_sum,
};
use net::parse::DeParse;
use net::rmirror::RmirrorHeader;
use pipeline::{NetworkFunction, Verdict, run_pipeline};
use pretty_assertions::assert_eq;
use routing::{
    Adjacency, IfState, Route, Router, RouterInterfaceConfig, RouterParamsBuilder, RoutingTables,
};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing_test::traced_test;

const COLLECTOR: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 5);
const ETH0_MAC: Mac = Mac([0x02, 0, 0, 0, 0, 0x01]);
const ETH1_MAC: Mac = Mac([0x02, 0, 0, 0, 0, 0x02]);
const ETH2_MAC: Mac = Mac([0x02, 0, 0, 0, 0, 0x03]);
const NEIGHBOR_MAC: Mac = Mac([0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb]);
const PEER_MAC: Mac = Mac([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);

fn idx(n: u32) -> InterfaceIndex {
    InterfaceIndex::try_new(n).unwrap()
}

/// eth0 (10.0.0.1/24) faces the collector, eth1 (192.168.1.254/24) a server network with one
/// resolved neighbor, eth2 has no address at all.
fn host() -> RoutingTables {
    let mut tables = RoutingTables::new();
    for (name, n, mac) in [("eth0", 1, ETH0_MAC), ("eth1", 2, ETH1_MAC), ("eth2", 3, ETH2_MAC)] {
        tables
            .add_interface(&RouterInterfaceConfig::new(name, idx(n), mac))
            .unwrap();
    }
    tables
        .add_ifaddr(idx(1), "10.0.0.1/24".parse().unwrap())
        .unwrap();
    tables
        .add_ifaddr(idx(2), "192.168.1.254/24".parse().unwrap())
        .unwrap();
    tables
        .add_route(Route::unicast("172.16.0.0/24".parse().unwrap(), idx(3), None))
        .unwrap();
    tables
        .add_route(Route::unicast(
            "172.20.0.0/16".parse().unwrap(),
            idx(2),
            Some(Ipv4Addr::new(192, 168, 1, 1)),
        ))
        .unwrap();
    tables.add_adjacency(Adjacency::new(
        Ipv4Addr::new(192, 168, 1, 1),
        idx(2),
        NEIGHBOR_MAC,
    ));
    tables
}

fn framed(total_len: usize) -> Packet<HeapBuffer> {
    build_test_framed_packet(PEER_MAC, NEIGHBOR_MAC, "192.168.1.10", "192.168.1.1", total_len)
}

/// Mirror `packet` once with a fresh engine and return the engine and whatever was sent.
fn mirror_once(
    packet: &Packet<HeapBuffer>,
    target: MirrorTarget,
) -> (Rmirror<RoutingTables>, Vec<Packet<HeapBuffer>>) {
    let engine = Rmirror::new(host());
    let ctx = WorkerContext::new(0);
    let mut out = Vec::new();
    assert_eq!(engine.target(&ctx, packet, &target, &mut out), Verdict::Continue);
    assert!(!ctx.is_mirroring());
    (engine, out)
}

fn assert_outer_header(copy: &Packet<HeapBuffer>, source: Ipv4Addr, destination: Ipv4Addr) {
    let outer = RmirrorHeader::decode(copy.data()).unwrap();
    assert_eq!(outer.ip().source(), source);
    assert_eq!(outer.ip().destination(), destination);
    assert_eq!(usize::from(outer.ip().total_len()), copy.len());
    assert_eq!(outer.ip().ttl(), 255);
    assert_eq!(outer.ip().tos(), 0);
    // may be fragmented on the way to the collector
    assert_eq!(&copy.data()[6..8], &[0, 0]);
    assert!(outer.ip().checksum_is_valid());
    assert_eq!(ones_complement_sum(&copy.data()[..20]), 0xffff);
    assert_eq!(outer.gre().protocol(), EthType::TEB);
    assert_eq!(&copy.data()[20..24], &[0, 0, 0x65, 0x58]);
}

fn eth_bytes(source: Mac, destination: Mac) -> Vec<u8> {
    let mut bytes = vec![0u8; Eth::LEN];
    Eth::new(source, destination, EthType::IPV4)
        .write(&mut bytes)
        .unwrap();
    bytes
}

#[test]
#[traced_test]
fn framed_packet_mirrored_whole() {
    let packet = framed(100);
    let datagram = packet.data().to_vec();
    let (engine, out) = mirror_once(&packet, MirrorTarget::new(COLLECTOR, 0));

    assert_eq!(out.len(), 1);
    let copy = &out[0];
    assert_eq!(copy.len(), 138);
    assert_outer_header(copy, Ipv4Addr::new(10, 0, 0, 1), COLLECTOR);
    assert_eq!(&copy.data()[24..38], eth_bytes(PEER_MAC, NEIGHBOR_MAC).as_slice());
    assert_eq!(&copy.data()[38..], datagram.as_slice());

    let meta = copy.get_meta();
    assert_eq!(meta.protocol, EthType::TEB);
    assert_eq!(meta.oif, Some(idx(1)));
    assert_eq!(meta.dst, Some(Dst::new(idx(1), None)));
    assert_eq!(meta.conntrack, Conntrack::Untracked);
    assert!(meta.encapsulation);
    assert!(meta.mirrored);
    assert_eq!(copy.link(), &LinkLayer::Unframed);
    assert_eq!(copy.offsets().network, Some(0));
    assert_eq!(copy.offsets().inner_mac, Some(24));
    assert_eq!(copy.offsets().inner_network, Some(38));

    assert_eq!(
        engine.stats().snapshot(),
        MirrorStatsSnapshot {
            mirrored: 1,
            ..Default::default()
        }
    );
}

#[test]
#[traced_test]
fn original_left_untouched() {
    let entry = Arc::new(ConnEntry::new(9));
    let mut packet = framed(100);
    packet.get_meta_mut().conntrack = Conntrack::Tracked(entry.clone());
    let data = packet.data().to_vec();
    let link = packet.link().clone();

    let (_, out) = mirror_once(&packet, MirrorTarget::new(COLLECTOR, 40));
    assert_eq!(out.len(), 1);

    assert_eq!(packet.data(), data.as_slice());
    assert_eq!(packet.link(), &link);
    let meta = packet.get_meta();
    assert_eq!(meta.conntrack, Conntrack::Tracked(entry.clone()));
    assert_eq!(meta.protocol, EthType::IPV4);
    assert_eq!(meta.oif, None);
    assert_eq!(meta.dst, None);
    assert!(!meta.encapsulation);
    assert!(!meta.mirrored);

    // the copy holds no reference to the connection
    assert_eq!(out[0].get_meta().conntrack, Conntrack::Untracked);
    assert_eq!(Arc::strong_count(&entry), 2);
    drop(out);
    assert_eq!(Arc::strong_count(&entry), 2);
}

#[test]
#[traced_test]
fn trim_keeps_leading_bytes() {
    let packet = framed(100);
    let (_, full) = mirror_once(&packet, MirrorTarget::new(COLLECTOR, 0));
    let (_, trimmed) = mirror_once(&packet, MirrorTarget::new(COLLECTOR, 40));

    let copy = &trimmed[0];
    assert_eq!(copy.len(), 64);
    assert_outer_header(copy, Ipv4Addr::new(10, 0, 0, 1), COLLECTOR);
    assert_eq!(copy.data()[24..], full[0].data()[24..64]);
}

#[test]
#[traced_test]
fn trim_longer_than_packet_ignored() {
    let packet = framed(100);
    let (_, out) = mirror_once(&packet, MirrorTarget::new(COLLECTOR, 1000));
    assert_eq!(out[0].len(), 138);
    assert_outer_header(&out[0], Ipv4Addr::new(10, 0, 0, 1), COLLECTOR);
}

#[test]
#[traced_test]
fn unframed_packet_gets_synthesized_header() {
    let packet = build_test_datagram_packet("192.168.1.254", "192.168.1.1", 60);
    let datagram = packet.data().to_vec();
    let (engine, out) = mirror_once(&packet, MirrorTarget::new(COLLECTOR, 0));

    let copy = &out[0];
    assert_eq!(copy.len(), 24 + 14 + 60);
    assert_outer_header(copy, Ipv4Addr::new(10, 0, 0, 1), COLLECTOR);
    assert_eq!(&copy.data()[24..38], eth_bytes(ETH1_MAC, NEIGHBOR_MAC).as_slice());
    assert_eq!(&copy.data()[38..], datagram.as_slice());
    // the final route replaces the provisional one
    assert_eq!(copy.get_meta().dst, Some(Dst::new(idx(1), None)));
    assert_eq!(copy.get_meta().oif, Some(idx(1)));
    assert_eq!(engine.stats().snapshot().neighbor_fallbacks, 0);
}

#[test]
#[traced_test]
fn unframed_packet_via_gateway() {
    let packet = build_test_datagram_packet("192.168.1.254", "172.20.3.4", 60);
    let (_, out) = mirror_once(&packet, MirrorTarget::new(COLLECTOR, 0));
    assert_eq!(&out[0].data()[24..38], eth_bytes(ETH1_MAC, NEIGHBOR_MAC).as_slice());
}

#[test]
#[traced_test]
fn unresolved_neighbor_falls_back_to_zero() {
    // headroom full of garbage, so stale bytes would show
    let datagram = build_test_ipv4_datagram("192.168.1.254", "192.168.1.77", 60);
    let mut data = vec![0xff; 64];
    data.extend_from_slice(&datagram);
    let mut buf = HeapBuffer::new(0, &data, 0).unwrap();
    buf.trim_from_start(64).unwrap();
    let packet = Packet::from_datagram(buf);

    let (engine, out) = mirror_once(&packet, MirrorTarget::new(COLLECTOR, 0));
    assert_eq!(&out[0].data()[24..38], eth_bytes(ETH1_MAC, Mac::ZERO).as_slice());
    assert_eq!(&out[0].data()[38..], datagram.as_slice());
    assert_eq!(engine.stats().snapshot().neighbor_fallbacks, 1);
    assert!(logs_contain("no neighbor for inner destination 192.168.1.77"));
}

#[test]
#[traced_test]
fn unframed_packet_with_output_interface() {
    let mut packet = build_test_datagram_packet("192.168.1.254", "192.168.1.1", 60);
    packet.get_meta_mut().oif = Some(idx(3));
    let (engine, out) = mirror_once(&packet, MirrorTarget::new(COLLECTOR, 0));
    // no route was bound to the original, so there is no neighbor to ask
    assert_eq!(&out[0].data()[24..38], eth_bytes(ETH2_MAC, Mac::ZERO).as_slice());
    assert_eq!(engine.stats().snapshot().neighbor_fallbacks, 1);
}

#[test]
#[traced_test]
fn unframed_trim_cuts_inner_destination() {
    let packet = build_test_datagram_packet("192.168.1.254", "192.168.1.1", 60);
    let (_, out) = mirror_once(&packet, MirrorTarget::new(COLLECTOR, 4));
    assert_eq!(out[0].len(), 28);
    assert_eq!(&out[0].data()[24..], &NEIGHBOR_MAC.0[..4]);
    assert_outer_header(&out[0], Ipv4Addr::new(10, 0, 0, 1), COLLECTOR);
}

#[test]
#[traced_test]
fn unframed_packet_without_route_not_mirrored() {
    let packet = build_test_datagram_packet("192.168.1.254", "203.0.113.7", 60);
    let (engine, out) = mirror_once(&packet, MirrorTarget::new(COLLECTOR, 0));
    assert!(out.is_empty());
    assert_eq!(engine.stats().snapshot().invalid, 1);
}

#[test]
#[traced_test]
fn collector_unreachable() {
    let packet = framed(100);
    for collector in [
        Ipv4Addr::new(203, 0, 113, 9),
        // local addresses are not a valid next hop
        Ipv4Addr::new(10, 0, 0, 1),
    ] {
        let (engine, out) = mirror_once(&packet, MirrorTarget::new(collector, 0));
        assert!(out.is_empty());
        assert_eq!(
            engine.stats().snapshot(),
            MirrorStatsSnapshot {
                route_failures: 1,
                ..Default::default()
            }
        );
    }
    assert!(logs_contain("mirror destination unreachable"));
}

#[test]
#[traced_test]
fn collector_behind_down_interface() {
    let mut tables = host();
    tables.set_oper_state(idx(1), IfState::Down).unwrap();
    let engine = Rmirror::new(tables);
    let mut out = Vec::new();
    engine.target(
        &WorkerContext::new(0),
        &framed(100),
        &MirrorTarget::new(COLLECTOR, 0),
        &mut out,
    );
    assert!(out.is_empty());
    assert_eq!(engine.stats().snapshot().route_failures, 1);
}

#[test]
#[traced_test]
fn output_interface_without_address() {
    let target = MirrorTarget::new(Ipv4Addr::new(172, 16, 0, 9), 0);
    let (engine, out) = mirror_once(&framed(100), target);
    assert!(out.is_empty());
    assert_eq!(engine.stats().snapshot().no_local_address, 1);
}

#[test]
#[traced_test]
fn non_ipv4_packet_not_mirrored() {
    let mut frame = vec![0u8; Eth::LEN + 28];
    Eth::new(PEER_MAC, Mac::BROADCAST, EthType::ARP)
        .write(&mut frame)
        .unwrap();
    let packet = Packet::from_frame(HeapBuffer::from_data(&frame).unwrap()).unwrap();
    let (engine, out) = mirror_once(&packet, MirrorTarget::new(COLLECTOR, 0));
    assert!(out.is_empty());
    assert_eq!(engine.stats().snapshot().invalid, 1);
}

#[test]
#[traced_test]
fn identifications_advance() {
    let engine = Rmirror::new(host());
    let ctx = WorkerContext::new(0);
    let target = MirrorTarget::new(COLLECTOR, 0);
    let mut out = Vec::new();
    engine.target(&ctx, &framed(100), &target, &mut out);
    engine.target(&ctx, &framed(100), &target, &mut out);
    let first = RmirrorHeader::decode(out[0].data()).unwrap();
    let second = RmirrorHeader::decode(out[1].data()).unwrap();
    assert_eq!(
        second.ip().identification(),
        first.ip().identification().wrapping_add(1)
    );
}

/// An output path running the mirror rule again on what it sends, as a filter hook on the
/// local output path would.
struct FilteredOut<'a> {
    engine: &'a Rmirror<RoutingTables>,
    ctx: &'a WorkerContext,
    target: MirrorTarget,
    sent: Vec<Packet<HeapBuffer>>,
    nested: Vec<Packet<HeapBuffer>>,
    flag_seen: Vec<bool>,
}

impl LocalOut<HeapBuffer> for FilteredOut<'_> {
    fn local_out(&mut self, packet: Packet<HeapBuffer>) -> Result<(), TxError> {
        self.flag_seen.push(self.ctx.is_mirroring());
        let verdict = self
            .engine
            .target(self.ctx, &packet, &self.target, &mut self.nested);
        assert_eq!(verdict, Verdict::Continue);
        self.sent.push(packet);
        Ok(())
    }
}

#[test]
#[traced_test]
fn copies_not_mirrored_again() {
    let engine = Rmirror::new(host());
    let ctx = WorkerContext::new(0);
    let target = MirrorTarget::new(COLLECTOR, 0);
    let mut out = FilteredOut {
        engine: &engine,
        ctx: &ctx,
        target,
        sent: Vec::new(),
        nested: Vec::new(),
        flag_seen: Vec::new(),
    };
    engine.target(&ctx, &framed(100), &target, &mut out);

    assert_eq!(out.sent.len(), 1);
    assert!(out.nested.is_empty());
    assert_eq!(out.flag_seen, vec![true]);
    assert!(!ctx.is_mirroring());
    assert_eq!(
        engine.stats().snapshot(),
        MirrorStatsSnapshot {
            mirrored: 1,
            skipped: 1,
            ..Default::default()
        }
    );

    // a copy seen by another worker is recognized by its mark
    let other = WorkerContext::new(1);
    let mut nested = Vec::new();
    engine.target(&other, &out.sent[0], &target, &mut nested);
    assert!(nested.is_empty());
    assert_eq!(engine.stats().snapshot().skipped, 2);

    // and the worker mirrors again once the copy is out
    let mut again = Vec::new();
    engine.target(&ctx, &framed(100), &target, &mut again);
    assert_eq!(again.len(), 1);
}

#[test]
#[traced_test]
fn transmit_failure_clears_flag() {
    let engine = Rmirror::new(host());
    let ctx = WorkerContext::new(0);
    let target = MirrorTarget::new(COLLECTOR, 0);
    let mut queue = PktQueue::new(1);
    assert_eq!(engine.target(&ctx, &framed(100), &target, &mut queue), Verdict::Continue);
    assert_eq!(engine.target(&ctx, &framed(100), &target, &mut queue), Verdict::Continue);
    assert!(!ctx.is_mirroring());
    assert_eq!(queue.len(), 1);
    assert_eq!(
        engine.stats().snapshot(),
        MirrorStatsSnapshot {
            mirrored: 1,
            tx_failures: 1,
            ..Default::default()
        }
    );
}

/// A heap buffer which can be told to fail allocations.
#[derive(Debug)]
struct FlakyBuffer {
    inner: HeapBuffer,
    duplicate_fails: bool,
}

impl FlakyBuffer {
    fn frame(headroom: u16, duplicate_fails: bool) -> Packet<FlakyBuffer> {
        let mut frame = eth_bytes(PEER_MAC, NEIGHBOR_MAC);
        frame.extend_from_slice(&build_test_ipv4_datagram("192.168.1.10", "192.168.1.1", 100));
        let inner = HeapBuffer::new(headroom, &frame, 0).unwrap();
        Packet::from_frame(FlakyBuffer {
            inner,
            duplicate_fails,
        })
        .unwrap()
    }
}

impl AsRef<[u8]> for FlakyBuffer {
    fn as_ref(&self) -> &[u8] {
        self.inner.as_ref()
    }
}

impl AsMut<[u8]> for FlakyBuffer {
    fn as_mut(&mut self) -> &mut [u8] {
        self.inner.as_mut()
    }
}

impl Headroom for FlakyBuffer {
    fn headroom(&self) -> u16 {
        self.inner.headroom()
    }
}

impl Tailroom for FlakyBuffer {
    fn tailroom(&self) -> u16 {
        self.inner.tailroom()
    }
}

impl Prepend for FlakyBuffer {
    type Error = NotEnoughHeadRoom;
    fn prepend(&mut self, len: u16) -> Result<&mut [u8], Self::Error> {
        self.inner.prepend(len)
    }
}

impl Append for FlakyBuffer {
    type Error = <HeapBuffer as Append>::Error;
    fn append(&mut self, len: u16) -> Result<&mut [u8], Self::Error> {
        self.inner.append(len)
    }
}

impl TrimFromStart for FlakyBuffer {
    type Error = <HeapBuffer as TrimFromStart>::Error;
    fn trim_from_start(&mut self, len: u16) -> Result<&mut [u8], Self::Error> {
        self.inner.trim_from_start(len)
    }
}

impl TrimFromEnd for FlakyBuffer {
    type Error = <HeapBuffer as TrimFromEnd>::Error;
    fn trim_from_end(&mut self, len: u16) -> Result<&mut [u8], Self::Error> {
        self.inner.trim_from_end(len)
    }
}

impl DuplicateBuffer for FlakyBuffer {
    fn duplicate(&self) -> Result<Self, BufferAllocationError> {
        if self.duplicate_fails {
            return Err(BufferAllocationError::new(self.inner.as_ref().len()));
        }
        Ok(FlakyBuffer {
            inner: self.inner.duplicate()?,
            duplicate_fails: false,
        })
    }
}

impl GrowHeadroom for FlakyBuffer {
    fn grow_headroom(self, min: u16) -> Result<Self, BufferAllocationError> {
        if self.inner.headroom() >= min {
            Ok(self)
        } else {
            Err(BufferAllocationError::new(usize::from(min)))
        }
    }
}

#[test]
#[traced_test]
fn allocation_failures_lose_only_the_copy() {
    let target = MirrorTarget::new(COLLECTOR, 0);
    for (headroom, duplicate_fails, mirrored) in [(128, true, 0), (0, false, 0), (128, false, 1)] {
        let engine = Rmirror::new(host());
        let packet = FlakyBuffer::frame(headroom, duplicate_fails);
        let data = packet.data().to_vec();
        let mut out = Vec::new();
        let verdict = engine.target(&WorkerContext::new(0), &packet, &target, &mut out);
        assert_eq!(verdict, Verdict::Continue);
        assert_eq!(out.len(), mirrored);
        assert_eq!(packet.data(), data.as_slice());
        assert_eq!(
            engine.stats().snapshot(),
            MirrorStatsSnapshot {
                mirrored: u64::try_from(mirrored).unwrap(),
                alloc_failures: 1 - u64::try_from(mirrored).unwrap(),
                ..Default::default()
            }
        );
    }
}

#[test]
#[traced_test]
fn mirror_stage_in_pipeline() {
    let mut router = Router::new(
        RouterParamsBuilder::default()
            .name("mirror-router")
            .tables(host())
            .build()
            .unwrap(),
    );
    let engine = Arc::new(Rmirror::new(router.reader()));
    let full = PktQueue::new(16);
    let trimmed = PktQueue::new(16);
    let mut first = MirrorStage::new(
        "rmirror",
        &engine,
        MirrorTarget::new(COLLECTOR, 0),
        WorkerContext::new(0),
        full.clone(),
    );
    let mut second = MirrorStage::new(
        "rmirror-trimmed",
        &engine,
        MirrorTarget::new(Ipv4Addr::new(10, 0, 0, 6), 64),
        WorkerContext::new(0),
        trimmed.clone(),
    );
    assert_eq!(first.nf_name(), "rmirror");
    assert_eq!(second.target().trim_length(), 64);

    let input: Vec<_> = (0..3).map(|i| framed(100 + i)).collect();
    let expected: Vec<Vec<u8>> = input.iter().map(|p| p.data().to_vec()).collect();
    let output: Vec<Vec<u8>> = run_pipeline(&mut first, &mut second, input.into_iter())
        .map(|p| p.data().to_vec())
        .collect();
    assert_eq!(output, expected);
    assert!(logs_contain("Stage 'rmirror'..."));

    assert_eq!(full.len(), 3);
    assert_eq!(trimmed.len(), 3);
    while let Some(copy) = trimmed.pop() {
        assert_eq!(copy.len(), 24 + 64);
        assert_outer_header(&copy, Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 6));
    }
    assert_eq!(engine.stats().snapshot().mirrored, 6);

    // routing updates are picked up by the running stage
    router.update(|tables| tables.set_oper_state(idx(1), IfState::Down)).unwrap();
    let output: Vec<_> = first.process([framed(100)].into_iter()).collect();
    assert_eq!(output.len(), 1);
    assert_eq!(full.len(), 3);
    assert_eq!(engine.stats().snapshot().route_failures, 1);
}

#[test]
fn mirrored_length_follows_trim() {
    bolero::check!()
        .with_type::<(u16, u16, bool)>()
        .for_each(|&(payload, trim, is_framed)| {
            let engine = Rmirror::new(host());
            let ctx = WorkerContext::new(0);
            let total_len = 28 + usize::from(payload % 1200);
            let trim = u32::from(trim % 1600);
            let packet = if is_framed {
                framed(total_len)
            } else {
                build_test_datagram_packet("192.168.1.254", "192.168.1.1", total_len)
            };
            let mut out = Vec::new();
            engine.target(&ctx, &packet, &MirrorTarget::new(COLLECTOR, trim), &mut out);
            let inner_len = total_len + Eth::LEN;
            let expected = if trim == 0 {
                24 + inner_len
            } else {
                24 + inner_len.min(usize::try_from(trim).unwrap())
            };
            assert_eq!(out.len(), 1);
            assert_eq!(out[0].len(), expected);
            assert_outer_header(&out[0], Ipv4Addr::new(10, 0, 0, 1), COLLECTOR);
        });
}
