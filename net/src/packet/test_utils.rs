// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Packet builders for tests

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use crate::buffer::HeapBuffer;
use crate::eth::Eth;
use crate::eth::ethtype::EthType;
use crate::eth::mac::Mac;
use crate::packet::Packet;
use crate::parse::DeParse;
use etherparse::PacketBuilder;
use std::net::Ipv4Addr;

const IPV4_UDP_OVERHEAD: usize = 28;

/// Build the bytes of a UDP over IPv4 datagram of exactly `total_len` bytes.
///
/// The payload is a counting pattern so truncation and offsets are visible in assertions.
#[must_use]
pub fn build_test_ipv4_datagram(src: &str, dst: &str, total_len: usize) -> Vec<u8> {
    assert!(total_len >= IPV4_UDP_OVERHEAD, "datagram too short for IPv4 + UDP");
    let src: Ipv4Addr = src.parse().expect("bad source address");
    let dst: Ipv4Addr = dst.parse().expect("bad destination address");
    #[allow(clippy::cast_possible_truncation)] // wrapping pattern
    let payload: Vec<u8> = (0..total_len - IPV4_UDP_OVERHEAD)
        .map(|i| i as u8)
        .collect();
    let mut bytes = Vec::with_capacity(total_len);
    PacketBuilder::ipv4(src.octets(), dst.octets(), 64)
        .udp(4789, 5000)
        .write(&mut bytes, &payload)
        .expect("failed to build test datagram");
    bytes
}

/// A locally generated (unframed) packet carrying a test datagram.
#[must_use]
pub fn build_test_datagram_packet(src: &str, dst: &str, total_len: usize) -> Packet<HeapBuffer> {
    let buf = HeapBuffer::from_data(&build_test_ipv4_datagram(src, dst, total_len))
        .expect("failed to allocate test buffer");
    Packet::from_datagram(buf)
}

/// A packet received with an ethernet header, carrying a test datagram.
#[must_use]
pub fn build_test_framed_packet(
    src_mac: Mac,
    dst_mac: Mac,
    src: &str,
    dst: &str,
    total_len: usize,
) -> Packet<HeapBuffer> {
    let mut frame = vec![0u8; Eth::LEN];
    Eth::new(src_mac, dst_mac, EthType::IPV4)
        .write(&mut frame)
        .expect("failed to write ethernet header");
    frame.extend_from_slice(&build_test_ipv4_datagram(src, dst, total_len));
    let buf = HeapBuffer::from_data(&frame).expect("failed to allocate test buffer");
    Packet::from_frame(buf).expect("failed to parse test frame")
}

/// The one's complement sum of `bytes` taken as big endian 16 bit words.
///
/// A valid IPv4 header sums to `0xffff`.
#[must_use]
pub fn ones_complement_sum(bytes: &[u8]) -> u16 {
    let mut sum: u32 = bytes
        .chunks(2)
        .map(|w| u32::from(u16::from_be_bytes([w[0], w.get(1).copied().unwrap_or(0)])))
        .sum();
    while sum > 0xffff {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    u16::try_from(sum).unwrap_or(u16::MAX)
}
