// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Packet definition

pub mod meta;
#[cfg(any(test, feature = "test_buffer"))]
pub mod test_utils;

use crate::buffer::{BufferAllocationError, NotEnoughHeadRoom, PacketBufferMut};
use crate::eth::Eth;
use crate::ipv4::Ipv4;
use crate::packet::meta::{LinkLayer, PacketMeta};
use crate::parse::{LengthError, Parse, ParseError};
use core::convert::Infallible;
use etherparse::err::ipv4::HeaderError;
use std::net::Ipv4Addr;
use tracing::trace;

/// Offsets of interesting headers, relative to the start of the packet data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderOffsets {
    /// The (outermost) network header.
    pub network: Option<usize>,
    /// The ethernet header of the encapsulated frame.
    pub inner_mac: Option<usize>,
    /// The network header of the encapsulated frame.
    pub inner_network: Option<usize>,
}

impl HeaderOffsets {
    fn shift(&mut self, by: usize) {
        for offset in [&mut self.network, &mut self.inner_mac, &mut self.inner_network] {
            if let Some(offset) = offset.as_mut() {
                *offset += by;
            }
        }
    }
}

/// A packet: a buffer, its link layer state and metadata.
///
/// The buffer data starts at the network header when the packet is built and grows towards
/// the front as headers are pushed.
/// For [`LinkLayer::AlreadyFramed`] packets the ethernet header is kept beside the data
/// rather than in it.
#[derive(Debug)]
pub struct Packet<Buf: PacketBufferMut> {
    buf: Buf,
    link: LinkLayer,
    meta: PacketMeta,
    offsets: HeaderOffsets,
}

impl<Buf: PacketBufferMut> Packet<Buf> {
    /// Build a packet whose data starts at an IPv4 header.
    pub fn new(buf: Buf, link: LinkLayer) -> Packet<Buf> {
        Packet {
            buf,
            link,
            meta: PacketMeta::default(),
            offsets: HeaderOffsets {
                network: Some(0),
                ..HeaderOffsets::default()
            },
        }
    }

    /// Build a packet from a buffer holding an ethernet frame.
    ///
    /// The ethernet header is removed from the data and kept as [`LinkLayer::AlreadyFramed`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the buffer is too short to hold an ethernet header.
    pub fn from_frame(mut buf: Buf) -> Result<Packet<Buf>, ParseError<Infallible>> {
        let (eth, consumed) = Eth::parse(buf.as_ref())?;
        let actual = buf.as_ref().len();
        #[allow(clippy::cast_possible_truncation)] // ethernet header is 14 bytes
        buf.trim_from_start(consumed.get() as u16).map_err(|_| {
            ParseError::Length(LengthError {
                expected: consumed,
                actual,
            })
        })?;
        let mut packet = Packet::new(buf, LinkLayer::AlreadyFramed(eth.clone()));
        packet.meta.protocol = eth.ether_type();
        Ok(packet)
    }

    /// Build a packet from a buffer holding a locally generated IPv4 datagram.
    pub fn from_datagram(buf: Buf) -> Packet<Buf> {
        Packet::new(buf, LinkLayer::Unframed)
    }

    /// Get the packet metadata.
    #[must_use]
    pub fn get_meta(&self) -> &PacketMeta {
        &self.meta
    }

    /// Get mutable access to the packet metadata.
    pub fn get_meta_mut(&mut self) -> &mut PacketMeta {
        &mut self.meta
    }

    /// The link layer state of the packet.
    #[must_use]
    pub fn link(&self) -> &LinkLayer {
        &self.link
    }

    /// Header offsets, relative to the start of the data.
    #[must_use]
    pub fn offsets(&self) -> HeaderOffsets {
        self.offsets
    }

    /// The packet bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.buf.as_ref()
    }

    /// Mutable access to the packet bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.buf.as_mut()
    }

    /// Number of bytes in the packet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns true if the packet holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    /// Unused space in front of the data.
    #[must_use]
    pub fn headroom(&self) -> u16 {
        self.buf.headroom()
    }

    /// Extend the data towards the front by `len` bytes and return the new bytes.
    ///
    /// The content of the new bytes is unspecified.
    /// Recorded header offsets are shifted so they keep pointing at the same headers.
    ///
    /// # Errors
    ///
    /// Returns [`NotEnoughHeadRoom`] if the buffer has less than `len` bytes of headroom.
    pub fn push(&mut self, len: u16) -> Result<&mut [u8], NotEnoughHeadRoom> {
        self.buf.prepend(len)?;
        self.offsets.shift(usize::from(len));
        Ok(&mut self.buf.as_mut()[..usize::from(len)])
    }

    /// Shorten the packet to at most `len` bytes.  Longer lengths leave the packet unchanged.
    pub fn trim(&mut self, len: usize) {
        let current = self.len();
        if len >= current {
            return;
        }
        // steps of at most u16::MAX, each within the data checked above
        let mut left = current - len;
        while left > 0 {
            let step = u16::try_from(left).unwrap_or(u16::MAX);
            let trimmed = self.buf.trim_from_end(step);
            debug_assert!(trimmed.is_ok(), "trim of {step} bytes past the end of the data");
            left -= usize::from(step);
        }
        trace!("trimmed packet from {current} to {len} bytes");
    }

    /// Copy the packet.
    ///
    /// The copy has its own buffer; metadata is cloned, so a tracked connection gains a
    /// second reference.
    ///
    /// # Errors
    ///
    /// Returns [`BufferAllocationError`] if a buffer for the copy can not be obtained.
    pub fn try_clone(&self) -> Result<Packet<Buf>, BufferAllocationError> {
        Ok(Packet {
            buf: self.buf.duplicate()?,
            link: self.link.clone(),
            meta: self.meta.clone(),
            offsets: self.offsets,
        })
    }

    /// Make sure at least `min` bytes of headroom are available, relocating the buffer if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`BufferAllocationError`] if larger storage can not be obtained.
    /// The packet is released in that case.
    pub fn ensure_headroom(self, min: u16) -> Result<Packet<Buf>, BufferAllocationError> {
        if self.buf.headroom() >= min {
            return Ok(self);
        }
        trace!(
            "growing headroom from {have} to {min}",
            have = self.buf.headroom()
        );
        let Packet {
            buf,
            link,
            meta,
            offsets,
        } = self;
        Ok(Packet {
            buf: buf.grow_headroom(min)?,
            link,
            meta,
            offsets,
        })
    }

    /// Mark the start of the data as the network header.
    pub fn reset_network_header(&mut self) {
        self.offsets.network = Some(0);
    }

    /// Record the current start of the data as the inner ethernet header and the current
    /// network header as the inner network header.
    pub fn reset_inner_headers(&mut self) {
        self.offsets.inner_mac = Some(0);
        self.offsets.inner_network = self.offsets.network;
    }

    /// Mark the packet as carrying (or not) an ethernet header in its data.
    pub fn set_link(&mut self, link: LinkLayer) {
        self.link = link;
    }

    /// Parse the IPv4 header at the network offset.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if no network offset is recorded or no valid IPv4 header is
    /// found there.
    pub fn ipv4(&self) -> Result<Ipv4, ParseError<HeaderError>> {
        let offset = self.offsets.network.unwrap_or(0);
        let data = self.data().get(offset..).unwrap_or_default();
        Ipv4::parse(data).map(|(ip, _)| ip)
    }

    /// Destination address of the IPv4 header at the network offset.
    ///
    /// # Errors
    ///
    /// See [`Packet::ipv4`].
    pub fn ipv4_destination(&self) -> Result<Ipv4Addr, ParseError<HeaderError>> {
        self.ipv4().map(|ip| ip.destination())
    }
}
