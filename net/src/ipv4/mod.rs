// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! IPv4 header type and logic.

use crate::parse::{DeParse, DeParseError, LengthError, Parse, ParseError};
use core::convert::Infallible;
pub use etherparse::err::ipv4::HeaderError;
use etherparse::err::ipv4::HeaderSliceError;
use etherparse::{IpFragOffset, IpNumber, Ipv4Header};
use std::net::Ipv4Addr;
use std::num::NonZero;

/// An IPv4 header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4 {
    pub(crate) inner: Ipv4Header,
}

impl Ipv4 {
    /// The length of an IPv4 header without options.
    pub const MIN_LEN: usize = Ipv4Header::MIN_LEN;

    /// IP protocol number of GRE.
    pub const PROTO_GRE: u8 = 47;

    /// Create a new option-less IPv4 header.
    ///
    /// The checksum is left at zero; see [`Ipv4::update_checksum`].
    #[must_use]
    pub fn new(source: Ipv4Addr, destination: Ipv4Addr, protocol: u8, ttl: u8) -> Ipv4 {
        Ipv4 {
            inner: Ipv4Header {
                time_to_live: ttl,
                protocol: IpNumber(protocol),
                source: source.octets(),
                destination: destination.octets(),
                dont_fragment: false,
                more_fragments: false,
                fragment_offset: IpFragOffset::ZERO,
                ..Default::default()
            },
        }
    }

    /// Get the source ip address of the header
    #[must_use]
    pub fn source(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.inner.source)
    }

    /// Get the destination ip address of the header
    #[must_use]
    pub fn destination(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.inner.destination)
    }

    /// Set the source ip address of the header.
    pub fn set_source(&mut self, source: Ipv4Addr) -> &mut Self {
        self.inner.source = source.octets();
        self
    }

    /// Set the destination ip address of the header.
    pub fn set_destination(&mut self, destination: Ipv4Addr) -> &mut Self {
        self.inner.destination = destination.octets();
        self
    }

    /// The legacy type of service byte (DSCP and ECN together).
    #[must_use]
    pub fn tos(&self) -> u8 {
        (self.inner.dscp.value() << 2) | self.inner.ecn.value()
    }

    /// The IP protocol number of the payload.
    #[must_use]
    pub fn protocol(&self) -> u8 {
        self.inner.protocol.0
    }

    /// Time to live
    #[must_use]
    pub fn ttl(&self) -> u8 {
        self.inner.time_to_live
    }

    /// Length of the header plus payload, as recorded in the header.
    #[must_use]
    pub fn total_len(&self) -> u16 {
        self.inner.total_len
    }

    /// Set the total length field.
    pub fn set_total_len(&mut self, total_len: u16) -> &mut Self {
        self.inner.total_len = total_len;
        self
    }

    /// The identification field.
    #[must_use]
    pub fn identification(&self) -> u16 {
        self.inner.identification
    }

    /// Set the identification field.
    pub fn set_identification(&mut self, identification: u16) -> &mut Self {
        self.inner.identification = identification;
        self
    }

    /// The checksum currently stored in the header.
    #[must_use]
    pub fn checksum(&self) -> u16 {
        self.inner.header_checksum
    }

    /// Recompute the header checksum from the current field values.
    pub fn update_checksum(&mut self) -> &mut Self {
        self.inner.header_checksum = self.inner.calc_header_checksum();
        self
    }

    /// Returns true if the stored checksum matches the header contents.
    #[must_use]
    pub fn checksum_is_valid(&self) -> bool {
        self.inner.header_checksum == self.inner.calc_header_checksum()
    }

    /// Length of the header in bytes, options included.
    #[must_use]
    pub fn header_len(&self) -> usize {
        self.inner.header_len()
    }
}

impl Parse for Ipv4 {
    type Error = HeaderError;

    fn parse(buf: &[u8]) -> Result<(Self, NonZero<usize>), ParseError<Self::Error>> {
        let (inner, _) = Ipv4Header::from_slice(buf).map_err(|e| match e {
            HeaderSliceError::Len(len) => ParseError::Length(LengthError {
                expected: NonZero::new(len.required_len).unwrap_or(NonZero::<usize>::MIN),
                actual: buf.len(),
            }),
            HeaderSliceError::Content(content) => ParseError::Invalid(content),
        })?;
        let consumed = NonZero::new(inner.header_len()).unwrap_or(NonZero::<usize>::MIN);
        Ok((Self { inner }, consumed))
    }
}

impl DeParse for Ipv4 {
    type Error = Infallible;

    fn size(&self) -> NonZero<usize> {
        NonZero::new(self.inner.header_len()).unwrap_or(NonZero::<usize>::MIN)
    }

    fn write(&self, buf: &mut [u8]) -> Result<NonZero<usize>, DeParseError<Self::Error>> {
        let size = self.size();
        crate::parse::check_len(buf, size).map_err(DeParseError::Length)?;
        buf[..size.get()].copy_from_slice(&self.inner.to_bytes());
        Ok(size)
    }
}
