// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The outer header prepended to every mirrored frame: IPv4 followed by a base GRE header
//! carrying transparent ethernet bridging.

use crate::eth::ethtype::EthType;
use crate::gre::{Gre, GreError};
use crate::ipv4::Ipv4;
use crate::parse::{DeParse, DeParseError, LengthError, Parse, ParseError};
use core::convert::Infallible;
use etherparse::err::ipv4::HeaderError;
use std::net::Ipv4Addr;
use std::num::NonZero;
use std::sync::LazyLock;

/// TTL of the outer IPv4 header.
pub const RMIRROR_TTL: u8 = 255;

static TEMPLATE: LazyLock<RmirrorHeader> = LazyLock::new(|| RmirrorHeader {
    ip: Ipv4::new(
        Ipv4Addr::UNSPECIFIED,
        Ipv4Addr::UNSPECIFIED,
        Ipv4::PROTO_GRE,
        RMIRROR_TTL,
    ),
    gre: Gre::new(EthType::TEB),
});

/// IPv4 + GRE encapsulation header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RmirrorHeader {
    ip: Ipv4,
    gre: Gre,
}

/// Errors which may occur when reading an [`RmirrorHeader`] back from a buffer.
#[derive(Debug, thiserror::Error)]
pub enum RmirrorHeaderError {
    /// Buffer shorter than [`RmirrorHeader::LEN`].
    #[error(transparent)]
    Length(#[from] LengthError),
    /// The IPv4 part is malformed.
    #[error(transparent)]
    Ipv4(#[from] HeaderError),
    /// The GRE part is malformed.
    #[error(transparent)]
    Gre(#[from] GreError),
    /// The IPv4 header is not an option-less GRE carrier.
    #[error("not a mirror header (ihl {header_len}, protocol {protocol})")]
    NotMirror {
        /// Header length found
        header_len: usize,
        /// Protocol found
        protocol: u8,
    },
}

impl<E> From<ParseError<E>> for RmirrorHeaderError
where
    E: core::error::Error,
    RmirrorHeaderError: From<E>,
{
    fn from(value: ParseError<E>) -> Self {
        match value {
            ParseError::Length(e) => RmirrorHeaderError::Length(e),
            ParseError::Invalid(e) => e.into(),
        }
    }
}

impl RmirrorHeader {
    /// Size of the outer header on the wire: 20 bytes of IPv4 and 4 bytes of GRE.
    pub const LEN: usize = Ipv4::MIN_LEN + Gre::LEN;

    /// The process-wide header template.
    ///
    /// Version 4, header length 5, TOS 0, no fragmentation, TTL 255, protocol GRE and an
    /// all-zero GRE base header announcing ethertype 0x6558.
    /// Addresses, total length, identification and checksum are filled in per packet.
    #[must_use]
    pub fn template() -> &'static RmirrorHeader {
        &TEMPLATE
    }

    /// A copy of the template addressed to `destination`.
    #[must_use]
    pub fn new(destination: Ipv4Addr, total_len: u16, identification: u16) -> RmirrorHeader {
        let mut header = Self::template().clone();
        header
            .ip
            .set_destination(destination)
            .set_total_len(total_len)
            .set_identification(identification)
            .update_checksum();
        header
    }

    /// The outer IPv4 header.
    #[must_use]
    pub fn ip(&self) -> &Ipv4 {
        &self.ip
    }

    /// Mutable access to the outer IPv4 header.
    ///
    /// Callers changing fields must refresh the checksum, or write the header with
    /// [`RmirrorHeader::encode_into`] which does so.
    pub fn ip_mut(&mut self) -> &mut Ipv4 {
        &mut self.ip
    }

    /// The GRE header.
    #[must_use]
    pub fn gre(&self) -> &Gre {
        &self.gre
    }

    /// Write the header to the first [`RmirrorHeader::LEN`] bytes of `buf`, with a freshly
    /// computed IPv4 checksum.
    ///
    /// # Errors
    ///
    /// Returns a [`LengthError`] if `buf` is too short.
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<(), LengthError> {
        crate::parse::check_len(buf, rmirror_len())?;
        let mut ip = self.ip.clone();
        ip.update_checksum();
        let (ip_buf, gre_buf) = buf.split_at_mut(Ipv4::MIN_LEN);
        ip.write(ip_buf).map_err(length_only)?;
        self.gre.write(gre_buf).map_err(length_only)?;
        Ok(())
    }

    /// Read a header back from the start of `buf`.
    ///
    /// # Errors
    ///
    /// Returns a [`RmirrorHeaderError`] if `buf` does not start with an option-less IPv4 header
    /// carrying GRE.
    pub fn decode(buf: &[u8]) -> Result<RmirrorHeader, RmirrorHeaderError> {
        crate::parse::check_len(buf, rmirror_len())?;
        let (ip, consumed) = Ipv4::parse(buf)?;
        if consumed.get() != Ipv4::MIN_LEN || ip.protocol() != Ipv4::PROTO_GRE {
            return Err(RmirrorHeaderError::NotMirror {
                header_len: consumed.get(),
                protocol: ip.protocol(),
            });
        }
        let (gre, _) = Gre::parse(&buf[Ipv4::MIN_LEN..])?;
        Ok(RmirrorHeader { ip, gre })
    }
}

fn length_only(e: DeParseError<Infallible>) -> LengthError {
    match e {
        DeParseError::Length(e) => e,
        DeParseError::Invalid(never) => match never {},
    }
}

const fn rmirror_len() -> NonZero<usize> {
    match NonZero::new(RmirrorHeader::LEN) {
        Some(len) => len,
        None => unreachable!(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::packet::test_utils::ones_complement_sum;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn template_fields() {
        let template = RmirrorHeader::template();
        assert_eq!(RmirrorHeader::LEN, 24);
        assert_eq!(template.ip().ttl(), 255);
        assert_eq!(template.ip().tos(), 0);
        assert_eq!(template.ip().protocol(), 47);
        assert_eq!(template.ip().header_len(), 20);
        assert_eq!(template.gre().protocol(), EthType::TEB);
    }

    #[test]
    #[traced_test]
    fn encoded_layout() {
        let header = RmirrorHeader::new(Ipv4Addr::new(10, 0, 0, 5), 138, 7);
        let mut buf = [0u8; RmirrorHeader::LEN];
        header.encode_into(&mut buf).unwrap();
        assert_eq!(buf[0], 0x45);
        assert_eq!(buf[1], 0);
        assert_eq!(u16::from_be_bytes([buf[2], buf[3]]), 138);
        assert_eq!(u16::from_be_bytes([buf[4], buf[5]]), 7);
        assert_eq!(&buf[6..8], &[0, 0]);
        assert_eq!(buf[8], 255);
        assert_eq!(buf[9], 47);
        assert_eq!(&buf[16..20], &[10, 0, 0, 5]);
        assert_eq!(&buf[20..24], &[0x00, 0x00, 0x65, 0x58]);
        assert_eq!(ones_complement_sum(&buf[..20]), 0xffff);
    }

    #[test]
    #[traced_test]
    fn encode_refreshes_checksum() {
        let mut header = RmirrorHeader::new(Ipv4Addr::new(10, 0, 0, 5), 64, 1);
        header.ip_mut().set_source(Ipv4Addr::new(10, 0, 0, 1));
        assert!(!header.ip().checksum_is_valid());
        let mut buf = [0u8; RmirrorHeader::LEN];
        header.encode_into(&mut buf).unwrap();
        let decoded = RmirrorHeader::decode(&buf).unwrap();
        assert!(decoded.ip().checksum_is_valid());
        assert_eq!(decoded.ip().source(), Ipv4Addr::new(10, 0, 0, 1));
    }

    #[test]
    #[traced_test]
    fn decode_rejects_other_protocols() {
        let mut ip = Ipv4::new(Ipv4Addr::new(1, 1, 1, 1), Ipv4Addr::new(2, 2, 2, 2), 17, 64);
        ip.set_total_len(28).update_checksum();
        let mut buf = [0u8; RmirrorHeader::LEN];
        ip.write(&mut buf).unwrap();
        assert!(matches!(
            RmirrorHeader::decode(&buf),
            Err(RmirrorHeaderError::NotMirror { protocol: 17, .. })
        ));
        assert!(matches!(
            RmirrorHeader::decode(&buf[..23]),
            Err(RmirrorHeaderError::Length(_))
        ));
    }

    #[test]
    fn encoded_checksum_always_valid() {
        bolero::check!()
            .with_type::<([u8; 4], [u8; 4], u16, u16)>()
            .for_each(|&(src, dst, total_len, ident)| {
                let mut header = RmirrorHeader::new(Ipv4Addr::from(dst), total_len, ident);
                header.ip_mut().set_source(Ipv4Addr::from(src));
                let mut buf = [0u8; RmirrorHeader::LEN];
                header.encode_into(&mut buf).unwrap();
                assert_eq!(ones_complement_sum(&buf[..Ipv4::MIN_LEN]), 0xffff);
            });
    }
}
