// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Minimal GRE header ([RFC 2784]): no checksum, key or sequence number.
//!
//! [RFC 2784]: https://datatracker.ietf.org/doc/html/rfc2784

use crate::eth::ethtype::EthType;
use crate::parse::{DeParse, DeParseError, Parse, ParseError, check_len};
use core::convert::Infallible;
use std::num::NonZero;

const GRE_LEN: NonZero<usize> = match NonZero::new(Gre::LEN) {
    Some(len) => len,
    None => unreachable!(),
};

/// A base GRE header: all flag bits clear, version zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gre {
    protocol: EthType,
}

/// Errors which may occur when parsing a [`Gre`] header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GreError {
    /// Checksum, key, sequence or version bits were set.
    #[error("unsupported GRE flags/version: {0:#06x}")]
    UnsupportedFlags(u16),
}

impl Gre {
    /// Length of the base header.
    pub const LEN: usize = 4;

    /// Create a GRE header announcing `protocol` as its payload.
    #[must_use]
    pub fn new(protocol: EthType) -> Gre {
        Gre { protocol }
    }

    /// The protocol type of the payload.
    #[must_use]
    pub fn protocol(&self) -> EthType {
        self.protocol
    }
}

impl Parse for Gre {
    type Error = GreError;

    fn parse(buf: &[u8]) -> Result<(Self, NonZero<usize>), ParseError<Self::Error>> {
        check_len(buf, GRE_LEN).map_err(ParseError::Length)?;
        let flags = u16::from_be_bytes([buf[0], buf[1]]);
        if flags != 0 {
            return Err(ParseError::Invalid(GreError::UnsupportedFlags(flags)));
        }
        let protocol = EthType::new(u16::from_be_bytes([buf[2], buf[3]]));
        Ok((Gre { protocol }, GRE_LEN))
    }
}

impl DeParse for Gre {
    type Error = Infallible;

    fn size(&self) -> NonZero<usize> {
        GRE_LEN
    }

    fn write(&self, buf: &mut [u8]) -> Result<NonZero<usize>, DeParseError<Self::Error>> {
        check_len(buf, GRE_LEN).map_err(DeParseError::Length)?;
        buf[..2].copy_from_slice(&0u16.to_be_bytes());
        buf[2..4].copy_from_slice(&self.protocol.as_u16().to_be_bytes());
        Ok(GRE_LEN)
    }
}
