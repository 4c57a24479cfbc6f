// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Ethernet types

pub mod ethtype;
pub mod mac;

use crate::eth::ethtype::EthType;
use crate::eth::mac::Mac;
use crate::parse::{DeParse, DeParseError, LengthError, Parse, ParseError};
use core::convert::Infallible;
use etherparse::Ethernet2Header;
use std::num::NonZero;

const ETH_LEN: NonZero<usize> = match NonZero::new(Ethernet2Header::LEN) {
    Some(len) => len,
    None => unreachable!(),
};

/// An ethernet header.
///
/// Unlike a header received from the wire, the inner header of a mirrored frame may carry a
/// zero destination, so no address validation is performed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eth {
    inner: Ethernet2Header,
}

impl Eth {
    /// The length of an untagged ethernet header.
    pub const LEN: usize = Ethernet2Header::LEN;

    /// Create a new [`Eth`] header.
    pub fn new(source: Mac, destination: Mac, ether_type: EthType) -> Eth {
        Eth {
            inner: Ethernet2Header {
                source: source.0,
                destination: destination.0,
                ether_type: ether_type.into(),
            },
        }
    }

    /// Get the source [`Mac`] of the header.
    pub fn source(&self) -> Mac {
        Mac(self.inner.source)
    }

    /// Get the destination [`Mac`] of the header.
    pub fn destination(&self) -> Mac {
        Mac(self.inner.destination)
    }

    /// Get the ethertype of the header.
    #[must_use]
    pub fn ether_type(&self) -> EthType {
        self.inner.ether_type.into()
    }

    /// Set the source [`Mac`] of the header.
    pub fn set_source(&mut self, source: Mac) -> &mut Eth {
        self.inner.source = source.0;
        self
    }

    /// Set the destination [`Mac`] of the header.
    pub fn set_destination(&mut self, destination: Mac) -> &mut Eth {
        self.inner.destination = destination.0;
        self
    }

    /// Set the ethertype of the header.
    pub fn set_ether_type(&mut self, ether_type: EthType) -> &mut Eth {
        self.inner.ether_type = ether_type.into();
        self
    }
}

impl Parse for Eth {
    type Error = Infallible;

    fn parse(buf: &[u8]) -> Result<(Self, NonZero<usize>), ParseError<Self::Error>> {
        let (inner, _) = Ethernet2Header::from_slice(buf).map_err(|e| {
            let expected = NonZero::new(e.required_len).unwrap_or(ETH_LEN);
            ParseError::Length(LengthError {
                expected,
                actual: buf.len(),
            })
        })?;
        Ok((Self { inner }, ETH_LEN))
    }
}

impl DeParse for Eth {
    type Error = Infallible;

    fn size(&self) -> NonZero<usize> {
        ETH_LEN
    }

    fn write(&self, buf: &mut [u8]) -> Result<NonZero<usize>, DeParseError<Self::Error>> {
        let size = self.size();
        crate::parse::check_len(buf, size).map_err(DeParseError::Length)?;
        buf[..size.get()].copy_from_slice(&self.inner.to_bytes());
        Ok(size)
    }
}
