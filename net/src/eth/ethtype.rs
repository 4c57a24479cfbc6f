// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Ethernet type

use etherparse::EtherType;
use std::fmt::{Display, Formatter};

/// An ethernet type (the protocol carried in an ethernet frame or GRE payload).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "u16", into = "u16"))]
pub struct EthType(pub(crate) EtherType);

impl EthType {
    /// Internet protocol version 4
    pub const IPV4: EthType = EthType(EtherType::IPV4);
    /// Address resolution protocol
    pub const ARP: EthType = EthType(EtherType::ARP);
    /// Transparent ethernet bridging: a whole ethernet frame follows.
    pub const TEB: EthType = EthType(EtherType(0x6558));

    /// Create a new [`EthType`] from its wire value.
    #[must_use]
    pub const fn new(raw: u16) -> EthType {
        EthType(EtherType(raw))
    }

    /// The wire value of this [`EthType`].
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0.0
    }
}

impl Default for EthType {
    fn default() -> Self {
        EthType::IPV4
    }
}

impl From<u16> for EthType {
    fn from(value: u16) -> Self {
        EthType::new(value)
    }
}

impl From<EthType> for u16 {
    fn from(value: EthType) -> Self {
        value.as_u16()
    }
}

impl From<EtherType> for EthType {
    fn from(value: EtherType) -> Self {
        EthType(value)
    }
}

impl From<EthType> for EtherType {
    fn from(value: EthType) -> Self {
        value.0
    }
}

impl Display for EthType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06x}", self.as_u16())
    }
}
