// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Interface identifiers

use std::fmt::{Display, Formatter};
use std::num::NonZero;

/// The kernel style index of a network interface.
///
/// Zero is never a valid interface index.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct InterfaceIndex(NonZero<u32>);

/// Error returned when attempting to build an [`InterfaceIndex`] from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("zero is not a legal interface index")]
pub struct ZeroInterfaceIndex;

impl InterfaceIndex {
    /// Create a new [`InterfaceIndex`].
    ///
    /// # Errors
    ///
    /// Returns [`ZeroInterfaceIndex`] if `raw` is zero.
    pub fn try_new(raw: u32) -> Result<InterfaceIndex, ZeroInterfaceIndex> {
        NonZero::new(raw).map(InterfaceIndex).ok_or(ZeroInterfaceIndex)
    }

    /// The raw index.
    #[must_use]
    pub fn to_u32(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for InterfaceIndex {
    type Error = ZeroInterfaceIndex;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        InterfaceIndex::try_new(value)
    }
}

impl From<InterfaceIndex> for u32 {
    fn from(value: InterfaceIndex) -> Self {
        value.to_u32()
    }
}

impl Display for InterfaceIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
