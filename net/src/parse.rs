// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Header parsing and serialization traits

use std::num::NonZero;

/// A header which can be read from the start of a byte slice.
pub trait Parse: Sized {
    /// Error returned when the bytes do not describe a valid header.
    type Error: core::error::Error;

    /// Parse a header from the start of `buf`.
    ///
    /// On success, returns the header and the number of bytes it occupied.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if `buf` is too short or does not hold a valid header.
    fn parse(buf: &[u8]) -> Result<(Self, NonZero<usize>), ParseError<Self::Error>>;
}

/// A header which can be written to the start of a byte slice.
pub trait DeParse {
    /// Error returned when the header can not be written.
    type Error: core::error::Error;

    /// The number of bytes [`DeParse::write`] will produce.
    fn size(&self) -> NonZero<usize>;

    /// Write the header to the start of `buf`.
    ///
    /// # Errors
    ///
    /// Returns a [`DeParseError`] if `buf` is shorter than [`DeParse::size`].
    fn write(&self, buf: &mut [u8]) -> Result<NonZero<usize>, DeParseError<Self::Error>>;
}

/// Not enough bytes to complete the operation.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("expected at least {expected} bytes, got {actual}")]
pub struct LengthError {
    pub(crate) expected: NonZero<usize>,
    pub(crate) actual: usize,
}

impl LengthError {
    /// The number of bytes the operation required.
    #[must_use]
    pub fn expected(&self) -> NonZero<usize> {
        self.expected
    }

    /// The number of bytes which were available.
    #[must_use]
    pub fn actual(&self) -> usize {
        self.actual
    }
}

/// Errors which may occur while parsing a header.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError<E: core::error::Error> {
    /// The buffer was too short.
    #[error(transparent)]
    Length(LengthError),
    /// The bytes do not describe a valid header.
    #[error(transparent)]
    Invalid(E),
}

/// Errors which may occur while writing a header.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DeParseError<E: core::error::Error> {
    /// The buffer was too short.
    #[error(transparent)]
    Length(LengthError),
    /// The header can not be represented on the wire.
    #[error(transparent)]
    Invalid(E),
}

/// Check that `buf` holds at least `expected` bytes.
pub(crate) fn check_len(buf: &[u8], expected: NonZero<usize>) -> Result<(), LengthError> {
    if buf.len() < expected.get() {
        return Err(LengthError {
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}
