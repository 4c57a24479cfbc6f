// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Packet storage.
//!
//! Packets are carried in buffers with reserved space in front of the data (headroom) so that
//! outer headers can be pushed without moving the payload. Mirror copies are the main consumer:
//! they are duplicated, grown, prefixed and trimmed through the traits below.

mod heap;

use core::fmt::Debug;
use std::error::Error;

pub use heap::HeapBuffer;

/// Read access to packet bytes.
pub trait PacketBuffer: AsRef<[u8]> + Headroom + Debug + 'static {}
impl<T> PacketBuffer for T where T: AsRef<[u8]> + Headroom + Debug + 'static {}

/// Everything needed to clone, encapsulate and trim a packet in place.
pub trait PacketBufferMut:
    PacketBuffer
    + AsMut<[u8]>
    + Append
    + Prepend<Error = NotEnoughHeadRoom>
    + Send
    + TrimFromStart
    + TrimFromEnd
    + Tailroom
    + DuplicateBuffer
    + GrowHeadroom
{
}

impl<T> PacketBufferMut for T where
    T: PacketBuffer
        + AsMut<[u8]>
        + Append
        + Prepend<Error = NotEnoughHeadRoom>
        + Send
        + TrimFromStart
        + TrimFromEnd
        + Tailroom
        + DuplicateBuffer
        + GrowHeadroom
{
}

/// Free space in front of the packet data.
pub trait Headroom {
    /// Bytes that can still be prepended.
    fn headroom(&self) -> u16;
}

/// Free space behind the packet data.
pub trait Tailroom {
    /// Bytes that can still be appended.
    fn tailroom(&self) -> u16;
}

/// Growing the data towards the front of the buffer.
pub trait Prepend {
    /// Returned when the headroom is exhausted.
    type Error: Debug + Error;
    /// Move the start of the data `len` bytes back and return the new data.
    ///
    /// Bytes already in the buffer are left as they are. The `len` new leading bytes hold
    /// whatever the headroom held before.
    ///
    /// # Errors
    ///
    /// Fails when fewer than `len` bytes of headroom remain.
    fn prepend(&mut self, len: u16) -> Result<&mut [u8], Self::Error>;
}

/// Growing the data towards the end of the buffer.
pub trait Append {
    /// Returned when the tailroom is exhausted.
    type Error: Debug;
    /// Move the end of the data `len` bytes forward and return the new data.
    ///
    /// # Errors
    ///
    /// Fails when fewer than `len` bytes of tailroom remain.
    fn append(&mut self, len: u16) -> Result<&mut [u8], Self::Error>;
}

/// Dropping leading bytes.
pub trait TrimFromStart {
    /// Returned when the data is shorter than the request.
    type Error: Debug;
    /// Give the first `len` bytes of data back to the headroom.
    ///
    /// # Errors
    ///
    /// Fails when the data holds fewer than `len` bytes.
    fn trim_from_start(&mut self, len: u16) -> Result<&mut [u8], Self::Error>;
}

/// Dropping trailing bytes.
pub trait TrimFromEnd {
    /// Returned when the data is shorter than the request.
    type Error: Debug;
    /// Give the last `len` bytes of data back to the tailroom.
    ///
    /// # Errors
    ///
    /// Fails when the data holds fewer than `len` bytes.
    fn trim_from_end(&mut self, len: u16) -> Result<&mut [u8], Self::Error>;
}

/// Trait representing the ability to produce an independent copy of a packet buffer.
///
/// The copy owns its own storage: writes to one are never visible through the other.
pub trait DuplicateBuffer: Sized {
    /// Copy the buffer, including its headroom and tailroom.
    ///
    /// # Errors
    ///
    /// Returns [`BufferAllocationError`] if storage for the copy can not be obtained.
    fn duplicate(&self) -> Result<Self, BufferAllocationError>;
}

/// Trait representing the ability to relocate a packet buffer into larger storage.
pub trait GrowHeadroom: Sized {
    /// Make sure at least `min` bytes of headroom are available.
    ///
    /// The buffer is consumed; the returned buffer may live in different storage.
    /// If the buffer already has enough headroom it is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`BufferAllocationError`] if larger storage can not be obtained.
    /// The original buffer is released in that case.
    fn grow_headroom(self, min: u16) -> Result<Self, BufferAllocationError>;
}

/// The headroom is too small for a prepend.
#[non_exhaustive]
#[repr(transparent)]
#[derive(Debug, thiserror::Error)]
#[error("not enough headroom in packet buffer")]
pub struct NotEnoughHeadRoom;

/// The tailroom is too small for an append.
#[non_exhaustive]
#[repr(transparent)]
#[derive(Debug, thiserror::Error)]
#[error("not enough tailroom in packet buffer")]
pub struct NotEnoughTailRoom;

/// A trim asked for more bytes than the buffer holds.
#[non_exhaustive]
#[repr(transparent)]
#[derive(Debug, thiserror::Error)]
#[error("packet buffer too short to trim")]
pub struct MemoryBufferNotLongEnough;

/// Error indicating that memory for a packet buffer could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("failed to allocate a packet buffer of {requested} bytes")]
pub struct BufferAllocationError {
    requested: usize,
}

impl BufferAllocationError {
    /// Create a new allocation error for a request of `requested` bytes.
    #[must_use]
    pub fn new(requested: usize) -> Self {
        Self { requested }
    }

    /// The number of bytes which could not be allocated.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }
}
