// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! A [`Vec`] backed packet buffer.

use crate::buffer::{
    Append, BufferAllocationError, DuplicateBuffer, GrowHeadroom, Headroom,
    MemoryBufferNotLongEnough, NotEnoughHeadRoom, NotEnoughTailRoom, Prepend, Tailroom,
    TrimFromEnd, TrimFromStart,
};
use std::fmt::{Debug, Formatter};

/// A packet buffer with headroom and tailroom, backed by heap storage.
///
/// The live data is `storage[start..end]`.
/// Everything before `start` is headroom and everything after `end` is tailroom.
#[derive(Clone, PartialEq, Eq)]
pub struct HeapBuffer {
    storage: Vec<u8>,
    start: usize,
    end: usize,
}

fn allocate(len: usize) -> Result<Vec<u8>, BufferAllocationError> {
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(len)
        .map_err(|_| BufferAllocationError::new(len))?;
    Ok(storage)
}

impl HeapBuffer {
    /// Headroom reserved by [`HeapBuffer::from_data`].
    pub const DEFAULT_HEADROOM: u16 = 128;
    /// Tailroom reserved by [`HeapBuffer::from_data`].
    pub const DEFAULT_TAILROOM: u16 = 64;

    /// Create a buffer holding a copy of `data` with the requested spare room around it.
    ///
    /// # Errors
    ///
    /// Returns [`BufferAllocationError`] if the storage can not be allocated.
    pub fn new(headroom: u16, data: &[u8], tailroom: u16) -> Result<Self, BufferAllocationError> {
        let headroom = usize::from(headroom);
        let total = headroom + data.len() + usize::from(tailroom);
        let mut storage = allocate(total)?;
        storage.resize(headroom, 0);
        storage.extend_from_slice(data);
        storage.resize(total, 0);
        Ok(Self {
            storage,
            start: headroom,
            end: headroom + data.len(),
        })
    }

    /// Create a buffer holding a copy of `data` with the default headroom and tailroom.
    ///
    /// # Errors
    ///
    /// Returns [`BufferAllocationError`] if the storage can not be allocated.
    pub fn from_data(data: &[u8]) -> Result<Self, BufferAllocationError> {
        Self::new(Self::DEFAULT_HEADROOM, data, Self::DEFAULT_TAILROOM)
    }

    fn len(&self) -> usize {
        self.end - self.start
    }
}

impl Debug for HeapBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeapBuffer")
            .field("headroom", &self.start)
            .field("len", &self.len())
            .field("tailroom", &(self.storage.len() - self.end))
            .finish()
    }
}

impl AsRef<[u8]> for HeapBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.storage[self.start..self.end]
    }
}

impl AsMut<[u8]> for HeapBuffer {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.storage[self.start..self.end]
    }
}

impl Headroom for HeapBuffer {
    fn headroom(&self) -> u16 {
        u16::try_from(self.start).unwrap_or(u16::MAX)
    }
}

impl Tailroom for HeapBuffer {
    fn tailroom(&self) -> u16 {
        u16::try_from(self.storage.len() - self.end).unwrap_or(u16::MAX)
    }
}

impl Prepend for HeapBuffer {
    type Error = NotEnoughHeadRoom;

    fn prepend(&mut self, len: u16) -> Result<&mut [u8], Self::Error> {
        let len = usize::from(len);
        if len > self.start {
            return Err(NotEnoughHeadRoom);
        }
        self.start -= len;
        Ok(&mut self.storage[self.start..self.end])
    }
}

impl Append for HeapBuffer {
    type Error = NotEnoughTailRoom;

    fn append(&mut self, len: u16) -> Result<&mut [u8], Self::Error> {
        let len = usize::from(len);
        if len > self.storage.len() - self.end {
            return Err(NotEnoughTailRoom);
        }
        self.end += len;
        Ok(&mut self.storage[self.start..self.end])
    }
}

impl TrimFromStart for HeapBuffer {
    type Error = MemoryBufferNotLongEnough;

    fn trim_from_start(&mut self, len: u16) -> Result<&mut [u8], Self::Error> {
        let len = usize::from(len);
        if len > self.len() {
            return Err(MemoryBufferNotLongEnough);
        }
        self.start += len;
        Ok(&mut self.storage[self.start..self.end])
    }
}

impl TrimFromEnd for HeapBuffer {
    type Error = MemoryBufferNotLongEnough;

    fn trim_from_end(&mut self, len: u16) -> Result<&mut [u8], Self::Error> {
        let len = usize::from(len);
        if len > self.len() {
            return Err(MemoryBufferNotLongEnough);
        }
        self.end -= len;
        Ok(&mut self.storage[self.start..self.end])
    }
}

impl DuplicateBuffer for HeapBuffer {
    fn duplicate(&self) -> Result<Self, BufferAllocationError> {
        let mut storage = allocate(self.storage.len())?;
        storage.extend_from_slice(&self.storage);
        Ok(Self {
            storage,
            start: self.start,
            end: self.end,
        })
    }
}

impl GrowHeadroom for HeapBuffer {
    fn grow_headroom(self, min: u16) -> Result<Self, BufferAllocationError> {
        if self.headroom() >= min {
            return Ok(self);
        }
        Self::new(min, self.as_ref(), self.tailroom())
    }
}
