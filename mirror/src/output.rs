// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Hand off of mirror copies to the host output path

use crossbeam::queue::ArrayQueue;
use net::buffer::PacketBufferMut;
use net::packet::Packet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Errors reported by the output path
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TxError {
    /// The transmit queue has no room; the packet was dropped.
    #[error("transmit queue full")]
    QueueFull,
}

/// The host's local output path.
///
/// Packets handed over are owned by the output path from then on, whether sent or not.
/// Sending may run the packet filter again, possibly re-entering the mirror engine on the
/// calling worker.
pub trait LocalOut<Buf: PacketBufferMut> {
    /// Send a locally built packet.
    fn local_out(&mut self, packet: Packet<Buf>) -> Result<(), TxError>;
}

/// Collect sent packets, mostly useful in tests.
impl<Buf: PacketBufferMut> LocalOut<Buf> for Vec<Packet<Buf>> {
    fn local_out(&mut self, packet: Packet<Buf>) -> Result<(), TxError> {
        self.push(packet);
        Ok(())
    }
}

/// Bounded queue of packets towards a transmit thread.
///
/// Clones share the same queue. Packets are boxed so large capacities stay cheap.
pub struct PktQueue<Buf: PacketBufferMut> {
    queue: Arc<ArrayQueue<Box<Packet<Buf>>>>,
}

impl<Buf: PacketBufferMut> Clone for PktQueue<Buf> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<Buf: PacketBufferMut> PktQueue<Buf> {
    /// Create a queue with room for `capacity` packets (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: Arc::new(ArrayQueue::new(capacity.max(1))),
        }
    }
    /// Take the oldest queued packet.
    #[must_use]
    pub fn pop(&self) -> Option<Box<Packet<Buf>>> {
        self.queue.pop()
    }
    /// Push a [`Packet`] (boxed) to this queue.
    /// # Errors
    ///
    /// This method fails if the queue is full, giving the packet back.
    pub fn push(&self, packet: Box<Packet<Buf>>) -> Result<(), Box<Packet<Buf>>> {
        self.queue.push(packet)
    }
    /// Number of queued packets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }
    /// True if no packet is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
    /// Maximum number of queued packets.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }
}

impl<Buf: PacketBufferMut> LocalOut<Buf> for PktQueue<Buf> {
    fn local_out(&mut self, packet: Packet<Buf>) -> Result<(), TxError> {
        match self.push(Box::new(packet)) {
            Ok(()) => {
                trace!("queued packet for transmission, {} pending", self.len());
                Ok(())
            }
            Err(packet) => {
                debug!("dropping {} byte packet: transmit queue full", packet.len());
                Err(TxError::QueueFull)
            }
        }
    }
}
