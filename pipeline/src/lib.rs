// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Packet processing stages.

#![deny(
    unsafe_code,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]

use net::buffer::PacketBufferMut;
use net::packet::Packet;

/// The verdict a filtering hook gives to the packet it inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Let the packet continue through the remaining stages untouched.
    Continue,
}

/// A stage of a packet pipeline.
pub trait NetworkFunction<Buf: PacketBufferMut> {
    /// The name of the stage, for logging.
    fn nf_name(&self) -> &str;

    /// Process a batch of packets, yielding the packets which continue down the pipeline.
    fn process<'a, Input: Iterator<Item = Packet<Buf>> + 'a>(
        &'a mut self,
        input: Input,
    ) -> impl Iterator<Item = Packet<Buf>> + 'a;
}

/// Run a batch of packets through a sequence of two stages.
pub fn run_pipeline<'a, Buf, First, Second, Input>(
    first: &'a mut First,
    second: &'a mut Second,
    input: Input,
) -> impl Iterator<Item = Packet<Buf>> + 'a
where
    Buf: PacketBufferMut,
    First: NetworkFunction<Buf>,
    Second: NetworkFunction<Buf>,
    Input: Iterator<Item = Packet<Buf>> + 'a,
{
    second.process(first.process(input))
}
