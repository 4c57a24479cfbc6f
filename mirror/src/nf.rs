// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Pipeline stage mirroring every packet to a fixed target

use crate::context::WorkerContext;
use crate::engine::Rmirror;
use crate::output::PktQueue;
use crate::target::MirrorTarget;
use net::buffer::PacketBufferMut;
use net::packet::Packet;
use pipeline::{NetworkFunction, Verdict};
use routing::HostStack;
use std::sync::Arc;
use tracing::trace;

/// A pipeline stage applying a mirror rule to all packets.
///
/// Copies are queued on `out` for a transmit thread; every packet continues down the pipeline
/// unchanged.
pub struct MirrorStage<H: HostStack, Buf: PacketBufferMut> {
    name: String,
    engine: Arc<Rmirror<H>>,
    target: MirrorTarget,
    ctx: WorkerContext,
    out: PktQueue<Buf>,
}

impl<H: HostStack, Buf: PacketBufferMut> MirrorStage<H, Buf> {
    /// Creates a new [`MirrorStage`] run by the worker owning `ctx`.
    #[must_use]
    pub fn new(
        name: &str,
        engine: &Arc<Rmirror<H>>,
        target: MirrorTarget,
        ctx: WorkerContext,
        out: PktQueue<Buf>,
    ) -> Self {
        Self {
            name: name.to_string(),
            engine: Arc::clone(engine),
            target,
            ctx,
            out,
        }
    }

    /// The rule applied by this stage.
    #[must_use]
    pub fn target(&self) -> &MirrorTarget {
        &self.target
    }
}

impl<H: HostStack, Buf: PacketBufferMut> NetworkFunction<Buf> for MirrorStage<H, Buf> {
    fn nf_name(&self) -> &str {
        &self.name
    }

    fn process<'a, Input: Iterator<Item = Packet<Buf>> + 'a>(
        &'a mut self,
        input: Input,
    ) -> impl Iterator<Item = Packet<Buf>> + 'a {
        trace!("Stage '{}'...", self.name);
        input.map(|packet| {
            let Verdict::Continue =
                self.engine
                    .target(&self.ctx, &packet, &self.target, &mut self.out);
            packet
        })
    }
}
