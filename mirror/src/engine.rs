// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The mirror target
//!
//! For every packet it is given, [`Rmirror::target`] copies the packet, tunnels the copy to the
//! collector in an IPv4 + GRE header and hands it to the host output path.
//! Whatever happens to the copy, the original continues unchanged.

use crate::conntrack;
use crate::context::WorkerContext;
use crate::encap::{Encapsulated, encapsulate};
use crate::errors::MirrorError;
use crate::ident::IdentGenerator;
use crate::neigh::{resolve_inner_destination, rewrite_inner_destination};
use crate::output::LocalOut;
use crate::route::{bind_route, set_outer_source};
use crate::stats::{MirrorEvent, MirrorStats};
use crate::target::MirrorTarget;
use net::buffer::PacketBufferMut;
use net::eth::mac::Mac;
use net::packet::Packet;
use net::rmirror::RmirrorHeader;
use pipeline::Verdict;
use routing::HostStack;
use tracing::{debug, trace};

/// Remote mirror engine.
///
/// One engine serves any number of workers and targets; per worker state lives in the
/// [`WorkerContext`] passed to each call.
#[derive(Debug)]
pub struct Rmirror<H: HostStack> {
    host: H,
    idents: IdentGenerator,
    stats: MirrorStats,
}

impl<H: HostStack> Rmirror<H> {
    /// Create an engine resolving routes, neighbors and interfaces with `host`.
    #[must_use]
    pub fn new(host: H) -> Self {
        Self::with_idents(host, IdentGenerator::new())
    }

    /// Create an engine drawing outer IPv4 identifications from `idents`.
    #[must_use]
    pub fn with_idents(host: H, idents: IdentGenerator) -> Self {
        Self {
            host,
            idents,
            stats: MirrorStats::default(),
        }
    }

    /// The host stack the engine resolves against.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The engine counters.
    #[must_use]
    pub fn stats(&self) -> &MirrorStats {
        &self.stats
    }

    /// Mirror `packet` to `target`, sending the copy through `out`.
    ///
    /// Always returns [`Verdict::Continue`]: the original packet is neither modified nor
    /// consumed, and mirroring failures only cost the copy.
    /// Packets seen while this worker is already emitting a copy, and copies themselves, are
    /// not mirrored.
    pub fn target<Buf, O>(
        &self,
        ctx: &WorkerContext,
        packet: &Packet<Buf>,
        target: &MirrorTarget,
        out: &mut O,
    ) -> Verdict
    where
        Buf: PacketBufferMut,
        O: LocalOut<Buf> + ?Sized,
    {
        match self.mirror(ctx, packet, target, out) {
            Ok(()) => self.stats.record(MirrorEvent::Mirrored),
            Err(e) => {
                self.stats.record(Self::failure_event(&e));
                match e {
                    MirrorError::Reentrant | MirrorError::AlreadyMirrored => {
                        trace!("worker {}: not mirroring: {e}", ctx.id());
                    }
                    e => debug!(
                        "worker {}: mirror copy to {} lost: {e}",
                        ctx.id(),
                        target.destination()
                    ),
                }
            }
        }
        Verdict::Continue
    }

    fn failure_event(e: &MirrorError) -> MirrorEvent {
        match e {
            MirrorError::Reentrant | MirrorError::AlreadyMirrored => MirrorEvent::Skipped,
            e if e.is_allocation() => MirrorEvent::AllocFailure,
            MirrorError::RouteUnreachable(_) => MirrorEvent::RouteFailure,
            MirrorError::NoLocalAddress(_) => MirrorEvent::NoLocalAddress,
            MirrorError::Transmit(_) => MirrorEvent::TxFailure,
            _ => MirrorEvent::Invalid,
        }
    }

    fn mirror<Buf, O>(
        &self,
        ctx: &WorkerContext,
        packet: &Packet<Buf>,
        target: &MirrorTarget,
        out: &mut O,
    ) -> Result<(), MirrorError>
    where
        Buf: PacketBufferMut,
        O: LocalOut<Buf> + ?Sized,
    {
        if ctx.is_mirroring() {
            return Err(MirrorError::Reentrant);
        }
        if packet.get_meta().mirrored {
            return Err(MirrorError::AlreadyMirrored);
        }

        let mut copy = packet.try_clone()?;
        conntrack::bypass(&mut copy);
        copy.get_meta_mut().mirrored = true;
        let inner_destination = copy.ipv4_destination().map_err(MirrorError::NotIpv4)?;

        let Encapsulated {
            packet: mut copy,
            pending_link_rewrite,
        } = encapsulate(copy, target, inner_destination, &self.host, &self.idents)?;

        // the route bound while synthesizing the inner ethernet header, if any
        let inner_dst = if pending_link_rewrite {
            copy.get_meta().dst
        } else {
            None
        };

        let tos = RmirrorHeader::template().ip().tos();
        let dst = bind_route(&mut copy, &self.host, target.destination(), tos)?;
        let source = set_outer_source(&mut copy, &self.host, dst.oif())?;

        if pending_link_rewrite {
            let mac = resolve_inner_destination(&self.host, inner_dst.as_ref(), inner_destination)
                .unwrap_or_else(|| {
                    self.stats.record(MirrorEvent::NeighborFallback);
                    Mac::ZERO
                });
            rewrite_inner_destination(&mut copy, mac);
        }

        trace!(
            "worker {}: mirroring {} bytes {source} -> {} via {}",
            ctx.id(),
            copy.len(),
            target.destination(),
            dst.oif()
        );
        let _guard = ctx.enter();
        out.local_out(copy)?;
        Ok(())
    }
}
