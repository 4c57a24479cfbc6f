// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Mirror engine counters
//!
//! Every event is counted twice: in the engine's own atomics, readable through
//! [`MirrorStats::snapshot`], and in the process wide `metrics` recorder, if one is installed.

use metrics::{counter, describe_counter};
use std::sync::atomic::{AtomicU64, Ordering};

/// Metric name constants
pub const RMIRROR_MIRRORED: &str = "rmirror_mirrored_pkts";
pub const RMIRROR_SKIPPED: &str = "rmirror_skipped_pkts";
pub const RMIRROR_ALLOC_FAILURES: &str = "rmirror_alloc_failures";
pub const RMIRROR_ROUTE_FAILURES: &str = "rmirror_route_failures";
pub const RMIRROR_NO_LOCAL_ADDRESS: &str = "rmirror_no_local_address";
pub const RMIRROR_NEIGHBOR_FALLBACKS: &str = "rmirror_neighbor_fallbacks";
pub const RMIRROR_TX_FAILURES: &str = "rmirror_tx_failures";
pub const RMIRROR_INVALID: &str = "rmirror_invalid_pkts";

/// Register descriptions of the mirror metrics with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(RMIRROR_MIRRORED, "Mirror copies handed to the output path");
    describe_counter!(
        RMIRROR_SKIPPED,
        "Packets not mirrored because they are mirror copies or seen while mirroring"
    );
    describe_counter!(RMIRROR_ALLOC_FAILURES, "Mirror copies lost to memory shortage");
    describe_counter!(
        RMIRROR_ROUTE_FAILURES,
        "Mirror copies dropped for lack of a route to the collector"
    );
    describe_counter!(
        RMIRROR_NO_LOCAL_ADDRESS,
        "Mirror copies dropped because the output interface has no address"
    );
    describe_counter!(
        RMIRROR_NEIGHBOR_FALLBACKS,
        "Mirror copies sent with a zero inner destination MAC"
    );
    describe_counter!(RMIRROR_TX_FAILURES, "Mirror copies refused by the output path");
    describe_counter!(RMIRROR_INVALID, "Packets which could not be encapsulated");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MirrorEvent {
    Mirrored,
    Skipped,
    AllocFailure,
    RouteFailure,
    NoLocalAddress,
    NeighborFallback,
    TxFailure,
    Invalid,
}

impl MirrorEvent {
    fn metric(self) -> &'static str {
        match self {
            MirrorEvent::Mirrored => RMIRROR_MIRRORED,
            MirrorEvent::Skipped => RMIRROR_SKIPPED,
            MirrorEvent::AllocFailure => RMIRROR_ALLOC_FAILURES,
            MirrorEvent::RouteFailure => RMIRROR_ROUTE_FAILURES,
            MirrorEvent::NoLocalAddress => RMIRROR_NO_LOCAL_ADDRESS,
            MirrorEvent::NeighborFallback => RMIRROR_NEIGHBOR_FALLBACKS,
            MirrorEvent::TxFailure => RMIRROR_TX_FAILURES,
            MirrorEvent::Invalid => RMIRROR_INVALID,
        }
    }
}

/// Counters of a mirror engine, shared by all workers using it.
#[derive(Debug, Default)]
pub struct MirrorStats {
    mirrored: AtomicU64,
    skipped: AtomicU64,
    alloc_failures: AtomicU64,
    route_failures: AtomicU64,
    no_local_address: AtomicU64,
    neighbor_fallbacks: AtomicU64,
    tx_failures: AtomicU64,
    invalid: AtomicU64,
}

/// A point in time copy of [`MirrorStats`]
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStatsSnapshot {
    pub mirrored: u64,
    pub skipped: u64,
    pub alloc_failures: u64,
    pub route_failures: u64,
    pub no_local_address: u64,
    pub neighbor_fallbacks: u64,
    pub tx_failures: u64,
    pub invalid: u64,
}

impl MirrorStats {
    fn counter(&self, event: MirrorEvent) -> &AtomicU64 {
        match event {
            MirrorEvent::Mirrored => &self.mirrored,
            MirrorEvent::Skipped => &self.skipped,
            MirrorEvent::AllocFailure => &self.alloc_failures,
            MirrorEvent::RouteFailure => &self.route_failures,
            MirrorEvent::NoLocalAddress => &self.no_local_address,
            MirrorEvent::NeighborFallback => &self.neighbor_fallbacks,
            MirrorEvent::TxFailure => &self.tx_failures,
            MirrorEvent::Invalid => &self.invalid,
        }
    }

    pub(crate) fn record(&self, event: MirrorEvent) {
        self.counter(event).fetch_add(1, Ordering::Relaxed);
        counter!(event.metric()).increment(1);
    }

    /// Read all counters.
    #[must_use]
    pub fn snapshot(&self) -> MirrorStatsSnapshot {
        let get = |event| self.counter(event).load(Ordering::Relaxed);
        MirrorStatsSnapshot {
            mirrored: get(MirrorEvent::Mirrored),
            skipped: get(MirrorEvent::Skipped),
            alloc_failures: get(MirrorEvent::AllocFailure),
            route_failures: get(MirrorEvent::RouteFailure),
            no_local_address: get(MirrorEvent::NoLocalAddress),
            neighbor_fallbacks: get(MirrorEvent::NeighborFallback),
            tx_failures: get(MirrorEvent::TxFailure),
            invalid: get(MirrorEvent::Invalid),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn events_counted_separately() {
        describe_metrics();
        let stats = MirrorStats::default();
        stats.record(MirrorEvent::Mirrored);
        stats.record(MirrorEvent::Mirrored);
        stats.record(MirrorEvent::TxFailure);
        assert_eq!(
            stats.snapshot(),
            MirrorStatsSnapshot {
                mirrored: 2,
                tx_failures: 1,
                ..Default::default()
            }
        );
    }
}
