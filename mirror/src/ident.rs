// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! IPv4 identification values for outer headers

use ahash::RandomState;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicU16, Ordering};

const IDENT_BUCKETS: usize = 2048;

/// Generator of IPv4 identification values.
///
/// Counters are kept per hashed (destination, protocol) bucket, so consecutive headers towards
/// a collector get distinct identifications while the sequence of one flow reveals nothing about
/// the others. Safe to share between workers.
pub struct IdentGenerator {
    hasher: RandomState,
    buckets: Box<[AtomicU16]>,
}

impl IdentGenerator {
    /// A generator with randomly keyed bucket hashing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// A generator with fixed hashing keys, yielding reproducible sequences.
    #[must_use]
    pub fn with_seeds(k0: u64, k1: u64, k2: u64, k3: u64) -> Self {
        Self::with_hasher(RandomState::with_seeds(k0, k1, k2, k3))
    }

    fn with_hasher(hasher: RandomState) -> Self {
        let buckets = (0..IDENT_BUCKETS).map(|_| AtomicU16::new(0)).collect();
        Self { hasher, buckets }
    }

    #[allow(clippy::cast_possible_truncation)] // only the low bits pick the bucket
    fn bucket_index(&self, destination: Ipv4Addr, protocol: u8) -> usize {
        (self.hasher.hash_one((destination, protocol)) as usize) % IDENT_BUCKETS
    }

    /// The identification for the next header sent to `destination` with `protocol`.
    pub fn next(&self, destination: Ipv4Addr, protocol: u8) -> u16 {
        let index = self.bucket_index(destination, protocol);
        // keyed offset, so that buckets do not all count from 0
        #[allow(clippy::cast_possible_truncation)]
        let salt = self.hasher.hash_one(index) as u16;
        self.buckets[index]
            .fetch_add(1, Ordering::Relaxed)
            .wrapping_add(salt)
    }
}

impl Default for IdentGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IdentGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentGenerator")
            .field("buckets", &self.buckets.len())
            .finish_non_exhaustive()
    }
}
