// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Per worker state

use std::cell::Cell;

/// State owned by a single packet processing worker.
///
/// Handing a mirror copy to the output path may run the packet filter again on the same
/// worker. The `mirroring` flag marks that window so the engine does not mirror its own copies.
/// A context is never shared between workers, hence the plain [`Cell`].
#[derive(Debug, Default)]
pub struct WorkerContext {
    id: usize,
    mirroring: Cell<bool>,
}

impl WorkerContext {
    /// Create the context of worker `id`.
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self {
            id,
            mirroring: Cell::new(false),
        }
    }

    /// The worker this context belongs to.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// True while this worker is emitting a mirror copy.
    #[must_use]
    pub fn is_mirroring(&self) -> bool {
        self.mirroring.get()
    }

    /// Raise the mirroring flag until the returned guard is dropped.
    pub(crate) fn enter(&self) -> MirroringGuard<'_> {
        self.mirroring.set(true);
        MirroringGuard {
            flag: &self.mirroring,
        }
    }
}

/// Clears the mirroring flag of a [`WorkerContext`] when dropped, on every exit path.
#[must_use]
pub(crate) struct MirroringGuard<'ctx> {
    flag: &'ctx Cell<bool>,
}

impl Drop for MirroringGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
