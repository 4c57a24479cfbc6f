// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Remote packet mirroring.
//!
//! A mirror target copies each packet it sees, wraps the copy in an IPv4 + GRE header
//! addressed to a collector and hands it to the host output path, while the original packet
//! continues untouched.

#![deny(
    unsafe_code,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::missing_errors_doc)]

mod conntrack;
mod context;
mod encap;
mod engine;
mod errors;
mod ident;
mod neigh;
mod nf;
mod output;
mod route;
mod stats;
mod target;

#[cfg(test)]
mod test;

pub use context::WorkerContext;
pub use engine::Rmirror;
pub use errors::{EncapError, MirrorError};
pub use ident::IdentGenerator;
pub use nf::MirrorStage;
pub use output::{LocalOut, PktQueue, TxError};
pub use stats::{MirrorStats, MirrorStatsSnapshot, describe_metrics};
pub use target::{MirrorTarget, TargetError, check};
