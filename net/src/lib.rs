// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Packet buffers, headers and the packet model used by the mirror engine.

#![deny(
    unsafe_code,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]

pub mod buffer;
pub mod eth;
pub mod gre;
pub mod interface;
pub mod ipv4;
pub mod packet;
pub mod parse;
pub mod rmirror;
