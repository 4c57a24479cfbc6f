// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Mirror target configuration and its install time validation

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use tracing::{info, warn};

/// Where mirrored copies go and how much of each packet they carry.
///
/// Immutable for the lifetime of the rule that installs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MirrorTarget {
    destination: Ipv4Addr,
    /// Bytes kept after the GRE header; zero keeps the whole packet.
    #[serde(default, alias = "len")]
    trim_length: u32,
}

impl MirrorTarget {
    /// Create a new target.
    #[must_use]
    pub fn new(destination: Ipv4Addr, trim_length: u32) -> Self {
        Self {
            destination,
            trim_length,
        }
    }

    /// The collector address.
    #[must_use]
    pub fn destination(&self) -> Ipv4Addr {
        self.destination
    }

    /// Number of bytes kept after the GRE header, zero meaning the full packet.
    #[must_use]
    pub fn trim_length(&self) -> u32 {
        self.trim_length
    }
}

/// Reasons a [`MirrorTarget`] is refused at install time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    /// 0.0.0.0
    #[error("mirror destination must be specified")]
    Unspecified,
    /// Copies can only be tunneled to a single collector.
    #[error("mirror destination {0} is a multicast address")]
    Multicast(Ipv4Addr),
    /// 255.255.255.255
    #[error("mirror destination {0} is the broadcast address")]
    Broadcast(Ipv4Addr),
    /// 127.0.0.0/8
    #[error("mirror destination {0} is a loopback address")]
    Loopback(Ipv4Addr),
}

/// Validate a target when the rule carrying it is installed.
pub fn check(target: &MirrorTarget) -> Result<(), TargetError> {
    let destination = target.destination();
    info!(
        %destination,
        len = target.trim_length(),
        "checking mirror target"
    );
    let verdict = if destination.is_unspecified() {
        Err(TargetError::Unspecified)
    } else if destination.is_broadcast() {
        Err(TargetError::Broadcast(destination))
    } else if destination.is_multicast() {
        Err(TargetError::Multicast(destination))
    } else if destination.is_loopback() {
        Err(TargetError::Loopback(destination))
    } else {
        Ok(())
    };
    if let Err(e) = &verdict {
        warn!("rejecting mirror target: {e}");
    }
    verdict
}
