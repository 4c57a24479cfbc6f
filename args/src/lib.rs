// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Option syntax of the `RMIRROR` rule target.
//!
//! A rule is written as `--target IPADDR [--len BYTES]`. Parsing validates the target the same
//! way installing the rule does. [`save`] renders a rule back to options which parse to the
//! same target; [`print`] renders the human readable form used when listing rules.

#![deny(clippy::all, clippy::pedantic, clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::missing_errors_doc)]

pub use clap::Parser;
use clap::CommandFactory;
use mirror::{MirrorTarget, TargetError, check};
use std::ffi::OsString;
use std::net::Ipv4Addr;
use tracing::debug;

/// Name of the target in rule listings
pub const TARGET_NAME: &str = "RMIRROR";

/// Options of the `RMIRROR` target
#[derive(Parser, Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[command(name = TARGET_NAME, no_binary_name = true)]
#[command(about = "RMIRROR target options", long_about = None)]
pub struct RmirrorArgs {
    #[arg(long, value_name = "IPADDR", help = "RMIRROR destination IP")]
    target: Ipv4Addr,

    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = 0,
        help = "Number of bytes to trim packet to, defaults to full packet. 0 is equivalent to full length. Byte count is offset from end of GRE header"
    )]
    len: u32,
}

impl From<RmirrorArgs> for MirrorTarget {
    fn from(args: RmirrorArgs) -> Self {
        MirrorTarget::new(args.target, args.len)
    }
}

impl From<&MirrorTarget> for RmirrorArgs {
    fn from(target: &MirrorTarget) -> Self {
        RmirrorArgs {
            target: target.destination(),
            len: target.trim_length(),
        }
    }
}

/// Errors in a rule's target options
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error(transparent)]
    Syntax(#[from] clap::Error),
    #[error(transparent)]
    Target(#[from] TargetError),
}

/// Parse and validate target options, given without a program name.
pub fn parse_rule<I, T>(args: I) -> Result<MirrorTarget, RuleError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let target = MirrorTarget::from(RmirrorArgs::try_parse_from(args)?);
    check(&target)?;
    debug!("parsed rule target {target:?}");
    Ok(target)
}

/// The options reproducing `target`.
#[must_use]
pub fn save(target: &MirrorTarget) -> String {
    format!(
        " --target {} --len {}",
        target.destination(),
        target.trim_length()
    )
}

/// The form of `target` shown in rule listings.
#[must_use]
pub fn print(target: &MirrorTarget) -> String {
    let mut out = format!(" {TARGET_NAME} target:{}", target.destination());
    if target.trim_length() > 0 {
        out.push_str(&format!(" len: {}", target.trim_length()));
    }
    out
}

/// Usage of the target options.
#[must_use]
pub fn help() -> String {
    RmirrorArgs::command().render_help().to_string()
}
