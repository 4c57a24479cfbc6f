// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Cmd line of the rule tool

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Validate and render RMIRROR rule targets", long_about = None)]
pub struct Cmdline {
    #[arg(long, help = "Render the rule as YAML instead of rule options")]
    pub yaml: bool,

    #[arg(
        long,
        value_name = "YAML file",
        conflicts_with = "options",
        help = "Read the rule from a YAML file instead of target options"
    )]
    pub file: Option<PathBuf>,

    #[arg(long, help = "Show the target options and exit")]
    pub show_options: bool,

    #[arg(
        last = true,
        value_name = "OPTIONS",
        help = "Target options, e.g. -- --target 10.0.0.5 --len 64"
    )]
    pub options: Vec<String>,
}
