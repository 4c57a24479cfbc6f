// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Validate an `RMIRROR` rule target and print it the way rule listings show it.

mod cmdline;

use args::RuleError;
use clap::Parser;
use cmdline::Cmdline;
use mirror::{MirrorTarget, TargetError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("bad rule file: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Target(#[from] TargetError),
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_file(path: &Path) -> Result<MirrorTarget, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let target: MirrorTarget = serde_yaml_ng::from_str(&text)?;
    mirror::check(&target)?;
    Ok(target)
}

fn load(cmdline: &Cmdline) -> Result<MirrorTarget, CliError> {
    match &cmdline.file {
        Some(path) => load_file(path),
        None => Ok(args::parse_rule(&cmdline.options)?),
    }
}

fn render(cmdline: &Cmdline, target: &MirrorTarget) -> Result<String, CliError> {
    if cmdline.yaml {
        Ok(serde_yaml_ng::to_string(target)?)
    } else {
        Ok(format!(
            "{}\n{}\n",
            args::print(target).trim_start(),
            args::save(target).trim_start()
        ))
    }
}

fn main() -> ExitCode {
    let cmdline = Cmdline::parse();
    init_logging();
    if cmdline.show_options {
        println!("{}", args::help());
        return ExitCode::SUCCESS;
    }
    match load(&cmdline).and_then(|target| render(&cmdline, &target)) {
        Ok(rendered) => {
            info!("rule is valid");
            print!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(CliError::Rule(RuleError::Syntax(e))) => {
            // clap formats its own usage errors
            let _ = e.print();
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
