//! # arbor
//!
//! Command line entry point.
//!
//! Startup runs in a fixed order: parse arguments, load configuration
//! (file, then `ARBOR_*` environment overrides), install the tracing
//! subscriber, then dispatch the subcommand. Any failure halts with a
//! contextual error.

#![forbid(unsafe_code)]
#![forbid(clippy::unwrap_used)]
#![forbid(clippy::panic)]
#![deny(clippy::expect_used)]

use std::time::Instant;

use anyhow::{Context, Result};
use arbor::cli::Cli;
use arbor::commands::execute_command;
use arbor_core::{load_config, logging::init_tracing};
use clap::Parser;
use tracing::info;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())
        .context("Configuration failed. Check arbor.toml and ARBOR_* variables")?;
    init_tracing(&config.log_filter).context("Logging initialization failed")?;

    info!(data_dir = %config.data_dir.display(), "arbor starting");
    execute_command(cli.command, &config)?;
    info!(elapsed_ms = start_time.elapsed().as_millis(), "arbor finished");
    Ok(())
}
