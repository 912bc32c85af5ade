//! IKnow command-line client
//!
//! - `tree` - print the materials tree
//! - `browse` - expand and open materials interactively
//! - `replies` - show the replies to a comment
//! - `reply` - reply to a comment

mod cli;
mod commands;
mod paths;

use std::fs;
use std::fs::File;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use crate::cli::Cli;

/// Starts logging to `latest.log` in the cache directory.
fn init_logging(level: LevelFilter) -> Result<()> {
    let Some(path) = paths::log_file() else {
        return Ok(());
    };
    paths::rotate_logs();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let log_file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    WriteLogger::init(level, Config::default(), log_file).context("failed to initialize logger")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.log_level) {
        eprintln!("warning: {e:#}");
    }
    log::info!("iknow {} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = cli.execute().await {
        log::error!("{:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
