//! CLI module for the AI Studio history service
//!
//! Provides subcommands:
//! - `serve`: HTTP API over the recent-searches cache
//! - `add`: record an interaction from the command line
//! - `list`: show one feature's history or the merged view

pub mod history;
pub mod serve;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// AI Studio history - recent searches across the media utilities
#[derive(Parser)]
#[command(name = "ai-studio-history")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve,

    /// Record an interaction for a feature
    Add(history::AddArgs),

    /// List recent interactions
    List(history::ListArgs),
}

/// Loads `.env` and configuration, then installs logging
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    logging::init_logging(&config.logging);

    if let Err(e) = loaded {
        warn!(error = %e, "Failed to load configuration, using defaults");
    }

    config
}
