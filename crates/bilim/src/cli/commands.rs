//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bilim - daily facts with photos for a Telegram channel
#[derive(Parser, Debug)]
#[command(name = "bilim")]
#[command(about = "Publishes generated facts with matching photos to a Telegram channel", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file overriding the defaults
    #[arg(short, long, global = true, env = "BILIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run one publish cycle at startup, then publish on the daily schedule
    Run,

    /// Run a single publish cycle and exit
    Once,

    /// Print usage statistics and the number of published facts
    Stats,

    /// Validate configuration and credentials, then exit
    Check,
}
