//! bilim CLI binary.
//!
//! Runs the scheduled publisher, a single publish cycle, or inspects the
//! usage ledger and history files.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, check, run_once, run_server, show_stats};

    let cli = Cli::parse();

    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = cli.config.as_deref();
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await?,
        Commands::Once => run_once(config).await?,
        Commands::Stats => show_stats(config).await?,
        Commands::Check => check(config)?,
    }

    Ok(())
}
