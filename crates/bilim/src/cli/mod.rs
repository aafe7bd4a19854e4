//! Command-line interface module.

mod commands;
mod run;
mod stats;

pub use commands::{Cli, Commands};
pub use run::{run_once, run_server};
pub use stats::{check, show_stats};
