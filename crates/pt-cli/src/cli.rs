//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Player online-time report.
///
/// Reads server logs (plain `.log` files, `.gz` archives, or directories of
/// them), pairs player logins with logouts, and writes the total online
/// seconds of every player to a report file.
#[derive(Debug, Parser)]
#[command(name = "playtime", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to write the report (overrides the configured path).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Console output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log files or directories of log files.
    pub paths: Vec<PathBuf>,
}

/// How the run is reported on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Progress lines and a short summary.
    Text,
    /// The full report as JSON, nothing else.
    Json,
}
