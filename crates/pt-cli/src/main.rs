use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use pt_cli::commands::analyze;
use pt_cli::{Cli, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    if cli.paths.is_empty() {
        // No inputs, show help
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }

    let mut config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    tracing::debug!(?config, "loaded configuration");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = analyze::run(&mut out, &cli.paths, &config, cli.format)?;
    tracing::info!(
        analyzed = summary.analyzed,
        skipped = summary.skipped,
        players = summary.report.player_count,
        "run complete"
    );

    Ok(())
}
