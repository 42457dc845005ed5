//! Implementation of the analysis run.
//!
//! Every input is processed in order and its online seconds are added to a
//! single running total. A file that cannot be read, inflated or decoded is
//! skipped with a warning; the report file is written regardless.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use pt_core::{PlayerDurations, Report, durations_for_text, source};

use crate::{Config, OutputFormat};

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub report: Report,
    /// Files whose contents were analyzed.
    pub analyzed: usize,
    /// Inputs skipped because of an error.
    pub skipped: usize,
}

/// Run the analysis over `paths` and write the report file.
pub fn run<W: Write>(
    out: &mut W,
    paths: &[PathBuf],
    config: &Config,
    format: OutputFormat,
) -> Result<RunSummary> {
    let encodings = config
        .encodings()
        .context("invalid encodings in configuration")?;
    let extensions = config.extensions();
    fs::create_dir_all(&config.scratch_dir).with_context(|| {
        format!(
            "failed to create scratch directory {}",
            config.scratch_dir.display()
        )
    })?;

    let mut totals = PlayerDurations::new();
    let mut analyzed = 0;
    let mut skipped = 0;

    for input in source::expand_inputs(paths, &extensions) {
        let log = match input {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!(error = %e, "skipping input");
                skipped += 1;
                continue;
            }
        };

        if format == OutputFormat::Text {
            writeln!(out, "Analyzing {}", log.path.display())?;
        }

        match source::load(&log, &encodings, &config.scratch_dir) {
            Ok(text) => {
                let durations = durations_for_text(&text);
                tracing::debug!(
                    path = %log.path.display(),
                    players = durations.len(),
                    "analyzed log"
                );
                totals.absorb(durations);
                analyzed += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping file");
                skipped += 1;
            }
        }
    }

    let report = Report::from_durations(totals);
    fs::write(&config.output_path, report.render_file())
        .with_context(|| format!("failed to write {}", config.output_path.display()))?;

    match format {
        OutputFormat::Text => {
            writeln!(out, "{}", report.render_summary())?;
            if skipped > 0 {
                writeln!(out, "Skipped: {skipped}")?;
            }
            writeln!(out, "Report written to {}", config.output_path.display())?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report).context("failed to serialize report")?;
            writeln!(out)?;
        }
    }

    Ok(RunSummary {
        report,
        analyzed,
        skipped,
    })
}
