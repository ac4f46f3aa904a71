//! Summarize command handler.
//!
//! Implements the `summarize` subcommand: one build, optionally compared
//! against the build before it.

use crate::config::SummarizeConfig;
use crate::gate;
use crate::pipeline::{assemble, load_report, output_history_report};
use crate::reports::{ReportConfig, ReportMetadata};
use anyhow::{Context, Result};

/// Run the summarize command, returning the gate's exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_summarize(config: SummarizeConfig) -> Result<i32> {
    let quiet = config.behavior.quiet;

    if !quiet {
        tracing::info!("Loading build report: {}", config.current.display());
    }
    let current = load_report(&config.current)?;
    let previous = match &config.previous {
        Some(path) => {
            if !quiet {
                tracing::info!("Loading previous build report: {}", path.display());
            }
            Some(load_report(path)?)
        }
        None => None,
    };

    let history = assemble(&current, previous.as_ref())
        .with_context(|| format!("Invalid build report: {}", config.current.display()))?;

    if !quiet {
        tracing::info!(
            "Build {}: {} flaws, {} new, net {}",
            history.build_id(),
            history.total_flaws_count(),
            history.total_new_flaws_count(),
            history.total_net_change_count()
        );
    }

    let verdict = gate::evaluate(&history, &config.behavior);
    for failure in &verdict.failures {
        tracing::warn!("Gate failed: {failure}");
    }

    let report_config = ReportConfig {
        title: config.title.clone(),
        include_history: config.include_history,
        metadata: ReportMetadata {
            current_report_path: Some(config.current.display().to_string()),
            previous_report_path: config.previous.as_ref().map(|p| p.display().to_string()),
        },
    };
    output_history_report(&history, &config.output, &report_config, quiet)?;

    Ok(verdict.exit_code())
}
