//! Trend command handler.
//!
//! Implements the `trend` subcommand: a flaw-count series over several
//! build reports given in build order.

use crate::config::TrendConfig;
use crate::pipeline::{exit_codes, load_report, output_trend_report, trend};
use crate::reports::{ReportConfig, ReportMetadata};
use anyhow::{bail, Result};

/// Run the trend command, returning the desired exit code.
#[allow(clippy::needless_pass_by_value)]
pub fn run_trend(config: TrendConfig) -> Result<i32> {
    if config.reports.is_empty() {
        bail!("At least one build report is required");
    }

    let reports = config
        .reports
        .iter()
        .map(|path| {
            if !config.quiet {
                tracing::info!("Loading build report: {}", path.display());
            }
            load_report(path)
        })
        .collect::<crate::Result<Vec<_>>>()?;

    let series = trend(&config.label, &reports)?;
    if !config.quiet {
        tracing::info!("Built trend of {} builds", series.len());
    }

    let report_config = ReportConfig {
        title: None,
        include_history: true,
        metadata: ReportMetadata {
            current_report_path: config.reports.last().map(|p| p.display().to_string()),
            previous_report_path: config.reports.first().map(|p| p.display().to_string()),
        },
    };
    output_trend_report(&series, &config.output, &report_config, config.quiet)?;

    Ok(exit_codes::SUCCESS)
}
