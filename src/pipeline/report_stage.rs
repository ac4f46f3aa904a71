//! Report output stage.
//!
//! Renders a history or trend with the configured reporter and writes it to
//! the configured destination.

use crate::config::OutputConfig;
use crate::history::ScanHistory;
use crate::model::BuildHistory;
use crate::reports::{create_reporter_with_options, ReportConfig};
use anyhow::Result;

use super::{should_use_color, write_output, OutputTarget};

/// Render `history` and write it to the configured destination.
pub fn output_history_report(
    history: &ScanHistory,
    output: &OutputConfig,
    report_config: &ReportConfig,
    quiet: bool,
) -> Result<()> {
    let target = OutputTarget::from_option(output.file.clone());
    let reporter =
        create_reporter_with_options(output.format, should_use_color(output.no_color, &target));
    let report = reporter.generate_history_report(history, report_config)?;
    write_output(&report, &target, quiet)
}

/// Render a trend and write it to the configured destination.
pub fn output_trend_report(
    trend: &BuildHistory,
    output: &OutputConfig,
    report_config: &ReportConfig,
    quiet: bool,
) -> Result<()> {
    let target = OutputTarget::from_option(output.file.clone());
    let reporter =
        create_reporter_with_options(output.format, should_use_color(output.no_color, &target));
    let report = reporter.generate_trend_report(trend, report_config)?;
    write_output(&report, &target, quiet)
}
