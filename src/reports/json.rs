//! JSON report generator.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator, ReportMetadata};
use crate::history::ScanHistory;
use crate::model::{BuildHistory, SeverityLevel};
use chrono::Utc;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String, ReportError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.map_err(|e| ReportError::SerializationError(e.to_string()))
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct JsonReportMetadata<'a> {
    tool: ToolInfo,
    generated_at: String,
    title: Option<&'a str>,
    #[serde(flatten)]
    sources: &'a ReportMetadata,
}

impl<'a> JsonReportMetadata<'a> {
    fn new(config: &'a ReportConfig) -> Self {
        Self {
            tool: ToolInfo {
                name: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            },
            generated_at: Utc::now().to_rfc3339(),
            title: config.title.as_deref(),
            sources: &config.metadata,
        }
    }
}

/// Per-severity row with the derived new-flaw count spelled out.
#[derive(Serialize)]
struct SeverityRow {
    severity: SeverityLevel,
    label: &'static str,
    count: i64,
    net_change: i64,
    new_flaws: i64,
    mitigated: bool,
}

#[derive(Serialize)]
struct JsonHistoryReport<'a> {
    metadata: JsonReportMetadata<'a>,
    severities: Vec<SeverityRow>,
    history: &'a ScanHistory,
}

#[derive(Serialize)]
struct JsonTrendReport<'a> {
    metadata: JsonReportMetadata<'a>,
    trend: &'a BuildHistory,
}

impl ReportGenerator for JsonReporter {
    fn generate_history_report(
        &self,
        history: &ScanHistory,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let severities = SeverityLevel::descending()
            .map(|level| SeverityRow {
                severity: level,
                label: level.label(),
                count: history.flaws_count_at(level),
                net_change: history.net_change_at(level),
                new_flaws: history.new_flaws_at(level),
                mitigated: history.is_mitigated_at(level),
            })
            .collect();

        self.render(&JsonHistoryReport {
            metadata: JsonReportMetadata::new(config),
            severities,
            history,
        })
    }

    fn generate_trend_report(
        &self,
        trend: &BuildHistory,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        self.render(&JsonTrendReport {
            metadata: JsonReportMetadata::new(config),
            trend,
        })
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}
