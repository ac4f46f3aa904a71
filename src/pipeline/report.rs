//! Build-report input and assembly into frozen histories.
//!
//! A build report is the JSON document an upstream scanner integration
//! writes for one build. Two of them (current and previous) are enough to
//! derive every delta a [`ScanHistory`] carries.

use crate::error::{ErrorContext, HistoryError, Result};
use crate::history::{delta, ScaScanHistory, ScanHistory, SeverityCounts};
use crate::model::{severity_array, BuildHistory, HistorySnapshot, ScaComponent, SEVERITY_COUNT};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Kind of analysis a report was produced by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    #[default]
    Static,
    Dynamic,
}

/// Composition-analysis block of a build report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaReport {
    pub subscribed: bool,
    pub max_cvss_score: f64,
    pub blacklisted_components_count: i64,
    /// Vulnerability counts, one per severity, ascending
    pub vulnerabilities: Vec<i64>,
    /// Mitigation flags, one per severity; non-zero means mitigated
    pub mitigated: Vec<i64>,
    pub components: Vec<ScaComponent>,
    pub history: Vec<HistorySnapshot>,
}

/// One build's report as read from disk.
///
/// Per-severity arrays are ascending by severity (informational first). An
/// omitted array is read as all zeros; any other length is rejected when the
/// report is assembled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildReport {
    pub account_id: String,
    pub app_id: String,
    pub build_id: String,
    /// Build date, used as the trend label when present
    pub date: Option<String>,
    pub analysis: AnalysisKind,
    pub policy_name: String,
    pub policy_compliance_status: String,
    pub veracode_level: String,
    pub score: i64,
    pub scan_overdue: bool,
    pub flaws_count: Vec<i64>,
    pub mitigated: Vec<i64>,
    pub policy_affect: Vec<i64>,
    /// Reported total; the sum of `flaws_count` when absent
    pub total_flaws_count: Option<i64>,
    pub history: Vec<HistorySnapshot>,
    pub sca: Option<ScaReport>,
}

impl BuildReport {
    /// Decode a report from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| HistoryError::parse("decoding build report", e))
    }

    /// Total flaw count, falling back to the per-severity sum.
    ///
    /// `flaws_count` is length-checked even when a total is reported.
    pub fn total_flaws(&self) -> Result<i64> {
        let counts = self.severity_counts()?;
        match self.total_flaws_count {
            Some(total) => Ok(total),
            None => delta::checked_total("flaws_count", counts),
        }
    }

    /// Trend label: the build date when known, otherwise the build id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.date
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.build_id)
    }

    fn severity_counts(&self) -> Result<SeverityCounts> {
        counts_or_zero("flaws_count", &self.flaws_count)
    }
}

/// Read and decode a build report.
pub fn load_report(path: &Path) -> Result<BuildReport> {
    let content = std::fs::read_to_string(path).map_err(|e| HistoryError::io(path, e))?;
    BuildReport::from_json(&content)
        .with_context(|| format!("Failed to load {}", path.display()))
}

fn counts_or_zero(field: &str, values: &[i64]) -> Result<SeverityCounts> {
    if values.is_empty() {
        Ok([0; SEVERITY_COUNT])
    } else {
        severity_array(field, values)
    }
}

/// Build the frozen history of `current`, with deltas against `previous`.
///
/// A missing previous build counts as a build with no findings and no
/// components. Dynamic reports never carry SCA data; an `sca` block on one is
/// ignored.
pub fn assemble(current: &BuildReport, previous: Option<&BuildReport>) -> Result<ScanHistory> {
    if let Some(previous) = previous {
        if !previous.app_id.is_empty() && previous.app_id != current.app_id {
            tracing::warn!(
                current = %current.app_id,
                previous = %previous.app_id,
                "Comparing builds of different applications"
            );
        }
    }

    let flaws_count = current.severity_counts()?;
    let previous_counts = previous.map(BuildReport::severity_counts).transpose()?;

    let builder = match current.analysis {
        AnalysisKind::Static => ScanHistory::builder(),
        AnalysisKind::Dynamic => ScanHistory::dynamic_builder(),
    };
    let mut builder = builder
        .ids(&current.account_id, &current.app_id, &current.build_id)
        .policy(
            &current.policy_name,
            &current.policy_compliance_status,
            &current.veracode_level,
        )
        .score(current.score)
        .scan_overdue(current.scan_overdue)
        .flaws_count(flaws_count)
        .mitigate_flag(counts_or_zero("mitigated", &current.mitigated)?)
        .policy_affect(counts_or_zero("policy_affect", &current.policy_affect)?)
        .net_change(delta::net_change(previous_counts.as_ref(), &flaws_count)?)
        .total_flaws_count(current.total_flaws()?)
        .flaws_count_history(current.history.clone());

    match (current.analysis, &current.sca) {
        (AnalysisKind::Static, Some(sca)) => {
            let previous_sca = previous.and_then(|p| p.sca.as_ref()).filter(|s| s.subscribed);
            builder = builder.sca_history(assemble_sca(sca, previous_sca)?);
        }
        (AnalysisKind::Dynamic, Some(_)) => {
            tracing::warn!(
                build_id = %current.build_id,
                "Ignoring SCA block on a dynamic analysis report"
            );
        }
        (_, None) => {}
    }

    builder.build()
}

fn assemble_sca(current: &ScaReport, previous: Option<&ScaReport>) -> Result<ScaScanHistory> {
    if !current.subscribed {
        if current.history.is_empty() {
            return Ok(ScaScanHistory::empty());
        }
        return Ok(ScaScanHistory::history_only(current.history.clone()));
    }

    let vulnerabilities = counts_or_zero("sca.vulnerabilities", &current.vulnerabilities)?;
    let mitigated = counts_or_zero("sca.mitigated", &current.mitigated)?;
    let previous_vulnerabilities = previous
        .map(|p| counts_or_zero("sca.vulnerabilities", &p.vulnerabilities))
        .transpose()?;

    let finding_counts = delta::vulnerability_counts(
        previous_vulnerabilities.as_ref(),
        &vulnerabilities,
        &mitigated,
    )?;
    let components = delta::mark_new_components(
        previous.map(|p| p.components.as_slice()),
        &current.components,
    );

    ScaScanHistory::full(
        current.max_cvss_score,
        current.blacklisted_components_count,
        finding_counts,
        components,
        current.history.clone(),
    )
}

/// Flaw-count time series across `reports`, in the order given.
///
/// Each report's `flaws_count` is validated the same way `assemble` does.
pub fn trend(label: &str, reports: &[BuildReport]) -> Result<BuildHistory> {
    let snapshots = reports
        .iter()
        .map(|report| -> Result<HistorySnapshot> {
            Ok(HistorySnapshot::new(report.label(), report.total_flaws()?))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(BuildHistory::new(label, snapshots))
}
