//! Static or dynamic scan outcome of one build.

use super::{delta, ScaScanHistory};
use crate::error::{HistoryError, Result};
use crate::model::{has_series, HistorySnapshot, SeverityLevel, FLAWS_COUNT_KEY, SEVERITY_COUNT};
use serde::Serialize;

/// Per-severity integer array, indexed by [`SeverityLevel::ordinal`].
pub type SeverityCounts = [i64; SEVERITY_COUNT];

/// Kind of analysis that produced a [`ScanHistory`].
///
/// Dynamic analysis and composition analysis are mutually exclusive, so only
/// the static variant can carry SCA data.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "analysis", rename_all = "snake_case")]
pub enum ScanOutcome {
    Static { sca_history: Option<ScaScanHistory> },
    Dynamic,
}

impl ScanOutcome {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Static { .. } => "Static Analysis",
            Self::Dynamic => "Dynamic Analysis",
        }
    }
}

impl Default for ScanOutcome {
    fn default() -> Self {
        Self::Static { sca_history: None }
    }
}

/// Frozen scan result for one build, with its deltas against the previous build.
///
/// `total_new_flaws_count` and `total_net_change_count` are derived from
/// `net_change` when the value is built and never recomputed.
#[derive(Debug, Clone, Serialize)]
pub struct ScanHistory {
    account_id: String,
    app_id: String,
    build_id: String,
    policy_name: String,
    policy_compliance_status: String,
    veracode_level: String,
    score: i64,
    scan_overdue: bool,
    flaws_count: SeverityCounts,
    mitigate_flag: SeverityCounts,
    policy_affect: SeverityCounts,
    net_change: SeverityCounts,
    total_flaws_count: i64,
    total_new_flaws_count: i64,
    total_net_change_count: i64,
    flaws_count_history: Vec<HistorySnapshot>,
    outcome: ScanOutcome,
}

impl ScanHistory {
    /// Builder for a static-analysis history.
    pub fn builder() -> ScanHistoryBuilder {
        ScanHistoryBuilder::default()
    }

    /// Builder for a dynamic-analysis history, which never carries SCA data.
    pub fn dynamic_builder() -> ScanHistoryBuilder {
        ScanHistoryBuilder {
            outcome: ScanOutcome::Dynamic,
            ..ScanHistoryBuilder::default()
        }
    }

    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    #[must_use]
    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    #[must_use]
    pub fn policy_name(&self) -> &str {
        &self.policy_name
    }

    #[must_use]
    pub fn policy_compliance_status(&self) -> &str {
        &self.policy_compliance_status
    }

    #[must_use]
    pub fn veracode_level(&self) -> &str {
        &self.veracode_level
    }

    #[must_use]
    pub const fn score(&self) -> i64 {
        self.score
    }

    #[must_use]
    pub const fn is_scan_overdue(&self) -> bool {
        self.scan_overdue
    }

    #[must_use]
    pub const fn outcome(&self) -> &ScanOutcome {
        &self.outcome
    }

    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        matches!(self.outcome, ScanOutcome::Dynamic)
    }

    /// Flaw count at a raw severity index.
    pub fn flaws_count(&self, severity: i64) -> Result<i64> {
        Ok(self.flaws_count[index(severity)?])
    }

    pub fn mitigate_flag(&self, severity: i64) -> Result<i64> {
        Ok(self.mitigate_flag[index(severity)?])
    }

    pub fn policy_affection(&self, severity: i64) -> Result<i64> {
        Ok(self.policy_affect[index(severity)?])
    }

    /// Signed change against the previous build at a raw severity index.
    pub fn net_change(&self, severity: i64) -> Result<i64> {
        Ok(self.net_change[index(severity)?])
    }

    /// Newly introduced flaws: the positive part of the net change.
    pub fn new_flaws(&self, severity: i64) -> Result<i64> {
        Ok(self.net_change[index(severity)?].max(0))
    }

    #[must_use]
    pub const fn flaws_count_at(&self, severity: SeverityLevel) -> i64 {
        self.flaws_count[severity.ordinal()]
    }

    #[must_use]
    pub const fn net_change_at(&self, severity: SeverityLevel) -> i64 {
        self.net_change[severity.ordinal()]
    }

    #[must_use]
    pub fn new_flaws_at(&self, severity: SeverityLevel) -> i64 {
        self.net_change[severity.ordinal()].max(0)
    }

    #[must_use]
    pub const fn is_mitigated_at(&self, severity: SeverityLevel) -> bool {
        self.mitigate_flag[severity.ordinal()] > 0
    }

    #[must_use]
    pub const fn total_flaws_count(&self) -> i64 {
        self.total_flaws_count
    }

    #[must_use]
    pub const fn total_new_flaws_count(&self) -> i64 {
        self.total_new_flaws_count
    }

    #[must_use]
    pub const fn total_net_change_count(&self) -> i64 {
        self.total_net_change_count
    }

    #[must_use]
    pub fn flaws_count_history(&self) -> &[HistorySnapshot] {
        &self.flaws_count_history
    }

    /// Whether any historical snapshot carries a flaw count.
    #[must_use]
    pub fn has_flaws_count_history(&self) -> bool {
        has_series(&self.flaws_count_history, FLAWS_COUNT_KEY)
    }

    /// Always false for dynamic scans.
    #[must_use]
    pub const fn has_sca_history(&self) -> bool {
        matches!(
            self.outcome,
            ScanOutcome::Static {
                sca_history: Some(_)
            }
        )
    }

    /// SCA sub-history of a static scan. Dynamic scans fail with
    /// [`HistoryError::ScaNotApplicable`].
    pub fn sca_history(&self) -> Result<Option<&ScaScanHistory>> {
        match &self.outcome {
            ScanOutcome::Static { sca_history } => Ok(sca_history.as_ref()),
            ScanOutcome::Dynamic => Err(HistoryError::ScaNotApplicable),
        }
    }
}

fn index(severity: i64) -> Result<usize> {
    SeverityLevel::from_ordinal(severity).map(SeverityLevel::ordinal)
}

// ============================================================================
// Builder
// ============================================================================

/// Collects the inputs of a [`ScanHistory`] and freezes them in [`build`](Self::build).
#[derive(Debug, Default)]
#[must_use]
pub struct ScanHistoryBuilder {
    account_id: String,
    app_id: String,
    build_id: String,
    policy_name: String,
    policy_compliance_status: String,
    veracode_level: String,
    score: i64,
    scan_overdue: bool,
    flaws_count: SeverityCounts,
    mitigate_flag: SeverityCounts,
    policy_affect: SeverityCounts,
    net_change: SeverityCounts,
    total_flaws_count: i64,
    flaws_count_history: Vec<HistorySnapshot>,
    outcome: ScanOutcome,
}

impl ScanHistoryBuilder {
    pub fn ids(
        mut self,
        account_id: impl Into<String>,
        app_id: impl Into<String>,
        build_id: impl Into<String>,
    ) -> Self {
        self.account_id = account_id.into();
        self.app_id = app_id.into();
        self.build_id = build_id.into();
        self
    }

    pub fn policy(
        mut self,
        policy_name: impl Into<String>,
        compliance_status: impl Into<String>,
        veracode_level: impl Into<String>,
    ) -> Self {
        self.policy_name = policy_name.into();
        self.policy_compliance_status = compliance_status.into();
        self.veracode_level = veracode_level.into();
        self
    }

    pub const fn score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }

    pub const fn scan_overdue(mut self, overdue: bool) -> Self {
        self.scan_overdue = overdue;
        self
    }

    pub const fn flaws_count(mut self, counts: SeverityCounts) -> Self {
        self.flaws_count = counts;
        self
    }

    pub const fn mitigate_flag(mut self, flags: SeverityCounts) -> Self {
        self.mitigate_flag = flags;
        self
    }

    pub const fn policy_affect(mut self, affect: SeverityCounts) -> Self {
        self.policy_affect = affect;
        self
    }

    pub const fn net_change(mut self, net_change: SeverityCounts) -> Self {
        self.net_change = net_change;
        self
    }

    /// Total flaw count as reported; not derived from `flaws_count`.
    pub const fn total_flaws_count(mut self, total: i64) -> Self {
        self.total_flaws_count = total;
        self
    }

    pub fn flaws_count_history(mut self, history: Vec<HistorySnapshot>) -> Self {
        self.flaws_count_history = history;
        self
    }

    /// Attach SCA data. Ignored by dynamic builders, which stay SCA-free.
    pub fn sca_history(mut self, sca: ScaScanHistory) -> Self {
        match &mut self.outcome {
            ScanOutcome::Static { sca_history } => *sca_history = Some(sca),
            ScanOutcome::Dynamic => {
                tracing::warn!("Ignoring SCA history attached to a dynamic scan");
            }
        }
        self
    }

    /// Validate the policy fields and freeze the history.
    ///
    /// Fails with `CountOverflow` when the net-change totals do not fit in
    /// an `i64`.
    pub fn build(self) -> Result<ScanHistory> {
        if self.policy_name.is_empty() {
            return Err(HistoryError::empty_field("policy_name"));
        }
        if self.policy_compliance_status.is_empty() {
            return Err(HistoryError::empty_field("policy_compliance_status"));
        }
        if self.veracode_level.is_empty() {
            return Err(HistoryError::empty_field("veracode_level"));
        }

        let total_net_change_count = delta::checked_total("net_change", self.net_change)?;
        let total_new_flaws_count =
            delta::checked_total("net_change", self.net_change.map(|d| d.max(0)))?;

        tracing::debug!(
            build_id = %self.build_id,
            analysis = self.outcome.label(),
            total_new_flaws_count,
            total_net_change_count,
            "Froze scan history"
        );

        Ok(ScanHistory {
            account_id: self.account_id,
            app_id: self.app_id,
            build_id: self.build_id,
            policy_name: self.policy_name,
            policy_compliance_status: self.policy_compliance_status,
            veracode_level: self.veracode_level,
            score: self.score,
            scan_overdue: self.scan_overdue,
            flaws_count: self.flaws_count,
            mitigate_flag: self.mitigate_flag,
            policy_affect: self.policy_affect,
            net_change: self.net_change,
            total_flaws_count: self.total_flaws_count,
            total_new_flaws_count,
            total_net_change_count,
            flaws_count_history: self.flaws_count_history,
            outcome: self.outcome,
        })
    }
}
