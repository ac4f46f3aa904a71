//! Composition-analysis outcome of one build.

use super::delta;
use crate::error::Result;
use crate::model::{
    has_series, FindingCounts, HistorySnapshot, ScaComponent, SeverityLevel, FLAWS_COUNT_KEY,
    SEVERITY_COUNT,
};
use indexmap::IndexSet;
use serde::Serialize;

/// Which of the three construction states a [`ScaScanHistory`] is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaState {
    /// No subscription and no data
    Empty,
    /// Not subscribed for this build, but a vulnerability trend exists
    HistoryOnly,
    /// Subscribed, with current counts and components
    Full,
}

/// Frozen SCA result for one build.
///
/// Totals are computed once, at construction, from the finding counts that
/// survive de-duplication. Nothing changes afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ScaScanHistory {
    state: ScaState,
    max_cvss_score: f64,
    blacklisted_components_count: i64,
    counts: [Option<FindingCounts>; SEVERITY_COUNT],
    components: Option<IndexSet<ScaComponent>>,
    vul_count_history: Option<Vec<HistorySnapshot>>,
    total_vul_count: i64,
    total_new_vul_count: i64,
    total_net_vul_count: i64,
}

impl ScaScanHistory {
    /// No subscription, no data: every count is zero and every collection absent.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            state: ScaState::Empty,
            max_cvss_score: 0.0,
            blacklisted_components_count: 0,
            counts: [None; SEVERITY_COUNT],
            components: None,
            vul_count_history: None,
            total_vul_count: 0,
            total_new_vul_count: 0,
            total_net_vul_count: 0,
        }
    }

    /// Not subscribed for the current build, but keeps the vulnerability
    /// trend so charts can still be drawn.
    #[must_use]
    pub fn history_only(vul_count_history: Vec<HistorySnapshot>) -> Self {
        Self {
            state: ScaState::HistoryOnly,
            vul_count_history: Some(vul_count_history),
            ..Self::empty()
        }
    }

    /// Subscribed build with current data.
    ///
    /// Finding counts are taken in iteration order and the first entry for a
    /// severity wins; later entries for the same severity and absent entries
    /// are dropped and contribute nothing to the totals. Components are
    /// de-duplicated by name, also keeping the first. Fails with
    /// `CountOverflow` when a total does not fit in an `i64`.
    pub fn full<C, I>(
        max_cvss_score: f64,
        blacklisted_components_count: i64,
        finding_counts: C,
        components: I,
        vul_count_history: Vec<HistorySnapshot>,
    ) -> Result<Self>
    where
        C: IntoIterator,
        C::Item: Into<Option<FindingCounts>>,
        I: IntoIterator<Item = ScaComponent>,
    {
        let mut counts: [Option<FindingCounts>; SEVERITY_COUNT] = [None; SEVERITY_COUNT];
        let mut dropped = 0usize;

        for entry in finding_counts {
            let entry: Option<FindingCounts> = entry.into();
            let Some(entry) = entry else {
                dropped += 1;
                continue;
            };
            let slot = &mut counts[entry.severity().ordinal()];
            if slot.is_some() {
                dropped += 1;
                continue;
            }
            *slot = Some(entry);
        }

        let kept = || counts.iter().flatten();
        let total_vul_count =
            delta::checked_total("vulnerabilities", kept().map(FindingCounts::count))?;
        let total_new_vul_count =
            delta::checked_total("new vulnerabilities", kept().map(FindingCounts::new_count))?;
        let total_net_vul_count =
            delta::checked_total("net vulnerabilities", kept().map(FindingCounts::net_count))?;

        let mut set = IndexSet::new();
        let mut duplicate_components = 0usize;
        for component in components {
            if !set.insert(component) {
                duplicate_components += 1;
            }
        }

        if dropped > 0 || duplicate_components > 0 {
            tracing::debug!(
                dropped_counts = dropped,
                duplicate_components,
                "Dropped absent or duplicate SCA entries"
            );
        }

        Ok(Self {
            state: ScaState::Full,
            max_cvss_score,
            blacklisted_components_count,
            counts,
            components: Some(set),
            vul_count_history: Some(vul_count_history),
            total_vul_count,
            total_new_vul_count,
            total_net_vul_count,
        })
    }

    #[must_use]
    pub const fn state(&self) -> ScaState {
        self.state
    }

    /// Whether the build was subscribed to composition analysis.
    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        matches!(self.state, ScaState::Full)
    }

    #[must_use]
    pub const fn max_cvss_score(&self) -> f64 {
        self.max_cvss_score
    }

    #[must_use]
    pub const fn blacklisted_components_count(&self) -> i64 {
        self.blacklisted_components_count
    }

    /// Counts for `severity`, `None` when that severity was never populated.
    #[must_use]
    pub const fn count_by_severity(&self, severity: SeverityLevel) -> Option<&FindingCounts> {
        self.counts[severity.ordinal()].as_ref()
    }

    /// Same as [`count_by_severity`](Self::count_by_severity) for a raw
    /// severity index; indices outside `0..=5` are rejected.
    pub fn count_by_ordinal(&self, severity: i64) -> Result<Option<&FindingCounts>> {
        let level = SeverityLevel::from_ordinal(severity)?;
        Ok(self.count_by_severity(level))
    }

    /// Populated counts, ascending by severity.
    pub fn finding_counts(&self) -> impl DoubleEndedIterator<Item = &FindingCounts> {
        self.counts.iter().flatten()
    }

    /// An owned copy of the component set. Each call returns a fresh set.
    #[must_use]
    pub fn sca_components(&self) -> IndexSet<ScaComponent> {
        self.components.clone().unwrap_or_default()
    }

    /// Number of distinct components, without copying the set.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.as_ref().map_or(0, IndexSet::len)
    }

    /// Whether any recorded component is blacklisted.
    #[must_use]
    pub fn has_blacklisted_components(&self) -> bool {
        self.blacklisted_components_count > 0
            || self
                .components
                .as_ref()
                .is_some_and(|set| set.iter().any(ScaComponent::is_blacklisted))
    }

    #[must_use]
    pub fn vul_count_history(&self) -> Option<&[HistorySnapshot]> {
        self.vul_count_history.as_deref()
    }

    /// True when the trend exists and at least one snapshot has a count.
    #[must_use]
    pub fn has_vul_count_history(&self) -> bool {
        self.vul_count_history
            .as_deref()
            .is_some_and(|history| has_series(history, FLAWS_COUNT_KEY))
    }

    #[must_use]
    pub const fn total_vul_count(&self) -> i64 {
        self.total_vul_count
    }

    #[must_use]
    pub const fn total_new_vul_count(&self) -> i64 {
        self.total_new_vul_count
    }

    #[must_use]
    pub const fn total_net_vul_count(&self) -> i64 {
        self.total_net_vul_count
    }
}

impl Default for ScaScanHistory {
    fn default() -> Self {
        Self::empty()
    }
}
