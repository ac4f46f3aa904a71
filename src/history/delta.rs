//! Previous-build vs. current-build arithmetic.
//!
//! These helpers turn two already-parsed reports into the inputs the frozen
//! histories are built from. A missing previous build behaves as a build
//! with zero findings and no components.
//!
//! All count arithmetic is checked: a result outside `i64` is reported as
//! [`HistoryError::CountOverflow`] instead of wrapping.

use super::scan::SeverityCounts;
use crate::error::{HistoryError, Result};
use crate::model::{FindingCounts, ScaComponent, SeverityLevel, SEVERITY_COUNT};
use std::collections::HashSet;

/// Exact sum of `values`, or `CountOverflow` naming `field` when the sum
/// does not fit in an `i64`. Intermediate sums may exceed `i64`.
pub fn checked_total(field: &'static str, values: impl IntoIterator<Item = i64>) -> Result<i64> {
    values
        .into_iter()
        .try_fold(0i128, |total, value| total.checked_add(i128::from(value)))
        .and_then(|total| i64::try_from(total).ok())
        .ok_or_else(|| HistoryError::count_overflow(field))
}

/// `current[i] - previous[i]` for every severity.
pub fn net_change(
    previous: Option<&SeverityCounts>,
    current: &SeverityCounts,
) -> Result<SeverityCounts> {
    let baseline = previous.copied().unwrap_or([0; SEVERITY_COUNT]);
    let mut delta = [0; SEVERITY_COUNT];
    for (i, slot) in delta.iter_mut().enumerate() {
        *slot = current[i]
            .checked_sub(baseline[i])
            .ok_or_else(|| HistoryError::count_overflow("net_change"))?;
    }
    Ok(delta)
}

/// One [`FindingCounts`] per severity, ascending.
///
/// `new_count` is the positive part of the net change, so a severity that
/// improved contributes no new vulnerabilities.
pub fn vulnerability_counts(
    previous: Option<&SeverityCounts>,
    current: &SeverityCounts,
    mitigated: &SeverityCounts,
) -> Result<Vec<FindingCounts>> {
    let delta = net_change(previous, current)?;
    Ok(SeverityLevel::ALL
        .iter()
        .map(|&level| {
            let i = level.ordinal();
            FindingCounts::new(level, current[i], delta[i].max(0), delta[i], mitigated[i] > 0)
        })
        .collect())
}

/// Copy of `current` with `is_new` set on components whose name did not
/// appear in the previous build.
#[must_use]
pub fn mark_new_components(
    previous: Option<&[ScaComponent]>,
    current: &[ScaComponent],
) -> Vec<ScaComponent> {
    let known: HashSet<&str> = previous
        .unwrap_or_default()
        .iter()
        .map(ScaComponent::name)
        .collect();

    current
        .iter()
        .map(|c| c.with_new_flag(!known.contains(c.name())))
        .collect()
}
