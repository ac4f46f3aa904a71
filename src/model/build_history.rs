//! Labelled time series for trend charts.

use super::snapshot::{has_series, HistorySnapshot, FLAWS_COUNT_KEY};
use serde::{Deserialize, Serialize};

/// A scan-type label paired with per-build snapshots, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildHistory {
    scan_type: String,
    snapshots: Vec<HistorySnapshot>,
}

impl BuildHistory {
    pub fn new(scan_type: impl Into<String>, snapshots: Vec<HistorySnapshot>) -> Self {
        Self {
            scan_type: scan_type.into(),
            snapshots,
        }
    }

    #[must_use]
    pub fn scan_type(&self) -> &str {
        &self.scan_type
    }

    #[must_use]
    pub fn snapshots(&self) -> &[HistorySnapshot] {
        &self.snapshots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Whether at least one snapshot has a count to plot.
    #[must_use]
    pub fn has_count_history(&self) -> bool {
        has_series(&self.snapshots, FLAWS_COUNT_KEY)
    }

    /// `(date, count)` points, skipping snapshots without a count.
    #[must_use]
    pub fn points(&self) -> Vec<(String, i64)> {
        self.snapshots
            .iter()
            .filter_map(|s| {
                let count = s.count()?;
                Some((s.date().unwrap_or_default().to_string(), count))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_skip_missing_counts() {
        let history = BuildHistory::new(
            "Static Analysis",
            vec![
                HistorySnapshot::new("b1", 10),
                HistorySnapshot::without_count("b2"),
                HistorySnapshot::new("b3", 7),
            ],
        );
        assert_eq!(history.scan_type(), "Static Analysis");
        assert_eq!(history.len(), 3);
        assert!(history.has_count_history());
        assert_eq!(
            history.points(),
            vec![("b1".to_string(), 10), ("b3".to_string(), 7)]
        );
    }

    #[test]
    fn test_empty_history() {
        let history = BuildHistory::new("SCA", Vec::new());
        assert!(history.is_empty());
        assert!(!history.has_count_history());
        assert!(history.points().is_empty());
    }
}
