//! Per-severity vulnerability counts for one build.

use super::SeverityLevel;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Counts for a single severity level.
///
/// Equality and hashing look at `severity` only. Two values with the same
/// severity are the same entry regardless of their counts, which is what
/// lets a set hold at most one entry per severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FindingCounts {
    severity: SeverityLevel,
    count: i64,
    new_count: i64,
    net_count: i64,
    mitigated: bool,
}

impl FindingCounts {
    /// Create counts for one severity. `net_count` is a signed delta;
    /// `count` and `new_count` are expected to be non-negative.
    #[must_use]
    pub const fn new(
        severity: SeverityLevel,
        count: i64,
        new_count: i64,
        net_count: i64,
        mitigated: bool,
    ) -> Self {
        Self {
            severity,
            count,
            new_count,
            net_count,
            mitigated,
        }
    }

    #[must_use]
    pub const fn severity(&self) -> SeverityLevel {
        self.severity
    }

    #[must_use]
    pub const fn count(&self) -> i64 {
        self.count
    }

    #[must_use]
    pub const fn new_count(&self) -> i64 {
        self.new_count
    }

    #[must_use]
    pub const fn net_count(&self) -> i64 {
        self.net_count
    }

    #[must_use]
    pub const fn is_mitigated(&self) -> bool {
        self.mitigated
    }
}

impl PartialEq for FindingCounts {
    fn eq(&self, other: &Self) -> bool {
        self.severity == other.severity
    }
}

impl Eq for FindingCounts {}

impl Hash for FindingCounts {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.severity.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_counts() {
        let a = FindingCounts::new(SeverityLevel::High, 5, 1, 1, false);
        let b = FindingCounts::new(SeverityLevel::High, 9, 0, -2, true);
        let c = FindingCounts::new(SeverityLevel::Low, 5, 1, 1, false);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_set_keeps_one_entry_per_severity() {
        let mut set = HashSet::new();
        assert!(set.insert(FindingCounts::new(SeverityLevel::High, 5, 0, 0, false)));
        assert!(!set.insert(FindingCounts::new(SeverityLevel::High, 9, 0, 0, false)));
        assert_eq!(set.len(), 1);
        let kept = set.iter().next().unwrap();
        assert_eq!(kept.count(), 5);
    }

    #[test]
    fn test_negative_net_count_allowed() {
        let counts = FindingCounts::new(SeverityLevel::Medium, 2, 0, -3, false);
        assert_eq!(counts.net_count(), -3);
        assert_eq!(counts.new_count(), 0);
    }
}
