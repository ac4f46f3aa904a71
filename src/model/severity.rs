//! Severity ranks shared by flaws and vulnerabilities.
//!
//! The ordinal of each level is the dense index used by every
//! per-severity array in the crate.

use crate::error::{HistoryError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Number of severity levels, and the length of every per-severity array.
pub const SEVERITY_COUNT: usize = 6;

/// Fixed severity ranks, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    Informational = 0,
    VeryLow = 1,
    Low = 2,
    Medium = 3,
    High = 4,
    VeryHigh = 5,
}

impl SeverityLevel {
    /// All levels in ascending ordinal order.
    pub const ALL: [Self; SEVERITY_COUNT] = [
        Self::Informational,
        Self::VeryLow,
        Self::Low,
        Self::Medium,
        Self::High,
        Self::VeryHigh,
    ];

    /// Stable array index of this level.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Resolve a raw severity index, rejecting anything outside `0..=5`.
    pub fn from_ordinal(ordinal: i64) -> Result<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(HistoryError::SeverityOutOfRange(ordinal))
    }

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Informational => "Informational",
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    /// Iterate levels from most to least severe, the order reports list them in.
    pub fn descending() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().rev()
    }
}

impl std::fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for SeverityLevel {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "informational" | "info" => Ok(Self::Informational),
            "very low" => Ok(Self::VeryLow),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "very high" => Ok(Self::VeryHigh),
            other => other
                .parse::<i64>()
                .map_err(|_| HistoryError::config(format!("unknown severity '{s}'")))
                .and_then(Self::from_ordinal),
        }
    }
}

impl TryFrom<i64> for SeverityLevel {
    type Error = HistoryError;

    fn try_from(value: i64) -> Result<Self> {
        Self::from_ordinal(value)
    }
}

/// Convert a parsed per-severity sequence into a fixed array.
///
/// Fails with [`HistoryError::ArrayLength`] unless the slice has exactly one
/// entry per severity level.
pub fn severity_array<T: Copy>(field: &str, values: &[T]) -> Result<[T; SEVERITY_COUNT]> {
    <[T; SEVERITY_COUNT]>::try_from(values)
        .map_err(|_| HistoryError::array_length(field, SEVERITY_COUNT, values.len()))
}
