//! Historical count snapshots used for trend charts.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key holding the build date (or build label) of a snapshot.
pub const DATE_KEY: &str = "date";
/// Key holding the flaw or vulnerability count of a snapshot.
pub const FLAWS_COUNT_KEY: &str = "flaws_count";

/// One point of a build-over-build time series.
///
/// A snapshot is an ordered key/value mapping so that extra series (for
/// example per-severity counts) can ride along with the two well-known keys.
/// A `null` value is treated the same as a missing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistorySnapshot(IndexMap<String, Value>);

impl HistorySnapshot {
    /// Snapshot with a date and a count.
    pub fn new(date: impl Into<String>, count: i64) -> Self {
        let mut entries = IndexMap::with_capacity(2);
        entries.insert(DATE_KEY.to_string(), Value::String(date.into()));
        entries.insert(FLAWS_COUNT_KEY.to_string(), Value::from(count));
        Self(entries)
    }

    /// Snapshot with a date and no recorded count.
    pub fn without_count(date: impl Into<String>) -> Self {
        let mut entries = IndexMap::with_capacity(1);
        entries.insert(DATE_KEY.to_string(), Value::String(date.into()));
        Self(entries)
    }

    /// Add or replace an entry.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw value under `key`, `None` when missing or `null`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Whether `key` holds a non-null value.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Date label of the snapshot.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.get(DATE_KEY).and_then(Value::as_str)
    }

    /// Count under the well-known count key.
    #[must_use]
    pub fn count(&self) -> Option<i64> {
        self.count_for(FLAWS_COUNT_KEY)
    }

    /// Integer under `key`; numeric strings are accepted.
    #[must_use]
    pub fn count_for(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Whether any snapshot carries a value under `key`.
#[must_use]
pub fn has_series(snapshots: &[HistorySnapshot], key: &str) -> bool {
    snapshots.iter().any(|s| s.has(key))
}
