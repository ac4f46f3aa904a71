//! Value types shared by scan histories.
//!
//! Everything here is immutable once built. [`FindingCounts`] and
//! [`ScaComponent`] compare by a single key field (severity and name) so they
//! can be de-duplicated through ordinary sets.

mod build_history;
mod component;
mod counts;
mod severity;
mod snapshot;

pub use build_history::BuildHistory;
pub use component::ScaComponent;
pub use counts::FindingCounts;
pub use severity::{severity_array, SeverityLevel, SEVERITY_COUNT};
pub use snapshot::{has_series, HistorySnapshot, DATE_KEY, FLAWS_COUNT_KEY};
