//! Per-build scan histories and the delta arithmetic that feeds them.
//!
//! A [`ScanHistory`] is built once per build from already-parsed report data
//! and is read-only afterwards, so it can be shared across threads freely.
//!
//! ```
//! use scan_history::history::ScanHistory;
//!
//! let history = ScanHistory::builder()
//!     .ids("acct", "app", "build-42")
//!     .policy("Veracode Recommended High", "Did Not Pass", "VL3")
//!     .flaws_count([0, 0, 3, 22, 1, 1])
//!     .net_change([0, 0, 0, 3, 0, 1])
//!     .total_flaws_count(27)
//!     .build()?;
//!
//! assert_eq!(history.total_new_flaws_count(), 4);
//! assert_eq!(history.new_flaws(3)?, 3);
//! # Ok::<(), scan_history::HistoryError>(())
//! ```

pub mod delta;
mod sca;
mod scan;

pub use sca::{ScaScanHistory, ScaState};
pub use scan::{ScanHistory, ScanHistoryBuilder, ScanOutcome, SeverityCounts};
