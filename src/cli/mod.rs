//! CLI command handlers.
//!
//! Testable handlers invoked by main.rs. Each one returns the process exit
//! code instead of exiting itself.

mod summarize;
mod trend;

pub use summarize::run_summarize;
pub use trend::run_trend;

// Re-export config types used by handlers
pub use crate::config::{SummarizeConfig, TrendConfig};
