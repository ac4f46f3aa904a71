//! **Build-over-build history of security scan results.**
//!
//! `scan-history` turns the per-build reports of a static or dynamic
//! application scan into frozen, read-only histories: flaw counts per
//! severity, the change against the previous build, mitigation and policy
//! flags, composition-analysis (SCA) vulnerabilities and components, and the
//! count series behind trend charts.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: Value types shared by histories: [`SeverityLevel`],
//!   [`FindingCounts`], [`ScaComponent`], [`HistorySnapshot`] and
//!   [`BuildHistory`].
//! - **[`history`]**: The frozen aggregates, [`ScanHistory`] and
//!   [`ScaScanHistory`], plus the previous-vs-current arithmetic in
//!   [`history::delta`].
//! - **[`pipeline`]**: Reads JSON build reports and assembles them into
//!   histories and trends.
//! - **[`gate`]**: Pass/fail decisions for CI pipelines.
//! - **[`reports`]**: Summary and JSON renderers.
//! - **[`config`]**: YAML configuration, presets and validation.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use scan_history::pipeline::{assemble, load_report};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let current = load_report(Path::new("build-42.json"))?;
//!     let previous = load_report(Path::new("build-41.json"))?;
//!     let history = assemble(&current, Some(&previous))?;
//!
//!     println!(
//!         "{} flaws, {} new since the previous build",
//!         history.total_flaws_count(),
//!         history.total_new_flaws_count()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! The `scan-history` binary wraps the library: `summarize` renders one build
//! against its predecessor and exits with the gate's verdict, `trend` renders
//! a flaw-count series across many builds.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools,
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod history;
pub mod model;
pub mod pipeline;
pub mod reports;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, BehaviorConfig, ConfigPreset, OutputConfig};
pub use config::{ConfigError, Validatable};
pub use config::{SummarizeConfig, TrendConfig};
pub use error::{ErrorContext, HistoryError, Result};
pub use gate::{evaluate, GateFailure, GateVerdict};
pub use history::{ScaScanHistory, ScaState, ScanHistory, ScanHistoryBuilder, ScanOutcome};
pub use model::{
    BuildHistory, FindingCounts, HistorySnapshot, ScaComponent, SeverityLevel, SEVERITY_COUNT,
};
pub use pipeline::{assemble, load_report, trend, BuildReport};
pub use reports::{ReportFormat, ReportGenerator};
