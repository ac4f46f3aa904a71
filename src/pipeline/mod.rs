//! Pipeline orchestration for scan-history commands.
//!
//! Shared load → assemble → report logic, so the CLI handlers stay thin.

mod output;
mod report;
mod report_stage;

pub use output::{should_use_color, write_output, OutputTarget};
pub use report::{assemble, load_report, trend, AnalysisKind, BuildReport, ScaReport};
pub use report_stage::{output_history_report, output_trend_report};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - the build passed every enabled check
    pub const SUCCESS: i32 = 0;
    /// The build did not pass its policy
    pub const POLICY_FAILED: i32 = 1;
    /// New flaws were introduced
    pub const NEW_FLAWS: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
    /// Blacklisted components were found
    pub const BLACKLISTED_COMPONENTS: i32 = 4;
}
