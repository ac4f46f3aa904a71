//! Configuration types for scan-history operations.

use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or
/// config files, with CLI values layered over file values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// Pass/fail behavior
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    pub const fn fail_on_policy(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_policy = fail;
        self
    }

    pub const fn fail_on_new_flaws(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_new_flaws = fail;
        self
    }

    /// Fail when more than `max` new flaws were introduced.
    pub const fn max_new_flaws(mut self, max: Option<i64>) -> Self {
        self.config.behavior.max_new_flaws = max;
        self
    }

    pub const fn fail_on_blacklisted(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_blacklisted = fail;
        self
    }

    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format
    pub format: ReportFormat,
    /// Output file path (stdout when absent)
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

/// Pass/fail behavior applied to the current build's history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Fail when the build does not pass its policy
    pub fail_on_policy: bool,
    /// Fail when any new flaw was introduced since the previous build
    pub fail_on_new_flaws: bool,
    /// Fail when more than this many new flaws were introduced
    pub max_new_flaws: Option<i64>,
    /// Fail when composition analysis found blacklisted components
    pub fail_on_blacklisted: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

// ============================================================================
// Command Configurations
// ============================================================================

/// Configuration for the `summarize` command.
#[derive(Debug, Clone)]
pub struct SummarizeConfig {
    /// Report of the build being evaluated
    pub current: PathBuf,
    /// Report of the build before it, if any
    pub previous: Option<PathBuf>,
    pub output: OutputConfig,
    pub behavior: BehaviorConfig,
    /// Report title override
    pub title: Option<String>,
    /// Render the flaw and vulnerability trends
    pub include_history: bool,
}

impl SummarizeConfig {
    /// Combine report paths with an effective `AppConfig`.
    #[must_use]
    pub fn from_app_config(current: PathBuf, previous: Option<PathBuf>, app: AppConfig) -> Self {
        Self {
            current,
            previous,
            output: app.output,
            behavior: app.behavior,
            title: None,
            include_history: true,
        }
    }
}

/// Configuration for the `trend` command.
#[derive(Debug, Clone)]
pub struct TrendConfig {
    /// Reports in build order, oldest first
    pub reports: Vec<PathBuf>,
    /// Label of the resulting series
    pub label: String,
    pub output: OutputConfig,
    pub quiet: bool,
}
