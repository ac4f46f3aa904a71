//! Named presets for common pipelines.

use super::types::{AppConfig, BehaviorConfig, OutputConfig};
use crate::reports::ReportFormat;

/// Named configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Report only, never fail
    Default,
    /// Fail on policy, on any new flaw and on blacklisted components
    Strict,
    /// Machine-readable output, fail on policy
    CiCd,
}

impl ConfigPreset {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::CiCd => "ci-cd",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "strict" | "security" => Some(Self::Strict),
            "ci-cd" | "ci" | "cd" | "pipeline" => Some(Self::CiCd),
            _ => None,
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Summarize the build without failing it",
            Self::Strict => "Fail on policy, new flaws and blacklisted components",
            Self::CiCd => "JSON output, fail when the build does not pass policy",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::CiCd]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Strict => Self {
                output: OutputConfig::default(),
                behavior: BehaviorConfig {
                    fail_on_policy: true,
                    fail_on_new_flaws: true,
                    max_new_flaws: None,
                    fail_on_blacklisted: true,
                    quiet: false,
                },
            },
            ConfigPreset::CiCd => Self {
                output: OutputConfig {
                    format: ReportFormat::Json,
                    file: None,
                    no_color: true,
                },
                behavior: BehaviorConfig {
                    fail_on_policy: true,
                    quiet: true,
                    ..BehaviorConfig::default()
                },
            },
        }
    }
}
