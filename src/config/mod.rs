//! Configuration module for scan-history.
//!
//! Provides:
//! - Type-safe configuration structures
//! - Validation for configuration values
//! - Named presets for common pipelines
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.scan-history.yaml` file in your project root or
//! `~/.config/scan-history/`:
//!
//! ```yaml
//! output:
//!   format: json
//! behavior:
//!   fail_on_policy: true
//!   max_new_flaws: 0
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::ConfigPreset;
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, OutputConfig, SummarizeConfig, TrendConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    config_search_dirs, discover_config_file, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
pub fn generate_json_schema() -> crate::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| crate::HistoryError::config(format!("schema serialization failed: {e}")))
}
