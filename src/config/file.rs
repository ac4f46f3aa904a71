//! Configuration file loading and discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".scan-history.yaml",
    ".scan-history.yml",
    "scan-history.yaml",
    "scan-history.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/scan-history/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    config_search_dirs()
        .into_iter()
        .find_map(|dir| find_config_in_dir(&dir))
}

/// Directories searched for a config file, in search order.
#[must_use]
pub fn config_search_dirs() -> Vec<PathBuf> {
    [
        std::env::current_dir().ok(),
        find_git_root(),
        dirs::config_dir().map(|d| d.join("scan-history")),
        dirs::home_dir(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from a discovered file, or return defaults.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    pub fn merge(&mut self, other: &Self) {
        if other.output.format != crate::reports::ReportFormat::default() {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.no_color {
            self.output.no_color = true;
        }

        if other.behavior.fail_on_policy {
            self.behavior.fail_on_policy = true;
        }
        if other.behavior.fail_on_new_flaws {
            self.behavior.fail_on_new_flaws = true;
        }
        if other.behavior.max_new_flaws.is_some() {
            self.behavior.max_new_flaws = other.behavior.max_new_flaws;
        }
        if other.behavior.fail_on_blacklisted {
            self.behavior.fail_on_blacklisted = true;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# scan-history configuration
# Place this file at .scan-history.yaml in your project root
# or ~/.config/scan-history/scan-history.yaml for global config.
#
# CLI arguments always override file settings.

output:
  # Format: summary, json
  format: summary
  # Output file path (omit for stdout)
  # file: scan-summary.json
  no_color: false

behavior:
  # Exit with code 1 if the build does not pass its policy
  fail_on_policy: false
  # Exit with code 2 if any new flaw was introduced
  fail_on_new_flaws: false
  # Exit with code 2 if more than this many new flaws were introduced
  # max_new_flaws: 5
  # Exit with code 4 if blacklisted components were found
  fail_on_blacklisted: false
  quiet: false
"
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BehaviorConfig;
    use crate::reports::ReportFormat;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".scan-history.yaml");
        std::fs::write(&config_path, "behavior:\n  fail_on_policy: true\n").unwrap();

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        let yaml = r"
output:
  format: json
behavior:
  fail_on_new_flaws: true
  max_new_flaws: 3
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.output.format, ReportFormat::Json);
        assert!(config.behavior.fail_on_new_flaws);
        assert_eq!(config.behavior.max_new_flaws, Some(3));
        assert!(!config.behavior.fail_on_policy);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_bad_yaml() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        std::fs::write(&config_path, "behavior: [not, a, map]\n").unwrap();
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig::default();
        let overrides = AppConfig {
            behavior: BehaviorConfig {
                fail_on_policy: true,
                max_new_flaws: Some(2),
                ..Default::default()
            },
            ..AppConfig::default()
        };

        base.merge(&overrides);

        assert!(base.behavior.fail_on_policy);
        assert_eq!(base.behavior.max_new_flaws, Some(2));
        assert_eq!(base.output.format, ReportFormat::Summary);
    }

    #[test]
    fn test_full_example_config_parses() {
        let config: AppConfig = serde_yaml::from_str(&generate_full_example_config()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        std::fs::write(&config_path, "output:\n  no_color: true\n").unwrap();

        assert_eq!(discover_config_file(Some(&config_path)), Some(config_path));
    }

    #[test]
    fn test_search_dirs_follow_discovery_order() {
        let dirs = config_search_dirs();
        assert_eq!(dirs.first(), Some(&std::env::current_dir().unwrap()));
        if let Some(root) = find_git_root() {
            assert_eq!(dirs.get(1), Some(&root));
        }
        if let Some(config_dir) = dirs::config_dir() {
            assert!(dirs.contains(&config_dir.join("scan-history")));
        }
    }
}
