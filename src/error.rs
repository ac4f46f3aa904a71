//! Unified error types for scan-history.
//!
//! The invalid-argument family covers contract violations at the model
//! boundary (empty policy fields, out-of-range severities, SCA requests on
//! dynamic scans, wrongly sized per-severity arrays, counts too large to
//! total). They are never retried or defaulted; callers get them
//! synchronously.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scan-history operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HistoryError {
    /// A required text field was empty
    #[error("Invalid argument: {field} must not be empty")]
    EmptyField { field: &'static str },

    /// Severity index outside `0..=5`
    #[error("Invalid argument: severity {0} is out of range (expected 0-5)")]
    SeverityOutOfRange(i64),

    /// Composition analysis was requested from a dynamic scan
    #[error("Invalid argument: SCA history is not available for dynamic analysis scans")]
    ScaNotApplicable,

    /// A per-severity array did not have one slot per severity
    #[error("Invalid argument: {field} has {actual} entries, expected {expected}")]
    ArrayLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// A count or total does not fit in an `i64`
    #[error("Invalid argument: {field} overflows a 64-bit count")]
    CountOverflow { field: &'static str },

    /// Errors while decoding a build report
    #[error("Failed to parse build report: {context}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenient Result type for scan-history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

impl HistoryError {
    /// Create an empty-field error
    #[must_use]
    pub const fn empty_field(field: &'static str) -> Self {
        Self::EmptyField { field }
    }

    /// Create an array-length error
    pub fn array_length(field: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ArrayLength {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Create a count-overflow error
    #[must_use]
    pub const fn count_overflow(field: &'static str) -> Self {
        Self::CountOverflow { field }
    }

    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error is a caller contract violation rather than an
    /// input/environment failure.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::EmptyField { .. }
                | Self::SeverityOutOfRange(_)
                | Self::ScaNotApplicable
                | Self::ArrayLength { .. }
                | Self::CountOverflow { .. }
        )
    }
}

impl From<std::io::Error> for HistoryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse("JSON deserialization", err)
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context is chained onto parse, IO and config errors so the message shows
/// the path through the pipeline. Invalid-argument errors carry their own
/// precise message and are passed through untouched.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<HistoryError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: HistoryError, new_ctx: &str) -> HistoryError {
    match err {
        HistoryError::Parse {
            context: existing,
            source,
        } => HistoryError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        HistoryError::Io {
            path,
            message,
            source,
        } => HistoryError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        HistoryError::Config(msg) => HistoryError::Config(chain_context(new_ctx, &msg)),
        other => other,
    }
}

/// Returns "`new`: `existing`", or just `new` when there is nothing to chain.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_family() {
        assert!(HistoryError::empty_field("policy_name").is_invalid_argument());
        assert!(HistoryError::SeverityOutOfRange(6).is_invalid_argument());
        assert!(HistoryError::ScaNotApplicable.is_invalid_argument());
        assert!(HistoryError::array_length("flaws_count", 6, 5).is_invalid_argument());
        assert!(HistoryError::count_overflow("net_change").is_invalid_argument());
        assert!(!HistoryError::config("bad").is_invalid_argument());
    }

    #[test]
    fn test_error_display() {
        let err = HistoryError::SeverityOutOfRange(-1);
        assert!(err.to_string().contains("-1"));

        let err = HistoryError::empty_field("veracode_level");
        assert!(err.to_string().contains("veracode_level"));

        let err = HistoryError::ScaNotApplicable;
        assert!(err.to_string().contains("dynamic"));
    }

    #[test]
    fn test_io_error_has_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = HistoryError::io("/path/to/report.json", io_err);
        assert!(err.to_string().contains("/path/to/report.json"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(HistoryError::config("base"))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(HistoryError::Config(msg)) => {
                assert_eq!(msg, "outer layer: middle layer: base");
            }
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_context_leaves_invalid_argument_untouched() {
        let result: Result<()> = Err(HistoryError::SeverityOutOfRange(9));
        match result.context("reading flaws") {
            Err(HistoryError::SeverityOutOfRange(9)) => {}
            other => panic!("Expected SeverityOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;
        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called);

        let err_result: Result<i32> = Err(HistoryError::config("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called);
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
