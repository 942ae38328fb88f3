//! Error types for `tabata`
//!
//! A small hierarchy: configuration errors are raised at the boundary
//! before anything reaches the phase engine, driver errors cover refused
//! user commands, and everything funnels into [`TabataError`] for exit
//! code mapping.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `tabata` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Driver error (refused start, command channel closed)
    pub const DRIVER_ERROR: i32 = 5;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `tabata` operations.
#[derive(Debug, Error)]
pub enum TabataError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Scheduling driver error
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TabataError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Driver(_) => ExitCode::DRIVER_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}: {}", summarize(errors))]
    ValidationError {
        /// Source of the configuration (file path or `"<cli>"`)
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// File exists but could not be read
    #[error("cannot read {path}: {source}")]
    Unreadable {
        /// Path to the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

fn summarize(errors: &[ValidationIssue]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "workout.rounds")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - validation failure that prevents configuration from being used
    Error,
    /// Warning - potential issue that does not prevent configuration loading
    Warning,
}

// ============================================================================
// Driver Errors
// ============================================================================

/// Errors raised by the scheduling driver in response to user commands.
///
/// None of these leave the workout state modified.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DriverError {
    /// Start was refused by a user-facing validation rule
    #[error("start refused: {0}")]
    StartRefused(String),

    /// Command is not valid in the current mode
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// The driver task is gone
    #[error("driver channel closed")]
    ChannelClosed,
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `tabata` operations.
pub type Result<T> = std::result::Result<T, TabataError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::DRIVER_ERROR, 5);
        assert_eq!(ExitCode::INTERRUPTED, 130);
        assert_eq!(ExitCode::TERMINATED, 143);
    }

    #[test]
    fn test_driver_error_exit_code() {
        let err: TabataError = DriverError::StartRefused("no exercises".to_string()).into();
        assert_eq!(err.exit_code(), ExitCode::DRIVER_ERROR);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err: TabataError = ConfigError::MissingFile {
            path: PathBuf::from("/test"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: TabataError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue {
            path: "workout.rounds".to_string(),
            message: "must be at least 1".to_string(),
            severity: Severity::Error,
        };
        assert_eq!(issue.to_string(), "error: must be at least 1 at workout.rounds");
    }

    #[test]
    fn test_validation_issue_warning_display() {
        let issue = ValidationIssue {
            path: "workout.exercises".to_string(),
            message: "list is empty".to_string(),
            severity: Severity::Warning,
        };
        assert_eq!(
            issue.to_string(),
            "warning: list is empty at workout.exercises"
        );
    }

    #[test]
    fn test_validation_error_lists_every_issue() {
        let err = ConfigError::ValidationError {
            path: "hiit.yaml".to_string(),
            errors: vec![
                ValidationIssue {
                    path: "workout.work".to_string(),
                    message: "must be at least 1 second".to_string(),
                    severity: Severity::Error,
                },
                ValidationIssue {
                    path: "workout.rounds".to_string(),
                    message: "must be at least 1".to_string(),
                    severity: Severity::Error,
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("hiit.yaml"));
        assert!(text.contains("workout.work"));
        assert!(text.contains("workout.rounds"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ParseError {
            path: PathBuf::from("config.yaml"),
            line: Some(42),
            message: "unexpected token".to_string(),
        };
        assert!(err.to_string().contains("config.yaml"));
        assert!(err.to_string().contains("unexpected token"));
    }
}
