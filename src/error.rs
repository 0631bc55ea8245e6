//! Error types for `Xercise`
//!
//! One error enum per domain, aggregated in [`XerciseError`] which maps
//! every failure to a process exit code.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `Xercise` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Plan file error (invalid YAML/JSON, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Session error (operation rejected by the session controller)
    pub const SESSION_ERROR: i32 = 5;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `Xercise` operations.
#[derive(Debug, Error)]
pub enum XerciseError {
    /// Plan loading or validation error
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Session operation rejected
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Workout history error
    #[error(transparent)]
    History(#[from] HistoryError),

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

impl XerciseError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Plan(PlanError::Unreadable { .. }) | Self::Io(_) => ExitCode::IO_ERROR,
            Self::Plan(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Session(_) => ExitCode::SESSION_ERROR,
            Self::History(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Plan Errors
// ============================================================================

/// Workout plan loading and validation errors.
#[derive(Debug, Error)]
pub enum PlanError {
    /// YAML or JSON parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the plan file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Plan validation failed
    #[error("validation failed for {path}: {}", summarize(errors))]
    ValidationError {
        /// Path (or name) of the plan that failed
        path: String,
        /// Every error-severity issue found
        errors: Vec<ValidationIssue>,
    },

    /// Plan file not found or unreadable
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Plan file exists but could not be read
    #[error("cannot read {path}: {source}")]
    Unreadable {
        /// Path to the plan file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Plan file exceeds the configured size limit
    #[error("plan file {path} is {size} bytes (limit: {limit})")]
    FileTooLarge {
        /// Path to the plan file
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// File extension is not one of yaml, yml, json
    #[error("unsupported plan format for {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat {
        /// Path to the plan file
        path: PathBuf,
    },
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found in a workout plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "exercises[2].sets")
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
    /// Error - the plan cannot be used
    Error,
    /// Warning - suspicious but loadable
    Warning,
}

// ============================================================================
// Session Errors
// ============================================================================

/// Rejected session operations.
///
/// These are reported to the caller and leave the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// `start` on a plan with no exercises
    #[error("no exercises configured to start the workout")]
    EmptyPlan,

    /// `start` on a plan with zero rounds
    #[error("workout has no rounds to run")]
    NoRounds,

    /// `skip` with no exercise at the current position
    #[error("no current exercise to skip")]
    NoCurrentExercise,
}

// ============================================================================
// History Errors
// ============================================================================

/// Workout history persistence errors.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Reading or writing the history file failed
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// History file content is not valid JSON
    #[error("history JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `Xercise` operations.
pub type Result<T> = std::result::Result<T, XerciseError>;

// ============================================================================
// Tests
// ============================================================================
