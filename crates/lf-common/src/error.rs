//! Error types for levelfit.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Remediation suggestions for humans
//! - Suggested actions for scripted callers
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Unparseable Value
//!   Reason: row 7, column TimeTaken: cannot parse "12,5ms": invalid float literal
//!   Fix: Correct the value in the input file, then run 'levelfit check' to confirm.
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 22,
//!   "category": "input",
//!   "message": "row 7, column TimeTaken: cannot parse \"12,5ms\": invalid float literal",
//!   "suggested_action": "fix_input",
//!   "context": { "row": 7, "column": "TimeTaken", "value": "12,5ms" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for levelfit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file errors.
    Config,
    /// Input loading and record normalization errors.
    Input,
    /// Aggregation, regression and numerical errors.
    Analysis,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Analysis => write!(f, "analysis"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested next steps for scripted callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Fix the offending value in the input file.
    FixInput,
    /// Run the validation command.
    RunCheck,
    /// Fix or remove the configuration file.
    FixConfig,
    /// Provide more data.
    CollectMoreData,
    /// Retry the operation.
    Retry,
    /// Manual intervention required.
    ManualIntervention,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::FixInput => write!(f, "fix_input"),
            SuggestedAction::RunCheck => write!(f, "run_check"),
            SuggestedAction::FixConfig => write!(f, "fix_config"),
            SuggestedAction::CollectMoreData => write!(f, "collect_more_data"),
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::ManualIntervention => write!(f, "manual_intervention"),
        }
    }
}

/// Unified error type for levelfit.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load config {path}: {message}")]
    ConfigLoad { path: String, message: String },

    // Input errors (20-29)
    #[error("failed to read input: {0}")]
    Load(String),

    #[error("missing required column: {column}")]
    MissingColumn { column: String },

    #[error("row {row}, column {column}: cannot parse {value:?}: {message}")]
    Parse {
        row: usize,
        column: String,
        value: String,
        message: String,
    },

    #[error("row {row}: log level {label:?} has no ordinal code")]
    UnmappedLevel { row: usize, label: String },

    // Analysis errors (30-39)
    #[error("insufficient data: {groups} distinct log level group(s), at least {required} required")]
    InsufficientData { groups: usize, required: usize },

    #[error("numerical instability detected: {0}")]
    NumericalInstability(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Analysis errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidConfig(_) => 11,
            Error::ConfigLoad { .. } => 12,
            Error::Load(_) => 20,
            Error::MissingColumn { .. } => 21,
            Error::Parse { .. } => 22,
            Error::UnmappedLevel { .. } => 23,
            Error::InsufficientData { .. } => 30,
            Error::NumericalInstability(_) => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidConfig(_) | Error::ConfigLoad { .. } => {
                ErrorCategory::Config
            }

            Error::Load(_)
            | Error::MissingColumn { .. }
            | Error::Parse { .. }
            | Error::UnmappedLevel { .. } => ErrorCategory::Input,

            Error::InsufficientData { .. } | Error::NumericalInstability(_) => {
                ErrorCategory::Analysis
            }

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns the suggested action for scripted callers.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::InvalidConfig(_) | Error::ConfigLoad { .. } => {
                SuggestedAction::FixConfig
            }

            Error::Load(_) | Error::MissingColumn { .. } | Error::Parse { .. } => {
                SuggestedAction::FixInput
            }
            Error::UnmappedLevel { .. } => SuggestedAction::RunCheck,

            Error::InsufficientData { .. } => SuggestedAction::CollectMoreData,
            Error::NumericalInstability(_) => SuggestedAction::ManualIntervention,

            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::ManualIntervention,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::ConfigLoad { .. } => {
                "Run 'levelfit config validate' to check the configuration file."
            }
            Error::InvalidConfig(_) => {
                "Fix the reported setting, or run 'levelfit config schema' for the accepted layout."
            }

            Error::Load(_) => {
                "Check that the input is a delimited text file with a header row and a consistent delimiter."
            }
            Error::MissingColumn { .. } => {
                "The header must name Timestamp, Service, LogLevel and TimeTaken columns."
            }
            Error::Parse { .. } => {
                "Correct the value in the input file, then run 'levelfit check' to confirm."
            }
            Error::UnmappedLevel { .. } => {
                "Use one of INFO, DEBUG, WARNING, ERROR, FATAL, or rerun with '--unknown-levels exclude'."
            }

            Error::InsufficientData { .. } => {
                "A line fit needs records from at least two distinct log levels."
            }
            Error::NumericalInstability(_) => {
                "Inspect the input for extreme magnitudes. Report as a bug if the data looks ordinary."
            }

            Error::Io(_) => "Check that the path exists and is readable, then retry.",
            Error::Json(_) => "Internal serialization failure. Retry with '--format text'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::InvalidConfig(_) => "Invalid Configuration",
            Error::ConfigLoad { .. } => "Configuration Load Failed",

            Error::Load(_) => "Input Read Failed",
            Error::MissingColumn { .. } => "Missing Column",
            Error::Parse { .. } => "Unparseable Value",
            Error::UnmappedLevel { .. } => "Unmapped Log Level",

            Error::InsufficientData { .. } => "Insufficient Data",
            Error::NumericalInstability(_) => "Numerical Instability",

            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Serialization Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Suggested next step.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (row, column, path).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::ConfigLoad { path, .. } => {
                context.insert("path".to_string(), serde_json::json!(path));
            }
            Error::MissingColumn { column } => {
                context.insert("column".to_string(), serde_json::json!(column));
            }
            Error::Parse {
                row, column, value, ..
            } => {
                context.insert("row".to_string(), serde_json::json!(row));
                context.insert("column".to_string(), serde_json::json!(column));
                context.insert("value".to_string(), serde_json::json!(value));
            }
            Error::UnmappedLevel { row, label } => {
                context.insert("row".to_string(), serde_json::json!(row));
                context.insert("label".to_string(), serde_json::json!(label));
            }
            Error::InsufficientData { groups, required } => {
                context.insert("groups".to_string(), serde_json::json!(groups));
                context.insert("required".to_string(), serde_json::json!(required));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
