//! Exit codes for the levelfit CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/input errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

use lf_common::{Error, ErrorCategory};

/// Exit codes for levelfit operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success: report produced
    Clean = 0,

    // ========================================================================
    // User / Input Errors (10-19)
    // ========================================================================
    /// Invalid arguments
    ArgsError = 10,

    /// Configuration file missing, malformed, or invalid
    ConfigError = 11,

    /// Input file malformed (missing columns, unparseable values, unmapped levels)
    InputError = 12,

    /// Fewer than two distinct log level groups
    InsufficientData = 13,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::InsufficientData => "ERR_INSUFFICIENT_DATA",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Map an error to the exit code reported for it.
    pub fn for_error(err: &Error) -> Self {
        match err {
            Error::InsufficientData { .. } => ExitCode::InsufficientData,
            Error::NumericalInstability(_) => ExitCode::InternalError,
            _ => match err.category() {
                ErrorCategory::Config => ExitCode::ConfigError,
                ErrorCategory::Input => ExitCode::InputError,
                ErrorCategory::Analysis => ExitCode::InternalError,
                ErrorCategory::Io => match err {
                    Error::Json(_) => ExitCode::InternalError,
                    _ => ExitCode::IoError,
                },
            },
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_error() {
        assert_eq!(
            ExitCode::for_error(&Error::InsufficientData {
                groups: 1,
                required: 2
            }),
            ExitCode::InsufficientData
        );
        assert_eq!(
            ExitCode::for_error(&Error::UnmappedLevel {
                row: 1,
                label: "TRACE".into()
            }),
            ExitCode::InputError
        );
        assert_eq!(
            ExitCode::for_error(&Error::InvalidConfig("x".into())),
            ExitCode::ConfigError
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(ExitCode::for_error(&Error::Io(io)), ExitCode::IoError);
        assert_eq!(
            ExitCode::for_error(&Error::NumericalInstability("nan".into())),
            ExitCode::InternalError
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::InsufficientData.to_string(), "ERR_INSUFFICIENT_DATA (13)");
        assert_eq!(i32::from(ExitCode::InputError), 12);
    }
}
