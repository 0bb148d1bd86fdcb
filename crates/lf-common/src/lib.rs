//! levelfit common types, IDs, and errors.
//!
//! This crate provides the foundational types shared across the workspace:
//! - Run identifiers for correlating logs with reports
//! - The unified error type with stable codes
//! - Output format selection

pub mod error;
pub mod id;
pub mod output;

pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError};
pub use id::RunId;
pub use output::OutputFormat;

/// Version of the JSON report layout.
pub const SCHEMA_VERSION: &str = "1.0.0";
