//! Configuration validation errors and semantic validation.

use chrono::format::{Item, StrftimeItems};
use thiserror::Error;

use crate::settings::Settings;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Validate settings semantically.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    if settings.input.delimiter_byte().is_none() {
        return Err(ValidationError::InvalidValue {
            field: "input.delimiter".to_string(),
            message: format!(
                "Must be a single ASCII character, got {:?}",
                settings.input.delimiter
            ),
        });
    }

    if settings.input.duration_suffix.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "input.duration_suffix".to_string(),
            message: "Must not be empty".to_string(),
        });
    }

    for (idx, layout) in settings.input.timestamp_formats.iter().enumerate() {
        validate_timestamp_layout(&format!("input.timestamp_formats[{}]", idx), layout)?;
    }

    validate_open_unit(
        "analysis.confidence_level",
        settings.analysis.confidence_level,
    )?;
    validate_open_unit(
        "analysis.significance_level",
        settings.analysis.significance_level,
    )?;

    Ok(())
}

/// Probability-like values must lie strictly inside (0, 1).
fn validate_open_unit(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be in (0, 1), got {}", value),
        });
    }
    Ok(())
}

fn validate_timestamp_layout(field: &str, layout: &str) -> ValidationResult<()> {
    if layout.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "Must not be empty".to_string(),
        });
    }
    if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Not a valid chrono format string: {:?}", layout),
        });
    }
    if !layout.contains('%') {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Layout has no format specifiers: {:?}", layout),
        });
    }
    Ok(())
}
