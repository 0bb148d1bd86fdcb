//! Typed settings for `levelfit.toml`.
//!
//! Every table and key is optional; missing values fall back to the
//! defaults below. Unknown keys are rejected so typos surface early.
//!
//! ```toml
//! [input]
//! delimiter = ","
//! duration_suffix = "ms"
//! timestamp_formats = ["%d.%m.%Y %H:%M:%S"]
//!
//! [analysis]
//! confidence_level = 0.95
//! significance_level = 0.05
//! unknown_levels = "reject"
//!
//! [report]
//! service_counts = false
//! ```

use std::path::Path;

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::validate::{ValidationError, ValidationResult};

/// Complete levelfit configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub input: InputSettings,
    pub analysis: AnalysisSettings,
    pub report: ReportSettings,
}

/// How the input table is read and normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct InputSettings {
    /// Field separator; must be a single ASCII character.
    pub delimiter: String,

    /// Literal unit suffix stripped from TimeTaken before parsing.
    pub duration_suffix: String,

    /// Extra chrono layouts tried after the built-in timestamp layouts.
    pub timestamp_formats: Vec<String>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            duration_suffix: "ms".to_string(),
            timestamp_formats: Vec::new(),
        }
    }
}

impl InputSettings {
    /// Delimiter as a byte, or `None` if it is not a single ASCII character.
    pub fn delimiter_byte(&self) -> Option<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Some(*b),
            _ => None,
        }
    }
}

/// Statistical thresholds and the policy for unmapped log levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisSettings {
    /// Two-sided confidence level for the mean-response intervals.
    pub confidence_level: f64,

    /// p-value threshold for the significance verdicts.
    pub significance_level: f64,

    /// What aggregation does with records whose level has no ordinal code.
    pub unknown_levels: UnknownLevelPolicy,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            significance_level: 0.05,
            unknown_levels: UnknownLevelPolicy::default(),
        }
    }
}

/// Handling of records whose LogLevel label is outside the ordinal table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum UnknownLevelPolicy {
    /// Abort the run, naming the first offending row.
    #[default]
    Reject,
    /// Drop those records from the analysis with a warning.
    Exclude,
}

impl std::fmt::Display for UnknownLevelPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnknownLevelPolicy::Reject => write!(f, "reject"),
            UnknownLevelPolicy::Exclude => write!(f, "exclude"),
        }
    }
}

/// Optional report sections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSettings {
    /// Include the Service × LogLevel count table.
    pub service_counts: bool,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> ValidationResult<Self> {
        toml::from_str(content).map_err(|e| ValidationError::ParseError(e.to_string()))
    }

    /// Read and parse a settings file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ValidationError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> ValidationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ValidationError::ParseError(e.to_string()))
    }

    /// JSON schema describing the settings file.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Settings)).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.input.delimiter, ",");
        assert_eq!(settings.input.duration_suffix, "ms");
        assert_eq!(settings.analysis.confidence_level, 0.95);
        assert_eq!(settings.analysis.significance_level, 0.05);
        assert_eq!(settings.analysis.unknown_levels, UnknownLevelPolicy::Reject);
        assert!(!settings.report.service_counts);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [analysis]
            unknown_levels = "exclude"
            "#,
        )
        .unwrap();
        assert_eq!(settings.analysis.unknown_levels, UnknownLevelPolicy::Exclude);
        assert_eq!(settings.analysis.confidence_level, 0.95);
        assert_eq!(settings.input, InputSettings::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Settings::from_toml_str("[input]\nseparator = \";\"\n").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
        assert!(err.to_string().contains("separator"));

        assert!(Settings::from_toml_str("[plots]\nshow = true\n").is_err());
    }

    #[test]
    fn toml_round_trip() {
        let mut settings = Settings::default();
        settings.input.delimiter = ";".into();
        settings.input.timestamp_formats = vec!["%d.%m.%Y %H:%M".into()];
        settings.report.service_counts = true;
        let text = settings.to_toml_string().unwrap();
        assert_eq!(Settings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn delimiter_byte_requires_single_ascii() {
        let mut input = InputSettings::default();
        assert_eq!(input.delimiter_byte(), Some(b','));
        input.delimiter = "\t".into();
        assert_eq!(input.delimiter_byte(), Some(b'\t'));
        input.delimiter = ";;".into();
        assert_eq!(input.delimiter_byte(), None);
        input.delimiter = "§".into();
        assert_eq!(input.delimiter_byte(), None);
        input.delimiter = String::new();
        assert_eq!(input.delimiter_byte(), None);
    }

    #[test]
    fn schema_names_all_tables() {
        let schema = Settings::json_schema().to_string();
        for key in ["input", "analysis", "report", "unknown_levels", "duration_suffix"] {
            assert!(schema.contains(key), "schema is missing {key}");
        }
    }
}
