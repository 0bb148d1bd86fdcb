//! Output formats for reports and errors.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Supported output formats for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Fixed-order plain text report
    #[default]
    Text,

    /// Human-readable Markdown tables
    Md,

    /// Structured JSON including plot data
    Json,

    /// One-line summary for quick status checks
    Summary,
}

impl OutputFormat {
    /// Whether the payload is meant for machines rather than people.
    pub fn is_structured(&self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Md => write!(f, "md"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}
