//! Record types flowing through the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed severity table. Labels outside it are passed through unchanged.
pub const LEVEL_TABLE: [(&str, u8); 5] = [
    ("INFO", 1),
    ("DEBUG", 2),
    ("WARNING", 3),
    ("ERROR", 4),
    ("FATAL", 5),
];

/// Ordinal code for a severity label, if the label is in [`LEVEL_TABLE`].
///
/// Matching is exact after trimming surrounding whitespace.
pub fn level_code(label: &str) -> Option<u8> {
    let label = label.trim();
    LEVEL_TABLE
        .iter()
        .find(|(name, _)| *name == label)
        .map(|&(_, code)| code)
}

/// One input row as read, before any normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub timestamp: String,
    pub service: String,
    pub log_level: String,
    pub time_taken: String,
}

/// A log level after remapping: an ordinal code, or the untouched label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelCode {
    Ordinal(u8),
    Raw(String),
}

impl LevelCode {
    /// Remap a label through the level table.
    pub fn from_label(label: &str) -> Self {
        match level_code(label) {
            Some(code) => LevelCode::Ordinal(code),
            None => LevelCode::Raw(label.trim().to_string()),
        }
    }

    pub fn ordinal(&self) -> Option<u8> {
        match self {
            LevelCode::Ordinal(code) => Some(*code),
            LevelCode::Raw(_) => None,
        }
    }
}

impl fmt::Display for LevelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelCode::Ordinal(code) => write!(f, "{}", code),
            LevelCode::Raw(label) => write!(f, "{}", label),
        }
    }
}

/// A normalized record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub row: usize,
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub level: LevelCode,
    /// Duration in the unit of the stripped suffix.
    pub time_taken: f64,
}
