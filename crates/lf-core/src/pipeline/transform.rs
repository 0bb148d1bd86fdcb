//! Record normalization: timestamps, durations and level remapping.

use super::load::{COL_TIMESTAMP, COL_TIME_TAKEN};
use super::record::{LevelCode, RawRecord, Record};
use crate::logging::{event_names, LogContext, Stage};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lf_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Naive layouts tried after RFC 3339, in order. Interpreted as UTC.
pub const DATETIME_LAYOUTS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only layout, taken as midnight.
pub const DATE_LAYOUT: &str = "%Y-%m-%d";

/// Transformation options.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Unit suffix stripped from the duration column.
    pub duration_suffix: String,
    /// Additional chrono layouts, tried after the built-in ones.
    pub extra_timestamp_formats: Vec<String>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            duration_suffix: "ms".to_string(),
            extra_timestamp_formats: Vec::new(),
        }
    }
}

/// A level label that had no ordinal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedLabel {
    pub label: String,
    pub first_row: usize,
    pub count: usize,
}

/// Output of the transform stage.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub records: Vec<Record>,
    /// Unmapped labels, ordered by label.
    pub unmapped: Vec<UnmappedLabel>,
}

/// Parse a timestamp with the built-in layouts, then `extra`.
pub fn parse_timestamp(value: &str, extra: &[String]) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, layout) {
            return Some(naive.and_utc());
        }
    }
    if let Some(dt) = parse_date_only(value, DATE_LAYOUT) {
        return Some(dt);
    }
    for layout in extra {
        if let Ok(dt) = DateTime::parse_from_str(value, layout) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, layout) {
            return Some(naive.and_utc());
        }
        if let Some(dt) = parse_date_only(value, layout) {
            return Some(dt);
        }
    }
    None
}

fn parse_date_only(value: &str, layout: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(value, layout)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Strip a trailing unit suffix and parse the remainder as a finite float.
pub fn parse_duration(value: &str, suffix: &str) -> std::result::Result<f64, String> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix(suffix).unwrap_or(trimmed).trim();
    let parsed: f64 = number.parse().map_err(|e| format!("{}", e))?;
    if !parsed.is_finite() {
        return Err("value is not finite".to_string());
    }
    Ok(parsed)
}

/// Normalize raw records.
///
/// Fails on the first unparseable timestamp or duration. Unmapped level
/// labels are kept as [`LevelCode::Raw`] and logged once per label.
pub fn transform(
    raws: &[RawRecord],
    options: &TransformOptions,
    ctx: &LogContext,
) -> Result<Transformed> {
    let mut records = Vec::with_capacity(raws.len());
    let mut unmapped: BTreeMap<String, UnmappedLabel> = BTreeMap::new();

    for raw in raws {
        let timestamp = parse_timestamp(&raw.timestamp, &options.extra_timestamp_formats)
            .ok_or_else(|| Error::Parse {
                row: raw.row,
                column: COL_TIMESTAMP.to_string(),
                value: raw.timestamp.clone(),
                message: "no accepted date-time layout matches".to_string(),
            })?;

        let time_taken =
            parse_duration(&raw.time_taken, &options.duration_suffix).map_err(|message| {
                Error::Parse {
                    row: raw.row,
                    column: COL_TIME_TAKEN.to_string(),
                    value: raw.time_taken.clone(),
                    message,
                }
            })?;

        let level = LevelCode::from_label(&raw.log_level);
        if let LevelCode::Raw(label) = &level {
            match unmapped.get_mut(label) {
                Some(entry) => entry.count += 1,
                None => {
                    crate::log_event!(
                        ctx,
                        WARN,
                        event_names::TRANSFORM_UNMAPPED_LEVEL,
                        Stage::Transform,
                        format!("log level {:?} has no ordinal code; kept as-is", label),
                        label = label.as_str(),
                        first_row = raw.row
                    );
                    unmapped.insert(
                        label.clone(),
                        UnmappedLabel {
                            label: label.clone(),
                            first_row: raw.row,
                            count: 1,
                        },
                    );
                }
            }
        }

        records.push(Record {
            row: raw.row,
            timestamp,
            service: raw.service.trim().to_string(),
            level,
            time_taken,
        });
    }

    Ok(Transformed {
        records,
        unmapped: unmapped.into_values().collect(),
    })
}
