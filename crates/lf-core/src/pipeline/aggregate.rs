//! Grouping records by ordinal level.

use super::record::{LevelCode, Record};
use crate::logging::{event_names, LogContext, Stage};
use lf_common::{Error, Result};
use lf_config::UnknownLevelPolicy;
use lf_math::mean;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One record reduced to the two analysed variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSample {
    pub row: usize,
    pub level: u8,
    pub time_taken: f64,
}

/// Mean duration for one ordinal level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedStat {
    pub log_level: u8,
    /// Mean duration over the group.
    pub time_taken: f64,
    pub count: usize,
    /// Constant design column.
    pub intercept: f64,
}

/// Records for one (Service, LogLevel) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLevelCount {
    pub service: String,
    pub log_level: LevelCode,
    pub count: usize,
}

/// Samples kept after applying the unknown-level policy.
#[derive(Debug, Clone, Default)]
pub struct LevelSamples {
    pub samples: Vec<LevelSample>,
    /// Rows dropped under [`UnknownLevelPolicy::Exclude`].
    pub excluded: usize,
}

/// Reduce records to ordinal samples.
///
/// Under `Reject` the first record with an unmapped label aborts with
/// [`Error::UnmappedLevel`]. Under `Exclude` such records are dropped and
/// the drop is logged.
pub fn level_samples(
    records: &[Record],
    policy: UnknownLevelPolicy,
    ctx: &LogContext,
) -> Result<LevelSamples> {
    let mut out = LevelSamples::default();
    for record in records {
        match &record.level {
            LevelCode::Ordinal(level) => out.samples.push(LevelSample {
                row: record.row,
                level: *level,
                time_taken: record.time_taken,
            }),
            LevelCode::Raw(label) => match policy {
                UnknownLevelPolicy::Reject => {
                    return Err(Error::UnmappedLevel {
                        row: record.row,
                        label: label.clone(),
                    })
                }
                UnknownLevelPolicy::Exclude => out.excluded += 1,
            },
        }
    }

    if out.excluded > 0 {
        crate::log_event!(
            ctx,
            WARN,
            event_names::AGGREGATE_EXCLUDED,
            Stage::Aggregate,
            format!(
                "excluded {} record(s) with unmapped log levels",
                out.excluded
            ),
            excluded = out.excluded,
            kept = out.samples.len()
        );
    }
    Ok(out)
}

/// Mean duration per ordinal level, ascending by level.
pub fn group_means(samples: &[LevelSample]) -> Vec<GroupedStat> {
    let mut groups: BTreeMap<u8, Vec<f64>> = BTreeMap::new();
    for s in samples {
        groups.entry(s.level).or_default().push(s.time_taken);
    }
    groups
        .into_iter()
        .filter_map(|(log_level, values)| {
            mean(&values).map(|time_taken| GroupedStat {
                log_level,
                time_taken,
                count: values.len(),
                intercept: 1.0,
            })
        })
        .collect()
}

/// Record counts per (Service, LogLevel), ordered by service then level.
pub fn service_level_counts(records: &[Record]) -> Vec<ServiceLevelCount> {
    let mut counts: BTreeMap<(&str, &LevelCode), usize> = BTreeMap::new();
    for r in records {
        *counts.entry((r.service.as_str(), &r.level)).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|((service, level), count)| ServiceLevelCount {
            service: service.to_string(),
            log_level: level.clone(),
            count,
        })
        .collect()
}
