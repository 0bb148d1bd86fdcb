//! The analysis pipeline.
//!
//! Each stage is a function over the previous stage's output:
//!
//! ```text
//! load → transform → level_samples → group_means → fit_groups
//!                                  ↘ correlate
//! ```
//!
//! [`run_pipeline`] chains them and emits the stage events; rendering lives
//! in [`crate::report`].

pub mod aggregate;
pub mod load;
pub mod record;
pub mod regress;
pub mod transform;

pub use aggregate::{
    group_means, level_samples, service_level_counts, GroupedStat, LevelSample, LevelSamples,
    ServiceLevelCount,
};
pub use load::{load_path, load_reader, LoadOptions, REQUIRED_COLUMNS};
pub use record::{level_code, LevelCode, RawRecord, Record, LEVEL_TABLE};
pub use regress::{correlate, fit_groups, FitResult, FittedGroup, Verdict, Verdicts, MIN_GROUPS};
pub use transform::{parse_duration, parse_timestamp, transform, TransformOptions, Transformed, UnmappedLabel};

use crate::logging::{event_names, LogContext, Stage};
use lf_common::{Error, Result};
use lf_config::{Settings, UnknownLevelPolicy};
use lf_math::Correlation;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Pipeline parameters derived from [`Settings`].
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub load: LoadOptions,
    pub transform: TransformOptions,
    pub unknown_levels: UnknownLevelPolicy,
    pub confidence_level: f64,
    pub significance_level: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            load: LoadOptions::default(),
            transform: TransformOptions::default(),
            unknown_levels: UnknownLevelPolicy::Reject,
            confidence_level: 0.95,
            significance_level: 0.05,
        }
    }
}

impl PipelineOptions {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let delimiter = settings.input.delimiter_byte().ok_or_else(|| {
            Error::InvalidConfig(format!(
                "input.delimiter must be a single ASCII character, got {:?}",
                settings.input.delimiter
            ))
        })?;
        Ok(PipelineOptions {
            load: LoadOptions { delimiter },
            transform: TransformOptions {
                duration_suffix: settings.input.duration_suffix.clone(),
                extra_timestamp_formats: settings.input.timestamp_formats.clone(),
            },
            unknown_levels: settings.analysis.unknown_levels,
            confidence_level: settings.analysis.confidence_level,
            significance_level: settings.analysis.significance_level,
        })
    }
}

/// Everything a report needs from one run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub record_count: usize,
    pub excluded_records: usize,
    pub unmapped: Vec<UnmappedLabel>,
    pub groups: Vec<FittedGroup>,
    pub fit: FitResult,
    pub correlation: Option<Correlation>,
    pub verdicts: Verdicts,
    pub significance_level: f64,
    pub service_counts: Vec<ServiceLevelCount>,
}

/// Load, normalize and analyse the file at `path`.
pub fn run_pipeline(path: &Path, options: &PipelineOptions, ctx: &LogContext) -> Result<Analysis> {
    crate::log_event!(ctx, INFO, event_names::LOAD_STARTED, Stage::Load, "reading input");
    let raws = load_path(path, options.load)?;
    crate::log_event!(
        ctx,
        INFO,
        event_names::LOAD_FINISHED,
        Stage::Load,
        "input read",
        rows = raws.len()
    );
    analyze_records(&raws, options, ctx)
}

/// Run every stage after loading.
pub fn analyze_records(
    raws: &[RawRecord],
    options: &PipelineOptions,
    ctx: &LogContext,
) -> Result<Analysis> {
    crate::log_event!(ctx, DEBUG, event_names::TRANSFORM_STARTED, Stage::Transform, "normalizing records");
    let transformed = transform(raws, &options.transform, ctx)?;
    crate::log_event!(
        ctx,
        INFO,
        event_names::TRANSFORM_FINISHED,
        Stage::Transform,
        "records normalized",
        records = transformed.records.len(),
        unmapped_labels = transformed.unmapped.len()
    );

    crate::log_event!(ctx, DEBUG, event_names::AGGREGATE_STARTED, Stage::Aggregate, "grouping by level");
    let selected = level_samples(&transformed.records, options.unknown_levels, ctx)?;
    let groups = group_means(&selected.samples);
    let service_counts = service_level_counts(&transformed.records);
    crate::log_event!(
        ctx,
        INFO,
        event_names::AGGREGATE_FINISHED,
        Stage::Aggregate,
        "groups computed",
        groups = groups.len(),
        samples = selected.samples.len()
    );

    crate::log_event!(ctx, DEBUG, event_names::FIT_STARTED, Stage::Fit, "fitting grouped means");
    let (fit, fitted) = fit_groups(&groups, options.confidence_level)?;
    if fit.saturated {
        crate::log_event!(
            ctx,
            WARN,
            event_names::FIT_SATURATED,
            Stage::Fit,
            "two groups only; inference statistics are undefined",
            groups = fit.n_groups
        );
    }
    crate::log_event!(
        ctx,
        INFO,
        event_names::FIT_FINISHED,
        Stage::Fit,
        "regression fitted",
        slope = fit.slope.estimate,
        intercept = fit.intercept.estimate,
        r_squared = fit.r_squared.unwrap_or(f64::NAN)
    );

    crate::log_event!(ctx, DEBUG, event_names::CORRELATE_STARTED, Stage::Correlate, "correlating samples");
    let correlation = correlate(&selected.samples);
    match &correlation {
        Some(c) => crate::log_event!(
            ctx,
            INFO,
            event_names::CORRELATE_FINISHED,
            Stage::Correlate,
            "correlation computed",
            r = c.r,
            p_value = c.p_value,
            n = c.n
        ),
        None => crate::log_event!(
            ctx,
            WARN,
            event_names::CORRELATE_UNDEFINED,
            Stage::Correlate,
            "correlation undefined for these samples",
            n = selected.samples.len()
        ),
    }

    let verdicts = Verdicts::evaluate(&fit, correlation.as_ref(), options.significance_level);

    Ok(Analysis {
        record_count: transformed.records.len(),
        excluded_records: selected.excluded,
        unmapped: transformed.unmapped,
        groups: fitted,
        fit,
        correlation,
        verdicts,
        significance_level: options.significance_level,
        service_counts,
    })
}

/// Result of the load + transform dry run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub records: usize,
    /// Distinct ordinal levels present, ascending.
    pub levels: Vec<u8>,
    /// Distinct services present, sorted.
    pub services: Vec<String>,
    pub unmapped: Vec<UnmappedLabel>,
}

/// Load and normalize without analysing.
pub fn check_input(path: &Path, options: &PipelineOptions, ctx: &LogContext) -> Result<CheckSummary> {
    let raws = load_path(path, options.load)?;
    let transformed = transform(&raws, &options.transform, ctx)?;

    let levels: BTreeSet<u8> = transformed
        .records
        .iter()
        .filter_map(|r| r.level.ordinal())
        .collect();
    let services: BTreeSet<&str> = transformed
        .records
        .iter()
        .map(|r| r.service.as_str())
        .collect();

    Ok(CheckSummary {
        records: transformed.records.len(),
        levels: levels.into_iter().collect(),
        services: services.into_iter().map(str::to_string).collect(),
        unmapped: transformed.unmapped,
    })
}
