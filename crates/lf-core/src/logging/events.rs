//! Structured event definitions for logging.
//!
//! Every event carries the run ID and the pipeline stage that emitted it,
//! so JSONL output can be filtered per run and per stage.

use serde::{Deserialize, Serialize};

/// Log levels for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Stages of the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading the delimited input.
    Load,
    /// Timestamp/duration parsing and level remapping.
    Transform,
    /// Grouping by ordinal level.
    Aggregate,
    /// Least-squares fit over the groups.
    Fit,
    /// Record-level correlation.
    Correlate,
    /// Report rendering.
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Transform => "transform",
            Stage::Aggregate => "aggregate",
            Stage::Fit => "fit",
            Stage::Correlate => "correlate",
            Stage::Report => "report",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";
    pub const RUN_FAILED: &str = "run.failed";

    // Config/init events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";

    // Load stage
    pub const LOAD_STARTED: &str = "load.started";
    pub const LOAD_FINISHED: &str = "load.finished";

    // Transform stage
    pub const TRANSFORM_STARTED: &str = "transform.started";
    pub const TRANSFORM_UNMAPPED_LEVEL: &str = "transform.unmapped_level";
    pub const TRANSFORM_FINISHED: &str = "transform.finished";

    // Aggregate stage
    pub const AGGREGATE_STARTED: &str = "aggregate.started";
    pub const AGGREGATE_EXCLUDED: &str = "aggregate.excluded";
    pub const AGGREGATE_FINISHED: &str = "aggregate.finished";

    // Fit stage
    pub const FIT_STARTED: &str = "fit.started";
    pub const FIT_SATURATED: &str = "fit.saturated";
    pub const FIT_FINISHED: &str = "fit.finished";

    // Correlate stage
    pub const CORRELATE_STARTED: &str = "correlate.started";
    pub const CORRELATE_UNDEFINED: &str = "correlate.undefined";
    pub const CORRELATE_FINISHED: &str = "correlate.finished";

    // Report stage
    pub const REPORT_RENDERED: &str = "report.rendered";
}

/// Context for generating log events with a consistent run ID.
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Unique ID for this invocation.
    pub run_id: String,
    /// Input being analyzed.
    pub input: Option<String>,
}

impl LogContext {
    /// Create a new log context.
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            input: None,
        }
    }

    /// Set the input path.
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Input path for log fields, `-` when there is none.
    pub fn input_label(&self) -> &str {
        self.input.as_deref().unwrap_or("-")
    }
}
