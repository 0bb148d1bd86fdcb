//! Report rendering.
//!
//! The pipeline produces an [`Analysis`]; this module wraps it with run
//! metadata into an [`AnalysisReport`] and renders it in one of the
//! [`OutputFormat`]s. Text and Markdown keep the same fixed section order:
//! grouped means, fit summary, R², correlation, t-values, p-values, F-test
//! p-value, then the two verdicts.

mod md;
mod summary;
mod text;

use crate::config::ConfigSnapshot;
use crate::pipeline::{
    Analysis, CheckSummary, FitResult, FittedGroup, ServiceLevelCount, UnmappedLabel, Verdict,
    Verdicts,
};
use lf_common::{OutputFormat, Result, RunId, SCHEMA_VERSION};
use lf_math::Correlation;
use serde::{Deserialize, Serialize};

/// Full structured result of one analysis run.
///
/// `groups` carries the observed means with fitted means and interval
/// bounds, which is all the data behind the regression plots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub schema_version: String,
    pub run_id: String,
    pub generated_at: String,
    pub input: String,
    pub config: ConfigSnapshot,
    pub record_count: usize,
    pub excluded_records: usize,
    pub unmapped_labels: Vec<UnmappedLabel>,
    pub groups: Vec<FittedGroup>,
    pub fit: FitResult,
    pub correlation: Option<Correlation>,
    pub significance_level: f64,
    pub verdicts: Verdicts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_counts: Option<Vec<ServiceLevelCount>>,
}

impl AnalysisReport {
    pub fn new(
        run_id: &RunId,
        input: impl Into<String>,
        config: ConfigSnapshot,
        analysis: Analysis,
        include_service_counts: bool,
    ) -> Self {
        AnalysisReport {
            schema_version: SCHEMA_VERSION.to_string(),
            run_id: run_id.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            input: input.into(),
            config,
            record_count: analysis.record_count,
            excluded_records: analysis.excluded_records,
            unmapped_labels: analysis.unmapped,
            groups: analysis.groups,
            fit: analysis.fit,
            correlation: analysis.correlation,
            significance_level: analysis.significance_level,
            verdicts: analysis.verdicts,
            service_counts: include_service_counts.then_some(analysis.service_counts),
        }
    }
}

/// Render an analysis report.
pub fn render(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Md => md::render(report),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Summary => summary::render(report),
    })
}

/// Render the result of `levelfit check`.
pub fn render_check(input: &str, check: &CheckSummary, format: OutputFormat) -> Result<String> {
    let levels = check
        .levels
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let unmapped = check
        .unmapped
        .iter()
        .map(|u| format!("{} (first row {}, {} record(s))", u.label, u.first_row, u.count))
        .collect::<Vec<_>>();

    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "input": input,
            "status": if check.unmapped.is_empty() { "ok" } else { "warn" },
            "check": check,
        }))?,
        OutputFormat::Summary => format!(
            "records={} levels={} services={} unmapped={}",
            check.records,
            levels,
            check.services.len(),
            check.unmapped.len()
        ),
        OutputFormat::Text | OutputFormat::Md => {
            let mut out = String::new();
            out.push_str(&format!("Input: {}\n", input));
            out.push_str(&format!("Records: {}\n", check.records));
            out.push_str(&format!("Levels: {}\n", if levels.is_empty() { "-" } else { levels.as_str() }));
            out.push_str(&format!("Services: {}\n", check.services.join(", ")));
            if unmapped.is_empty() {
                out.push_str("Unmapped levels: none\n");
            } else {
                out.push_str("Unmapped levels:\n");
                for line in &unmapped {
                    out.push_str(&format!("  {}\n", line));
                }
            }
            out
        }
    })
}

/// Confidence level as a percentage without float noise (0.9 -> "90").
pub(crate) fn fmt_percent(level: f64) -> String {
    let text = format!("{:.2}", level * 100.0);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Number for display; `undefined` when absent or not finite.
pub(crate) fn fmt_num(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            if v != 0.0 && v.abs() < 1e-4 {
                format!("{:.4e}", v)
            } else {
                format!("{:.6}", v)
            }
        }
        Some(v) if v.is_nan() => "undefined".to_string(),
        Some(v) if v > 0.0 => "inf".to_string(),
        Some(_) => "-inf".to_string(),
        None => "undefined".to_string(),
    }
}

pub(crate) fn regression_sentence(verdict: Verdict, alpha: f64) -> String {
    match verdict {
        Verdict::Significant => format!(
            "The regression model is statistically significant (F-test p < {}).",
            alpha
        ),
        Verdict::NotSignificant => format!(
            "The regression model is not statistically significant (F-test p >= {}).",
            alpha
        ),
        Verdict::Undetermined => {
            "Regression significance is undetermined: the F-test p-value is undefined.".to_string()
        }
    }
}

pub(crate) fn correlation_sentence(verdict: Verdict, alpha: f64) -> String {
    match verdict {
        Verdict::Significant => format!(
            "The correlation coefficient is statistically significant (p < {}).",
            alpha
        ),
        Verdict::NotSignificant => format!(
            "The correlation coefficient is not statistically significant (p >= {}).",
            alpha
        ),
        Verdict::Undetermined => {
            "Correlation significance is undetermined: the correlation is undefined.".to_string()
        }
    }
}
