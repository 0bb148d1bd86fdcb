//! Group-level regression and record-level correlation.
//!
//! The regression runs over [`GroupedStat`] rows (one point per level); the
//! correlation runs over individual samples. They are different samples and
//! each gets its own verdict.

use super::aggregate::{GroupedStat, LevelSample};
use lf_common::{Error, Result};
use lf_math::{
    fit_simple_ols_with_confidence, pearson, CoefficientEstimate, Correlation, OlsError, SimpleOls,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum number of distinct level groups for a fit.
pub const MIN_GROUPS: usize = 2;

/// Regression summary over the grouped means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub intercept: CoefficientEstimate,
    pub slope: CoefficientEstimate,
    /// `None` when the grouped means have no variance.
    pub r_squared: Option<f64>,
    pub adjusted_r_squared: Option<f64>,
    pub residual_std_error: Option<f64>,
    pub f_statistic: Option<f64>,
    pub f_p_value: Option<f64>,
    pub n_groups: usize,
    pub df_resid: usize,
    /// True when there are no residual degrees of freedom.
    pub saturated: bool,
    /// Level of the coefficient and fitted-mean intervals.
    pub confidence_level: f64,
}

impl FitResult {
    fn from_ols(ols: &SimpleOls) -> Self {
        FitResult {
            intercept: ols.intercept,
            slope: ols.slope,
            r_squared: ols.r_squared,
            adjusted_r_squared: ols.adjusted_r_squared,
            residual_std_error: ols.residual_std_error,
            f_statistic: ols.f_statistic,
            f_p_value: ols.f_p_value,
            n_groups: ols.n,
            df_resid: ols.df_resid,
            saturated: ols.is_saturated(),
            confidence_level: ols.confidence_level,
        }
    }
}

/// A grouped row enriched with the fitted mean and its interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedGroup {
    pub log_level: u8,
    pub time_taken: f64,
    pub count: usize,
    pub intercept: f64,
    pub mean: f64,
    pub mean_ci_lower: Option<f64>,
    pub mean_ci_upper: Option<f64>,
}

/// Outcome of a significance test at a given threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Significant,
    NotSignificant,
    /// The p-value is undefined.
    Undetermined,
}

impl Verdict {
    /// Significant when `p < alpha`.
    pub fn from_p_value(p_value: Option<f64>, alpha: f64) -> Self {
        match p_value {
            Some(p) if p.is_finite() => {
                if p < alpha {
                    Verdict::Significant
                } else {
                    Verdict::NotSignificant
                }
            }
            _ => Verdict::Undetermined,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Significant => write!(f, "significant"),
            Verdict::NotSignificant => write!(f, "not_significant"),
            Verdict::Undetermined => write!(f, "undetermined"),
        }
    }
}

/// The two independent verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdicts {
    /// Overall F test of the group-level regression.
    pub regression: Verdict,
    /// Record-level Pearson correlation test.
    pub correlation: Verdict,
}

impl Verdicts {
    pub fn evaluate(fit: &FitResult, correlation: Option<&Correlation>, alpha: f64) -> Self {
        Verdicts {
            regression: Verdict::from_p_value(fit.f_p_value, alpha),
            correlation: Verdict::from_p_value(correlation.map(|c| c.p_value), alpha),
        }
    }
}

/// Fit `TimeTaken = intercept + slope · LogLevel` over the groups.
///
/// Returns the fit summary and each group with its fitted mean. Coefficient
/// and fitted-mean intervals are both at `confidence_level`.
pub fn fit_groups(
    groups: &[GroupedStat],
    confidence_level: f64,
) -> Result<(FitResult, Vec<FittedGroup>)> {
    if groups.len() < MIN_GROUPS {
        return Err(Error::InsufficientData {
            groups: groups.len(),
            required: MIN_GROUPS,
        });
    }

    let x: Vec<f64> = groups.iter().map(|g| f64::from(g.log_level)).collect();
    let y: Vec<f64> = groups.iter().map(|g| g.time_taken).collect();

    let ols = fit_simple_ols_with_confidence(&x, &y, confidence_level).map_err(|e| match e {
        OlsError::TooFewPoints { n } | OlsError::LengthMismatch { x: n, .. } => {
            Error::InsufficientData {
                groups: n,
                required: MIN_GROUPS,
            }
        }
        OlsError::ZeroVariance | OlsError::NonFinite => {
            Error::NumericalInstability(format!("cannot fit grouped means: {}", e))
        }
    })?;

    let fitted = groups
        .iter()
        .map(|g| {
            let prediction = ols.mean_interval(f64::from(g.log_level), confidence_level);
            FittedGroup {
                log_level: g.log_level,
                time_taken: g.time_taken,
                count: g.count,
                intercept: g.intercept,
                mean: prediction.mean,
                mean_ci_lower: prediction.lower,
                mean_ci_upper: prediction.upper,
            }
        })
        .collect();

    Ok((FitResult::from_ols(&ols), fitted))
}

/// Pearson correlation over record-level (LogLevel, TimeTaken) pairs.
///
/// `None` with fewer than two samples or when either variable is constant.
pub fn correlate(samples: &[LevelSample]) -> Option<Correlation> {
    let x: Vec<f64> = samples.iter().map(|s| f64::from(s.level)).collect();
    let y: Vec<f64> = samples.iter().map(|s| s.time_taken).collect();
    pearson(&x, &y)
}
