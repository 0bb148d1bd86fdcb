//! Simple ordinary least squares: y = intercept + slope · x.
//!
//! Closed-form fit from centered sums, coefficient inference against the
//! Student t distribution with n − 2 degrees of freedom, the overall F test,
//! and confidence intervals for the coefficients and the mean response.
//!
//! With exactly two points the fit is saturated (zero residual degrees of
//! freedom). Coefficients are still defined, but every inference quantity
//! is `None`. R² is `None` when the response has no variance.
//!
//! # References
//!
//! Draper & Smith (1998). "Applied Regression Analysis", 3rd edition.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::fisher_f::fisher_f_sf;
use super::stable::mean;
use super::student_t::{student_t_critical, student_t_two_sided_p};

/// Minimum number of points for a unique line.
pub const OLS_MIN_POINTS: usize = 2;

/// Confidence level used by [`fit_simple_ols`].
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Why a simple OLS fit could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OlsError {
    /// x and y have different lengths.
    LengthMismatch { x: usize, y: usize },
    /// An input value is NaN or infinite.
    NonFinite,
    /// Fewer than [`OLS_MIN_POINTS`] observations.
    TooFewPoints { n: usize },
    /// All x values are equal; the design matrix is singular.
    ZeroVariance,
}

impl fmt::Display for OlsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OlsError::LengthMismatch { x, y } => {
                write!(f, "x has {} values but y has {}", x, y)
            }
            OlsError::NonFinite => write!(f, "input contains non-finite values"),
            OlsError::TooFewPoints { n } => write!(
                f,
                "need at least {} points for a line, got {}",
                OLS_MIN_POINTS, n
            ),
            OlsError::ZeroVariance => write!(f, "predictor has zero variance"),
        }
    }
}

impl std::error::Error for OlsError {}

/// One fitted coefficient with its inference statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientEstimate {
    pub estimate: f64,
    pub std_error: Option<f64>,
    /// Coefficient / standard error (H₀: coefficient = 0).
    pub t_value: Option<f64>,
    /// Two-sided p-value against t(n − 2).
    pub p_value: Option<f64>,
    /// estimate − t_{1−α/2, n−2} · SE.
    pub ci_lower: Option<f64>,
    /// estimate + t_{1−α/2, n−2} · SE.
    pub ci_upper: Option<f64>,
}

impl CoefficientEstimate {
    fn saturated(estimate: f64) -> Self {
        CoefficientEstimate {
            estimate,
            std_error: None,
            t_value: None,
            p_value: None,
            ci_lower: None,
            ci_upper: None,
        }
    }

    fn with_std_error(estimate: f64, std_error: f64, df: f64, confidence: f64) -> Self {
        let t = t_statistic(estimate, std_error);
        let half = student_t_critical(confidence, df) * std_error;
        let (ci_lower, ci_upper) = if half.is_finite() {
            (Some(estimate - half), Some(estimate + half))
        } else {
            (None, None)
        };
        CoefficientEstimate {
            estimate,
            std_error: Some(std_error),
            t_value: Some(t),
            p_value: Some(student_t_two_sided_p(t, df)),
            ci_lower,
            ci_upper,
        }
    }
}

/// Result of a simple OLS fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleOls {
    pub intercept: CoefficientEstimate,
    pub slope: CoefficientEstimate,
    /// Coefficient of determination, 1 − SSres/SStot. `None` when SStot is
    /// zero or not finite.
    pub r_squared: Option<f64>,
    /// 1 − (1 − R²)(n − 1)/(n − 2).
    pub adjusted_r_squared: Option<f64>,
    /// √(SSres / (n − 2)).
    pub residual_std_error: Option<f64>,
    /// (SSreg / 1) / (SSres / (n − 2)).
    pub f_statistic: Option<f64>,
    /// P(F(1, n − 2) > f_statistic).
    pub f_p_value: Option<f64>,
    pub ss_residual: f64,
    pub ss_total: f64,
    pub n: usize,
    pub df_resid: usize,
    /// Level of the coefficient intervals.
    pub confidence_level: f64,
    pub x_mean: f64,
    /// Σ(xᵢ − x̄)².
    pub sxx: f64,
}

/// Fitted mean response at one predictor value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanPrediction {
    pub x: f64,
    pub mean: f64,
    pub std_error: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl MeanPrediction {
    /// Interval width, when the interval is defined.
    pub fn width(&self) -> Option<f64> {
        Some(self.upper? - self.lower?)
    }
}

fn t_statistic(estimate: f64, std_error: f64) -> f64 {
    if std_error > 0.0 {
        estimate / std_error
    } else if estimate == 0.0 {
        0.0
    } else {
        f64::INFINITY.copysign(estimate)
    }
}

/// Fits y = intercept + slope · x by ordinary least squares, with 95%
/// coefficient intervals.
///
/// # Errors
///
/// Fails when the slices differ in length, hold non-finite values, have
/// fewer than two points, or x is constant.
///
/// # Examples
///
/// ```
/// use lf_math::fit_simple_ols;
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [3.0, 5.0, 7.0, 9.0, 11.0];
/// let fit = fit_simple_ols(&x, &y).unwrap();
/// assert!((fit.slope.estimate - 2.0).abs() < 1e-12);
/// assert!((fit.intercept.estimate - 1.0).abs() < 1e-12);
/// ```
pub fn fit_simple_ols(x: &[f64], y: &[f64]) -> Result<SimpleOls, OlsError> {
    fit_simple_ols_with_confidence(x, y, DEFAULT_CONFIDENCE)
}

/// Same as [`fit_simple_ols`], with coefficient intervals at `confidence`.
///
/// Interval bounds are `None` when `confidence` is outside (0, 1).
pub fn fit_simple_ols_with_confidence(
    x: &[f64],
    y: &[f64],
    confidence: f64,
) -> Result<SimpleOls, OlsError> {
    if x.len() != y.len() {
        return Err(OlsError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    let n = x.len();
    if n < OLS_MIN_POINTS {
        return Err(OlsError::TooFewPoints { n });
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(OlsError::NonFinite);
    }

    let x_mean = mean(x).ok_or(OlsError::TooFewPoints { n })?;
    let y_mean = mean(y).ok_or(OlsError::TooFewPoints { n })?;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut ss_total = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        sxx += dx * dx;
        sxy += dx * dy;
        ss_total += dy * dy;
    }
    if sxx <= 0.0 {
        return Err(OlsError::ZeroVariance);
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let ss_residual: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| {
            let e = yi - (intercept + slope * xi);
            e * e
        })
        .sum();

    let r_squared = if ss_total.is_finite() && ss_total > 0.0 {
        Some(1.0 - ss_residual / ss_total).filter(|r| r.is_finite())
    } else {
        None
    };

    let df_resid = n - OLS_MIN_POINTS;
    if df_resid == 0 {
        return Ok(SimpleOls {
            intercept: CoefficientEstimate::saturated(intercept),
            slope: CoefficientEstimate::saturated(slope),
            r_squared,
            adjusted_r_squared: None,
            residual_std_error: None,
            f_statistic: None,
            f_p_value: None,
            ss_residual,
            ss_total,
            n,
            df_resid,
            confidence_level: confidence,
            x_mean,
            sxx,
        });
    }

    let nf = n as f64;
    let df = df_resid as f64;
    let mse = ss_residual / df;
    let slope_se = (mse / sxx).sqrt();
    let intercept_se = (mse * (1.0 / nf + x_mean * x_mean / sxx)).sqrt();

    let ss_regression = (ss_total - ss_residual).max(0.0);
    let f_statistic = if mse > 0.0 {
        ss_regression / mse
    } else if ss_regression > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    Ok(SimpleOls {
        intercept: CoefficientEstimate::with_std_error(intercept, intercept_se, df, confidence),
        slope: CoefficientEstimate::with_std_error(slope, slope_se, df, confidence),
        r_squared,
        adjusted_r_squared: r_squared.map(|r2| 1.0 - (1.0 - r2) * (nf - 1.0) / df),
        residual_std_error: Some(mse.sqrt()),
        f_statistic: Some(f_statistic),
        f_p_value: Some(fisher_f_sf(f_statistic, 1.0, df)),
        ss_residual,
        ss_total,
        n,
        df_resid,
        confidence_level: confidence,
        x_mean,
        sxx,
    })
}

impl SimpleOls {
    /// True when there are no residual degrees of freedom.
    pub fn is_saturated(&self) -> bool {
        self.df_resid == 0
    }

    /// Point prediction intercept + slope · x.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept.estimate + self.slope.estimate * x
    }

    /// Fitted mean and two-sided confidence interval for the mean response.
    ///
    /// SE(ŷ₀) = s · √(1/n + (x₀ − x̄)²/Sxx), half-width t_{1−α/2, n−2} · SE.
    /// Bounds are `None` for a saturated fit or a confidence level outside
    /// (0, 1).
    pub fn mean_interval(&self, x: f64, confidence: f64) -> MeanPrediction {
        let mean = self.predict(x);
        let undefined = MeanPrediction {
            x,
            mean,
            std_error: None,
            lower: None,
            upper: None,
        };
        let Some(s) = self.residual_std_error else {
            return undefined;
        };
        let dx = x - self.x_mean;
        let std_error = s * (1.0 / self.n as f64 + dx * dx / self.sxx).sqrt();
        let t_crit = student_t_critical(confidence, self.df_resid as f64);
        if !t_crit.is_finite() {
            return MeanPrediction {
                std_error: Some(std_error),
                ..undefined
            };
        }
        let half = t_crit * std_error;
        MeanPrediction {
            x,
            mean,
            std_error: Some(std_error),
            lower: Some(mean - half),
            upper: Some(mean + half),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn perfect_fit() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [3.0, 5.0, 7.0, 9.0, 11.0];
        let fit = fit_simple_ols(&x, &y).expect("fit");
        assert!(approx_eq(fit.slope.estimate, 2.0, 1e-12));
        assert!(approx_eq(fit.intercept.estimate, 1.0, 1e-12));
        assert!(approx_eq(fit.r_squared.expect("r2"), 1.0, 1e-12));
        assert_eq!(fit.df_resid, 3);
        assert!(approx_eq(fit.f_p_value.expect("defined"), 0.0, 1e-12));
    }

    #[test]
    fn two_points_is_saturated() {
        let fit = fit_simple_ols(&[1.0, 4.0], &[15.0, 40.0]).expect("fit");
        assert!(fit.is_saturated());
        assert!(approx_eq(fit.slope.estimate, 25.0 / 3.0, 1e-12));
        assert!(approx_eq(fit.intercept.estimate, 20.0 / 3.0, 1e-12));
        assert!(approx_eq(fit.r_squared.expect("r2"), 1.0, 1e-12));
        assert!(fit.slope.p_value.is_none());
        assert!(fit.slope.ci_lower.is_none() && fit.intercept.ci_upper.is_none());
        assert!(fit.f_p_value.is_none());
        let band = fit.mean_interval(1.0, 0.95);
        assert!(approx_eq(band.mean, 15.0, 1e-12));
        assert!(band.lower.is_none() && band.upper.is_none());
    }

    #[test]
    fn noisy_fit_statistics() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.1, 3.9, 6.1, 7.9, 10.1];
        let fit = fit_simple_ols(&x, &y).expect("fit");
        assert!(approx_eq(fit.slope.estimate, 2.0, 1e-12));
        assert!(approx_eq(fit.intercept.estimate, 0.02, 1e-12));
        // SSres = 0.048, s² = 0.048/3
        assert!(approx_eq(fit.ss_residual, 0.048, 1e-12));
        let se_slope = (0.048 / 3.0 / 10.0f64).sqrt();
        assert!(approx_eq(fit.slope.std_error.expect("se"), se_slope, 1e-12));
        let t = fit.slope.t_value.expect("t");
        let f = fit.f_statistic.expect("f");
        assert!(approx_eq(f, t * t, 1e-8));
        assert!(fit.slope.p_value.expect("p") < 1e-4);
    }

    #[test]
    fn noisy_fit_coefficient_intervals() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.1, 3.9, 6.1, 7.9, 10.1];
        let fit = fit_simple_ols(&x, &y).expect("fit");
        // t_{0.975,3} = 3.182446
        let t_crit = 3.182_446_305;
        for coef in [fit.slope, fit.intercept] {
            let se = coef.std_error.expect("se");
            let lower = coef.ci_lower.expect("lower");
            let upper = coef.ci_upper.expect("upper");
            assert!(approx_eq(lower, coef.estimate - t_crit * se, 1e-6));
            assert!(approx_eq(upper, coef.estimate + t_crit * se, 1e-6));
        }
        // SE(intercept) = s · √(1/5 + 9/10)
        let s = (0.048f64 / 3.0).sqrt();
        let se_intercept = s * (0.2f64 + 0.9).sqrt();
        assert!(approx_eq(fit.intercept.std_error.expect("se"), se_intercept, 1e-12));
    }

    #[test]
    fn coefficient_intervals_follow_confidence() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.1, 3.9, 6.1, 7.9, 10.1];
        let wide = fit_simple_ols_with_confidence(&x, &y, 0.99).expect("fit");
        let narrow = fit_simple_ols_with_confidence(&x, &y, 0.90).expect("fit");
        let width = |c: CoefficientEstimate| c.ci_upper.expect("upper") - c.ci_lower.expect("lower");
        assert!(width(wide.slope) > width(narrow.slope));
        assert_eq!(narrow.confidence_level, 0.90);

        let invalid = fit_simple_ols_with_confidence(&x, &y, 1.5).expect("fit");
        assert!(invalid.slope.ci_lower.is_none());
        assert!(invalid.slope.p_value.is_some());
    }

    #[test]
    fn mean_interval_is_narrowest_at_x_mean() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.1, 3.9, 6.1, 7.9, 10.1];
        let fit = fit_simple_ols(&x, &y).expect("fit");
        let centre = fit.mean_interval(3.0, 0.95).width().expect("width");
        let edge = fit.mean_interval(5.0, 0.95).width().expect("width");
        assert!(centre < edge);
        let band = fit.mean_interval(3.0, 0.95);
        // t_{0.975,3} = 3.182446; SE at x̄ = s/√n
        let s = (0.048f64 / 3.0).sqrt();
        let expected_half = 3.182_446_305 * s / 5.0f64.sqrt();
        assert!(approx_eq(band.upper.expect("upper") - band.mean, expected_half, 1e-6));
    }

    #[test]
    fn exact_fit_has_zero_width_band() {
        let x = [1.0, 2.0, 3.0];
        let y = [5.0, 8.0, 11.0];
        let fit = fit_simple_ols(&x, &y).expect("fit");
        for xi in x {
            let w = fit.mean_interval(xi, 0.95).width().expect("width");
            assert!(w.abs() < 1e-9, "width = {w}");
        }
    }

    #[test]
    fn flat_response_has_undefined_r_squared() {
        let fit = fit_simple_ols(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).expect("fit");
        assert_eq!(fit.r_squared, None);
        assert_eq!(fit.adjusted_r_squared, None);
        assert_eq!(fit.slope.t_value, Some(0.0));
        assert_eq!(fit.f_statistic, Some(0.0));
        assert_eq!(fit.f_p_value, Some(1.0));
    }

    #[test]
    fn overflowing_total_sum_of_squares_has_undefined_r_squared() {
        let fit = fit_simple_ols(&[1.0, 2.0, 3.0], &[-1e308, 1e308, -1e308]).expect("fit");
        assert!(!fit.ss_total.is_finite());
        assert_eq!(fit.r_squared, None);
    }

    #[test]
    fn error_cases() {
        assert_eq!(
            fit_simple_ols(&[1.0], &[2.0]),
            Err(OlsError::TooFewPoints { n: 1 })
        );
        assert_eq!(
            fit_simple_ols(&[1.0, 2.0], &[2.0]),
            Err(OlsError::LengthMismatch { x: 2, y: 1 })
        );
        assert_eq!(
            fit_simple_ols(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]),
            Err(OlsError::ZeroVariance)
        );
        assert_eq!(
            fit_simple_ols(&[1.0, f64::NAN], &[1.0, 2.0]),
            Err(OlsError::NonFinite)
        );
    }

    #[test]
    fn error_display() {
        let msg = OlsError::TooFewPoints { n: 1 }.to_string();
        assert!(msg.contains("at least 2"));
    }
}
