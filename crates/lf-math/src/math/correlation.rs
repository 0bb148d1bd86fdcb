//! Pearson product-moment correlation with a two-sided significance test.

use serde::{Deserialize, Serialize};

use super::stable::mean;
use super::student_t::student_t_two_sided_p;

/// Pearson correlation coefficient and its significance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    /// r in [-1, 1].
    pub r: f64,
    /// Two-sided p-value for H₀: ρ = 0, using t = r·√((n−2)/(1−r²)).
    pub p_value: f64,
    /// Number of (x, y) pairs.
    pub n: usize,
}

/// Computes Pearson's r and its p-value.
///
/// Returns `None` when the slices differ in length, hold fewer than two
/// pairs or non-finite values, or either variable is constant. With exactly
/// two pairs r is ±1 and the p-value is 1, since there are no degrees of
/// freedom left to test against.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<Correlation> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let x_mean = mean(x)?;
    let y_mean = mean(y)?;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }

    let r = (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0);
    let p_value = if n == 2 {
        1.0
    } else {
        let df = (n - 2) as f64;
        let denom = 1.0 - r * r;
        if denom <= 0.0 {
            0.0
        } else {
            student_t_two_sided_p(r * (df / denom).sqrt(), df)
        }
    };

    Some(Correlation { r, p_value, n })
}
