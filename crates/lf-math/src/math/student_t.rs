//! Student t distribution.
//!
//! Tail probabilities go through the regularized incomplete beta function:
//! P(|T| > t) = I_{df/(df+t²)}(df/2, 1/2).

use super::beta::regularized_incomplete_beta;

const QUANTILE_MAX_ITERS: usize = 300;
const QUANTILE_REL_TOL: f64 = 1e-13;
const QUANTILE_BRACKET_LIMIT: f64 = 1e12;

/// Upper tail P(T > t) for t >= 0.
fn upper_tail(t: f64, df: f64) -> f64 {
    if t.is_infinite() {
        return 0.0;
    }
    let x = df / (df + t * t);
    0.5 * regularized_incomplete_beta(x, 0.5 * df, 0.5)
}

fn invalid(value: f64, df: f64) -> bool {
    value.is_nan() || df.is_nan() || df <= 0.0
}

/// CDF of the Student t distribution with `df` degrees of freedom.
pub fn student_t_cdf(t: f64, df: f64) -> f64 {
    if invalid(t, df) {
        return f64::NAN;
    }
    let tail = upper_tail(t.abs(), df);
    if t >= 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Two-sided p-value P(|T| >= |t|).
///
/// Infinite statistics (an exact fit) map to 0.
pub fn student_t_two_sided_p(t: f64, df: f64) -> f64 {
    if invalid(t, df) {
        return f64::NAN;
    }
    (2.0 * upper_tail(t.abs(), df)).min(1.0)
}

/// Quantile function (inverse CDF) of the Student t distribution.
///
/// Solved by bracketing and bisection on the upper tail, which avoids the
/// cancellation in `1 - cdf` for the 0.975-style probabilities used by
/// confidence intervals.
pub fn student_t_inv_cdf(p: f64, df: f64) -> f64 {
    if invalid(p, df) {
        return f64::NAN;
    }
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    if p == 0.5 {
        return 0.0;
    }
    if p < 0.5 {
        return -student_t_inv_cdf(1.0 - p, df);
    }

    let target = 1.0 - p;
    let mut low = 0.0;
    let mut high = 1.0;
    while upper_tail(high, df) > target {
        low = high;
        high *= 2.0;
        if high > QUANTILE_BRACKET_LIMIT {
            return f64::INFINITY;
        }
    }

    for _ in 0..QUANTILE_MAX_ITERS {
        let mid = 0.5 * (low + high);
        if upper_tail(mid, df) > target {
            low = mid;
        } else {
            high = mid;
        }
        if high - low <= QUANTILE_REL_TOL * high.max(1.0) {
            break;
        }
    }
    0.5 * (low + high)
}

/// Critical value t_{1-α/2, df} for a two-sided interval at `confidence`.
pub fn student_t_critical(confidence: f64, df: f64) -> f64 {
    if confidence.is_nan() || confidence <= 0.0 || confidence >= 1.0 {
        return f64::NAN;
    }
    student_t_inv_cdf(0.5 + 0.5 * confidence, df)
}
