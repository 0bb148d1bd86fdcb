//! Fisher-Snedecor F distribution.

use super::beta::regularized_incomplete_beta;

/// Survival function P(F > f) for F(d1, d2).
///
/// Uses P(F > f) = I_{d2/(d2 + d1 f)}(d2/2, d1/2). An infinite statistic
/// (zero residual variance with a nonzero fit) maps to 0.
pub fn fisher_f_sf(f: f64, d1: f64, d2: f64) -> f64 {
    if f.is_nan() || d1.is_nan() || d2.is_nan() {
        return f64::NAN;
    }
    if d1 <= 0.0 || d2 <= 0.0 {
        return f64::NAN;
    }
    if f <= 0.0 {
        return 1.0;
    }
    if f.is_infinite() {
        return 0.0;
    }
    let x = d2 / (d2 + d1 * f);
    regularized_incomplete_beta(x, 0.5 * d2, 0.5 * d1)
}

/// CDF P(F <= f) for F(d1, d2).
pub fn fisher_f_cdf(f: f64, d1: f64, d2: f64) -> f64 {
    let sf = fisher_f_sf(f, d1, d2);
    if sf.is_nan() {
        return f64::NAN;
    }
    1.0 - sf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::student_t::student_t_two_sided_p;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn one_numerator_df_matches_t_squared() {
        // F(1, d) is the square of t(d).
        let t: f64 = 2.5;
        let df = 8.0;
        let via_f = fisher_f_sf(t * t, 1.0, df);
        let via_t = student_t_two_sided_p(t, df);
        assert!(approx_eq(via_f, via_t, 1e-12), "F: {via_f}, t: {via_t}");
    }

    #[test]
    fn critical_value_from_tables() {
        // F_{0.95}(1, 10) = 4.964603
        let sf = fisher_f_sf(4.964_603, 1.0, 10.0);
        assert!(approx_eq(sf, 0.05, 1e-6), "sf = {sf}");
    }

    #[test]
    fn cdf_plus_sf_is_one() {
        let f = 1.7;
        assert!(approx_eq(fisher_f_cdf(f, 3.0, 12.0) + fisher_f_sf(f, 3.0, 12.0), 1.0, 1e-15));
    }

    #[test]
    fn edges() {
        assert_eq!(fisher_f_sf(0.0, 1.0, 5.0), 1.0);
        assert_eq!(fisher_f_sf(f64::INFINITY, 1.0, 5.0), 0.0);
        assert!(fisher_f_sf(1.0, 1.0, 0.0).is_nan());
        assert!(fisher_f_cdf(f64::NAN, 1.0, 3.0).is_nan());
    }
}
