//! Plain-text report in the fixed section order.

use super::{correlation_sentence, fmt_num, fmt_percent, regression_sentence, AnalysisReport};

pub(super) fn render(report: &AnalysisReport) -> String {
    let fit = &report.fit;
    let alpha = report.significance_level;
    let mut out = String::new();

    out.push_str(&format!("levelfit report: {}\n", report.input));
    out.push_str(&format!("Records analysed: {}", report.record_count));
    if report.excluded_records > 0 {
        out.push_str(&format!(
            " ({} excluded with unmapped log levels)",
            report.excluded_records
        ));
    }
    out.push_str("\n\n");

    if let Some(counts) = &report.service_counts {
        out.push_str("Records per Service and LogLevel\n");
        out.push_str(&format!("  {:<20} {:>10} {:>8}\n", "Service", "LogLevel", "count"));
        for c in counts {
            out.push_str(&format!(
                "  {:<20} {:>10} {:>8}\n",
                c.service,
                c.log_level.to_string(),
                c.count
            ));
        }
        out.push('\n');
    }

    out.push_str("Mean TimeTaken by LogLevel\n");
    out.push_str(&format!("  {:>8} {:>14} {:>8}\n", "LogLevel", "TimeTaken", "count"));
    for g in &report.groups {
        out.push_str(&format!(
            "  {:>8} {:>14} {:>8}\n",
            g.log_level,
            fmt_num(Some(g.time_taken)),
            g.count
        ));
    }
    out.push('\n');

    out.push_str("OLS fit: TimeTaken ~ intercept + LogLevel\n");
    out.push_str(&format!(
        "  groups: {}  residual df: {}\n",
        fit.n_groups, fit.df_resid
    ));
    if fit.saturated {
        out.push_str("  saturated fit: standard errors, tests and intervals are undefined\n");
    }
    out.push_str(&format!(
        "  adj. R²: {}  residual std. error: {}  F-statistic: {}\n",
        fmt_num(fit.adjusted_r_squared),
        fmt_num(fit.residual_std_error),
        fmt_num(fit.f_statistic)
    ));
    let percent = fmt_percent(fit.confidence_level);
    out.push_str(&format!("  Coefficients with {}% confidence interval\n", percent));
    out.push_str(&format!(
        "  {:<10} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
        "", "estimate", "std. error", "t", "p", "ci_lower", "ci_upper"
    ));
    for (name, coef) in [("intercept", &fit.intercept), ("LogLevel", &fit.slope)] {
        out.push_str(&format!(
            "  {:<10} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
            name,
            fmt_num(Some(coef.estimate)),
            fmt_num(coef.std_error),
            fmt_num(coef.t_value),
            fmt_num(coef.p_value),
            fmt_num(coef.ci_lower),
            fmt_num(coef.ci_upper)
        ));
    }
    out.push_str(&format!("  Fitted mean with {}% confidence interval\n", percent));
    out.push_str(&format!(
        "  {:>8} {:>14} {:>14} {:>14}\n",
        "LogLevel", "mean", "mean_ci_lower", "mean_ci_upper"
    ));
    for g in &report.groups {
        out.push_str(&format!(
            "  {:>8} {:>14} {:>14} {:>14}\n",
            g.log_level,
            fmt_num(Some(g.mean)),
            fmt_num(g.mean_ci_lower),
            fmt_num(g.mean_ci_upper)
        ));
    }
    out.push('\n');

    out.push_str(&format!("R²: {}\n", fmt_num(fit.r_squared)));
    match &report.correlation {
        Some(c) => out.push_str(&format!(
            "Correlation (r): {} (n = {} records)\n",
            fmt_num(Some(c.r)),
            c.n
        )),
        None => out.push_str("Correlation (r): undefined\n"),
    }
    out.push_str("t-values:\n");
    out.push_str(&format!("  intercept  {}\n", fmt_num(fit.intercept.t_value)));
    out.push_str(&format!("  LogLevel   {}\n", fmt_num(fit.slope.t_value)));
    out.push_str("p-values:\n");
    out.push_str(&format!("  intercept  {}\n", fmt_num(fit.intercept.p_value)));
    out.push_str(&format!("  LogLevel   {}\n", fmt_num(fit.slope.p_value)));
    out.push_str(&format!("F-test p-value: {}\n", fmt_num(fit.f_p_value)));
    out.push_str(&format!(
        "Correlation p-value: {}\n",
        fmt_num(report.correlation.as_ref().map(|c| c.p_value))
    ));
    out.push('\n');

    out.push_str(&regression_sentence(report.verdicts.regression, alpha));
    out.push('\n');
    out.push_str(&correlation_sentence(report.verdicts.correlation, alpha));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    fn position(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("missing {needle:?} in:\n{haystack}"))
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let text = render(&fixtures::report());
        let order = [
            "Records per Service and LogLevel",
            "Mean TimeTaken by LogLevel",
            "OLS fit",
            "R²:",
            "Correlation (r):",
            "t-values:",
            "p-values:",
            "F-test p-value:",
            "Correlation p-value:",
            "The regression model is",
            "The correlation coefficient is",
        ];
        let positions: Vec<usize> = order.iter().map(|n| position(&text, n)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
    }

    #[test]
    fn coefficient_table_has_interval_columns() {
        let report = fixtures::report();
        let text = render(&report);
        assert!(text.contains("Coefficients with 95% confidence interval"));
        let header = text.lines().find(|l| l.contains("std. error")).unwrap();
        assert!(header.contains("ci_lower") && header.contains("ci_upper"));
        let slope = &report.fit.slope;
        let (estimate, lower, upper) = (
            fmt_num(Some(slope.estimate)),
            fmt_num(slope.ci_lower),
            fmt_num(slope.ci_upper),
        );
        assert!(
            text.lines()
                .any(|l| l.contains(&estimate) && l.contains(&lower) && l.contains(&upper)),
            "{text}"
        );
    }

    #[test]
    fn confidence_heading_has_no_float_noise() {
        let mut report = fixtures::report();
        report.fit.confidence_level = 0.9;
        let text = render(&report);
        assert!(text.contains("Fitted mean with 90% confidence interval"), "{text}");
    }

    #[test]
    fn flat_response_renders_undefined_r_squared() {
        let mut report = fixtures::report();
        report.fit.r_squared = None;
        assert!(render(&report).contains("R²: undefined"));
    }

    #[test]
    fn saturated_report_says_undefined() {
        let text = render(&fixtures::saturated_report());
        assert!(text.contains("saturated fit"));
        assert!(text.contains("F-test p-value: undefined"));
        assert!(text.contains("Regression significance is undetermined"));
        assert!(!text.contains("Records per Service"));
        assert!(text.contains("15.000000"));
        assert!(text.contains("40.000000"));
    }
}
