//! Markdown report: the text sections as tables.

use super::{correlation_sentence, fmt_num, fmt_percent, regression_sentence, AnalysisReport};

pub(super) fn render(report: &AnalysisReport) -> String {
    let fit = &report.fit;
    let alpha = report.significance_level;
    let mut out = String::new();

    out.push_str(&format!("# levelfit report: `{}`\n\n", report.input));
    out.push_str(&format!(
        "Run `{}`, {} record(s) analysed",
        report.run_id, report.record_count
    ));
    if report.excluded_records > 0 {
        out.push_str(&format!(
            ", {} excluded with unmapped log levels",
            report.excluded_records
        ));
    }
    out.push_str(".\n\n");

    if let Some(counts) = &report.service_counts {
        out.push_str("## Records per Service and LogLevel\n\n");
        out.push_str("| Service | LogLevel | count |\n|---|---:|---:|\n");
        for c in counts {
            out.push_str(&format!("| {} | {} | {} |\n", c.service, c.log_level, c.count));
        }
        out.push('\n');
    }

    out.push_str("## Mean TimeTaken by LogLevel\n\n");
    out.push_str("| LogLevel | TimeTaken | count |\n|---:|---:|---:|\n");
    for g in &report.groups {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            g.log_level,
            fmt_num(Some(g.time_taken)),
            g.count
        ));
    }
    out.push('\n');

    out.push_str("## OLS fit: TimeTaken ~ intercept + LogLevel\n\n");
    out.push_str(&format!(
        "Groups: {}, residual df: {}, adj. R²: {}, F-statistic: {}.\n\n",
        fit.n_groups,
        fit.df_resid,
        fmt_num(fit.adjusted_r_squared),
        fmt_num(fit.f_statistic)
    ));
    if fit.saturated {
        out.push_str("> Saturated fit: standard errors, tests and intervals are undefined.\n\n");
    }
    let percent = fmt_percent(fit.confidence_level);
    out.push_str(&format!(
        "| term | estimate | std. error | t | p | {p}% CI lower | {p}% CI upper |\n\
         |---|---:|---:|---:|---:|---:|---:|\n",
        p = percent
    ));
    for (name, coef) in [("intercept", &fit.intercept), ("LogLevel", &fit.slope)] {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            name,
            fmt_num(Some(coef.estimate)),
            fmt_num(coef.std_error),
            fmt_num(coef.t_value),
            fmt_num(coef.p_value),
            fmt_num(coef.ci_lower),
            fmt_num(coef.ci_upper)
        ));
    }
    out.push('\n');
    out.push_str(&format!(
        "| LogLevel | mean | {p}% CI lower | {p}% CI upper |\n|---:|---:|---:|---:|\n",
        p = percent
    ));
    for g in &report.groups {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            g.log_level,
            fmt_num(Some(g.mean)),
            fmt_num(g.mean_ci_lower),
            fmt_num(g.mean_ci_upper)
        ));
    }
    out.push('\n');

    let corr_r = report.correlation.as_ref().map(|c| c.r);
    let corr_p = report.correlation.as_ref().map(|c| c.p_value);
    out.push_str("## Statistics\n\n| statistic | value |\n|---|---:|\n");
    out.push_str(&format!("| R² | {} |\n", fmt_num(fit.r_squared)));
    out.push_str(&format!("| correlation r | {} |\n", fmt_num(corr_r)));
    out.push_str(&format!("| t (intercept) | {} |\n", fmt_num(fit.intercept.t_value)));
    out.push_str(&format!("| t (LogLevel) | {} |\n", fmt_num(fit.slope.t_value)));
    out.push_str(&format!("| p (intercept) | {} |\n", fmt_num(fit.intercept.p_value)));
    out.push_str(&format!("| p (LogLevel) | {} |\n", fmt_num(fit.slope.p_value)));
    out.push_str(&format!("| F-test p | {} |\n", fmt_num(fit.f_p_value)));
    out.push_str(&format!("| correlation p | {} |\n\n", fmt_num(corr_p)));

    out.push_str("## Verdicts\n\n");
    out.push_str(&format!(
        "- {}\n- {}\n",
        regression_sentence(report.verdicts.regression, alpha),
        correlation_sentence(report.verdicts.correlation, alpha)
    ));
    out
}
