//! One-line summary.

use super::{fmt_num, AnalysisReport};

pub(super) fn render(report: &AnalysisReport) -> String {
    let fit = &report.fit;
    format!(
        "levels={} slope={} r2={} f_p={} verdict={} r={} corr_p={} corr_verdict={}",
        report.groups.len(),
        fmt_num(Some(fit.slope.estimate)),
        fmt_num(fit.r_squared),
        fmt_num(fit.f_p_value),
        report.verdicts.regression,
        fmt_num(report.correlation.as_ref().map(|c| c.r)),
        fmt_num(report.correlation.as_ref().map(|c| c.p_value)),
        report.verdicts.correlation
    )
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    #[test]
    fn saturated_summary_line() {
        let line = render(&fixtures::saturated_report());
        assert!(line.starts_with("levels=2 slope=8.333333 r2=1.000000 f_p=undefined verdict=undetermined"));
        assert!(!line.contains('\n'));
    }
}
