//! Property-based tests for aggregation and fitting invariants.

use lf_core::pipeline::{fit_groups, group_means, LevelSample};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn samples_strategy() -> impl Strategy<Value = Vec<LevelSample>> {
    prop::collection::vec((1u8..=5, 0.0f64..1000.0), 0..60).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (level, time_taken))| LevelSample {
                row: i + 1,
                level,
                time_taken,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn one_group_per_distinct_level(samples in samples_strategy()) {
        let groups = group_means(&samples);
        let distinct: BTreeSet<u8> = samples.iter().map(|s| s.level).collect();
        let grouped: Vec<u8> = groups.iter().map(|g| g.log_level).collect();
        prop_assert_eq!(grouped, distinct.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn group_totals_preserve_the_sum(samples in samples_strategy()) {
        let groups = group_means(&samples);
        let total: f64 = samples.iter().map(|s| s.time_taken).sum();
        let regrouped: f64 = groups.iter().map(|g| g.time_taken * g.count as f64).sum();
        prop_assert!((total - regrouped).abs() <= 1e-9 * total.abs().max(1.0));
        prop_assert_eq!(groups.iter().map(|g| g.count).sum::<usize>(), samples.len());
    }

    #[test]
    fn exact_lines_are_recovered(
        a in -100.0f64..100.0,
        b in prop_oneof![-50.0f64..-0.5, 0.5f64..50.0],
        levels in prop::collection::btree_set(1u8..=5, 2..=5),
    ) {
        let samples: Vec<LevelSample> = levels
            .iter()
            .enumerate()
            .map(|(i, &level)| LevelSample {
                row: i + 1,
                level,
                time_taken: a + b * f64::from(level),
            })
            .collect();
        let groups = group_means(&samples);
        let (fit, fitted) = fit_groups(&groups, 0.95).unwrap();

        prop_assert!((fit.intercept.estimate - a).abs() < 1e-8);
        prop_assert!((fit.slope.estimate - b).abs() < 1e-8);
        prop_assert!((fit.r_squared.unwrap() - 1.0).abs() < 1e-8);
        for g in &fitted {
            prop_assert!((g.mean - g.time_taken).abs() < 1e-8);
            if let (Some(lo), Some(hi)) = (g.mean_ci_lower, g.mean_ci_upper) {
                prop_assert!(hi - lo < 1e-6);
            }
        }
        prop_assert_eq!(fit.saturated, levels.len() == 2);
    }

    #[test]
    fn fewer_than_two_groups_never_fit(level in 1u8..=5, values in prop::collection::vec(0.0f64..100.0, 1..10)) {
        let samples: Vec<LevelSample> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| LevelSample { row: i + 1, level, time_taken: v })
            .collect();
        prop_assert!(fit_groups(&group_means(&samples), 0.95).is_err());
    }
}
