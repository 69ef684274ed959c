use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use weightcast_core::{
    ChartMode, Direction, ForecastCfg, Goal, RawMeasurement, Termination, run_forecast,
};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    base().checked_add_days(Days::new(offset)).unwrap()
}

prop_compose! {
    fn records_strategy()(
        entries in prop::collection::vec((0u64..90, 40.0f64..160.0), 0..40),
    ) -> Vec<RawMeasurement> {
        entries
            .into_iter()
            .map(|(offset, kg)| RawMeasurement::kg(day(offset).to_string(), kg))
            .collect()
    }
}

prop_compose! {
    fn goal_strategy()(
        start in 40.0f64..160.0,
        target in 40.0f64..160.0,
        end in prop::option::of(1u64..400),
        rate in prop::option::of(0.05f64..2.0),
    ) -> Goal {
        let mut g = Goal::new(base(), start, target);
        g.end_date = end.map(day);
        g.weekly_rate_goal = rate;
        g
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn output_is_one_sample_per_day_in_order(records in records_strategy(), goal in goal_strategy()) {
        let out = run_forecast(&records, &goal, day(90), &ForecastCfg::default(), ChartMode::Full);
        for w in out.points.as_slice().windows(2) {
            prop_assert!(w[0].date < w[1].date);
        }
        // Forecast never precedes the last actual sample.
        if let (Some(last_actual), Some(first_forecast)) = (out.actual().last(), out.forecast().next()) {
            prop_assert!(first_forecast.date > last_actual.date);
        }
    }

    #[test]
    fn forecast_never_reverses_the_goal_direction(records in records_strategy(), goal in goal_strategy()) {
        let out = run_forecast(&records, &goal, day(90), &ForecastCfg::default(), ChartMode::Full);
        let forecast: Vec<f64> = out.forecast().map(|s| s.weight).collect();
        let direction = goal.direction();
        for w in forecast.windows(2) {
            prop_assert!(!direction.reverses(w[0], w[1]), "{} -> {}", w[0], w[1]);
        }
        // Never overshoots the target.
        for &w in &forecast {
            match direction {
                Direction::Loss => prop_assert!(w >= goal.target_weight - 1e-9),
                Direction::Gain => prop_assert!(w <= goal.target_weight + 1e-9),
                Direction::Flat => {}
            }
        }
    }

    #[test]
    fn forecast_stays_within_the_horizon(records in records_strategy(), goal in goal_strategy()) {
        let out = run_forecast(&records, &goal, day(90), &ForecastCfg::default(), ChartMode::Full);
        if let Some(h) = out.horizon {
            prop_assert!(out.forecast().all(|s| s.date <= h));
        }
    }

    #[test]
    fn same_input_same_output(records in records_strategy(), goal in goal_strategy()) {
        let cfg = ForecastCfg::default();
        let a = run_forecast(&records, &goal, day(90), &cfg, ChartMode::Full);
        let b = run_forecast(&records, &goal, day(90), &cfg, ChartMode::Full);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn step_cap_bounds_output(records in records_strategy(), goal in goal_strategy(), cap in 1u32..12) {
        let cfg = ForecastCfg { max_steps: cap, ..ForecastCfg::default() };
        let out = run_forecast(&records, &goal, day(90), &cfg, ChartMode::Full);
        let n = out.forecast().count();
        prop_assert!(n <= cap as usize + 3, "{n} forecast points with cap {cap}");
        if out.status.termination() == Some(Termination::IterationCap) {
            prop_assert!(n <= cap as usize);
        }
    }
}
