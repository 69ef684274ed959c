#![no_main]
use chrono::{Days, NaiveDate};
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use weightcast_core::{ChartMode, Direction, ForecastCfg, Goal, RawMeasurement, run_forecast};

#[derive(Debug, Arbitrary)]
struct Input {
    start_weight: f64,
    target_weight: f64,
    end_offset: Option<u16>,
    rate_goal: Option<f64>,
    today_offset: u16,
    step_days: u8,
    records: Vec<(u16, f64)>,
}

fn day(offset: u16) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1)
        .and_then(|d| d.checked_add_days(Days::new(u64::from(offset))))
        .unwrap_or(NaiveDate::MIN)
}

fuzz_target!(|input: Input| {
    let mut goal = Goal::new(day(0), input.start_weight, input.target_weight);
    goal.end_date = input.end_offset.map(day);
    goal.weekly_rate_goal = input.rate_goal;
    let cfg = ForecastCfg {
        step_days: u32::from(input.step_days.max(1)),
        ..ForecastCfg::default()
    };
    let records: Vec<RawMeasurement> = input
        .records
        .iter()
        .map(|&(offset, w)| RawMeasurement::kg(day(offset).to_string(), w))
        .collect();

    let out = run_forecast(&records, &goal, day(input.today_offset), &cfg, ChartMode::Full);

    for w in out.points.as_slice().windows(2) {
        assert!(w[0].date < w[1].date, "dates not strictly ascending");
    }
    let direction = goal.direction();
    let forecast: Vec<f64> = out.forecast().map(|s| s.weight).collect();
    for w in forecast.windows(2) {
        assert!(!direction.reverses(w[0], w[1]), "forecast reversed");
    }
    if direction != Direction::Flat {
        assert!(forecast.len() <= cfg.max_steps as usize + 3);
    }
});
