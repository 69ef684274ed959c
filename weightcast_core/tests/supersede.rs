use std::sync::{Arc, Barrier};
use std::thread;

use chrono::NaiveDate;
use weightcast_core::{ForecastResult, Forecaster, Goal, LatestOnly, RawMeasurement};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, day).unwrap()
}

#[test]
fn newest_ticket_wins_across_threads() {
    let gate = Arc::new(LatestOnly::<u64>::new());
    let tickets: Vec<_> = (0..8).map(|_| gate.issue()).collect();
    let newest = *tickets.last().unwrap();
    let barrier = Arc::new(Barrier::new(tickets.len()));

    let handles: Vec<_> = tickets
        .into_iter()
        .rev()
        .map(|t| {
            let gate = Arc::clone(&gate);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                gate.publish(t, t.sequence())
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(gate.held(), Some(newest));
    assert_eq!(gate.latest(), Some(newest.sequence()));
}

#[test]
fn slow_stale_forecast_cannot_replace_a_fresh_one() {
    let forecaster = Forecaster::builder()
        .with_goal(Goal::new(d(1), 100.0, 90.0))
        .build()
        .unwrap();
    let gate: LatestOnly<ForecastResult> = LatestOnly::new();

    let stale = gate.issue();
    let old_data = [RawMeasurement::kg("2026-04-01", 100.0)];

    let fresh = gate.issue();
    let new_data = [
        RawMeasurement::kg("2026-04-01", 100.0),
        RawMeasurement::kg("2026-04-08", 99.0),
    ];
    let fresh_out = forecaster.forecast_on(&new_data, d(10));
    assert!(gate.publish(fresh, fresh_out.clone()));

    let stale_out = forecaster.forecast_on(&old_data, d(10));
    assert!(!gate.publish(stale, stale_out));
    assert_eq!(gate.latest(), Some(fresh_out));
}
