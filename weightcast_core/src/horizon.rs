//! Target/end-date resolver.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::ForecastCfg;
use crate::generator::settling_days;
use crate::rate::{Alignment, RateEstimate};
use crate::types::{Goal, Sample};
use crate::util::{DAYS_PER_WEEK, add_days, days_between};

/// What bounds the forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizonBound {
    /// A user-specified end date that comes before the rate-implied date.
    Deadline,
    /// The rate-implied date by which the target should be reached.
    Projected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Horizon {
    pub date: NaiveDate,
    pub bound: HorizonBound,
    /// Rate-implied target-reaching date (buffer included).
    pub projected: NaiveDate,
}

/// Rates the forecast curve is planned with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePlan {
    /// Weekly magnitude used by the horizon formula.
    pub planning_rate: f64,
    /// Signed weekly rate the curve starts from.
    pub initial_rate: f64,
    /// Signed weekly rate the curve decays toward.
    pub sustainable_rate: f64,
}

pub fn plan_curve(goal: &Goal, estimate: &RateEstimate, cfg: &ForecastCfg) -> CurvePlan {
    let planning = planning_rate(goal, estimate, cfg);
    let sign = goal.direction().sign();
    let initial_rate = match estimate.alignment {
        Alignment::Aligned => estimate.rate,
        // A flat trend starts from the planning rate instead of standing still.
        Alignment::Flat | Alignment::Opposed => sign * planning,
    };
    CurvePlan {
        planning_rate: planning,
        initial_rate,
        sustainable_rate: sign * cfg.sustainable_rate,
    }
}

/// Weekly rate magnitude used to size the horizon: the goal's own rate when
/// set, otherwise the observed trend, otherwise the sustainable rate.
pub fn planning_rate(goal: &Goal, estimate: &RateEstimate, cfg: &ForecastCfg) -> f64 {
    if let Some(rate) = goal.usable_rate_goal() {
        return rate;
    }
    if let Some(rate) = goal.weekly_rate_goal {
        tracing::warn!(rate, "ignoring unusable weekly rate goal");
    }
    match estimate.alignment {
        Alignment::Aligned => estimate.rate.abs(),
        Alignment::Flat | Alignment::Opposed => cfg.sustainable_rate,
    }
}

/// `ceil(remaining / weekly_rate * 7) + buffer_days` after `from`, capped at
/// `max_horizon_days`. A zero or non-finite rate maps to the cap.
pub fn projected_date(from: NaiveDate, remaining: f64, weekly_rate: f64, cfg: &ForecastCfg) -> NaiveDate {
    let cap = u64::from(cfg.max_horizon_days);
    let days = if weekly_rate.is_finite() && weekly_rate > f64::EPSILON && remaining.is_finite() {
        let needed = (remaining.abs() / weekly_rate * DAYS_PER_WEEK).ceil();
        let total = needed + f64::from(cfg.buffer_days);
        if total >= cap as f64 { cap } else { total as u64 }
    } else {
        cap
    };
    add_days(from, days.max(1))
}

/// Resolve the forecast horizon from the goal and the last actual sample.
///
/// The rate-implied date is the formula date, pushed out to the shortest span
/// over which the decaying, tapered curve reaches the target on its own (still
/// capped at `max_horizon_days`). An explicit end date bounds the forecast
/// unless the rate-implied date comes first; the engine never projects past
/// the point the goal should be reached.
pub fn resolve_horizon(goal: &Goal, last: &Sample, plan: &CurvePlan, cfg: &ForecastCfg) -> Horizon {
    let remaining = (last.weight - goal.target_weight).abs();
    let rate = plan.planning_rate;
    let formula = projected_date(last.date, remaining, rate, cfg);
    let min_days = days_between(last.date, formula).max(0) as u64;
    let max_days = u64::from(cfg.max_horizon_days).max(min_days);
    let days = settling_days(*last, goal.target_weight, plan, min_days..=max_days, cfg);
    let projected = add_days(last.date, days);
    let horizon = match goal.end_date {
        Some(end) if end < projected => Horizon {
            date: end,
            bound: HorizonBound::Deadline,
            projected,
        },
        _ => Horizon {
            date: projected,
            bound: HorizonBound::Projected,
            projected,
        },
    };
    tracing::debug!(
        rate,
        remaining,
        %formula,
        horizon = %horizon.date,
        bound = ?horizon.bound,
        "resolved horizon"
    );
    horizon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn aligned(rate: f64) -> RateEstimate {
        RateEstimate {
            rate,
            direction: Direction::of_change(rate, 0.0),
            alignment: Alignment::Aligned,
        }
    }

    fn resolve(goal: &Goal, rate: f64, cfg: &ForecastCfg) -> Horizon {
        let plan = plan_curve(goal, &aligned(rate), cfg);
        resolve_horizon(goal, &Sample::actual(d(1, 15), 96.0), &plan, cfg)
    }

    #[test]
    fn derived_horizon_adds_buffer() {
        let cfg = ForecastCfg::default();
        // 16 kg at 2 kg/week = 56 days, + 14 buffer
        let got = projected_date(d(1, 1), 16.0, 2.0, &cfg);
        assert_eq!(got, add_days(d(1, 1), 70));
    }

    #[test]
    fn zero_rate_maps_to_cap() {
        let cfg = ForecastCfg::default();
        assert_eq!(projected_date(d(1, 1), 16.0, 0.0, &cfg), add_days(d(1, 1), 730));
        assert_eq!(projected_date(d(1, 1), 16.0, f64::NAN, &cfg), add_days(d(1, 1), 730));
    }

    #[test]
    fn earlier_deadline_wins() {
        let cfg = ForecastCfg::default();
        let goal = Goal::new(d(1, 1), 100.0, 80.0).with_end_date(d(2, 1));
        let h = resolve(&goal, -2.0, &cfg);
        assert_eq!(h.date, d(2, 1));
        assert_eq!(h.bound, HorizonBound::Deadline);
        assert!(h.projected > h.date);
    }

    #[test]
    fn later_deadline_yields_projected_date() {
        let cfg = ForecastCfg::default();
        let goal = Goal::new(d(1, 1), 100.0, 80.0).with_end_date(d(12, 1));
        let h = resolve(&goal, -2.0, &cfg);
        assert_eq!(h.bound, HorizonBound::Projected);
        assert_eq!(h.date, h.projected);
    }

    #[test]
    fn projected_horizon_leaves_room_for_the_decaying_curve() {
        let cfg = ForecastCfg::default();
        let goal = Goal::new(d(1, 1), 100.0, 80.0);
        let h = resolve(&goal, -2.0, &cfg);
        // The formula alone gives 70 days; the curve slows toward 0.9 kg/week.
        assert!(h.date > add_days(d(1, 15), 70), "{}", h.date);
        assert!(h.date <= add_days(d(1, 15), 730));
    }

    #[test]
    fn deadline_between_formula_and_curve_dates_still_binds() {
        let cfg = ForecastCfg::default();
        let goal = Goal::new(d(1, 1), 100.0, 80.0).with_end_date(add_days(d(1, 15), 75));
        let h = resolve(&goal, -2.0, &cfg);
        assert_eq!(h.bound, HorizonBound::Deadline);
        assert_eq!(h.date, add_days(d(1, 15), 75));
    }

    #[test]
    fn flat_trend_plans_from_the_goal_rate() {
        let cfg = ForecastCfg::default();
        let goal = Goal::new(d(1, 1), 100.0, 80.0).with_weekly_rate_goal(0.5);
        let flat = RateEstimate {
            rate: 0.0,
            direction: Direction::Flat,
            alignment: Alignment::Flat,
        };
        let plan = plan_curve(&goal, &flat, &cfg);
        assert_eq!(plan.initial_rate, -0.5);
        assert_eq!(plan.sustainable_rate, -0.9);
    }

    #[test]
    fn rate_goal_overrides_trend_for_planning() {
        let cfg = ForecastCfg::default();
        let goal = Goal::new(d(1, 1), 100.0, 80.0).with_weekly_rate_goal(0.5);
        assert_eq!(planning_rate(&goal, &aligned(-2.0), &cfg), 0.5);
        let plain = Goal::new(d(1, 1), 100.0, 80.0);
        assert_eq!(planning_rate(&plain, &aligned(-2.0), &cfg), 2.0);
    }
}
