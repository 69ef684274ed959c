//! Rate estimator: initial weekly trend and its alignment with the goal.

use serde::Serialize;

use crate::config::ForecastCfg;
use crate::types::{Direction, Sample, Series};
use crate::util::weeks_between;

/// How the observed trend relates to the goal's direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Trend moves toward the target.
    Aligned,
    /// Trend moves away from the target.
    Opposed,
    /// No measurable trend.
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateEstimate {
    /// Signed weekly rate in kilograms per week.
    pub rate: f64,
    /// Direction of the observed trend.
    pub direction: Direction,
    pub alignment: Alignment,
}

impl RateEstimate {
    pub fn opposes_goal(&self) -> bool {
        self.alignment == Alignment::Opposed
    }
}

/// Estimate the weekly trend of `series` and classify it against `goal_direction`.
///
/// With two or more samples the estimate is a recency-weighted mean of the
/// per-week slope of each consecutive transition (transition `i` weighs
/// `recency_base^i`). Otherwise, or when that mean is not finite, the simple
/// first-to-last slope is used.
pub fn estimate_rate(series: &Series, goal_direction: Direction, cfg: &ForecastCfg) -> RateEstimate {
    let samples = series.as_slice();
    let rate = recency_weighted_rate(samples, cfg.recency_base)
        .unwrap_or_else(|| simple_slope(samples));
    let direction = Direction::of_change(rate, cfg.flat_epsilon);
    let alignment = match direction {
        Direction::Flat => Alignment::Flat,
        d if d == goal_direction => Alignment::Aligned,
        _ => Alignment::Opposed,
    };
    tracing::debug!(rate, ?direction, ?alignment, "estimated weekly rate");
    RateEstimate {
        rate,
        direction,
        alignment,
    }
}

/// `Σ(slope_i · base^i) / Σ(base^i)` over consecutive transitions.
///
/// Weights are shifted so the most recent transition weighs 1; the ratio is
/// unchanged and long series cannot overflow.
fn recency_weighted_rate(samples: &[Sample], base: f64) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let last = samples.len() - 2;
    let mut num = 0.0f64;
    let mut den = 0.0f64;
    for (i, pair) in samples.windows(2).enumerate() {
        let weeks = weeks_between(pair[0].date, pair[1].date);
        if weeks <= 0.0 {
            continue;
        }
        let slope = (pair[1].weight - pair[0].weight) / weeks;
        let w = base.powi(i as i32 - last as i32);
        num += slope * w;
        den += w;
    }
    let rate = num / den;
    rate.is_finite().then_some(rate)
}

/// `(last - first) / weeks`, with a zero span treated as one week.
fn simple_slope(samples: &[Sample]) -> f64 {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return 0.0;
    };
    let mut weeks = weeks_between(first.date, last.date);
    if weeks == 0.0 {
        weeks = 1.0;
    }
    let rate = (last.weight - first.weight) / weeks;
    if rate.is_finite() { rate } else { 0.0 }
}
