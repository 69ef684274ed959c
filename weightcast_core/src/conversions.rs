//! `From` implementations bridging `weightcast_config` types to `weightcast_core` types.

use crate::config::{CurveCfg, ForecastCfg};
use crate::error::ForecastError;
use crate::types::{Goal, RawMeasurement, WeightUnit};

// ── Units ────────────────────────────────────────────────────────────────────

impl From<weightcast_config::UnitCfg> for WeightUnit {
    fn from(u: weightcast_config::UnitCfg) -> Self {
        match u {
            weightcast_config::UnitCfg::Kg => Self::Kg,
            weightcast_config::UnitCfg::Lb => Self::Lb,
        }
    }
}

// ── ForecastCfg ──────────────────────────────────────────────────────────────

impl From<&weightcast_config::CurveCfg> for CurveCfg {
    fn from(c: &weightcast_config::CurveCfg) -> Self {
        Self {
            decay_base: c.decay_base,
            decay_smoothing: c.decay_smoothing,
            taper_threshold: c.taper_threshold,
            taper_exponent: c.taper_exponent,
        }
    }
}

impl From<&weightcast_config::ForecastCfg> for ForecastCfg {
    fn from(c: &weightcast_config::ForecastCfg) -> Self {
        Self {
            sustainable_rate: c.sustainable_rate_kg_per_week,
            recency_base: c.recency_base,
            flat_epsilon: c.flat_rate_epsilon_kg_per_week,
            step_days: c.step_days,
            buffer_days: c.buffer_days,
            max_steps: c.max_steps,
            max_horizon_days: c.max_horizon_days,
            convergence_epsilon: c.convergence_epsilon_kg,
            converging_after: c.converging_after,
            terminal_tolerance: c.terminal_tolerance_kg,
            curve: (&c.curve).into(),
        }
    }
}

// ── Goal ─────────────────────────────────────────────────────────────────────

/// Goals from the config file are canonicalized to kilograms.
impl From<&weightcast_config::GoalCfg> for Goal {
    fn from(g: &weightcast_config::GoalCfg) -> Self {
        Goal {
            start_date: g.start_date,
            end_date: g.end_date,
            start_weight: g.start_weight,
            target_weight: g.target_weight,
            weekly_rate_goal: g.weekly_rate_goal,
        }
        .canonicalize(g.unit.into())
    }
}

// ── Measurements ─────────────────────────────────────────────────────────────

impl TryFrom<&weightcast_config::MeasurementRow> for RawMeasurement {
    type Error = ForecastError;

    fn try_from(row: &weightcast_config::MeasurementRow) -> Result<Self, Self::Error> {
        let unit = match row.unit.as_deref() {
            Some(u) => u.parse::<WeightUnit>()?,
            None => WeightUnit::Kg,
        };
        Ok(RawMeasurement::new(row.date.clone(), row.weight, unit))
    }
}

/// Convert CSV rows, skipping (and logging) rows with an unknown unit.
pub fn measurements_from_rows(rows: &[weightcast_config::MeasurementRow]) -> Vec<RawMeasurement> {
    rows.iter()
        .enumerate()
        .filter_map(|(idx, row)| match RawMeasurement::try_from(row) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(row = idx, error = %e, "skipping measurement with unknown unit");
                None
            }
        })
        .collect()
}
