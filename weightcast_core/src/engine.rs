//! The forecasting pipeline and the `Forecaster` front end.
//!
//! Normalizer -> rate estimator -> horizon resolver -> point generator ->
//! monotonicity enforcer -> chart assembler. Every stage is a pure function;
//! `run_forecast` never fails for degenerate data and reports why it skipped
//! the forecast through `ForecastStatus` instead.

use chrono::NaiveDate;
use weightcast_traits::Calendar;

use crate::builder::{ForecasterBuilder, Missing};
use crate::chart::{ChartMode, assemble};
use crate::config::ForecastCfg;
use crate::generator::{GeneratorParams, generate};
use crate::horizon::{HorizonBound, plan_curve, resolve_horizon};
use crate::monotonic::{Terminal, enforce_monotonic};
use crate::normalize::{Normalized, normalize};
use crate::rate::estimate_rate;
use crate::status::{ForecastStatus, SkipReason, Termination};
use crate::types::{Direction, ForecastResult, Goal, RawMeasurement, Series, WeightUnit};

/// Run the whole pipeline for one goal. `goal` must be in kilograms.
pub fn run_forecast(
    records: &[RawMeasurement],
    goal: &Goal,
    today: NaiveDate,
    cfg: &ForecastCfg,
    mode: ChartMode,
) -> ForecastResult {
    let Normalized {
        series, measured, ..
    } = normalize(records, goal, today);

    if let Err(e) = goal.validate() {
        tracing::warn!(error = %e, "goal is unusable; returning actual data only");
        return actual_only(series, SkipReason::InvalidGoal, None, None, mode);
    }
    let goal_direction = goal.direction();
    if goal_direction == Direction::Flat {
        return actual_only(series, SkipReason::NoChange, None, None, mode);
    }
    if measured < 2 {
        tracing::debug!(measured, "not enough measurements to forecast");
        return actual_only(series, SkipReason::InsufficientData, None, None, mode);
    }
    let Some(last) = series.last().copied() else {
        return actual_only(series, SkipReason::InsufficientData, None, None, mode);
    };

    let estimate = estimate_rate(&series, goal_direction, cfg);

    if let Some(reached) = first_reaching(&series, goal) {
        tracing::debug!(%reached, "target already reached by actual data");
        return ForecastResult {
            target_date: Some(reached),
            ..actual_only(
                series,
                SkipReason::AlreadyReached,
                Some(estimate.rate),
                None,
                mode,
            )
        };
    }
    if estimate.opposes_goal() {
        tracing::info!(
            rate = estimate.rate,
            goal = ?goal_direction,
            "trend moves away from the target; not forecasting"
        );
        return actual_only(
            series,
            SkipReason::NonConvergent,
            Some(estimate.rate),
            None,
            mode,
        );
    }

    let plan = plan_curve(goal, &estimate, cfg);
    let horizon = resolve_horizon(goal, &last, &plan, cfg);
    if horizon.date <= last.date {
        return actual_only(
            series,
            SkipReason::HorizonElapsed,
            Some(estimate.rate),
            Some(horizon.date),
            mode,
        );
    }

    let raw = generate(
        GeneratorParams {
            start: last,
            target: goal.target_weight,
            initial_rate: plan.initial_rate,
            sustainable_rate: plan.sustainable_rate,
            horizon,
        },
        cfg,
    );

    let terminal = match (raw.termination, horizon.bound) {
        (Termination::Converged, _) => raw.points.last().map(|p| Terminal {
            date: p.date,
            weight: goal.target_weight,
        }),
        (Termination::Horizon, HorizonBound::Projected) => Some(Terminal {
            date: horizon.date,
            weight: goal.target_weight,
        }),
        _ => None,
    };
    let target_date = terminal.map(|t| raw.reached.unwrap_or(t.date));
    let forecast = enforce_monotonic(raw.points, goal_direction, terminal, cfg.terminal_tolerance);

    ForecastResult {
        points: assemble(&series, &forecast, mode),
        target_date,
        horizon: Some(horizon.date),
        rate_per_week: Some(estimate.rate),
        status: ForecastStatus::Projected {
            termination: raw.termination,
        },
        unit: WeightUnit::Kg,
    }
}

fn actual_only(
    series: Series,
    reason: SkipReason,
    rate_per_week: Option<f64>,
    horizon: Option<NaiveDate>,
    mode: ChartMode,
) -> ForecastResult {
    ForecastResult {
        points: assemble(&series, &[], mode),
        target_date: None,
        horizon,
        rate_per_week,
        status: ForecastStatus::ActualOnly { reason },
        unit: WeightUnit::Kg,
    }
}

/// First measured date at or beyond the target, for the goal's direction.
fn first_reaching(series: &Series, goal: &Goal) -> Option<NaiveDate> {
    let last = series.last()?;
    let reached = |w: f64| match goal.direction() {
        Direction::Loss => w <= goal.target_weight,
        Direction::Gain => w >= goal.target_weight,
        Direction::Flat => true,
    };
    if !reached(last.weight) {
        return None;
    }
    series.iter().find(|s| reached(s.weight)).map(|s| s.date)
}

/// A configured forecasting engine for one goal.
///
/// Built through `Forecaster::builder()`. Weights in the returned
/// `ForecastResult` are in the configured output unit.
pub struct Forecaster {
    pub(crate) goal: Goal,
    pub(crate) cfg: ForecastCfg,
    pub(crate) calendar: Box<dyn Calendar + Send + Sync>,
    pub(crate) mode: ChartMode,
    pub(crate) output_unit: WeightUnit,
}

impl core::fmt::Debug for Forecaster {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Forecaster")
            .field("goal", &self.goal)
            .field("cfg", &self.cfg)
            .field("mode", &self.mode)
            .field("output_unit", &self.output_unit)
            .finish_non_exhaustive()
    }
}

impl Forecaster {
    /// Start building a Forecaster.
    pub fn builder() -> ForecasterBuilder<Missing> {
        ForecasterBuilder::default()
    }

    /// The goal in kilograms.
    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    pub fn config(&self) -> &ForecastCfg {
        &self.cfg
    }

    /// Forecast with "today" taken from the configured calendar.
    pub fn forecast(&self, records: &[RawMeasurement]) -> ForecastResult {
        self.forecast_on(records, self.calendar.today())
    }

    /// Forecast as of an explicit date.
    pub fn forecast_on(&self, records: &[RawMeasurement], today: NaiveDate) -> ForecastResult {
        run_forecast(records, &self.goal, today, &self.cfg, self.mode).to_unit(self.output_unit)
    }
}
