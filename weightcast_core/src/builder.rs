//! Type-state builder for `Forecaster`.
//!
//! The builder enforces at compile time that a goal is provided before
//! `build()` is available. `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;

use weightcast_traits::{Calendar, SystemCalendar};

use crate::chart::ChartMode;
use crate::config::ForecastCfg;
use crate::engine::Forecaster;
use crate::error::{BuildError, Result};
use crate::types::{Goal, WeightUnit};

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Forecaster`. All fields are validated on `build()`.
pub struct ForecasterBuilder<G> {
    goal: Option<Goal>,
    cfg: Option<ForecastCfg>,
    calendar: Option<Box<dyn Calendar + Send + Sync>>,
    mode: ChartMode,
    output_unit: WeightUnit,
    _g: PhantomData<G>,
}

impl Default for ForecasterBuilder<Missing> {
    fn default() -> Self {
        Self {
            goal: None,
            cfg: None,
            calendar: None,
            mode: ChartMode::Full,
            output_unit: WeightUnit::Kg,
            _g: PhantomData,
        }
    }
}

impl<G> ForecasterBuilder<G> {
    /// Provide the goal in kilograms.
    pub fn with_goal(self, goal: Goal) -> ForecasterBuilder<Set> {
        ForecasterBuilder {
            goal: Some(goal),
            cfg: self.cfg,
            calendar: self.calendar,
            mode: self.mode,
            output_unit: self.output_unit,
            _g: PhantomData,
        }
    }

    /// Provide a goal expressed in `unit`; it is canonicalized to kilograms.
    pub fn with_goal_in(self, goal: &Goal, unit: WeightUnit) -> ForecasterBuilder<Set> {
        self.with_goal(goal.canonicalize(unit))
    }

    pub fn with_config(mut self, cfg: ForecastCfg) -> Self {
        self.cfg = Some(cfg);
        self
    }

    /// Calendar used for "today" when the goal has no end date.
    pub fn with_calendar(mut self, calendar: impl Calendar + Send + Sync + 'static) -> Self {
        self.calendar = Some(Box::new(calendar));
        self
    }

    pub fn with_mode(mut self, mode: ChartMode) -> Self {
        self.mode = mode;
        self
    }

    /// Unit of the weights in returned results.
    pub fn with_output_unit(mut self, unit: WeightUnit) -> Self {
        self.output_unit = unit;
        self
    }

    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<Forecaster> {
        let goal = self
            .goal
            .ok_or_else(|| eyre::Report::new(BuildError::MissingGoal))?;
        let cfg = self.cfg.unwrap_or_default();
        cfg.check()
            .map_err(|msg| eyre::Report::new(BuildError::InvalidConfig(msg)))?;
        let calendar = self
            .calendar
            .unwrap_or_else(|| Box::new(SystemCalendar::new()));
        Ok(Forecaster {
            goal,
            cfg,
            calendar,
            mode: self.mode,
            output_unit: self.output_unit,
        })
    }
}

impl ForecasterBuilder<Set> {
    /// Build once the goal is known at compile time.
    pub fn build(self) -> Result<Forecaster> {
        self.try_build()
    }
}
