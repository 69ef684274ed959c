//! Forecast point generator.
//!
//! A small state machine (`Stepping -> Converging -> Done`) that walks forward
//! from the last actual sample in fixed day steps, asking the curve model for
//! the rate at each step. Every run is bounded by `ForecastCfg::max_steps`.

use std::ops::RangeInclusive;

use chrono::NaiveDate;

use crate::config::ForecastCfg;
use crate::curve::CurveModel;
use crate::horizon::{CurvePlan, Horizon, HorizonBound};
use crate::status::Termination;
use crate::types::{Direction, Sample};
use crate::util::{DAYS_PER_WEEK, add_days, days_between};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stepping,
    Converging,
    Done,
}

/// Raw generator output, before the monotonicity pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecast {
    /// Starts with a projected copy of the last actual sample.
    pub points: Vec<Sample>,
    pub termination: Termination,
    /// First date the running weight reached the target.
    pub reached: Option<NaiveDate>,
    pub steps: u32,
}

/// Inputs that stay fixed for one generator run. Rates are signed kg/week.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorParams {
    pub start: Sample,
    pub target: f64,
    pub initial_rate: f64,
    pub sustainable_rate: f64,
    pub horizon: Horizon,
}

pub struct ForecastGenerator<'a> {
    cfg: &'a ForecastCfg,
    curve: CurveModel<'a>,
    params: GeneratorParams,
    direction: Direction,
    total_days: u64,
    day: u64,
    prev_fraction: f64,
    /// Slowest pace seen so far, kg/day; the closing correction never exceeds it.
    pace: f64,
    weight: f64,
    steps: u32,
    phase: Phase,
    points: Vec<Sample>,
    reached: Option<NaiveDate>,
    termination: Option<Termination>,
}

impl<'a> ForecastGenerator<'a> {
    pub fn new(params: GeneratorParams, cfg: &'a ForecastCfg) -> Self {
        let total_days = days_between(params.start.date, params.horizon.date).max(0) as u64;
        let direction = Direction::of_change(params.target - params.start.weight, 0.0);
        let mut points = Vec::with_capacity((cfg.max_steps as usize).min(1024) + 3);
        points.push(Sample::projected(params.start.date, params.start.weight));
        let mut generator = Self {
            cfg,
            curve: CurveModel::new(&cfg.curve),
            params,
            direction,
            total_days,
            day: 0,
            prev_fraction: 0.0,
            pace: f64::INFINITY,
            weight: params.start.weight,
            steps: 0,
            phase: Phase::Stepping,
            points,
            reached: None,
            termination: None,
        };
        if total_days == 0 || direction == Direction::Flat {
            generator.finish(Termination::Horizon);
        }
        generator
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advance the state machine by one transition.
    pub fn step(&mut self) -> Phase {
        match self.phase {
            Phase::Stepping => self.advance(),
            Phase::Converging => self.approach(),
            Phase::Done => {}
        }
        self.phase
    }

    /// Drive the machine to `Done`.
    pub fn run(mut self) -> RawForecast {
        // Each transition either advances a step (bounded by max_steps) or ends the run.
        let guard = u64::from(self.cfg.max_steps) + 2;
        let mut transitions = 0u64;
        while self.step() != Phase::Done {
            transitions += 1;
            if transitions > guard {
                self.finish(Termination::IterationCap);
            }
        }
        RawForecast {
            points: self.points,
            termination: self.termination.unwrap_or(Termination::IterationCap),
            reached: self.reached,
            steps: self.steps,
        }
    }

    fn advance(&mut self) {
        if self.steps >= self.cfg.max_steps {
            tracing::debug!(steps = self.steps, "step cap reached");
            self.finish(Termination::IterationCap);
            return;
        }

        let next_day = (self.day + u64::from(self.cfg.step_days)).min(self.total_days);
        let dt = (next_day - self.day) as f64;
        let fraction = next_day as f64 / self.total_days as f64;
        let span = self.params.target - self.params.start.weight;
        let progress = (self.weight - self.params.start.weight) / span;

        let rate = self.curve.blended_rate(
            self.params.initial_rate,
            self.params.sustainable_rate,
            fraction,
            progress,
        );
        let mut delta = rate / DAYS_PER_WEEK * dt * self.curve.taper(fraction);
        self.pace = self.pace.min(rate.abs() / DAYS_PER_WEEK);
        let tapering = self.curve.in_taper(fraction);
        if tapering && self.params.horizon.bound == HorizonBound::Projected {
            // Spread the remaining gap over what is left of the taper, never
            // faster than the curve has already been moving.
            let gap =
                (self.params.target - self.weight) * self.curve.taper_share(self.prev_fraction, fraction);
            let closing = gap.signum() * gap.abs().min(self.pace * dt);
            if closing.abs() > delta.abs() {
                delta = closing;
            }
        }
        if self.direction.reverses(0.0, delta) {
            delta = 0.0;
        }

        let mut next = self.weight + delta;
        next = match self.direction {
            Direction::Loss => next.max(self.params.target),
            Direction::Gain => next.min(self.params.target),
            Direction::Flat => self.params.target,
        };

        if tapering && dt > 0.0 {
            self.pace = self.pace.min((next - self.weight).abs() / dt);
        }
        self.steps += 1;
        self.day = next_day;
        self.prev_fraction = fraction;
        self.weight = next;
        let date = add_days(self.params.start.date, self.day);
        tracing::trace!(
            step = self.steps,
            %date,
            fraction,
            progress,
            rate,
            weight = next,
            "forecast step"
        );

        if (next - self.params.target).abs() <= self.cfg.convergence_epsilon {
            self.reached = Some(date);
            if fraction > self.cfg.converging_after && self.day < self.total_days {
                // The approach points carry the exact target weight.
                self.points.push(Sample::projected(date, next));
                self.phase = Phase::Converging;
            } else {
                self.weight = self.params.target;
                self.points.push(Sample::projected(date, self.params.target));
                self.finish(Termination::Converged);
            }
            return;
        }

        self.points.push(Sample::projected(date, next));
        if self.day >= self.total_days {
            self.finish(Termination::Horizon);
        }
    }

    /// Emit up to two target-weight points between the current step and the horizon.
    fn approach(&mut self) {
        let remaining = self.total_days - self.day;
        let mid = self.day + remaining / 2;
        if mid > self.day && mid < self.total_days {
            self.points.push(Sample::projected(
                add_days(self.params.start.date, mid),
                self.params.target,
            ));
        }
        self.points
            .push(Sample::projected(self.params.horizon.date, self.params.target));
        self.day = self.total_days;
        self.finish(Termination::Converged);
    }

    fn finish(&mut self, termination: Termination) {
        self.termination = Some(termination);
        self.phase = Phase::Done;
    }
}

/// Shortest horizon in `days` over which the tapered curve reaches `target`
/// with no closing correction. Falls back to the upper bound when even that
/// falls short.
pub fn settling_days(
    start: Sample,
    target: f64,
    plan: &CurvePlan,
    days: RangeInclusive<u64>,
    cfg: &ForecastCfg,
) -> u64 {
    let reaches = |span: u64| {
        let date = add_days(start.date, span);
        let params = GeneratorParams {
            start,
            target,
            initial_rate: plan.initial_rate,
            sustainable_rate: plan.sustainable_rate,
            horizon: Horizon {
                date,
                bound: HorizonBound::Deadline,
                projected: date,
            },
        };
        ForecastGenerator::new(params, cfg).run().reached.is_some()
    };

    let (mut lo, mut hi) = (*days.start(), *days.end());
    if lo >= hi || reaches(lo) {
        return lo;
    }
    if !reaches(hi) {
        return hi;
    }
    // `lo` falls short, `hi` reaches.
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if reaches(mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    hi
}

/// Run the generator to completion.
pub fn generate(params: GeneratorParams, cfg: &ForecastCfg) -> RawForecast {
    let out = ForecastGenerator::new(params, cfg).run();
    tracing::debug!(
        steps = out.steps,
        points = out.points.len(),
        termination = ?out.termination,
        "forecast generated"
    );
    out
}
