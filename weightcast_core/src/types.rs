//! Core data model: samples, series, goals and units.
//!
//! All weights inside the engine are kilograms. `WeightUnit` conversions are only
//! applied when records enter (`RawMeasurement`, `Goal::canonicalize`) or when a
//! `ForecastResult` leaves (`ForecastResult::to_unit`).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ForecastError;
use crate::status::ForecastStatus;

/// Kilograms per international avoirdupois pound.
pub const KG_PER_LB: f64 = 0.453_592_37;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    /// Convert a value expressed in `self` to kilograms.
    #[inline]
    pub fn to_kg(self, value: f64) -> f64 {
        match self {
            Self::Kg => value,
            Self::Lb => value * KG_PER_LB,
        }
    }

    /// Convert a kilogram value to `self`.
    #[inline]
    pub fn from_kg(self, kg: f64) -> f64 {
        match self {
            Self::Kg => kg,
            Self::Lb => kg / KG_PER_LB,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lb => "lb",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for WeightUnit {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "kg" | "kgs" | "kilogram" | "kilograms" => Ok(Self::Kg),
            "lb" | "lbs" | "pound" | "pounds" => Ok(Self::Lb),
            other => Err(ForecastError::Unit(other.to_string())),
        }
    }
}

/// One weight observation, measured or projected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub date: NaiveDate,
    pub weight: f64,
    pub is_actual: bool,
}

impl Sample {
    pub fn actual(date: NaiveDate, weight: f64) -> Self {
        Self {
            date,
            weight,
            is_actual: true,
        }
    }

    pub fn projected(date: NaiveDate, weight: f64) -> Self {
        Self {
            date,
            weight,
            is_actual: false,
        }
    }
}

/// Samples strictly ascending by date, at most one per calendar day.
///
/// The only way to build a `Series` is through `from_samples`, which sorts and
/// collapses same-day samples (the later one in input order wins).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = Sample>,
    {
        let mut all: Vec<Sample> = samples.into_iter().collect();
        // Stable: same-day samples keep their input order, so the last one wins below.
        all.sort_by_key(|s| s.date);
        let mut out: Vec<Sample> = Vec::with_capacity(all.len());
        for s in all {
            match out.last_mut() {
                Some(prev) if prev.date == s.date => *prev = s,
                _ => out.push(s),
            }
        }
        Self { samples: out }
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.samples.binary_search_by_key(&date, |s| s.date).is_ok()
    }

    pub fn into_vec(self) -> Vec<Sample> {
        self.samples
    }

    /// Apply `f` to every weight, keeping dates and flags.
    pub(crate) fn map_weights(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            samples: self
                .samples
                .iter()
                .map(|s| Sample {
                    weight: f(s.weight),
                    ..*s
                })
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Direction of a weight change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Loss,
    Gain,
    Flat,
}

impl Direction {
    /// Classify a signed change; magnitudes `<= epsilon` are flat.
    pub fn of_change(delta: f64, epsilon: f64) -> Self {
        if !delta.is_finite() || delta.abs() <= epsilon {
            Self::Flat
        } else if delta < 0.0 {
            Self::Loss
        } else {
            Self::Gain
        }
    }

    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Self::Loss => -1.0,
            Self::Gain => 1.0,
            Self::Flat => 0.0,
        }
    }

    /// True when moving from `a` to `b` goes against this direction.
    #[inline]
    pub fn reverses(self, a: f64, b: f64) -> bool {
        match self {
            Self::Loss => b > a,
            Self::Gain => b < a,
            Self::Flat => false,
        }
    }
}

/// A weight goal for one tracking period.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_weight: f64,
    pub target_weight: f64,
    /// Desired weekly rate of change (magnitude, same unit as the weights).
    pub weekly_rate_goal: Option<f64>,
}

impl Goal {
    pub fn new(start_date: NaiveDate, start_weight: f64, target_weight: f64) -> Self {
        Self {
            start_date,
            end_date: None,
            start_weight,
            target_weight,
            weekly_rate_goal: None,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_weekly_rate_goal(mut self, rate: f64) -> Self {
        self.weekly_rate_goal = Some(rate);
        self
    }

    /// Convert a goal expressed in `unit` to kilograms.
    pub fn canonicalize(&self, unit: WeightUnit) -> Self {
        Self {
            start_weight: unit.to_kg(self.start_weight),
            target_weight: unit.to_kg(self.target_weight),
            weekly_rate_goal: self.weekly_rate_goal.map(|r| unit.to_kg(r)),
            ..self.clone()
        }
    }

    /// Implied direction; exact equality of start and target is flat.
    pub fn direction(&self) -> Direction {
        Direction::of_change(self.target_weight - self.start_weight, 0.0)
    }

    /// Weekly rate goal when it is usable (finite and positive).
    pub fn usable_rate_goal(&self) -> Option<f64> {
        self.weekly_rate_goal.filter(|r| r.is_finite() && *r > 0.0)
    }

    pub fn validate(&self) -> Result<(), ForecastError> {
        if !(self.start_weight.is_finite() && self.start_weight > 0.0) {
            return Err(ForecastError::InvalidGoal(format!(
                "start weight must be a positive number, got {}",
                self.start_weight
            )));
        }
        if !(self.target_weight.is_finite() && self.target_weight > 0.0) {
            return Err(ForecastError::InvalidGoal(format!(
                "target weight must be a positive number, got {}",
                self.target_weight
            )));
        }
        if let Some(end) = self.end_date
            && end < self.start_date
        {
            return Err(ForecastError::InvalidGoal(format!(
                "end date {end} precedes start date {}",
                self.start_date
            )));
        }
        Ok(())
    }
}

/// A raw record as handed over by the measurement store.
///
/// The date stays textual: records with an unparseable date are skipped during
/// normalization instead of failing the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMeasurement {
    pub date: String,
    pub weight: f64,
    pub unit: WeightUnit,
}

impl RawMeasurement {
    pub fn new(date: impl Into<String>, weight: f64, unit: WeightUnit) -> Self {
        Self {
            date: date.into(),
            weight,
            unit,
        }
    }

    pub fn kg(date: impl Into<String>, weight: f64) -> Self {
        Self::new(date, weight, WeightUnit::Kg)
    }
}

/// Output handed to the chart collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub points: Series,
    /// Date the forecast reaches the target weight, if it does.
    pub target_date: Option<NaiveDate>,
    /// Last date the forecast was allowed to extend to.
    pub horizon: Option<NaiveDate>,
    /// Estimated weekly trend (signed, in `unit`), when at least one sample exists.
    pub rate_per_week: Option<f64>,
    pub status: ForecastStatus,
    pub unit: WeightUnit,
}

impl ForecastResult {
    pub fn actual(&self) -> impl Iterator<Item = &Sample> {
        self.points.iter().filter(|s| s.is_actual)
    }

    pub fn forecast(&self) -> impl Iterator<Item = &Sample> {
        self.points.iter().filter(|s| !s.is_actual)
    }

    pub fn is_projected(&self) -> bool {
        matches!(self.status, ForecastStatus::Projected { .. })
    }

    /// Re-express every weight in `unit`.
    pub fn to_unit(&self, unit: WeightUnit) -> Self {
        if unit == self.unit {
            return self.clone();
        }
        let from = self.unit;
        let convert = |v: f64| unit.from_kg(from.to_kg(v));
        Self {
            points: self.points.map_weights(convert),
            rate_per_week: self.rate_per_week.map(convert),
            unit,
            ..self.clone()
        }
    }
}
