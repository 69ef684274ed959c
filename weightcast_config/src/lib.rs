#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and measurement parsing for the forecasting stack.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The measurement CSV loader enforces headers and keeps dates as text, so
//!   the core normalizer can skip individual unparseable records.
use chrono::NaiveDate;
use serde::Deserialize;

/// Measurement CSV schema.
///
/// Expected headers:
/// date,weight,unit
///
/// Example:
/// date,weight,unit
/// 2026-01-01,100.0,kg
/// 2026-01-08,215.6,lb
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MeasurementRow {
    pub date: String,
    pub weight: f64,
    /// Empty or missing means kilograms.
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CurveCfg {
    /// Base of the slow time decay, in (0, 1).
    pub decay_base: f64,
    /// Smoothing constant `k` of the time decay (> 0).
    pub decay_smoothing: f64,
    /// Elapsed fraction after which the ending taper kicks in, in (0, 1).
    pub taper_threshold: f64,
    /// Exponent of the ending taper (> 0).
    pub taper_exponent: f64,
}

impl Default for CurveCfg {
    fn default() -> Self {
        Self {
            decay_base: 0.5,
            decay_smoothing: 0.6,
            taper_threshold: 0.75,
            taper_exponent: 2.2,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ForecastCfg {
    /// Long-term safe weekly rate (kg/week) the curve tapers toward.
    pub sustainable_rate_kg_per_week: f64,
    /// Recency weighting base for the trend estimate (> 1).
    pub recency_base: f64,
    /// Weekly rates with a smaller magnitude count as flat.
    pub flat_rate_epsilon_kg_per_week: f64,
    pub step_days: u32,
    /// Days added to a rate-derived horizon.
    pub buffer_days: u32,
    /// Hard cap on generator steps.
    pub max_steps: u32,
    /// Upper bound for a rate-derived horizon (days after the last actual sample).
    pub max_horizon_days: u32,
    pub convergence_epsilon_kg: f64,
    /// Elapsed fraction after which convergence emits an interpolated approach.
    pub converging_after: f64,
    pub terminal_tolerance_kg: f64,
    pub curve: CurveCfg,
}

impl Default for ForecastCfg {
    fn default() -> Self {
        Self {
            sustainable_rate_kg_per_week: 0.9,
            recency_base: 1.2,
            flat_rate_epsilon_kg_per_week: 0.01,
            step_days: 2,
            buffer_days: 14,
            max_steps: 730,
            max_horizon_days: 730,
            convergence_epsilon_kg: 0.1,
            converging_after: 0.8,
            terminal_tolerance_kg: 0.05,
            curve: CurveCfg::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnitCfg {
    #[default]
    Kg,
    Lb,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Display {
    /// Unit used when presenting results: "kg" | "lb"
    pub unit: UnitCfg,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Goal/period record as stored by the goal collaborator.
#[derive(Debug, Deserialize, Clone)]
pub struct GoalCfg {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub start_weight: f64,
    pub target_weight: f64,
    #[serde(default)]
    pub weekly_rate_goal: Option<f64>,
    /// Unit of the weights above; defaults to kg.
    #[serde(default)]
    pub unit: UnitCfg,
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub forecast: ForecastCfg,
    #[serde(default)]
    pub display: Display,
    #[serde(default)]
    pub logging: Logging,
    /// Optional goal; the CLI requires it, library callers usually pass their own.
    #[serde(default)]
    pub goal: Option<GoalCfg>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

pub fn load_measurements_csv(path: &std::path::Path) -> eyre::Result<Vec<MeasurementRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open measurements CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["date", "weight", "unit"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "measurements CSV must have headers 'date,weight,unit', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<MeasurementRow>().enumerate() {
        match rec {
            Ok(mut row) => {
                if row.unit.as_deref().is_some_and(str::is_empty) {
                    row.unit = None;
                }
                rows.push(row);
            }
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    Ok(rows)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        let f = &self.forecast;

        // Rates
        if !(f.sustainable_rate_kg_per_week.is_finite() && f.sustainable_rate_kg_per_week > 0.0) {
            eyre::bail!("forecast.sustainable_rate_kg_per_week must be > 0");
        }
        if f.sustainable_rate_kg_per_week > 5.0 {
            eyre::bail!("forecast.sustainable_rate_kg_per_week is unreasonably large (>5 kg/week)");
        }
        if !(f.recency_base.is_finite() && f.recency_base > 1.0) {
            eyre::bail!("forecast.recency_base must be > 1.0");
        }
        if !(f.flat_rate_epsilon_kg_per_week >= 0.0 && f.flat_rate_epsilon_kg_per_week < 1.0) {
            eyre::bail!("forecast.flat_rate_epsilon_kg_per_week must be in [0.0, 1.0)");
        }

        // Stepping
        if f.step_days == 0 {
            eyre::bail!("forecast.step_days must be >= 1");
        }
        if f.step_days > 30 {
            eyre::bail!("forecast.step_days is unreasonably large (>30)");
        }
        if f.max_steps == 0 {
            eyre::bail!("forecast.max_steps must be >= 1");
        }
        if f.max_horizon_days == 0 {
            eyre::bail!("forecast.max_horizon_days must be >= 1");
        }
        if f.max_horizon_days > 10 * 366 {
            eyre::bail!("forecast.max_horizon_days is unreasonably large (>10y)");
        }

        // Tolerances
        if !(f.convergence_epsilon_kg > 0.0 && f.convergence_epsilon_kg <= 1.0) {
            eyre::bail!("forecast.convergence_epsilon_kg must be in (0.0, 1.0]");
        }
        if !(f.converging_after >= 0.0 && f.converging_after <= 1.0) {
            eyre::bail!("forecast.converging_after must be in [0.0, 1.0]");
        }
        if !(f.terminal_tolerance_kg > 0.0 && f.terminal_tolerance_kg <= 1.0) {
            eyre::bail!("forecast.terminal_tolerance_kg must be in (0.0, 1.0]");
        }

        // Curve
        let c = &f.curve;
        if !(c.decay_base > 0.0 && c.decay_base < 1.0) {
            eyre::bail!("forecast.curve.decay_base must be in (0.0, 1.0)");
        }
        if !(c.decay_smoothing.is_finite() && c.decay_smoothing > 0.0) {
            eyre::bail!("forecast.curve.decay_smoothing must be > 0");
        }
        if !(c.taper_threshold > 0.0 && c.taper_threshold < 1.0) {
            eyre::bail!("forecast.curve.taper_threshold must be in (0.0, 1.0)");
        }
        if !(c.taper_exponent.is_finite() && c.taper_exponent > 0.0) {
            eyre::bail!("forecast.curve.taper_exponent must be > 0");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        // Goal
        if let Some(goal) = &self.goal {
            if !(goal.start_weight.is_finite() && goal.start_weight > 0.0) {
                eyre::bail!("goal.start_weight must be > 0");
            }
            if !(goal.target_weight.is_finite() && goal.target_weight > 0.0) {
                eyre::bail!("goal.target_weight must be > 0");
            }
            if let Some(end) = goal.end_date
                && end < goal.start_date
            {
                eyre::bail!("goal.end_date must not precede goal.start_date");
            }
            if let Some(rate) = goal.weekly_rate_goal
                && !(rate.is_finite() && rate > 0.0)
            {
                eyre::bail!("goal.weekly_rate_goal must be > 0 when set");
            }
        }

        Ok(())
    }
}
