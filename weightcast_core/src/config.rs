//! Configuration types for the forecasting engine.
//!
//! These are the runtime configuration structs used by the pipeline.
//! They are separate from the TOML-deserialized config in `weightcast_config`.

/// Parameters of the curve/taper model.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveCfg {
    /// Base of the slow time decay, in (0, 1).
    pub decay_base: f64,
    /// Smoothing constant `k`: larger values decay more slowly.
    pub decay_smoothing: f64,
    /// Elapsed fraction at which the ending taper starts.
    pub taper_threshold: f64,
    /// Exponent `p` of the ending taper.
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

/// Engine configuration. All weights are kilograms.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCfg {
    /// Long-term safe weekly rate the curve tapers toward (magnitude, kg/week).
    pub sustainable_rate: f64,
    /// Recency weighting base for the trend estimate; transition `i` weighs `base^i`.
    pub recency_base: f64,
    /// Weekly rates with magnitude at or below this are flat.
    pub flat_epsilon: f64,
    /// Generator step size in days.
    pub step_days: u32,
    /// Buffer added to a rate-derived horizon.
    pub buffer_days: u32,
    /// Hard cap on generator steps, whatever the parameters.
    pub max_steps: u32,
    /// Upper bound on a rate-derived horizon, in days after the last actual sample.
    pub max_horizon_days: u32,
    /// Distance to the target that counts as reached.
    pub convergence_epsilon: f64,
    /// Elapsed fraction after which convergence emits an interpolated approach.
    pub converging_after: f64,
    /// Final-point tolerance of the monotonicity pass.
    pub terminal_tolerance: f64,
    pub curve: CurveCfg,
}

impl Default for ForecastCfg {
    fn default() -> Self {
        Self {
            sustainable_rate: 0.9,
            recency_base: 1.2,
            flat_epsilon: 0.01,
            step_days: 2,
            buffer_days: 14,
            max_steps: 730,
            max_horizon_days: 730,
            convergence_epsilon: 0.1,
            converging_after: 0.8,
            terminal_tolerance: 0.05,
            curve: CurveCfg::default(),
        }
    }
}

impl ForecastCfg {
    /// Cheap structural checks; the TOML layer performs the user-facing validation.
    pub(crate) fn check(&self) -> Result<(), &'static str> {
        if !(self.sustainable_rate.is_finite() && self.sustainable_rate > 0.0) {
            return Err("sustainable_rate must be > 0");
        }
        if !(self.recency_base.is_finite() && self.recency_base > 1.0) {
            return Err("recency_base must be > 1");
        }
        if !(0.0..1.0).contains(&self.flat_epsilon) {
            return Err("flat_epsilon must be in [0, 1)");
        }
        if self.step_days == 0 {
            return Err("step_days must be >= 1");
        }
        if self.max_steps == 0 {
            return Err("max_steps must be >= 1");
        }
        if self.max_horizon_days == 0 {
            return Err("max_horizon_days must be >= 1");
        }
        if !(self.convergence_epsilon.is_finite() && self.convergence_epsilon > 0.0) {
            return Err("convergence_epsilon must be > 0");
        }
        if !(0.0..=1.0).contains(&self.converging_after) {
            return Err("converging_after must be in [0, 1]");
        }
        if !(self.terminal_tolerance.is_finite() && self.terminal_tolerance > 0.0) {
            return Err("terminal_tolerance must be > 0");
        }
        let c = &self.curve;
        if !(c.decay_base > 0.0 && c.decay_base < 1.0) {
            return Err("curve.decay_base must be in (0, 1)");
        }
        if !(c.decay_smoothing.is_finite() && c.decay_smoothing > 0.0) {
            return Err("curve.decay_smoothing must be > 0");
        }
        if !(c.taper_threshold > 0.0 && c.taper_threshold < 1.0) {
            return Err("curve.taper_threshold must be in (0, 1)");
        }
        if !(c.taper_exponent.is_finite() && c.taper_exponent > 0.0) {
            return Err("curve.taper_exponent must be > 0");
        }
        Ok(())
    }
}
