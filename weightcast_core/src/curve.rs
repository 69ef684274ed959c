//! Curve/taper model.
//!
//! Pure functions of numeric fractions. Rates passed to `blend_toward_sustainable`
//! are signed (negative for loss); the other functions return unitless factors.

use crate::config::CurveCfg;

/// Slow geometric decay `base^(elapsed / k)`; 1.0 at the start and shrinking with time.
#[inline]
pub fn time_decay(elapsed_fraction: f64, base: f64, smoothing: f64) -> f64 {
    let f = clamp_unit(elapsed_fraction);
    base.powf(f / smoothing)
}

/// 1.0 up to `threshold`, then `1 - proximity^p`, reaching 0.0 at the horizon.
#[inline]
pub fn ending_taper(elapsed_fraction: f64, threshold: f64, exponent: f64) -> f64 {
    let f = clamp_unit(elapsed_fraction);
    if f <= threshold {
        return 1.0;
    }
    let proximity = (f - threshold) / (1.0 - threshold);
    (1.0 - proximity.powf(exponent)).max(0.0)
}

/// Integral of `ending_taper` over `[0, elapsed_fraction]`.
///
/// Used to spread a remaining distance over the taper so the curve flattens
/// while still closing the gap exactly at the horizon.
pub fn taper_area(elapsed_fraction: f64, threshold: f64, exponent: f64) -> f64 {
    let f = clamp_unit(elapsed_fraction);
    if f <= threshold {
        return f;
    }
    let span = 1.0 - threshold;
    let q = (f - threshold) / span;
    threshold + span * (q - q.powf(exponent + 1.0) / (exponent + 1.0))
}

/// `initial - (initial - sustainable) * factor`, clamped between the two rates.
///
/// The result never crosses the sustainable rate, whichever side of it the
/// initial rate starts on.
#[inline]
pub fn blend_toward_sustainable(initial: f64, sustainable: f64, factor: f64) -> f64 {
    let c = clamp_unit(factor);
    let blended = initial - (initial - sustainable) * c;
    let (lo, hi) = if initial <= sustainable {
        (initial, sustainable)
    } else {
        (sustainable, initial)
    };
    blended.clamp(lo, hi)
}

/// Whichever of time or goal proximity is more binding.
#[inline]
pub fn combined_factor(elapsed_fraction: f64, goal_progress: f64, cfg: &CurveCfg) -> f64 {
    let from_time = 1.0 - time_decay(elapsed_fraction, cfg.decay_base, cfg.decay_smoothing);
    from_time.max(clamp_unit(goal_progress))
}

/// Parameterized view over the free functions above.
#[derive(Debug, Clone, Copy)]
pub struct CurveModel<'a> {
    cfg: &'a CurveCfg,
}

impl<'a> CurveModel<'a> {
    pub fn new(cfg: &'a CurveCfg) -> Self {
        Self { cfg }
    }

    /// Signed weekly rate after blending, before the ending taper.
    pub fn blended_rate(
        &self,
        initial: f64,
        sustainable: f64,
        elapsed_fraction: f64,
        goal_progress: f64,
    ) -> f64 {
        let factor = combined_factor(elapsed_fraction, goal_progress, self.cfg);
        blend_toward_sustainable(initial, sustainable, factor)
    }

    pub fn taper(&self, elapsed_fraction: f64) -> f64 {
        ending_taper(
            elapsed_fraction,
            self.cfg.taper_threshold,
            self.cfg.taper_exponent,
        )
    }

    pub fn in_taper(&self, elapsed_fraction: f64) -> bool {
        elapsed_fraction > self.cfg.taper_threshold
    }

    /// Share of the taper area still ahead at `from` that lies in `(from, to]`.
    pub fn taper_share(&self, from: f64, to: f64) -> f64 {
        let (t, p) = (self.cfg.taper_threshold, self.cfg.taper_exponent);
        let total = taper_area(1.0, t, p) - taper_area(from, t, p);
        if total <= f64::EPSILON {
            return 1.0;
        }
        ((taper_area(to, t, p) - taper_area(from, t, p)) / total).clamp(0.0, 1.0)
    }
}

#[inline]
fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_decay_is_one_at_start_and_decreasing() {
        assert!((time_decay(0.0, 0.5, 0.6) - 1.0).abs() < 1e-12);
        let mut prev = 1.0;
        for i in 1..=10 {
            let v = time_decay(f64::from(i) / 10.0, 0.5, 0.6);
            assert!(v < prev);
            prev = v;
        }
        // base^(1/k) at the horizon
        assert!((time_decay(1.0, 0.5, 0.5) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn ending_taper_flat_then_falls_to_zero() {
        assert_eq!(ending_taper(0.5, 0.75, 2.0), 1.0);
        assert_eq!(ending_taper(0.75, 0.75, 2.0), 1.0);
        // proximity 0.5 -> 1 - 0.25
        assert!((ending_taper(0.875, 0.75, 2.0) - 0.75).abs() < 1e-12);
        assert!(ending_taper(1.0, 0.75, 2.0).abs() < 1e-12);
        assert!(ending_taper(3.0, 0.75, 2.0).abs() < 1e-12);
    }

    #[test]
    fn taper_area_matches_plateau_and_total() {
        assert!((taper_area(0.5, 0.75, 2.0) - 0.5).abs() < 1e-12);
        // 0.75 + 0.25 * (1 - 1/3)
        assert!((taper_area(1.0, 0.75, 2.0) - (0.75 + 0.25 * (2.0 / 3.0))).abs() < 1e-12);
    }

    #[test]
    fn blend_moves_toward_sustainable_without_crossing() {
        // loss: -2.0 toward -0.9
        assert_eq!(blend_toward_sustainable(-2.0, -0.9, 0.0), -2.0);
        assert!((blend_toward_sustainable(-2.0, -0.9, 0.5) - (-1.45)).abs() < 1e-12);
        assert_eq!(blend_toward_sustainable(-2.0, -0.9, 1.0), -0.9);
        assert_eq!(blend_toward_sustainable(-2.0, -0.9, 7.0), -0.9);
        // gain from below the sustainable rate
        assert!((blend_toward_sustainable(0.3, 0.9, 0.5) - 0.6).abs() < 1e-12);
        assert_eq!(blend_toward_sustainable(0.3, 0.9, 2.0), 0.9);
    }

    #[test]
    fn combined_factor_takes_the_more_binding_constraint() {
        let cfg = CurveCfg::default();
        let time_only = 1.0 - time_decay(0.1, cfg.decay_base, cfg.decay_smoothing);
        assert!((combined_factor(0.1, 0.0, &cfg) - time_only).abs() < 1e-12);
        assert!((combined_factor(0.1, 0.9, &cfg) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn taper_share_closes_at_horizon() {
        let cfg = CurveCfg::default();
        let m = CurveModel::new(&cfg);
        assert!((m.taper_share(0.9, 1.0) - 1.0).abs() < 1e-12);
        let a = m.taper_share(0.8, 0.9);
        assert!(a > 0.0 && a < 1.0);
    }
}
