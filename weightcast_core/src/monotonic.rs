//! Trend monotonicity enforcer.

use chrono::NaiveDate;

use crate::types::{Direction, Sample};

/// Exact end point a goal-bound forecast must finish on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Terminal {
    pub date: NaiveDate,
    pub weight: f64,
}

/// Make `points` non-increasing (loss) or non-decreasing (gain).
///
/// A point that would reverse the trend repeats the previous weight instead of
/// being dropped, so the curve may plateau but never turn back. When
/// `terminal` is given and the last point misses it by more than `tolerance`
/// (weight) or by date, the exact terminal point is written: it replaces a
/// last point on the same date and is appended otherwise.
pub fn enforce_monotonic(
    points: Vec<Sample>,
    direction: Direction,
    terminal: Option<Terminal>,
    tolerance: f64,
) -> Vec<Sample> {
    let mut out: Vec<Sample> = Vec::with_capacity(points.len() + 1);
    let mut flattened = 0usize;
    for p in points {
        match out.last() {
            Some(prev) if direction.reverses(prev.weight, p.weight) || !p.weight.is_finite() => {
                flattened += 1;
                out.push(Sample {
                    weight: prev.weight,
                    ..p
                });
            }
            _ => out.push(p),
        }
    }
    if flattened > 0 {
        tracing::debug!(flattened, "flattened reversing forecast points");
    }

    if let Some(t) = terminal {
        let fixed = Sample::projected(t.date, t.weight);
        match out.last_mut() {
            Some(last) if last.date == t.date => {
                if (last.weight - t.weight).abs() > tolerance {
                    *last = fixed;
                }
            }
            Some(last) if last.date > t.date => {}
            _ => out.push(fixed),
        }
    }
    out
}
