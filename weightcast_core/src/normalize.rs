//! Historical data normalizer: raw records to a canonical, windowed `Series`.

use chrono::{DateTime, NaiveDate};

use crate::types::{Goal, RawMeasurement, Sample, Series};

/// Normalized actual data plus bookkeeping the later stages need.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Canonical series in kilograms, anchor included.
    pub series: Series,
    /// Number of measured (non-synthesized) samples in `series`.
    pub measured: usize,
    /// Records dropped for an unparseable date or an unusable weight.
    pub skipped: usize,
    /// Whether an anchor was synthesized from the goal's start weight.
    pub anchored: bool,
}

/// Parse a record date: `YYYY-MM-DD` or an RFC 3339 timestamp (date part taken).
pub fn parse_record_date(s: &str) -> Option<NaiveDate> {
    let t = s.trim();
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(t).ok().map(|dt| dt.date_naive()))
}

/// Canonicalize `records` into a day-deduplicated series restricted to
/// `[goal.start_date, goal.end_date or today]`.
///
/// Same-day duplicates resolve to the last record in input order. When no
/// sample falls exactly on the start date, one is synthesized from the goal's
/// start weight (if that weight is usable).
pub fn normalize(records: &[RawMeasurement], goal: &Goal, today: NaiveDate) -> Normalized {
    let window_start = goal.start_date;
    let window_end = goal.end_date.unwrap_or(today);

    let mut skipped = 0usize;
    let mut kept: Vec<Sample> = Vec::with_capacity(records.len());
    for (idx, rec) in records.iter().enumerate() {
        let Some(date) = parse_record_date(&rec.date) else {
            tracing::warn!(record = idx, date = %rec.date, "skipping record with unparseable date");
            skipped += 1;
            continue;
        };
        let weight = rec.unit.to_kg(rec.weight);
        if !(weight.is_finite() && weight > 0.0) {
            tracing::warn!(record = idx, weight = rec.weight, "skipping record with unusable weight");
            skipped += 1;
            continue;
        }
        if date < window_start || date > window_end {
            continue;
        }
        kept.push(Sample::actual(date, weight));
    }

    let measured_series = Series::from_samples(kept);
    let measured = measured_series.len();

    let anchor_usable = goal.start_weight.is_finite() && goal.start_weight > 0.0;
    let anchored =
        anchor_usable && window_start <= window_end && !measured_series.contains_date(window_start);
    let series = if anchored {
        let anchor = Sample::actual(window_start, goal.start_weight);
        // Anchor goes first so it can never shadow a measured sample.
        Series::from_samples(std::iter::once(anchor).chain(measured_series.into_vec()))
    } else {
        measured_series
    };

    tracing::debug!(measured, skipped, anchored, "normalized measurements");
    Normalized {
        series,
        measured,
        skipped,
        anchored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_rfc3339_dates() {
        let want = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        assert_eq!(parse_record_date("2026-03-04"), Some(want));
        assert_eq!(parse_record_date(" 2026-03-04 "), Some(want));
        assert_eq!(parse_record_date("2026-03-04T07:30:00+01:00"), Some(want));
        assert_eq!(parse_record_date("04/03/2026"), None);
        assert_eq!(parse_record_date(""), None);
    }
}
