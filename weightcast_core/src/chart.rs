//! Chart data assembler: actual and forecast samples merged into one series.

use serde::Serialize;

use crate::types::{Sample, Series};

/// Which part of the merged series the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartMode {
    /// Actual data followed by the forecast.
    #[default]
    Full,
    /// Clipped to the span of actual dates.
    ActualRangeOnly,
}

/// Merge `actual` and `forecast`. Actual data always wins on a shared date.
pub fn assemble(actual: &Series, forecast: &[Sample], mode: ChartMode) -> Series {
    let merged = actual.iter().copied().chain(
        forecast
            .iter()
            .filter(|s| !actual.contains_date(s.date))
            .copied(),
    );
    let series = Series::from_samples(merged);
    match mode {
        ChartMode::Full => series,
        ChartMode::ActualRangeOnly => clip_to_actual(series, actual),
    }
}

fn clip_to_actual(series: Series, actual: &Series) -> Series {
    let (Some(first), Some(last)) = (actual.first(), actual.last()) else {
        return Series::new();
    };
    let (from, to) = (first.date, last.date);
    Series::from_samples(
        series
            .into_vec()
            .into_iter()
            .filter(|s| s.date >= from && s.date <= to),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn actual_wins_on_shared_dates() {
        let actual = Series::from_samples([Sample::actual(d(1), 90.0), Sample::actual(d(5), 89.0)]);
        let forecast = [
            Sample::projected(d(5), 89.0),
            Sample::projected(d(3), 70.0),
            Sample::projected(d(7), 88.5),
        ];
        let full = assemble(&actual, &forecast, ChartMode::Full);
        let got: Vec<(NaiveDate, bool)> = full.iter().map(|s| (s.date, s.is_actual)).collect();
        assert_eq!(
            got,
            vec![(d(1), true), (d(3), false), (d(5), true), (d(7), false)]
        );

        let clipped = assemble(&actual, &forecast, ChartMode::ActualRangeOnly);
        assert_eq!(clipped.len(), 3);
        assert_eq!(clipped.last().unwrap().date, d(5));
    }

    #[test]
    fn empty_actual_clips_to_nothing() {
        let out = assemble(
            &Series::new(),
            &[Sample::projected(d(2), 80.0)],
            ChartMode::ActualRangeOnly,
        );
        assert!(out.is_empty());
    }
}
