//! Common calendar helpers for weightcast_core.

use chrono::{Days, NaiveDate};

/// Number of days in one week.
pub const DAYS_PER_WEEK: f64 = 7.0;

/// Signed whole days from `from` to `to`.
#[inline]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Signed fractional weeks from `from` to `to`.
#[inline]
pub fn weeks_between(from: NaiveDate, to: NaiveDate) -> f64 {
    days_between(from, to) as f64 / DAYS_PER_WEEK
}

/// `date + days`, saturating at `NaiveDate::MAX` instead of overflowing.
#[inline]
pub fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}
