use chrono::{Local, NaiveDate};

/// Calendar abstraction used wherever the forecasting stack needs "today".
///
/// - today(): the current local calendar date
/// - days_since(): helper to compute whole days elapsed since an epoch date
///
/// The engine itself never reads wall-clock time; callers inject it through this trait.
pub trait Calendar {
    fn today(&self) -> NaiveDate;

    /// Whole days elapsed since `epoch`, saturating at 0 when `epoch` is in the future.
    fn days_since(&self, epoch: NaiveDate) -> u64 {
        let days = self.today().signed_duration_since(epoch).num_days();
        days.max(0) as u64
    }
}

/// Default calendar backed by the local system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCalendar;

impl SystemCalendar {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Calendar for SystemCalendar {
    #[inline]
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Deterministic calendar pinned to a single date. Useful for tests and replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCalendar {
    date: NaiveDate,
}

impl FixedCalendar {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Move the pinned date forward by `days`.
    pub fn advance_days(&mut self, days: u64) {
        if let Some(next) = self.date.checked_add_days(chrono::Days::new(days)) {
            self.date = next;
        }
    }
}

impl Calendar for FixedCalendar {
    fn today(&self) -> NaiveDate {
        self.date
    }
}
