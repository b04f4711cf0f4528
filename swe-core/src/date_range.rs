use chrono::{NaiveDate, TimeDelta};
use std::mem::replace;

/// Default spacing between hindcast evaluation dates, in days.
pub const WEEKLY_STEP_DAYS: i64 = 7;

/// A date range iterator that yields dates from the start date through the
/// end date (inclusive), advancing by a fixed number of days.
///
/// The range is `Copy`, so iterating a saved copy restarts the
/// sequence from the beginning.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange {
    next: NaiveDate,
    end: NaiveDate,
    step: TimeDelta,
}

impl DateRange {
    /// Range with an arbitrary step. A step below one day is treated as one day.
    pub fn with_step(start: NaiveDate, end: NaiveDate, step_days: i64) -> Self {
        DateRange {
            next: start,
            end,
            step: TimeDelta::days(step_days.max(1)),
        }
    }

    /// Range stepping every seven days.
    pub fn weekly(start: NaiveDate, end: NaiveDate) -> Self {
        Self::with_step(start, end, WEEKLY_STEP_DAYS)
    }

    /// Step between consecutive dates, in days.
    pub fn step_days(&self) -> i64 {
        self.step.num_days()
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.next <= self.end {
            let following = self.next + self.step;
            Some(replace(&mut self.next, following))
        } else {
            None
        }
    }
}
