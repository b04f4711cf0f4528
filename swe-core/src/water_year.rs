use crate::date_range::DateRange;
use crate::error::{HindcastError, Result};
use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use swe_utils::dates::{format_date, parse_year, water_year_start};

/// Days between an evaluation date and the date its "previous week" values
/// come from.
pub const LAG_DAYS: i64 = 7;

/// California's water year runs from October 1 to September 30. A hindcast
/// water year is named for the calendar year it ends in, so water year 2019
/// spans October 2018 through September 2019.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaterYear(pub i32);

impl WaterYear {
    /// Parse a water year given as a number or string ("2019").
    pub fn parse(s: &str) -> Result<Self> {
        parse_year(s)
            .map(WaterYear)
            .map_err(|e| HindcastError::DateParse(format!("{s}: {e}")))
    }

    /// Calendar year in which the water year begins.
    pub fn start_year(&self) -> i32 {
        self.0 - 1
    }

    /// October 1 of the start year.
    pub fn start(&self) -> NaiveDate {
        ymd(self.start_year(), 10, 1)
    }

    /// First hindcast evaluation date: October 2 of the start year.
    pub fn hindcast_start(&self) -> NaiveDate {
        ymd(self.start_year(), 10, 2)
    }

    /// Last possible hindcast evaluation date: June 26 of the end year.
    pub fn hindcast_end(&self) -> NaiveDate {
        ymd(self.0, 6, 26)
    }

    /// Weekly evaluation dates from `hindcast_start` through `hindcast_end`.
    pub fn hindcast_dates(&self) -> DateRange {
        DateRange::weekly(self.hindcast_start(), self.hindcast_end())
    }

    /// Key under which the seeded submission table is stored: September 25
    /// of the start year.
    pub fn seed_key(&self) -> String {
        format_date(&ymd(self.start_year(), 9, 25))
    }
}

/// Date whose values serve as the "previous week" for `date`.
pub fn lag_date(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(LAG_DAYS)
}

/// True when the lag date of `date` falls before October 1 of `date`'s water
/// year, so no earlier predictions exist.
pub fn is_cold_start(date: NaiveDate) -> bool {
    lag_date(date) < water_year_start(&date)
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    // only called with fixed calendar days that exist in every year
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
