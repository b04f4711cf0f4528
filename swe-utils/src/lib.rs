//! Shared utility functions for SWE hindcast crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    /// Key format used for date-keyed datasets and date columns: "YYYY-MM-DD"
    pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_KEY_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)?)
    }

    /// Parse a year given as a number or a string such as "2019".
    pub fn parse_year(s: &str) -> anyhow::Result<i32> {
        let year: i32 = s.trim().parse()?;
        if !(1000..=9999).contains(&year) {
            anyhow::bail!("year out of range: {year}");
        }
        Ok(year)
    }

    /// Get the water year for a given date.
    /// Water year runs Oct 1 to Sep 30 and is named for the year it ends in.
    /// e.g., Oct 1 2022 -> water year 2023, Sep 30 2023 -> water year 2023
    pub fn water_year_for_date(date: &NaiveDate) -> i32 {
        if date.month() >= 10 {
            date.year() + 1
        } else {
            date.year()
        }
    }

    /// October 1 of the water year containing `date`.
    pub fn water_year_start(date: &NaiveDate) -> NaiveDate {
        let start_year = water_year_for_date(date) - 1;
        // October 1 exists in every year
        NaiveDate::from_ymd_opt(start_year, 10, 1).unwrap_or(*date)
    }

}
