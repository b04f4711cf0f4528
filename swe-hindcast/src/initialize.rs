//! Seed a new hindcast water year from the previous year's submission table.

use crate::backfill::add_prediction_locations;
use crate::config::{HindcastPaths, InitOptions};
use std::fs::File;
use std::io::BufReader;
use swe_core::error::{HindcastError, Result};
use swe_core::frame::Frame;
use swe_utils::dates::format_date;

/// Index column of submission and prediction tables.
pub const SITE_KEY: &str = "cell_id";

/// Roll the source year's submission table forward into the new water year.
///
/// A zeroed `{source}-10-01` column is added (or an existing one zeroed), and
/// the `{source}-10-02` column is relabeled to the new start year's October 2
/// and zeroed. Every other column is kept as is.
pub fn seed_submission(paths: &HindcastPaths, source_year: i32) -> Result<Frame> {
    let source = paths.submission_source(source_year);
    if !source.is_file() {
        return Err(HindcastError::missing(source));
    }
    let mut table = Frame::from_csv(BufReader::new(File::open(&source)?), SITE_KEY)?;

    let sentinel = format!("{source_year}-10-02");
    let new_column = format_date(&paths.water_year.hindcast_start());
    if !table.has_column(&sentinel) {
        return Err(HindcastError::Schema(format!(
            "{}: column '{sentinel}' not found",
            source.display()
        )));
    }
    table.fill_column(&format!("{source_year}-10-01"), 0.0);
    table.rename_column(&sentinel, &new_column)?;
    table.fill_column(&new_column, 0.0);
    Ok(table)
}

/// Create the start files for a hindcast and return its evaluation dates.
///
/// Writes the seeded submission table to the submission dataset under the
/// water year's seed key, then lists weekly dates from October 2 through
/// June 26 as `YYYY-MM-DD` strings.
pub fn initialize(paths: &HindcastPaths, options: &InitOptions) -> Result<Vec<String>> {
    log::info!(
        "Creating files for a historical simulation within {} regions for water year {}",
        options.regions.join(", "),
        paths.water_year.0
    );
    log::debug!("threshold {}", options.threshold);

    let seeded = seed_submission(paths, options.source_year)?;
    let key = paths.water_year.seed_key();
    paths.submission_store().write_frame(&key, &seeded)?;
    log::info!("Seeded submission table with {} sites under {}", seeded.len(), key);

    let dates: Vec<String> = paths
        .water_year
        .hindcast_dates()
        .map(|d| format_date(&d))
        .collect();

    if options.backfill {
        let start = paths.water_year.hindcast_start();
        add_prediction_locations(&options.regions, paths, start, &seeded)?;
    }

    log::info!("New simulation start files complete");
    Ok(dates)
}
