//! Backfill prediction locations against a seeded submission table.

use crate::CommonArgs;
use anyhow::Context;
use log::info;
use swe_hindcast::backfill::add_prediction_locations;
use swe_hindcast::initialize::SITE_KEY;
use swe_utils::dates::parse_date;

/// Run the backfill against the submission table seeded by `init`.
pub fn run_backfill(common: &CommonArgs, start_date: Option<&str>) -> anyhow::Result<()> {
    let paths = common.paths()?;
    let start = match start_date {
        Some(s) => parse_date(s).with_context(|| format!("invalid start date {s}"))?,
        None => paths.water_year.hindcast_start(),
    };

    let key = paths.water_year.seed_key();
    let predictions = paths
        .submission_store()
        .read_frame(&key, SITE_KEY)
        .with_context(|| format!("reading seeded submission table {key}; run init first"))?;

    let updated = add_prediction_locations(&common.regions, &paths, start, &predictions)?;
    info!(
        "Region mapping now has {} regions: {}",
        updated.len(),
        updated.keys().cloned().collect::<Vec<_>>().join(", ")
    );
    Ok(())
}
