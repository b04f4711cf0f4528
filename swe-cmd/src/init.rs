//! Seed a hindcast water year.

use crate::CommonArgs;
use anyhow::Context;
use log::info;
use swe_hindcast::config::InitOptions;
use swe_hindcast::initialize::initialize;

/// Seed the submission table and print the evaluation dates, one per line.
pub fn run_init(
    common: &CommonArgs,
    threshold: f64,
    source_year: i32,
    backfill: bool,
) -> anyhow::Result<()> {
    let paths = common.paths()?;
    let options = InitOptions {
        threshold,
        regions: common.regions.clone(),
        source_year,
        backfill,
    };
    let dates = initialize(&paths, &options)
        .with_context(|| format!("initializing water year {}", paths.water_year.0))?;
    info!("{} evaluation dates", dates.len());
    for date in &dates {
        println!("{date}");
    }
    Ok(())
}
