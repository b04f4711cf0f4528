//! Assemble evaluation tables for a hindcast water year.

use crate::CommonArgs;
use anyhow::Context;
use log::info;
use swe_hindcast::evaluate::{assemble_evaluation, write_evaluation};
use swe_utils::dates::format_date;

pub fn run_evaluate(common: &CommonArgs) -> anyhow::Result<()> {
    let paths = common.paths()?;
    let dates: Vec<String> = paths
        .water_year
        .hindcast_dates()
        .map(|d| format_date(&d))
        .collect();

    let tables = assemble_evaluation(&dates, &common.regions, &paths)
        .context("assembling evaluation tables")?;
    write_evaluation(&paths, &tables).context("writing evaluation tables")?;

    info!(
        "Evaluation tables for {} regions written to {}",
        tables.len(),
        paths.evaluation_store().root().display()
    );
    Ok(())
}
