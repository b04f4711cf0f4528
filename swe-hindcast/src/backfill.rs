//! Make sure every held-out observation site is part of the prediction set.
//!
//! Sites observed in the hold-out year but absent from the prediction table
//! are classified into a region, merged into the region-to-sites mapping and
//! given zero-filled seed predictions for the week before the hindcast starts.

use crate::config::HindcastPaths;
use crate::initialize::SITE_KEY;
use crate::observations::load_observations;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use swe_core::error::{HindcastError, LookupMiss, Result};
use swe_core::frame::Frame;
use swe_core::region::{classify_or, Region};
use swe_core::site::{RegionSite, RegionMap};
use swe_core::water_year::lag_date;

/// Week number written into backfilled seed predictions.
pub const SEED_WY_WEEK: f64 = 52.0;

/// Regions whose sites are pooled and reclassified.
const POOLED_REGIONS: [Region; 2] = [Region::NorthernSierras, Region::SouthernSierras];

/// Whether `cell_id` has a row in the prediction table.
fn predicted(known: &HashSet<&str>, cell_id: &str) -> std::result::Result<(), LookupMiss> {
    if known.contains(cell_id) {
        Ok(())
    } else {
        Err(LookupMiss {
            cell_id: cell_id.to_string(),
            table: "prediction table".to_string(),
        })
    }
}

pub fn read_region_map(path: &Path) -> Result<RegionMap> {
    if !path.is_file() {
        return Err(HindcastError::missing(path));
    }
    Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
}

pub fn write_region_map(path: &Path, map: &RegionMap) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), map)?;
    Ok(())
}

/// Reclassify the pooled sites plus `new_sites` and rebuild the northern and
/// southern regions, splitting the south by elevation.
///
/// Keys of `map` other than the four rebuilt regions are kept unchanged.
/// Sites outside every region box are dropped. Southern sites with an
/// unknown elevation stay in `S_Sierras` but join neither elevation band.
pub fn merge_sites(map: &RegionMap, new_sites: Vec<RegionSite>) -> RegionMap {
    let mut pool: Vec<RegionSite> = Vec::new();
    for region in &POOLED_REGIONS {
        match map.get(region.as_str()) {
            Some(sites) => pool.extend(sites.iter().cloned()),
            None => log::warn!("region mapping has no {region} entry"),
        }
    }
    let mut seen: HashSet<String> = pool.iter().map(|s| s.cell_id.clone()).collect();
    for site in new_sites {
        if seen.insert(site.cell_id.clone()) {
            pool.push(site);
        }
    }

    let mut merged = map.clone();
    for region in [
        Region::NorthernSierras,
        Region::SouthernSierras,
        Region::SouthernSierrasLow,
        Region::SouthernSierrasHigh,
    ] {
        merged.insert(region.to_string(), Vec::new());
    }

    let mut unassigned = 0usize;
    for site in pool {
        let region = classify_or(Region::Unassigned, site.longitude, site.latitude);
        match region {
            Region::Unassigned => unassigned += 1,
            Region::SouthernSierras => {
                match Region::southern_by_elevation(site.elevation_m) {
                    Some(band) => merged.entry(band.to_string()).or_default().push(site.clone()),
                    None => log::warn!(
                        "{}: elevation unknown, left out of the elevation bands",
                        site.cell_id
                    ),
                }
                merged.entry(region.to_string()).or_default().push(site);
            }
            other => merged.entry(other.to_string()).or_default().push(site),
        }
    }
    if unassigned > 0 {
        log::info!("{unassigned} sites fall outside every region");
    }
    merged
}

/// Seed predictions for one region: one row per mapped site with its static
/// attributes, every prediction column missing from the site table set to
/// zero, and `WYWeek` fixed at 52.
pub fn seed_predictions(sites: &[RegionSite], previous: &Frame) -> Result<Frame> {
    let features: BTreeSet<&str> = sites
        .iter()
        .flat_map(|s| s.features.keys().map(String::as_str))
        .collect();
    let mut columns: Vec<String> = ["Long", "Lat", "elevation_m", "northness"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    columns.extend(features.iter().map(|f| f.to_string()));

    let mut frame = Frame::new(SITE_KEY, columns);
    for site in sites {
        let mut values = vec![site.longitude, site.latitude, site.elevation_m, site.northness];
        values.extend(
            features
                .iter()
                .map(|f| site.features.get(*f).copied().flatten().unwrap_or(f64::NAN)),
        );
        frame.push_row(site.cell_id.clone(), values)?;
    }

    for column in previous.columns() {
        if !frame.has_column(column) {
            frame.fill_column(column, 0.0);
        }
    }
    frame.fill_column("WYWeek", SEED_WY_WEEK);
    Ok(frame)
}

/// Add held-out observation sites missing from `predictions` to the region
/// mapping and rewrite the seed predictions for the week before `start_date`.
///
/// Writes the updated mapping to `RegionVal2.json` and, for each region,
/// overwrites its table in the `predictions{lag}` dataset. Returns the
/// updated mapping.
pub fn add_prediction_locations(
    regions: &[String],
    paths: &HindcastPaths,
    start_date: NaiveDate,
    predictions: &Frame,
) -> Result<RegionMap> {
    log::info!("Making sure all testing locations are in prediction dataframe.");
    let observations = load_observations(&paths.observation_store(), regions)?;

    let known: HashSet<&str> = predictions.ids().collect();
    let mut checked: HashSet<&str> = HashSet::new();
    let mut new_sites = Vec::new();
    for obs in &observations {
        if !checked.insert(obs.cell_id()) {
            continue;
        }
        if let Err(miss) = predicted(&known, obs.cell_id()) {
            log::debug!("{miss}");
            new_sites.push(RegionSite::from(&obs.observation));
        }
    }
    log::info!("{} observation sites missing from predictions", new_sites.len());

    let map = read_region_map(&paths.region_map())?;
    let updated = merge_sites(&map, new_sites);
    write_region_map(&paths.updated_region_map(), &updated)?;

    let lag = lag_date(start_date);
    let store = paths.seed_prediction_store(lag);
    for region in regions {
        let sites = updated.get(region).ok_or_else(|| {
            HindcastError::Schema(format!("region '{region}' not in region mapping"))
        })?;
        let previous = store.read_frame(region, SITE_KEY)?;
        let seeded = seed_predictions(sites, &previous)?;
        store.write_frame(region, &seeded)?;
        log::info!("{region}: seeded {} sites for {}", seeded.len(), lag);
    }
    Ok(updated)
}
