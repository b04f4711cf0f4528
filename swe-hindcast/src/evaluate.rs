//! Merge held-out observations with weekly predictions into per-region
//! evaluation tables.

use crate::config::HindcastPaths;
use crate::initialize::SITE_KEY;
use crate::observations::load_observations;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use swe_core::error::{HindcastError, LookupMiss, Result};
use swe_core::site::RegionalObservation;
use swe_core::store::TableStore;
use swe_core::water_year::{is_cold_start, lag_date};
use swe_utils::dates::{format_date, parse_date};

/// One site on one evaluation date.
///
/// Missing values are written as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRow {
    pub cell_id: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    pub y_test: f64,
    /// Observed SWE one week earlier
    pub y_test_prev: f64,
    pub y_pred: f64,
    /// Predicted SWE one week earlier
    #[serde(rename = "prev_SWE")]
    pub prev_swe: f64,
    #[serde(rename = "Long")]
    pub longitude: f64,
    #[serde(rename = "Lat")]
    pub latitude: f64,
    pub elevation_m: f64,
    #[serde(rename = "WYWeek")]
    pub wy_week: f64,
    pub northness: f64,
    #[serde(rename = "VIIRS_SCA")]
    pub viirs_sca: f64,
    #[serde(rename = "hasSnow")]
    pub has_snow: bool,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "prev_SWE_error")]
    pub prev_swe_error: f64,
    /// Same value as `y_pred`, under the name fSCA-adjusted consumers read.
    #[serde(rename = "y_pred_fSCA")]
    pub y_pred_fsca: f64,
}

impl EvaluationRow {
    fn new(obs: &RegionalObservation, y_pred: f64, prev_swe: f64, y_test_prev: f64) -> Self {
        let o = &obs.observation;
        let y_pred = zero_nan(y_pred);
        let prev_swe = zero_nan(prev_swe);
        let y_test_prev = zero_nan(y_test_prev);
        EvaluationRow {
            cell_id: o.cell_id.clone(),
            date: o.date,
            y_test: zero_nan(obs.y_test()),
            y_test_prev,
            y_pred,
            prev_swe,
            longitude: zero_nan(o.longitude),
            latitude: zero_nan(o.latitude),
            elevation_m: zero_nan(o.elevation_m),
            wy_week: zero_nan(o.wy_week),
            northness: zero_nan(o.northness),
            viirs_sca: zero_nan(o.viirs_sca),
            has_snow: o.has_snow,
            region: obs.region.to_string(),
            prev_swe_error: y_test_prev - prev_swe,
            y_pred_fsca: y_pred,
        }
    }
}

fn zero_nan(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Predicted SWE for every site on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionColumn {
    key: String,
    values: HashMap<String, f64>,
}

impl PredictionColumn {
    /// Read the column stored under `key`. The value column is the one named
    /// after the key, or the only non-index column.
    pub fn load(store: &TableStore, key: &str) -> Result<Self> {
        let frame = store.read_frame(key, SITE_KEY)?;
        let values = match frame.column_map(key) {
            Some(values) => values,
            None if frame.columns().len() == 1 => frame
                .column_map(&frame.columns()[0])
                .unwrap_or_default(),
            None => {
                return Err(HindcastError::Schema(format!(
                    "{}: no prediction column '{key}'",
                    store.path_for(key).display()
                )))
            }
        };
        Ok(PredictionColumn {
            key: key.to_string(),
            values,
        })
    }

    pub fn lookup(&self, cell_id: &str) -> std::result::Result<f64, LookupMiss> {
        self.values.get(cell_id).copied().ok_or_else(|| LookupMiss {
            cell_id: cell_id.to_string(),
            table: self.key.clone(),
        })
    }
}

/// Predictions from one week before an evaluation date.
#[derive(Debug, Clone, PartialEq)]
pub enum LagPrediction {
    /// The lag date precedes the water year, so every site starts at zero.
    ColdStart,
    Loaded(PredictionColumn),
}

impl LagPrediction {
    pub fn for_date(store: &TableStore, date: NaiveDate) -> Result<Self> {
        if is_cold_start(date) {
            Ok(LagPrediction::ColdStart)
        } else {
            PredictionColumn::load(store, &format_date(&lag_date(date))).map(LagPrediction::Loaded)
        }
    }

    pub fn lookup(&self, cell_id: &str) -> std::result::Result<f64, LookupMiss> {
        match self {
            LagPrediction::ColdStart => Ok(0.0),
            LagPrediction::Loaded(column) => column.lookup(cell_id),
        }
    }
}

fn or_zero(lookup: std::result::Result<f64, LookupMiss>) -> f64 {
    lookup.unwrap_or_else(|miss| {
        log::warn!("{miss}, using 0");
        0.0
    })
}

/// Build the evaluation table of every requested region.
///
/// For each date, rows are the sites observed on that date, in observation
/// file order. The result has one entry per requested region, possibly empty.
pub fn assemble_evaluation(
    dates: &[String],
    regions: &[String],
    paths: &HindcastPaths,
) -> Result<BTreeMap<String, Vec<EvaluationRow>>> {
    let observations = load_observations(&paths.observation_store(), regions)?;
    let mut by_date: HashMap<NaiveDate, Vec<&RegionalObservation>> = HashMap::new();
    for obs in &observations {
        by_date.entry(obs.date()).or_default().push(obs);
    }

    let store = paths.prediction_store();
    let mut rows = Vec::new();
    for key in dates {
        let date = parse_date(key).map_err(|e| HindcastError::DateParse(format!("{key}: {e}")))?;
        let current = PredictionColumn::load(&store, key)?;
        let previous = LagPrediction::for_date(&store, date)?;

        let lag = lag_date(date);
        // a cell can sit in more than one region file, each with its own value
        let previous_obs: HashMap<(&str, &str), f64> = match by_date.get(&lag) {
            Some(slice) => slice
                .iter()
                .map(|o| ((o.region.as_str(), o.cell_id()), o.y_test()))
                .collect(),
            None => {
                log::warn!("No previous observations for {key}");
                HashMap::new()
            }
        };

        let today = by_date.get(&date).map(Vec::as_slice).unwrap_or_default();
        for obs in today {
            let y_pred = or_zero(current.lookup(obs.cell_id()));
            let prev_swe = or_zero(previous.lookup(obs.cell_id()));
            let y_test_prev = previous_obs
                .get(&(obs.region.as_str(), obs.cell_id()))
                .copied()
                .unwrap_or(0.0);
            rows.push(EvaluationRow::new(obs, y_pred, prev_swe, y_test_prev));
        }
        log::debug!("{key}: {} observed sites", today.len());
    }

    let mut tables: BTreeMap<String, Vec<EvaluationRow>> =
        regions.iter().map(|r| (r.clone(), Vec::new())).collect();
    for row in rows {
        if let Some(table) = tables.get_mut(&row.region) {
            table.push(row);
        }
    }
    for (region, table) in &tables {
        log::info!("{region}: {} evaluation rows", table.len());
    }
    Ok(tables)
}

/// Write each region's evaluation table under its region key.
pub fn write_evaluation(
    paths: &HindcastPaths,
    tables: &BTreeMap<String, Vec<EvaluationRow>>,
) -> Result<()> {
    let store = paths.evaluation_store();
    for (region, rows) in tables {
        store.write_records(region, rows)?;
    }
    Ok(())
}
