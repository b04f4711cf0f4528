use crate::region::Region;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One held-out ground observation of snow water equivalent at a grid cell.
///
/// Read from a per-region observation table with the header
/// `cell_id,Date,SWE,Long,Lat,elevation_m,WYWeek,northness,VIIRS_SCA,hasSnow`.
/// Extra columns are ignored. Empty numeric cells read as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteObservation {
    pub cell_id: String,
    #[serde(rename = "Date", deserialize_with = "de_date")]
    pub date: NaiveDate,
    /// Observed SWE, the ground truth a prediction is scored against
    #[serde(rename = "SWE", deserialize_with = "de_f64_or_nan")]
    pub swe: f64,
    #[serde(rename = "Long", deserialize_with = "de_f64_or_nan")]
    pub longitude: f64,
    #[serde(rename = "Lat", deserialize_with = "de_f64_or_nan")]
    pub latitude: f64,
    #[serde(deserialize_with = "de_f64_or_nan")]
    pub elevation_m: f64,
    /// Week number within the water year
    #[serde(rename = "WYWeek", deserialize_with = "de_f64_or_nan")]
    pub wy_week: f64,
    #[serde(deserialize_with = "de_f64_or_nan")]
    pub northness: f64,
    /// VIIRS fractional snow-covered area
    #[serde(rename = "VIIRS_SCA", deserialize_with = "de_f64_or_nan")]
    pub viirs_sca: f64,
    #[serde(rename = "hasSnow", deserialize_with = "de_flag")]
    pub has_snow: bool,
}

/// A site observation tagged with the region it was loaded for.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalObservation {
    pub region: Region,
    pub observation: SiteObservation,
}

impl RegionalObservation {
    /// Observed SWE under its canonical evaluation name.
    pub fn y_test(&self) -> f64 {
        self.observation.swe
    }

    pub fn cell_id(&self) -> &str {
        &self.observation.cell_id
    }

    pub fn date(&self) -> NaiveDate {
        self.observation.date
    }
}

/// Static attributes of a site in the region-to-sites mapping.
///
/// Any additional numeric feature columns of the mapping are kept in
/// `features` and written back unchanged. Missing values are `null` in the
/// JSON mapping: they read as NaN (or `None` for features) and NaN is
/// written back as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSite {
    pub cell_id: String,
    #[serde(rename = "Long", deserialize_with = "de_null_as_nan")]
    pub longitude: f64,
    #[serde(rename = "Lat", deserialize_with = "de_null_as_nan")]
    pub latitude: f64,
    #[serde(deserialize_with = "de_null_as_nan")]
    pub elevation_m: f64,
    #[serde(deserialize_with = "de_null_as_nan")]
    pub northness: f64,
    #[serde(flatten)]
    pub features: BTreeMap<String, Option<f64>>,
}

impl From<&SiteObservation> for RegionSite {
    fn from(obs: &SiteObservation) -> Self {
        RegionSite {
            cell_id: obs.cell_id.clone(),
            longitude: obs.longitude,
            latitude: obs.latitude,
            elevation_m: obs.elevation_m,
            northness: obs.northness,
            features: BTreeMap::new(),
        }
    }
}

/// Mapping of region label to the sites assigned to it.
pub type RegionMap = BTreeMap<String, Vec<RegionSite>>;

fn de_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    // tolerate a trailing time component such as "2019-01-01 00:00:00"
    let day = raw.trim().get(..10).unwrap_or(raw.trim());
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

fn de_f64_or_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(serde::de::Error::custom)
}

// serde_json writes NaN as null, so null has to read back as NaN
fn de_null_as_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "true" | "True" | "TRUE" | "1" | "1.0" => Ok(true),
        "false" | "False" | "FALSE" | "0" | "0.0" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!("invalid hasSnow flag: {other}"))),
    }
}
