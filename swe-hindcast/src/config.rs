//! Path layout and run options for a hindcast.
//!
//! Every input and output location is derived from the working directory,
//! the data directory and the target water year.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;
use swe_core::store::TableStore;
use swe_core::water_year::WaterYear;
use swe_utils::dates::format_date;

/// Water year whose submission table seeds a new hindcast by default.
pub const DEFAULT_SOURCE_YEAR: i32 = 2022;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HindcastPaths {
    /// Working directory holding `Predictions/Hold_Out_Year/...`
    pub cwd: PathBuf,
    /// Data directory holding `data/...`
    pub datapath: PathBuf,
    pub water_year: WaterYear,
}

impl HindcastPaths {
    pub fn new(cwd: impl Into<PathBuf>, datapath: impl Into<PathBuf>, water_year: WaterYear) -> Self {
        HindcastPaths {
            cwd: cwd.into(),
            datapath: datapath.into(),
            water_year,
        }
    }

    fn hold_out_dir(&self) -> PathBuf {
        self.cwd.join("Predictions").join("Hold_Out_Year")
    }

    pub fn predictions_dir(&self) -> PathBuf {
        self.hold_out_dir().join("Predictions")
    }

    pub fn preprocessed_dir(&self) -> PathBuf {
        self.datapath.join("data").join("PreProcessed")
    }

    /// Previous water year's submission-format table.
    pub fn submission_source(&self, source_year: i32) -> PathBuf {
        self.preprocessed_dir()
            .join(format!("submission_format_{source_year}-09-24.csv"))
    }

    /// Seeded submission tables, keyed by seed date.
    pub fn submission_store(&self) -> TableStore {
        TableStore::new(self.predictions_dir().join("submission_format"))
    }

    /// Weekly predictions for the water year, keyed by date.
    pub fn prediction_store(&self) -> TableStore {
        TableStore::new(
            self.predictions_dir()
                .join(format!("{}_predictions", self.water_year.0)),
        )
    }

    /// Per-region seed predictions for one date, keyed by region.
    pub fn seed_prediction_store(&self, date: NaiveDate) -> TableStore {
        TableStore::new(
            self.predictions_dir()
                .join(format!("predictions{}", format_date(&date))),
        )
    }

    /// Held-out observations, keyed by region.
    pub fn observation_store(&self) -> TableStore {
        TableStore::new(self.datapath.join("data").join("RegionWYTest"))
    }

    /// Assembled evaluation tables, keyed by region.
    pub fn evaluation_store(&self) -> TableStore {
        TableStore::new(self.hold_out_dir().join("Evaluation"))
    }

    pub fn region_map(&self) -> PathBuf {
        self.preprocessed_dir().join("RegionVal.json")
    }

    pub fn updated_region_map(&self) -> PathBuf {
        self.preprocessed_dir().join("RegionVal2.json")
    }
}

/// Parameters of [`crate::initialize::initialize`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InitOptions {
    /// Passed through for downstream consumers; not used when seeding.
    #[serde(default)]
    pub threshold: f64,
    pub regions: Vec<String>,
    #[serde(default = "default_source_year")]
    pub source_year: i32,
    /// Also run the prediction location backfill after seeding.
    #[serde(default)]
    pub backfill: bool,
}

fn default_source_year() -> i32 {
    DEFAULT_SOURCE_YEAR
}
