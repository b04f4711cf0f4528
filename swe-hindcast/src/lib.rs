//! Hindcast preparation for snow water equivalent models.
//!
//! This crate rolls a prior water year's submission table into a new water
//! year, assembles held-out observations and weekly predictions into
//! per-region evaluation tables, and backfills observation sites that are
//! missing from the prediction set.
//!
//! # Usage
//!
//! ```no_run
//! use swe_core::water_year::WaterYear;
//! use swe_hindcast::config::{HindcastPaths, InitOptions};
//! use swe_hindcast::evaluate::{assemble_evaluation, write_evaluation};
//! use swe_hindcast::initialize::initialize;
//!
//! let paths = HindcastPaths::new("/work", "/data", WaterYear(2019));
//! let options = InitOptions {
//!     threshold: 0.9,
//!     regions: vec!["N_Sierras".to_string(), "S_Sierras".to_string()],
//!     source_year: 2022,
//!     backfill: false,
//! };
//! let dates = initialize(&paths, &options).unwrap();
//! let tables = assemble_evaluation(&dates, &options.regions, &paths).unwrap();
//! write_evaluation(&paths, &tables).unwrap();
//! ```

pub mod backfill;
pub mod config;
pub mod evaluate;
pub mod initialize;
mod observations;

pub use observations::load_observations;
