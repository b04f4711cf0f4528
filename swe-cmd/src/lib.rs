//! Command implementations for the SWE hindcast CLI.
//!
//! Each subcommand maps its flags one-to-one onto the library parameters
//! of `swe-hindcast`.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use swe_core::water_year::WaterYear;
use swe_hindcast::config::{HindcastPaths, DEFAULT_SOURCE_YEAR};

pub mod backfill;
pub mod evaluate;
pub mod init;

/// Locations and water year shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Working directory holding Predictions/Hold_Out_Year
    #[arg(long, default_value = ".")]
    pub cwd: PathBuf,

    /// Data directory holding data/PreProcessed and data/RegionWYTest
    #[arg(long)]
    pub datapath: PathBuf,

    /// Water year to hindcast, named for the year it ends in (e.g. 2019)
    #[arg(short = 'y', long)]
    pub water_year: String,

    /// Regions to process
    #[arg(short = 'r', long, value_delimiter = ',', default_value = "N_Sierras,S_Sierras")]
    pub regions: Vec<String>,
}

impl CommonArgs {
    pub fn paths(&self) -> anyhow::Result<HindcastPaths> {
        let water_year = WaterYear::parse(&self.water_year)?;
        Ok(HindcastPaths::new(&self.cwd, &self.datapath, water_year))
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Seed a new water year's submission table and list its evaluation dates
    Init {
        #[command(flatten)]
        common: CommonArgs,

        /// Threshold passed through to downstream consumers
        #[arg(long, default_value_t = 0.9)]
        threshold: f64,

        /// Water year whose submission table is rolled forward
        #[arg(long, default_value_t = DEFAULT_SOURCE_YEAR)]
        source_year: i32,

        /// Also add unpredicted observation sites to the region mapping
        #[arg(long)]
        backfill: bool,
    },

    /// Assemble and write per-region evaluation tables
    Evaluate {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Add unpredicted observation sites to the region mapping and seed files
    Backfill {
        #[command(flatten)]
        common: CommonArgs,

        /// First hindcast date (YYYY-MM-DD); defaults to October 2 of the start year
        #[arg(long)]
        start_date: Option<String>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Init {
            common,
            threshold,
            source_year,
            backfill,
        } => init::run_init(&common, threshold, source_year, backfill),
        Command::Evaluate { common } => evaluate::run_evaluate(&common),
        Command::Backfill { common, start_date } => {
            backfill::run_backfill(&common, start_date.as_deref())
        }
    }
}
