/// Error types for hindcast preparation
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for hindcast operations
#[derive(Error, Debug)]
pub enum HindcastError {
    /// An expected input file or dataset key is absent
    #[error("Missing input: {}", path.display())]
    MissingInput { path: PathBuf },

    /// An expected column is absent or malformed
    #[error("Schema error: {0}")]
    Schema(String),

    /// Failed to read or write CSV data
    #[error("Failed to process CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to read or write the region mapping
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure other than a missing input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Date or year parsing failed
    #[error("Failed to parse date: {0}")]
    DateParse(String),
}

impl HindcastError {
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        HindcastError::MissingInput { path: path.into() }
    }
}

/// Type alias for Results using HindcastError
pub type Result<T> = std::result::Result<T, HindcastError>;

/// A site with no record in a secondary table.
///
/// Never propagated as a failure: callers log it and fall back to a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupMiss {
    pub cell_id: String,
    pub table: String,
}

impl fmt::Display for LookupMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no record for site {} in {}", self.cell_id, self.table)
    }
}
