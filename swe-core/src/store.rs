//! Keyed table storage.
//!
//! A dataset is a directory holding one CSV file per key, `{root}/{key}.csv`.
//! Date keys keep the `YYYY-MM-DD` form, so the dataset of weekly predictions
//! for water year 2019 holds `2018-10-02.csv`, `2018-10-09.csv`, and so on.

use crate::error::{HindcastError, Result};
use crate::frame::Frame;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const EXTENSION: &str = "csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStore {
    root: PathBuf,
}

impl TableStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        TableStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{EXTENSION}"))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    /// All keys in the dataset, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(HindcastError::missing(&self.root));
        }
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    pub fn read_frame(&self, key: &str, index_col: &str) -> Result<Frame> {
        let file = self.open(key)?;
        Frame::from_csv(BufReader::new(file), index_col).map_err(|e| self.annotate(key, e))
    }

    pub fn write_frame(&self, key: &str, frame: &Frame) -> Result<()> {
        let file = self.create(key)?;
        frame.write_csv(BufWriter::new(file))?;
        log::debug!("wrote {} rows to {}", frame.len(), self.path_for(key).display());
        Ok(())
    }

    /// Deserialize every row of `key` by header name.
    pub fn read_records<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let file = self.open(key)?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(BufReader::new(file));
        rdr.deserialize()
            .collect::<std::result::Result<Vec<T>, csv::Error>>()
            .map_err(|e| self.annotate(key, e.into()))
    }

    pub fn write_records<T: Serialize>(&self, key: &str, records: &[T]) -> Result<()> {
        let file = self.create(key)?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(BufWriter::new(file));
        for record in records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        log::debug!("wrote {} records to {}", records.len(), self.path_for(key).display());
        Ok(())
    }

    fn open(&self, key: &str) -> Result<File> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Err(HindcastError::missing(path));
        }
        Ok(File::open(path)?)
    }

    fn create(&self, key: &str) -> Result<File> {
        fs::create_dir_all(&self.root)?;
        Ok(File::create(self.path_for(key))?)
    }

    /// Deserialize failures mean a column is missing or malformed.
    fn annotate(&self, key: &str, err: HindcastError) -> HindcastError {
        let path = self.path_for(key);
        match err {
            HindcastError::Csv(e) if matches!(e.kind(), csv::ErrorKind::Deserialize { .. }) => {
                HindcastError::Schema(format!("{}: {e}", path.display()))
            }
            HindcastError::Schema(msg) => HindcastError::Schema(format!("{}: {msg}", path.display())),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::SiteObservation;

    #[test]
    fn test_frame_round_trip_and_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(dir.path().join("2019_predictions"));
        let mut frame = Frame::new("cell_id", vec!["2018-10-02".to_string()]);
        frame.push_row("a", vec![1.0]).unwrap();
        store.write_frame("2018-10-02", &frame).unwrap();
        store.write_frame("2018-10-09", &frame).unwrap();

        assert!(store.contains("2018-10-02"));
        assert!(!store.contains("2018-10-16"));
        assert_eq!(store.keys().unwrap(), vec!["2018-10-02", "2018-10-09"]);
        let read = store.read_frame("2018-10-02", "cell_id").unwrap();
        assert_eq!(read, frame);
    }

    #[test]
    fn test_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(dir.path());
        let err = store.read_frame("2018-10-02", "cell_id").unwrap_err();
        assert!(matches!(err, HindcastError::MissingInput { .. }));
    }

    #[test]
    fn test_missing_dataset_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(dir.path().join("nope"));
        assert!(matches!(store.keys(), Err(HindcastError::MissingInput { .. })));
    }

    #[test]
    fn test_records_with_missing_column_are_schema_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = TableStore::new(dir.path());
        fs::write(store.path_for("N_Sierras"), "cell_id,Date\nc1,2019-01-01\n").unwrap();
        let err = store.read_records::<SiteObservation>("N_Sierras").unwrap_err();
        assert!(matches!(err, HindcastError::Schema(_)));
    }
}
