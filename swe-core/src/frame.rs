//! A small ordered table of `f64` columns indexed by a string key.
//!
//! Used for tables whose column set is not fixed ahead of time, such as the
//! submission format (one column per forecast date) or a region's seed
//! predictions (one column per model feature).

use crate::error::{HindcastError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashMap;
use std::io::{Read, Write};

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    index_name: String,
    columns: Vec<String>,
    index: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl Frame {
    pub fn new(index_name: impl Into<String>, columns: Vec<String>) -> Self {
        Frame {
            index_name: index_name.into(),
            columns,
            index: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Parse CSV with headers. `index_col` names the key column; every other
    /// column must be numeric. Empty cells read as NaN.
    pub fn from_csv<R: Read>(reader: R, index_col: &str) -> Result<Frame> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();
        let index_pos = headers
            .iter()
            .position(|h| h.trim() == index_col)
            .ok_or_else(|| HindcastError::Schema(format!("index column '{index_col}' not found")))?;
        let columns: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index_pos)
            .map(|(_, h)| h.trim().to_string())
            .collect();

        let mut frame = Frame::new(index_col, columns);
        for result in rdr.records() {
            let record = result?;
            let id = record.get(index_pos).unwrap_or("").trim().to_string();
            let mut values = Vec::with_capacity(frame.columns.len());
            for (i, cell) in record.iter().enumerate() {
                if i == index_pos {
                    continue;
                }
                let cell = cell.trim();
                let value = if cell.is_empty() {
                    f64::NAN
                } else {
                    cell.parse::<f64>().map_err(|_| {
                        HindcastError::Schema(format!(
                            "non-numeric value '{cell}' in column '{}' for {id}",
                            headers.get(i).unwrap_or("?")
                        ))
                    })?
                };
                values.push(value);
            }
            frame.index.push(id);
            frame.rows.push(values);
        }
        Ok(frame)
    }

    /// Write as CSV with the index column first. NaN is written as an empty cell.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(self.index_name.as_str());
        header.extend(self.columns.iter().map(String::as_str));
        wtr.write_record(&header)?;
        for (id, values) in self.index.iter().zip(&self.rows) {
            let mut record = Vec::with_capacity(values.len() + 1);
            record.push(id.clone());
            record.extend(values.iter().map(|v| format_cell(*v)));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.index.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_position(name).is_some()
    }

    /// Append a row. The value count must match the column count.
    pub fn push_row(&mut self, id: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let id = id.into();
        if values.len() != self.columns.len() {
            return Err(HindcastError::Schema(format!(
                "row {id} has {} values, expected {}",
                values.len(),
                self.columns.len()
            )));
        }
        self.index.push(id);
        self.rows.push(values);
        Ok(())
    }

    /// Values of one column keyed by row id. Later duplicates of an id win.
    pub fn column_map(&self, name: &str) -> Option<HashMap<String, f64>> {
        let pos = self.column_position(name)?;
        Some(
            self.index
                .iter()
                .zip(&self.rows)
                .map(|(id, row)| (id.clone(), row[pos]))
                .collect(),
        )
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<()> {
        let pos = self
            .column_position(from)
            .ok_or_else(|| HindcastError::Schema(format!("column '{from}' not found")))?;
        self.columns[pos] = to.to_string();
        Ok(())
    }

    /// Set every value of `name` to `value`, appending the column if absent.
    pub fn fill_column(&mut self, name: &str, value: f64) {
        match self.column_position(name) {
            Some(pos) => {
                for row in &mut self.rows {
                    row[pos] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(value);
                }
            }
        }
    }
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}
