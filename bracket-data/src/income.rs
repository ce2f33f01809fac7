//! CSV loader for the income dataset.
//!
//! ## CSV Format
//!
//! Any columns are accepted; only the income column (default `Income`) is
//! read. Every other cell is carried through unchanged so it can be written
//! back next to the derived bracket columns. Header matching for the income
//! column is case-insensitive.
//!
//! ```csv
//! Name,Income
//! Avery,40000
//! Blake,"148,269"
//! ```
//!
//! A blank or non-numeric income is loaded as `None` (with a warning) and
//! simply never matches a bracket.
//!
//! A previously processed file can be loaded again: columns named like the
//! derived output columns are located so the writer overwrites them rather
//! than appending a second set.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use bracket_core::IncomeRecord;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cells::parse_amount;
use crate::writer::DERIVED_HEADERS;

/// Errors that can occur while loading an income dataset.
#[derive(Debug, Error)]
pub enum IncomeLoadError {
    /// Bad CSV structure (including rows with the wrong number of cells).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("cannot open income file: {0}")]
    Io(#[from] std::io::Error),

    #[error("income data is missing required column '{column}'")]
    MissingColumn { column: String },
}

/// Header name of the income column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeColumns {
    pub income: String,
}

impl Default for IncomeColumns {
    fn default() -> Self {
        Self {
            income: "Income".to_string(),
        }
    }
}

/// One input row: its original cells and the record derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeRow {
    pub cells: Vec<String>,
    pub record: IncomeRecord,
}

/// An income file held in memory, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomeDataset {
    pub headers: Vec<String>,
    pub rows: Vec<IncomeRow>,
    /// Input column holding each of [`DERIVED_HEADERS`], in the same order;
    /// `None` where the input has no such column.
    pub derived_columns: [Option<usize>; 5],
}

impl IncomeDataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &IncomeRecord> + '_ {
        self.rows.iter().map(|row| &row.record)
    }

    /// Mutable access for in-place annotation.
    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut IncomeRecord> + '_ {
        self.rows.iter_mut().map(|row| &mut row.record)
    }
}

pub struct IncomeLoader;

impl IncomeLoader {
    /// Parse an income dataset from a CSV reader.
    ///
    /// # Errors
    ///
    /// * [`IncomeLoadError::MissingColumn`] if the income header is absent.
    /// * [`IncomeLoadError::Parse`] for malformed CSV.
    pub fn parse<R: Read>(
        reader: R,
        columns: &IncomeColumns,
    ) -> Result<IncomeDataset, IncomeLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false) // strict column count
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let derived_columns =
            DERIVED_HEADERS.map(|name| headers.iter().position(|header| header == name));
        if derived_columns.iter().any(Option::is_some) {
            debug!(?derived_columns, "input already carries derived columns");
        }

        let income_index = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(columns.income.trim()))
            .ok_or_else(|| IncomeLoadError::MissingColumn {
                column: columns.income.clone(),
            })?;

        let mut rows = Vec::new();
        for (index, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row_number = index + 1; // 1-based for user-facing messages
            let raw_income = record.get(income_index).unwrap_or("");

            let income = match parse_amount(raw_income) {
                Ok(Some(income)) => Some(income),
                Ok(None) => {
                    warn!(row = row_number, "blank income; row will not be annotated");
                    None
                }
                Err(error) => {
                    warn!(row = row_number, %error, "unreadable income; row will not be annotated");
                    None
                }
            };

            rows.push(IncomeRow {
                cells: record.iter().map(str::to_string).collect(),
                record: IncomeRecord::new(income),
            });
        }

        debug!(rows = rows.len(), "parsed income dataset");
        Ok(IncomeDataset {
            headers,
            rows,
            derived_columns,
        })
    }

    /// Convenience wrapper over [`IncomeLoader::parse`] for string input.
    pub fn parse_str(
        input: &str,
        columns: &IncomeColumns,
    ) -> Result<IncomeDataset, IncomeLoadError> {
        Self::parse(input.as_bytes(), columns)
    }

    /// Read an income dataset from a file on disk.
    pub fn from_path(
        path: &Path,
        columns: &IncomeColumns,
    ) -> Result<IncomeDataset, IncomeLoadError> {
        let file = File::open(path)?;
        Self::parse(file, columns)
    }
}
