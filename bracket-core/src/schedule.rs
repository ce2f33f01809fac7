//! Ingestion of the long-form schedule table.
//!
//! A schedule arrives as rows tagged with a jurisdiction label (blank on all
//! but the first row of each jurisdiction), a free-text variable label and
//! one cell per year. [`ScheduleTable::from_raw`] materialises the
//! jurisdiction column and classifies each row once, so bracket building
//! never re-tests strings.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{RawScheduleRow, ScheduleCell, ScheduleRow, VariableKind};

/// The schedule cannot be used for the requested build.
///
/// These are fatal: no partial bracket list is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// The schedule has no column for the requested year.
    #[error("schedule has no column for year {year}")]
    YearColumnMissing { year: i32 },

    /// A required column is absent from the schedule header.
    #[error("schedule is missing required column '{column}'")]
    MissingColumn { column: String },

    /// A bracket or rate row has a blank cell in the requested year.
    /// `row` is 1-based over the data rows.
    #[error("schedule row {row} has no value for year {year}")]
    MissingValue { row: usize, year: i32 },

    /// A bracket or rate row holds text that is not a number in the
    /// requested year. `row` is 1-based over the data rows.
    #[error("schedule row {row}, year {year}: '{text}' is not a number")]
    InvalidValue { row: usize, year: i32, text: String },
}

/// A fully ingested schedule: year columns plus classified, forward-filled
/// rows in their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleTable {
    years: Vec<i32>,
    rows: Vec<ScheduleRow>,
}

impl ScheduleTable {
    /// Builds a table from raw rows.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    ///
    /// use bracket_core::{RawScheduleRow, ScheduleCell, ScheduleTable, VariableKind};
    /// use rust_decimal_macros::dec;
    ///
    /// let raw = vec![
    ///     RawScheduleRow {
    ///         jurisdiction: Some("Alberta TONI".to_string()),
    ///         variable: "Bracket 1".to_string(),
    ///         values: BTreeMap::from([(2024, ScheduleCell::Amount(dec!(0)))]),
    ///     },
    ///     RawScheduleRow {
    ///         jurisdiction: None,
    ///         variable: "Rate 1".to_string(),
    ///         values: BTreeMap::from([(2024, ScheduleCell::Amount(dec!(0.10)))]),
    ///     },
    /// ];
    ///
    /// let table = ScheduleTable::from_raw(vec![2024], raw);
    ///
    /// assert_eq!(table.rows()[1].jurisdiction.as_deref(), Some("Alberta TONI"));
    /// assert_eq!(table.rows()[1].kind, VariableKind::Rate);
    /// ```
    pub fn from_raw(years: Vec<i32>, raw_rows: Vec<RawScheduleRow>) -> Self {
        Self {
            years,
            rows: forward_fill(raw_rows),
        }
    }

    /// Year columns in header order.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn has_year(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    /// Distinct jurisdiction labels in first-seen order.
    pub fn jurisdictions(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for label in self.rows.iter().filter_map(|row| row.jurisdiction.as_deref()) {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }

    /// Rows belonging to `jurisdiction`, paired with their 1-based row number.
    pub fn rows_for<'a>(
        &'a self,
        jurisdiction: &'a str,
    ) -> impl Iterator<Item = (usize, &'a ScheduleRow)> + 'a {
        self.rows
            .iter()
            .enumerate()
            .filter(move |(_, row)| row.is_in(jurisdiction))
            .map(|(index, row)| (index + 1, row))
    }

    /// Value of the given row/year cell, failing on a blank or non-numeric
    /// cell.
    pub(crate) fn required_value(
        row_number: usize,
        row: &ScheduleRow,
        year: i32,
    ) -> Result<Decimal, ScheduleError> {
        match row.cell(year) {
            Some(ScheduleCell::Amount(value)) => Ok(*value),
            Some(ScheduleCell::Text(text)) => Err(ScheduleError::InvalidValue {
                row: row_number,
                year,
                text: text.clone(),
            }),
            Some(ScheduleCell::Blank) | None => Err(ScheduleError::MissingValue {
                row: row_number,
                year,
            }),
        }
    }
}

/// Scans top to bottom, giving each unlabelled row the nearest preceding
/// label. Only an absent or empty label is filled; any other text, even
/// whitespace, starts a new jurisdiction.
fn forward_fill(raw_rows: Vec<RawScheduleRow>) -> Vec<ScheduleRow> {
    let mut current: Option<String> = None;

    raw_rows
        .into_iter()
        .map(|raw| {
            if let Some(label) = raw.jurisdiction.filter(|l| !l.is_empty()) {
                current = Some(label);
            }
            ScheduleRow {
                jurisdiction: current.clone(),
                kind: VariableKind::classify(&raw.variable),
                variable: raw.variable,
                values: raw.values,
            }
        })
        .collect()
}
