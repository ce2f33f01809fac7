use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use bracket_core::{RawScheduleRow, ScheduleCell, ScheduleError, ScheduleTable};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cells::parse_amount;

/// Errors that can occur when loading a tax schedule.
#[derive(Debug, Error)]
pub enum ScheduleLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot open schedule: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Schema(#[from] ScheduleError),
}

impl From<csv::Error> for ScheduleLoadError {
    fn from(err: csv::Error) -> Self {
        ScheduleLoadError::CsvParse(err.to_string())
    }
}

/// Header names of the two label columns.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleColumns {
    pub jurisdiction: String,
    pub variable: String,
}

impl Default for ScheduleColumns {
    fn default() -> Self {
        Self {
            jurisdiction: "Province".to_string(),
            variable: "Variable".to_string(),
        }
    }
}

/// Column positions resolved from the header row.
#[derive(Debug)]
struct ScheduleLayout {
    jurisdiction: usize,
    variable: usize,
    /// (column index, year) in header order.
    years: Vec<(usize, i32)>,
}

impl ScheduleLayout {
    fn from_headers(
        headers: &csv::StringRecord,
        columns: &ScheduleColumns,
    ) -> Result<Self, ScheduleError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
                .ok_or_else(|| ScheduleError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let jurisdiction = find(columns.jurisdiction.as_str())?;
        let variable = find(columns.variable.as_str())?;

        let mut years: Vec<(usize, i32)> = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            if index == jurisdiction || index == variable {
                continue;
            }
            match header.trim().parse::<i32>() {
                Ok(year) if years.iter().any(|(_, seen)| *seen == year) => {
                    warn!(year, column = index + 1, "duplicate year column ignored");
                }
                Ok(year) => years.push((index, year)),
                Err(_) => debug!(header, "skipping non-year column"),
            }
        }

        Ok(Self {
            jurisdiction,
            variable,
            years,
        })
    }

    /// Cells are trimmed, so a whitespace-only jurisdiction cell is blank and
    /// takes the label of the row above.
    fn read_row(&self, record: &csv::StringRecord, row: usize) -> RawScheduleRow {
        let jurisdiction = Some(cell(record, self.jurisdiction))
            .filter(|label| !label.is_empty())
            .map(str::to_string);

        let values = self
            .years
            .iter()
            .map(|&(index, year)| (year, schedule_cell(cell(record, index), row, year)))
            .collect::<BTreeMap<_, _>>();

        RawScheduleRow {
            jurisdiction,
            variable: cell(record, self.variable).to_string(),
            values,
        }
    }
}

/// Trimmed cell text; short rows read as blank.
fn cell(record: &csv::StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("").trim()
}

/// Non-numeric text is kept; only a build that reads the cell rejects it.
fn schedule_cell(text: &str, row: usize, year: i32) -> ScheduleCell {
    match parse_amount(text) {
        Ok(value) => ScheduleCell::from(value),
        Err(error) => {
            debug!(row, year, %error, "keeping non-numeric schedule cell as text");
            ScheduleCell::Text(text.to_string())
        }
    }
}

/// Loader for the wide schedule table.
///
/// Expected layout: a jurisdiction column (blank on continuation rows), a
/// variable column, and one column per year whose header is the year itself.
/// Any other columns are ignored.
///
/// ```csv
/// Province,Variable,2023,2024
/// Alberta TONI,Bracket 1,0,0
/// ,Rate 1,0.10,0.10
/// ,Bracket 2,"142,292","148,269"
/// ,Rate 2,0.12,0.12
/// ```
pub struct ScheduleLoader;

impl ScheduleLoader {
    /// Parse a schedule from a CSV reader.
    ///
    /// Cell contents never fail a load. Row numbers reported later by
    /// [`ScheduleError::MissingValue`] and [`ScheduleError::InvalidValue`]
    /// are 1-based over the data rows (header excluded).
    pub fn parse<R: Read>(
        reader: R,
        columns: &ScheduleColumns,
    ) -> Result<ScheduleTable, ScheduleLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // continuation rows often omit trailing cells
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let layout = ScheduleLayout::from_headers(&headers, columns)?;

        let mut rows = Vec::new();
        for (index, result) in csv_reader.records().enumerate() {
            let record = result?;
            rows.push(layout.read_row(&record, index + 1));
        }

        let years: Vec<i32> = layout.years.iter().map(|&(_, year)| year).collect();
        debug!(rows = rows.len(), ?years, "parsed schedule");

        Ok(ScheduleTable::from_raw(years, rows))
    }

    /// Read a schedule from a file on disk.
    pub fn from_path(
        path: &Path,
        columns: &ScheduleColumns,
    ) -> Result<ScheduleTable, ScheduleLoadError> {
        let file = File::open(path)?;
        Self::parse(file, columns)
    }
}
