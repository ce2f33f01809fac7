//! Bracket construction from a long-form schedule.
//!
//! Rows for one jurisdiction are walked in order. Every bracket row opens a
//! new band at its threshold and closes the previous band at the same value;
//! every rate row queues a rate. Rates are then attached to bands by
//! position.
//!
//! # Trailing bracket
//!
//! The band opened by the last bracket row is never closed by the walk. How
//! it is treated depends on [`TrailingBracketPolicy`]. The default,
//! [`TrailingBracketPolicy::DropUnclosed`], discards it. Schedules are
//! authored with a final threshold row that only closes the top rated band,
//! so the returned list ends with a finite ceiling.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use bracket_core::calculations::{BracketBuilder, BuildOptions, TrailingBracketPolicy};
//! use bracket_core::{RawScheduleRow, ScheduleCell, ScheduleTable, UpperBound};
//! use rust_decimal_macros::dec;
//!
//! let row = |label: Option<&str>, variable: &str, value| RawScheduleRow {
//!     jurisdiction: label.map(str::to_string),
//!     variable: variable.to_string(),
//!     values: BTreeMap::from([(2024, ScheduleCell::Amount(value))]),
//! };
//! let table = ScheduleTable::from_raw(
//!     vec![2024],
//!     vec![
//!         row(Some("Alberta TONI"), "Bracket 1", dec!(0)),
//!         row(None, "Rate 1", dec!(0.10)),
//!         row(None, "Bracket 2", dec!(148269)),
//!         row(None, "Rate 2", dec!(0.12)),
//!     ],
//! );
//!
//! let builder = BracketBuilder::new(BuildOptions {
//!     trailing: TrailingBracketPolicy::Keep,
//! });
//! let brackets = builder.build(&table, "Alberta TONI", 2024).unwrap();
//!
//! assert_eq!(brackets.len(), 2);
//! assert_eq!(brackets[0].upper_bound, UpperBound::Bounded(dec!(148269)));
//! assert_eq!(brackets[1].upper_bound, UpperBound::Unbounded);
//! assert_eq!(brackets[1].rate, Some(dec!(0.12)));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{Bracket, UpperBound, VariableKind};
use crate::schedule::{ScheduleError, ScheduleTable};

/// What to do with the unbounded band left open at the end of the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailingBracketPolicy {
    /// Always discard it. The top rate row, if any, goes unused.
    #[default]
    DropUnclosed,
    /// Discard it only when no rate row lines up with it.
    DropUnrated,
    /// Keep it as an open-ended top bracket.
    Keep,
}

impl TrailingBracketPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DropUnclosed => "drop-unclosed",
            Self::DropUnrated => "drop-unrated",
            Self::Keep => "keep",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "drop-unclosed" => Some(Self::DropUnclosed),
            "drop-unrated" => Some(Self::DropUnrated),
            "keep" => Some(Self::Keep),
            _ => None,
        }
    }

    fn should_drop(&self, bracket_count: usize, rate_count: usize) -> bool {
        match self {
            Self::DropUnclosed => true,
            Self::DropUnrated => rate_count < bracket_count,
            Self::Keep => false,
        }
    }
}

/// Options for [`BracketBuilder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    pub trailing: TrailingBracketPolicy,
}

/// Builds bracket lists from a [`ScheduleTable`].
///
/// Each call produces a fresh list; nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct BracketBuilder {
    options: BuildOptions,
}

impl BracketBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// Builds the ordered brackets for `jurisdiction` in `year`.
    ///
    /// An unknown jurisdiction yields an empty list.
    ///
    /// # Errors
    ///
    /// * [`ScheduleError::YearColumnMissing`] if the table has no column for
    ///   `year`, checked before any rows are read.
    /// * [`ScheduleError::MissingValue`] if a bracket or rate row of the
    ///   jurisdiction is blank in that year.
    /// * [`ScheduleError::InvalidValue`] if such a cell is not a number.
    ///   Cells of other rows are never read.
    pub fn build(
        &self,
        table: &ScheduleTable,
        jurisdiction: &str,
        year: i32,
    ) -> Result<Vec<Bracket>, ScheduleError> {
        if !table.has_year(year) {
            return Err(ScheduleError::YearColumnMissing { year });
        }

        let mut brackets: Vec<Bracket> = Vec::new();
        let mut rates: Vec<Decimal> = Vec::new();

        for (row_number, row) in table.rows_for(jurisdiction) {
            match row.kind {
                VariableKind::Bracket => {
                    let threshold = ScheduleTable::required_value(row_number, row, year)?;
                    if let Some(previous) = brackets.last_mut() {
                        previous.upper_bound = UpperBound::Bounded(threshold);
                    }
                    brackets.push(Bracket::open(threshold));
                }
                VariableKind::Rate => {
                    rates.push(ScheduleTable::required_value(row_number, row, year)?);
                }
                VariableKind::Other => {}
            }
        }

        self.trim_trailing(&mut brackets, rates.len());

        for (bracket, rate) in brackets.iter_mut().zip(rates) {
            bracket.rate = Some(rate);
        }

        for bracket in &brackets {
            debug!(%jurisdiction, year, %bracket, "built bracket");
        }
        info!(
            %jurisdiction,
            year,
            count = brackets.len(),
            "built bracket list"
        );

        Ok(brackets)
    }

    fn trim_trailing(&self, brackets: &mut Vec<Bracket>, rate_count: usize) {
        let open_at_end = brackets
            .last()
            .is_some_and(|last| last.upper_bound.is_unbounded());

        if open_at_end && self.options.trailing.should_drop(brackets.len(), rate_count) {
            if let Some(dropped) = brackets.pop() {
                debug!(
                    lower_bound = %dropped.lower_bound,
                    policy = self.options.trailing.as_str(),
                    "dropped trailing open bracket"
                );
            }
        }
    }
}

/// Builds brackets with the default [`BuildOptions`].
///
/// See [`BracketBuilder::build`].
pub fn build_brackets(
    table: &ScheduleTable,
    jurisdiction: &str,
    year: i32,
) -> Result<Vec<Bracket>, ScheduleError> {
    BracketBuilder::default().build(table, jurisdiction, year)
}
