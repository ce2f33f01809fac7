use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a schedule row describes, decided once from its free-text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableKind {
    /// A bracket threshold (the floor of a new band).
    Bracket,
    /// The marginal rate of the next band in sequence.
    Rate,
    /// Anything else; skipped when building brackets.
    Other,
}

impl VariableKind {
    /// Classifies a variable label by case-insensitive substring match.
    ///
    /// "bracket" is tested before "rate", so a label containing both words is
    /// a bracket row.
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("bracket") {
            Self::Bracket
        } else if label.contains("rate") {
            Self::Rate
        } else {
            Self::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bracket => "bracket",
            Self::Rate => "rate",
            Self::Other => "other",
        }
    }
}

/// One year cell of a schedule row.
///
/// Cells are kept as read; whether a cell must be numeric is only decided
/// when a bracket list is built from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleCell {
    #[default]
    Blank,
    Amount(Decimal),
    /// Non-blank text that is not a number, trimmed.
    Text(String),
}

impl ScheduleCell {
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Amount(value) => Some(*value),
            Self::Blank | Self::Text(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

impl From<Decimal> for ScheduleCell {
    fn from(value: Decimal) -> Self {
        Self::Amount(value)
    }
}

impl From<Option<Decimal>> for ScheduleCell {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(Self::Blank, Self::Amount)
    }
}

/// A schedule row as a reader produces it: the jurisdiction cell may be
/// blank, meaning "same as the row above".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScheduleRow {
    pub jurisdiction: Option<String>,
    pub variable: String,
    /// One entry per year column.
    pub values: BTreeMap<i32, ScheduleCell>,
}

/// A schedule row after ingestion: jurisdiction forward-filled and variable
/// kind classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// `None` only for rows that precede the first labelled row.
    pub jurisdiction: Option<String>,
    pub variable: String,
    pub kind: VariableKind,
    pub values: BTreeMap<i32, ScheduleCell>,
}

impl ScheduleRow {
    /// Numeric value in the given year column; `None` if the cell is blank,
    /// not a number, or the column is absent.
    pub fn value(&self, year: i32) -> Option<Decimal> {
        self.values.get(&year).and_then(ScheduleCell::amount)
    }

    pub fn cell(&self, year: i32) -> Option<&ScheduleCell> {
        self.values.get(&year)
    }

    pub fn is_in(&self, jurisdiction: &str) -> bool {
        self.jurisdiction.as_deref() == Some(jurisdiction)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn classify_matches_bracket_case_insensitively() {
        assert_eq!(VariableKind::classify("Bracket 1"), VariableKind::Bracket);
        assert_eq!(VariableKind::classify("TAX BRACKET"), VariableKind::Bracket);
    }

    #[test]
    fn classify_matches_rate_case_insensitively() {
        assert_eq!(VariableKind::classify("Rate 1"), VariableKind::Rate);
        assert_eq!(VariableKind::classify("marginal RATE"), VariableKind::Rate);
    }

    #[test]
    fn classify_prefers_bracket_when_both_words_appear() {
        assert_eq!(VariableKind::classify("Bracket rate"), VariableKind::Bracket);
        assert_eq!(VariableKind::classify("rate bracket"), VariableKind::Bracket);
    }

    #[test]
    fn classify_unrelated_text_is_other() {
        assert_eq!(VariableKind::classify("Basic personal amount"), VariableKind::Other);
        assert_eq!(VariableKind::classify(""), VariableKind::Other);
    }

    #[test]
    fn classify_matches_anywhere_in_label() {
        assert_eq!(VariableKind::classify("Top marginal rate (%)"), VariableKind::Rate);
        assert_eq!(VariableKind::classify("2nd bracket threshold"), VariableKind::Bracket);
    }

    #[test]
    fn value_is_only_read_from_amount_cells() {
        let row = ScheduleRow {
            jurisdiction: Some("Yukon TONI".to_string()),
            variable: "Indexation note".to_string(),
            kind: VariableKind::Other,
            values: BTreeMap::from([
                (2022, ScheduleCell::Blank),
                (2023, ScheduleCell::Text("see footnote".to_string())),
                (2024, ScheduleCell::Amount(dec!(1.047))),
            ]),
        };

        assert_eq!(row.value(2022), None);
        assert_eq!(row.value(2023), None);
        assert_eq!(row.value(2024), Some(dec!(1.047)));
        assert_eq!(row.value(2025), None);
        assert_eq!(row.cell(2023), Some(&ScheduleCell::Text("see footnote".to_string())));
    }

    #[test]
    fn cell_from_optional_amount() {
        assert_eq!(ScheduleCell::from(None), ScheduleCell::Blank);
        assert_eq!(ScheduleCell::from(Some(dec!(0.10))), ScheduleCell::Amount(dec!(0.10)));
        assert!(ScheduleCell::default().is_blank());
    }
}
