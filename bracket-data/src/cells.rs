//! Parsing and formatting of numeric spreadsheet cells.

use rust_decimal::Decimal;
use thiserror::Error;

/// A non-blank cell that is not a number.
#[derive(Debug, Error)]
#[error("invalid number '{input}': {source}")]
pub struct ParseAmountError {
    pub input: String,
    #[source]
    pub source: rust_decimal::Error,
}

/// Trims whitespace and removes commas (thousands separator).
fn normalize_amount(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a cell into an optional [`Decimal`].
///
/// Blank or whitespace-only cells are `None`; `"1,234.56"` is accepted.
pub fn parse_amount(s: &str) -> Result<Option<Decimal>, ParseAmountError> {
    let normalized = normalize_amount(s);
    if normalized.is_empty() {
        return Ok(None);
    }
    normalized
        .parse()
        .map(Some)
        .map_err(|source| ParseAmountError {
            input: s.to_string(),
            source,
        })
}

/// Formats an optional value for output, blank when `None`.
pub fn format_optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
