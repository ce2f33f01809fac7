//! Jurisdiction codes and the schedule labels they select.
//!
//! The table is fixed at compile time. Lookups are case-insensitive and
//! ignore surrounding whitespace.

use serde::Serialize;
use thiserror::Error;

/// The caller supplied a code that is not in the jurisdiction table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("unrecognised jurisdiction code '{code}'")]
    UnknownJurisdiction { code: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Jurisdiction {
    /// Short code, upper case (e.g. `AB`).
    pub code: &'static str,
    /// Label used in the schedule's jurisdiction column.
    pub label: &'static str,
}

const JURISDICTIONS: &[Jurisdiction] = &[
    Jurisdiction { code: "NF", label: "Newfoundland TONI" },
    Jurisdiction { code: "PEI", label: "PEI TONI" },
    Jurisdiction { code: "NS", label: "Nova Scotia TONI" },
    Jurisdiction { code: "NB", label: "New Brunswick TONI" },
    Jurisdiction { code: "QC", label: "Quebec TONI" },
    Jurisdiction { code: "ON", label: "Ontario TONI" },
    Jurisdiction { code: "MB", label: "Manitoba TONI" },
    Jurisdiction { code: "SK", label: "Saskatchewan TONI" },
    Jurisdiction { code: "AB", label: "Alberta TONI" },
    Jurisdiction { code: "BC", label: "British Columbia TONI" },
    Jurisdiction { code: "YT", label: "Yukon TONI" },
    Jurisdiction { code: "NT", label: "Northwest territories TONI" },
    Jurisdiction { code: "NU", label: "Nunavut TONI" },
];

/// Every known jurisdiction, in table order.
pub fn all() -> &'static [Jurisdiction] {
    JURISDICTIONS
}

/// Finds the jurisdiction for `code`.
///
/// # Example
///
/// ```
/// use bracket_core::jurisdiction;
///
/// let ab = jurisdiction::lookup(" ab ").unwrap();
/// assert_eq!(ab.label, "Alberta TONI");
///
/// assert!(jurisdiction::lookup("XX").is_err());
/// ```
///
/// # Errors
///
/// [`SelectorError::UnknownJurisdiction`] when no entry matches.
pub fn lookup(code: &str) -> Result<&'static Jurisdiction, SelectorError> {
    let wanted = code.trim();
    JURISDICTIONS
        .iter()
        .find(|j| j.code.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| SelectorError::UnknownJurisdiction {
            code: code.to_string(),
        })
}
