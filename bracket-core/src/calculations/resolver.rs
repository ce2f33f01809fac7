//! Bracket lookup for a single income.
//!
//! # Example
//!
//! ```
//! use bracket_core::calculations::{nearest_boundary, resolve};
//! use bracket_core::{Bracket, UpperBound};
//! use rust_decimal_macros::dec;
//!
//! let brackets = vec![
//!     Bracket::new(dec!(0), UpperBound::Bounded(dec!(50000)), Some(dec!(0.15))),
//!     Bracket::new(dec!(50000), UpperBound::Bounded(dec!(100000)), Some(dec!(0.20))),
//!     Bracket::new(dec!(100000), UpperBound::Unbounded, Some(dec!(0.26))),
//! ];
//!
//! let found = resolve(dec!(40000), &brackets).unwrap();
//! assert_eq!(found.rate, Some(dec!(0.15)));
//!
//! let nearest = nearest_boundary(dec!(40000), &found);
//! assert_eq!(nearest.bound, dec!(50000));
//! assert_eq!(nearest.distance, dec!(10000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Bracket, UpperBound};

/// The bracket an income falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketMatch {
    /// `None` when the bracket has no positional rate.
    pub rate: Option<Decimal>,
    pub upper_bound: UpperBound,
    pub lower_bound: Decimal,
}

impl From<&Bracket> for BracketMatch {
    fn from(bracket: &Bracket) -> Self {
        Self {
            rate: bracket.rate,
            upper_bound: bracket.upper_bound,
            lower_bound: bracket.lower_bound,
        }
    }
}

/// The bracket edge closest to an income and how far away it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearestBound {
    pub bound: Decimal,
    pub distance: Decimal,
}

/// Finds the first bracket with `lower_bound < income <= upper_bound`.
///
/// Returns `None` when the list is empty or the income is at or below the
/// first floor (or above a finite last ceiling). Never fails.
pub fn resolve(income: Decimal, brackets: &[Bracket]) -> Option<BracketMatch> {
    brackets
        .iter()
        .find(|bracket| bracket.contains(income))
        .map(BracketMatch::from)
}

/// Picks the nearer of the matched bracket's two edges.
///
/// The upper edge wins only when strictly closer; an exact tie goes to the
/// lower edge. An unbounded upper edge is infinitely far away.
pub fn nearest_boundary(income: Decimal, found: &BracketMatch) -> NearestBound {
    let to_lower = (income - found.lower_bound).abs();
    let lower = NearestBound {
        bound: found.lower_bound,
        distance: to_lower,
    };

    match found.upper_bound {
        UpperBound::Bounded(upper) => {
            let to_upper = (upper - income).abs();
            if to_upper < to_lower {
                NearestBound {
                    bound: upper,
                    distance: to_upper,
                }
            } else {
                lower
            }
        }
        UpperBound::Unbounded => lower,
    }
}
