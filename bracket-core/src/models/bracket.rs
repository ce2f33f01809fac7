use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upper edge of a bracket.
///
/// The top bracket of a schedule has no ceiling. It is modelled as its own
/// variant rather than a large placeholder amount, and compares greater than
/// every income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpperBound {
    /// Inclusive ceiling.
    Bounded(Decimal),
    /// No ceiling; equivalent to +infinity.
    Unbounded,
}

impl UpperBound {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// The finite ceiling, or `None` for the top bracket.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Self::Bounded(value) => Some(*value),
            Self::Unbounded => None,
        }
    }

    /// Whether `income` lies at or below this ceiling.
    pub fn admits(&self, income: Decimal) -> bool {
        match self {
            Self::Bounded(ceiling) => income <= *ceiling,
            Self::Unbounded => true,
        }
    }
}

impl fmt::Display for UpperBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(value) => write!(f, "{value}"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// A contiguous income band `(lower_bound, upper_bound]` and its marginal rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// Exclusive floor.
    pub lower_bound: Decimal,
    pub upper_bound: UpperBound,
    /// Marginal rate as a fraction (`0.15` for 15%). `None` when the schedule
    /// supplied fewer rate rows than bracket rows.
    pub rate: Option<Decimal>,
}

impl Bracket {
    /// A bracket starting at `lower_bound` with no ceiling and no rate yet.
    pub fn open(lower_bound: Decimal) -> Self {
        Self {
            lower_bound,
            upper_bound: UpperBound::Unbounded,
            rate: None,
        }
    }

    pub fn new(lower_bound: Decimal, upper_bound: UpperBound, rate: Option<Decimal>) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }

    /// Whether `income` falls inside this band: strictly above the floor and
    /// at or below the ceiling.
    pub fn contains(&self, income: Decimal) -> bool {
        income > self.lower_bound && self.upper_bound.admits(income)
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}]", self.lower_bound, self.upper_bound)?;
        match self.rate {
            Some(rate) => write!(f, " @ {rate}"),
            None => f.write_str(" @ no rate"),
        }
    }
}
