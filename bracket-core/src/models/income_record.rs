use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::UpperBound;

/// One income row and the bracket details derived for it.
///
/// The five derived fields are all `None` until the record is annotated, and
/// stay `None` when no rated bracket contains the income.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    /// `None` when the source cell was blank or not a number.
    pub income: Option<Decimal>,

    // Derived values
    pub upper_bound: Option<UpperBound>,
    pub lower_bound: Option<Decimal>,
    pub nearest_bound: Option<Decimal>,
    pub distance_to_nearest: Option<Decimal>,
    pub marginal_rate: Option<Decimal>,
}

impl IncomeRecord {
    pub fn new(income: Option<Decimal>) -> Self {
        Self {
            income,
            ..Default::default()
        }
    }

    /// Resets every derived field, keeping the income.
    pub fn clear_annotation(&mut self) {
        self.upper_bound = None;
        self.lower_bound = None;
        self.nearest_bound = None;
        self.distance_to_nearest = None;
        self.marginal_rate = None;
    }

    pub fn is_annotated(&self) -> bool {
        self.marginal_rate.is_some()
    }
}
