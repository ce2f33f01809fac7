//! Per-record annotation of an income dataset with bracket details.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::calculations::resolver::{nearest_boundary, resolve};
use crate::models::{Bracket, IncomeRecord};

/// Counts from one pass of [`annotate_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AugmentSummary {
    pub matched: usize,
    pub unmatched: usize,
}

impl AugmentSummary {
    pub fn total(&self) -> usize {
        self.matched + self.unmatched
    }
}

/// Fills in the derived fields of one record.
///
/// Previous derived values are cleared first, so annotating twice gives the
/// same result as annotating once. The fields are filled only when a bracket
/// contains the income and that bracket has a rate; otherwise they are left
/// empty and `false` is returned.
pub fn annotate(record: &mut IncomeRecord, brackets: &[Bracket]) -> bool {
    record.clear_annotation();

    let Some(income) = record.income else {
        return false;
    };
    let Some(found) = resolve(income, brackets) else {
        return false;
    };
    let Some(rate) = found.rate else {
        debug!(%income, lower_bound = %found.lower_bound, "matched bracket has no rate");
        return false;
    };

    let nearest = nearest_boundary(income, &found);

    record.upper_bound = Some(found.upper_bound);
    record.lower_bound = Some(found.lower_bound);
    record.nearest_bound = Some(nearest.bound);
    record.distance_to_nearest = Some(nearest.distance);
    record.marginal_rate = Some(rate);
    true
}

/// Annotates every record in place.
///
/// Misses are local: a record that matches nothing is left unannotated and
/// the rest are still processed.
///
/// # Example
///
/// ```
/// use bracket_core::calculations::annotate_all;
/// use bracket_core::{Bracket, IncomeRecord, UpperBound};
/// use rust_decimal_macros::dec;
///
/// let brackets = vec![
///     Bracket::new(dec!(0), UpperBound::Bounded(dec!(50000)), Some(dec!(0.15))),
///     Bracket::new(dec!(50000), UpperBound::Unbounded, Some(dec!(0.20))),
/// ];
/// let mut records = vec![
///     IncomeRecord::new(Some(dec!(40000))),
///     IncomeRecord::new(Some(dec!(-5))),
///     IncomeRecord::new(None),
/// ];
///
/// let summary = annotate_all(&mut records, &brackets);
///
/// assert_eq!(summary.matched, 1);
/// assert_eq!(summary.unmatched, 2);
/// assert_eq!(records[0].marginal_rate, Some(dec!(0.15)));
/// assert_eq!(records[1].marginal_rate, None);
/// ```
pub fn annotate_all<'a, I>(records: I, brackets: &[Bracket]) -> AugmentSummary
where
    I: IntoIterator<Item = &'a mut IncomeRecord>,
{
    let mut summary = AugmentSummary::default();

    for record in records {
        if annotate(record, brackets) {
            summary.matched += 1;
        } else {
            summary.unmatched += 1;
        }
    }

    info!(
        matched = summary.matched,
        unmatched = summary.unmatched,
        brackets = brackets.len(),
        "annotated income records"
    );
    summary
}

/// Owned variant of [`annotate_all`]: takes the dataset and returns it with
/// the derived fields populated.
pub fn augment(mut records: Vec<IncomeRecord>, brackets: &[Bracket]) -> Vec<IncomeRecord> {
    annotate_all(records.iter_mut(), brackets);
    records
}

/// Convenience for callers that only have bare amounts.
pub fn augment_incomes<I>(incomes: I, brackets: &[Bracket]) -> Vec<IncomeRecord>
where
    I: IntoIterator<Item = Decimal>,
{
    let records = incomes
        .into_iter()
        .map(|income| IncomeRecord::new(Some(income)))
        .collect();
    augment(records, brackets)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::UpperBound;

    fn sample_brackets() -> Vec<Bracket> {
        vec![
            Bracket::new(dec!(0), UpperBound::Bounded(dec!(50000)), Some(dec!(0.15))),
            Bracket::new(dec!(50000), UpperBound::Bounded(dec!(100000)), Some(dec!(0.20))),
            Bracket::new(dec!(100000), UpperBound::Unbounded, Some(dec!(0.26))),
        ]
    }

    #[test]
    fn annotate_fills_all_derived_fields() {
        let mut record = IncomeRecord::new(Some(dec!(40000)));

        let matched = annotate(&mut record, &sample_brackets());

        assert!(matched);
        assert_eq!(
            record,
            IncomeRecord {
                income: Some(dec!(40000)),
                upper_bound: Some(UpperBound::Bounded(dec!(50000))),
                lower_bound: Some(dec!(0)),
                nearest_bound: Some(dec!(50000)),
                distance_to_nearest: Some(dec!(10000)),
                marginal_rate: Some(dec!(0.15)),
            }
        );
    }

    #[test]
    fn annotate_midpoint_income_reports_lower_bound() {
        let mut record = IncomeRecord::new(Some(dec!(75000)));

        annotate(&mut record, &sample_brackets());

        assert_eq!(record.marginal_rate, Some(dec!(0.20)));
        assert_eq!(record.upper_bound, Some(UpperBound::Bounded(dec!(100000))));
        assert_eq!(record.lower_bound, Some(dec!(50000)));
        assert_eq!(record.nearest_bound, Some(dec!(50000)));
        assert_eq!(record.distance_to_nearest, Some(dec!(25000)));
    }

    #[test]
    fn annotate_top_bracket_keeps_unbounded_upper() {
        let mut record = IncomeRecord::new(Some(dec!(250000)));

        annotate(&mut record, &sample_brackets());

        assert_eq!(record.upper_bound, Some(UpperBound::Unbounded));
        assert_eq!(record.nearest_bound, Some(dec!(100000)));
        assert_eq!(record.distance_to_nearest, Some(dec!(150000)));
    }

    #[test]
    fn annotate_unmatched_income_leaves_fields_empty() {
        let mut record = IncomeRecord::new(Some(dec!(0)));

        let matched = annotate(&mut record, &sample_brackets());

        assert!(!matched);
        assert_eq!(record, IncomeRecord::new(Some(dec!(0))));
    }

    #[test]
    fn annotate_missing_income_leaves_fields_empty() {
        let mut record = IncomeRecord::new(None);

        assert!(!annotate(&mut record, &sample_brackets()));
        assert!(!record.is_annotated());
    }

    #[test]
    fn annotate_bracket_without_rate_leaves_fields_empty() {
        let brackets = vec![
            Bracket::new(dec!(0), UpperBound::Bounded(dec!(1000)), Some(dec!(0.10))),
            Bracket::open(dec!(1000)),
        ];
        let mut record = IncomeRecord::new(Some(dec!(5000)));

        assert!(!annotate(&mut record, &brackets));
        assert_eq!(record.upper_bound, None);
        assert_eq!(record.lower_bound, None);
    }

    #[test]
    fn annotate_clears_stale_values() {
        let mut record = IncomeRecord::new(Some(dec!(40000)));
        annotate(&mut record, &sample_brackets());

        annotate(&mut record, &[]);

        assert_eq!(record, IncomeRecord::new(Some(dec!(40000))));
    }

    #[test]
    fn annotate_all_counts_matches_and_misses() {
        let mut records = vec![
            IncomeRecord::new(Some(dec!(40000))),
            IncomeRecord::new(Some(dec!(75000))),
            IncomeRecord::new(Some(dec!(0))),
            IncomeRecord::new(None),
            IncomeRecord::new(Some(dec!(1000000))),
        ];

        let summary = annotate_all(&mut records, &sample_brackets());

        assert_eq!(
            summary,
            AugmentSummary {
                matched: 3,
                unmatched: 2,
            }
        );
        assert_eq!(summary.total(), 5);
    }

    #[test]
    fn annotate_all_with_no_brackets_matches_nothing() {
        let mut records = vec![
            IncomeRecord::new(Some(dec!(1))),
            IncomeRecord::new(Some(dec!(100000))),
        ];

        let summary = annotate_all(&mut records, &[]);

        assert_eq!(summary.matched, 0);
        assert!(records.iter().all(|r| !r.is_annotated()));
    }

    #[test]
    fn augment_is_idempotent() {
        let brackets = sample_brackets();
        let once = augment_incomes([dec!(1), dec!(49999.99), dec!(75000), dec!(100001)], &brackets);

        let twice = augment(once.clone(), &brackets);

        assert_eq!(once, twice);
    }

    #[test]
    fn augment_preserves_record_order() {
        let records = augment_incomes([dec!(120000), dec!(10)], &sample_brackets());

        assert_eq!(records[0].marginal_rate, Some(dec!(0.26)));
        assert_eq!(records[1].marginal_rate, Some(dec!(0.15)));
    }
}
