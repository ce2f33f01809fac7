//! Bracket construction and lookup.
//!
//! [`builder`] turns a schedule into an ordered bracket list for one
//! jurisdiction and year, [`resolver`] finds the bracket containing an
//! income, and [`augment`] combines the two over a set of income records.

pub mod augment;
pub mod builder;
pub mod resolver;

pub use augment::{AugmentSummary, annotate, annotate_all, augment, augment_incomes};
pub use builder::{BracketBuilder, BuildOptions, TrailingBracketPolicy, build_brackets};
pub use resolver::{BracketMatch, NearestBound, nearest_boundary, resolve};
