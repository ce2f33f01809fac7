//! The lookup run behind the `bracket-lookup` binary: select a
//! jurisdiction, build its brackets, annotate an income file and write it
//! back out.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bracket_core::calculations::{AugmentSummary, BracketBuilder, BuildOptions, annotate_all};
use bracket_core::{Jurisdiction, jurisdiction};
use tracing::{debug, info, warn};

use crate::income::{IncomeColumns, IncomeLoader};
use crate::loader::{ScheduleColumns, ScheduleLoader};
use crate::writer::{AnnotatedWriter, default_output_path};

/// Inputs of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Jurisdiction code, e.g. `AB`.
    pub jurisdiction: String,
    pub year: i32,
    pub schedule: PathBuf,
    pub incomes: PathBuf,
    /// Defaults to [`default_output_path`] when `None`.
    pub output: Option<PathBuf>,
    pub build: BuildOptions,
    pub schedule_columns: ScheduleColumns,
    pub income_columns: IncomeColumns,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub jurisdiction: Jurisdiction,
    pub output: PathBuf,
    pub bracket_count: usize,
    pub summary: AugmentSummary,
}

/// Runs the full lookup.
///
/// The jurisdiction code is resolved before anything else, so an unknown
/// code fails with [`bracket_core::SelectorError`] without opening any file.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    let selected = *jurisdiction::lookup(&config.jurisdiction)?;
    let year = config.year;
    info!(code = selected.code, label = selected.label, year, "selected jurisdiction");

    let table = ScheduleLoader::from_path(&config.schedule, &config.schedule_columns)
        .with_context(|| format!("Failed to load schedule: {}", config.schedule.display()))?;
    debug!(jurisdictions = ?table.jurisdictions(), "schedule loaded");

    let brackets = BracketBuilder::new(config.build)
        .build(&table, selected.label, year)
        .with_context(|| format!("Failed to build brackets for {} {year}", selected.label))?;
    if brackets.is_empty() {
        warn!(
            label = selected.label,
            year, "schedule has no brackets for this jurisdiction; no rows will be annotated"
        );
    }

    let mut dataset = IncomeLoader::from_path(&config.incomes, &config.income_columns)
        .with_context(|| format!("Failed to load incomes: {}", config.incomes.display()))?;

    let summary = annotate_all(dataset.records_mut(), &brackets);

    let output = config
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(selected.code, year));
    AnnotatedWriter::to_path(&output, &dataset)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    info!(
        path = %output.display(),
        matched = summary.matched,
        unmatched = summary.unmatched,
        "wrote annotated incomes"
    );

    Ok(RunReport {
        jurisdiction: selected,
        output,
        bracket_count: brackets.len(),
        summary,
    })
}
