use std::path::PathBuf;

use anyhow::{Result, bail};
use bracket_core::calculations::{BuildOptions, TrailingBracketPolicy};
use bracket_core::jurisdiction;
use bracket_data::logging::init_tracing;
use bracket_data::{IncomeColumns, RunConfig, ScheduleColumns, run};
use clap::{Parser, ValueEnum};

/// Annotate an income file with marginal tax brackets.
///
/// Builds the bracket list for one jurisdiction and year from a schedule CSV,
/// then adds the containing bracket's bounds, the nearest bound, the distance
/// to it and the marginal rate to every income row.
#[derive(Parser, Debug)]
#[command(name = "bracket-lookup")]
#[command(version, about, long_about = None)]
struct Args {
    /// Jurisdiction code (e.g. AB, ON, PEI); case-insensitive
    #[arg(short, long, required_unless_present = "list_jurisdictions")]
    jurisdiction: Option<String>,

    /// Tax year; must be a column of the schedule
    #[arg(short, long, required_unless_present = "list_jurisdictions")]
    year: Option<i32>,

    /// Path to the schedule CSV
    #[arg(short, long, default_value = "Tax-Data.csv")]
    schedule: PathBuf,

    /// Path to the income CSV
    #[arg(short, long, default_value = "tax_sample_data.csv")]
    incomes: PathBuf,

    /// Output path (default: processed_tax_data_<code>_<year>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Treatment of the open bracket left after the last threshold row
    #[arg(long, value_enum, default_value_t = Trailing::DropUnclosed)]
    trailing: Trailing,

    /// Schedule column holding jurisdiction labels
    #[arg(long, default_value = "Province")]
    jurisdiction_column: String,

    /// Schedule column holding variable labels
    #[arg(long, default_value = "Variable")]
    variable_column: String,

    /// Income file column holding the income
    #[arg(long, default_value = "Income")]
    income_column: String,

    /// Print the known jurisdiction codes and exit
    #[arg(long, default_value_t = false)]
    list_jurisdictions: bool,

    /// Log level or filter directive, used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Trailing {
    DropUnclosed,
    DropUnrated,
    Keep,
}

impl From<Trailing> for TrailingBracketPolicy {
    fn from(value: Trailing) -> Self {
        match value {
            Trailing::DropUnclosed => TrailingBracketPolicy::DropUnclosed,
            Trailing::DropUnrated => TrailingBracketPolicy::DropUnrated,
            Trailing::Keep => TrailingBracketPolicy::Keep,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    if args.list_jurisdictions {
        for entry in jurisdiction::all() {
            println!("{:<4} {}", entry.code, entry.label);
        }
        return Ok(());
    }

    let (Some(code), Some(year)) = (args.jurisdiction, args.year) else {
        bail!("--jurisdiction and --year are required");
    };

    let config = RunConfig {
        jurisdiction: code,
        year,
        schedule: args.schedule,
        incomes: args.incomes,
        output: args.output,
        build: BuildOptions {
            trailing: args.trailing.into(),
        },
        schedule_columns: ScheduleColumns {
            jurisdiction: args.jurisdiction_column,
            variable: args.variable_column,
        },
        income_columns: IncomeColumns {
            income: args.income_column,
        },
    };

    let report = run(&config)?;
    println!("Processed data saved to {}", report.output.display());

    Ok(())
}
