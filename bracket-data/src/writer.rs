//! CSV output of an annotated income dataset.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use bracket_core::IncomeRecord;
use thiserror::Error;

use crate::cells::format_optional;
use crate::income::IncomeDataset;

/// Column headers appended after the input columns, in output order.
pub const DERIVED_HEADERS: [&str; 5] = [
    "Upper bound bracket",
    "Lower bound bracket",
    "Nearest bracket to income",
    "Distance to nearest bracket",
    "Current marginal tax rate",
];

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot write output: {0}")]
    Io(#[from] std::io::Error),
}

/// File name used when no output path is given, e.g.
/// `processed_tax_data_ab_2024.csv`.
pub fn default_output_path(code: &str, year: i32) -> PathBuf {
    PathBuf::from(format!(
        "processed_tax_data_{}_{year}.csv",
        code.trim().to_lowercase()
    ))
}

fn derived_cells(record: &IncomeRecord) -> [String; 5] {
    [
        format_optional(record.upper_bound),
        format_optional(record.lower_bound),
        format_optional(record.nearest_bound),
        format_optional(record.distance_to_nearest),
        format_optional(record.marginal_rate),
    ]
}

/// Writes the input columns followed by [`DERIVED_HEADERS`].
///
/// Absent values are empty cells; an unbounded upper bound is written as
/// `unbounded`. Derived columns the input already has (see
/// [`IncomeDataset::derived_columns`]) are overwritten in place, so writing
/// a reloaded output file reproduces it.
pub struct AnnotatedWriter;

impl AnnotatedWriter {
    pub fn write<W: Write>(writer: W, dataset: &IncomeDataset) -> Result<(), WriteError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut headers: Vec<&str> = dataset.headers.iter().map(String::as_str).collect();
        headers.extend(
            DERIVED_HEADERS
                .iter()
                .zip(dataset.derived_columns)
                .filter(|(_, column)| column.is_none())
                .map(|(name, _)| *name),
        );
        csv_writer.write_record(&headers)?;

        for row in &dataset.rows {
            let mut cells = row.cells.clone();
            for (value, column) in derived_cells(&row.record)
                .into_iter()
                .zip(dataset.derived_columns)
            {
                match column.and_then(|index| cells.get_mut(index)) {
                    Some(cell) => *cell = value,
                    None => cells.push(value),
                }
            }
            csv_writer.write_record(&cells)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_path(path: &Path, dataset: &IncomeDataset) -> Result<(), WriteError> {
        let file = File::create(path)?;
        Self::write(file, dataset)
    }
}

#[cfg(test)]
mod tests {
    use bracket_core::calculations::annotate_all;
    use bracket_core::{Bracket, UpperBound};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::income::{IncomeColumns, IncomeLoader, IncomeRow};

    fn render(dataset: &IncomeDataset) -> String {
        let mut buffer = Vec::new();
        AnnotatedWriter::write(&mut buffer, dataset).expect("write should succeed");
        String::from_utf8(buffer).expect("output is UTF-8")
    }

    fn dataset(records: Vec<(&str, IncomeRecord)>) -> IncomeDataset {
        IncomeDataset {
            headers: vec!["Name".to_string(), "Income".to_string()],
            rows: records
                .into_iter()
                .map(|(name, record)| IncomeRow {
                    cells: vec![
                        name.to_string(),
                        format_optional(record.income),
                    ],
                    record,
                })
                .collect(),
            derived_columns: [None; 5],
        }
    }

    #[test]
    fn write_appends_derived_headers() {
        let output = render(&dataset(Vec::new()));

        assert_eq!(
            output,
            "Name,Income,Upper bound bracket,Lower bound bracket,Nearest bracket to income,\
             Distance to nearest bracket,Current marginal tax rate\n"
        );
    }

    #[test]
    fn write_annotated_row() {
        let record = IncomeRecord {
            income: Some(dec!(40000)),
            upper_bound: Some(UpperBound::Bounded(dec!(50000))),
            lower_bound: Some(dec!(0)),
            nearest_bound: Some(dec!(50000)),
            distance_to_nearest: Some(dec!(10000)),
            marginal_rate: Some(dec!(0.15)),
        };

        let output = render(&dataset(vec![("Avery", record)]));

        assert_eq!(output.lines().nth(1), Some("Avery,40000,50000,0,50000,10000,0.15"));
    }

    #[test]
    fn write_unbounded_upper_as_word() {
        let record = IncomeRecord {
            income: Some(dec!(250000)),
            upper_bound: Some(UpperBound::Unbounded),
            lower_bound: Some(dec!(100000)),
            nearest_bound: Some(dec!(100000)),
            distance_to_nearest: Some(dec!(150000)),
            marginal_rate: Some(dec!(0.26)),
        };

        let output = render(&dataset(vec![("Blake", record)]));

        assert_eq!(
            output.lines().nth(1),
            Some("Blake,250000,unbounded,100000,100000,150000,0.26")
        );
    }

    #[test]
    fn write_unmatched_row_leaves_cells_empty() {
        let output = render(&dataset(vec![("Casey", IncomeRecord::new(Some(dec!(0))))]));

        assert_eq!(output.lines().nth(1), Some("Casey,0,,,,,"));
    }

    #[test]
    fn write_overwrites_existing_derived_columns() {
        let csv = "\
Name,Upper bound bracket,Income,Lower bound bracket,Nearest bracket to income,\
Distance to nearest bracket,Current marginal tax rate
Avery,stale,40000,stale,stale,stale,stale
";
        let mut dataset =
            IncomeLoader::parse_str(csv, &IncomeColumns::default()).expect("should parse");
        let brackets = [Bracket::new(dec!(0), UpperBound::Bounded(dec!(50000)), Some(dec!(0.15)))];
        annotate_all(dataset.records_mut(), &brackets);

        let output = render(&dataset);

        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec![
                "Name,Upper bound bracket,Income,Lower bound bracket,Nearest bracket to income,\
                 Distance to nearest bracket,Current marginal tax rate",
                "Avery,50000,40000,0,50000,10000,0.15",
            ]
        );
    }

    #[test]
    fn write_appends_only_missing_derived_columns() {
        let csv = "Name,Income,Current marginal tax rate\nAvery,40000,\n";
        let mut dataset =
            IncomeLoader::parse_str(csv, &IncomeColumns::default()).expect("should parse");
        let brackets = [Bracket::new(dec!(0), UpperBound::Bounded(dec!(50000)), Some(dec!(0.15)))];
        annotate_all(dataset.records_mut(), &brackets);

        let output = render(&dataset);

        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec![
                "Name,Income,Current marginal tax rate,Upper bound bracket,Lower bound bracket,\
                 Nearest bracket to income,Distance to nearest bracket",
                "Avery,40000,0.15,50000,0,50000,10000",
            ]
        );
    }

    #[test]
    fn reprocessing_written_output_is_byte_identical() {
        let columns = IncomeColumns::default();
        let brackets = [
            Bracket::new(dec!(0), UpperBound::Bounded(dec!(1000)), Some(dec!(0.10))),
            Bracket::new(dec!(1000), UpperBound::Unbounded, Some(dec!(0.20))),
        ];

        let mut first =
            IncomeLoader::parse_str("Name,Income\nA,400\nB,\"2,500\"\nC,\n", &columns)
                .expect("should parse");
        annotate_all(first.records_mut(), &brackets);
        let first_output = render(&first);

        let mut second = IncomeLoader::parse_str(&first_output, &columns).expect("should reload");
        annotate_all(second.records_mut(), &brackets);
        let second_output = render(&second);

        assert_eq!(second_output, first_output);
        assert_eq!(first_output.lines().nth(1), Some("A,400,1000,0,0,400,0.10"));
    }

    #[test]
    fn default_output_path_lowercases_code() {
        assert_eq!(
            default_output_path("AB", 2024),
            PathBuf::from("processed_tax_data_ab_2024.csv")
        );
        assert_eq!(
            default_output_path(" pei ", 2023),
            PathBuf::from("processed_tax_data_pei_2023.csv")
        );
    }
}
