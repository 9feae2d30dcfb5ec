//! Read-only inspection of the weather table.
//!
//! - Descriptive statistics of numeric columns ([`DescribeReport`])
//! - Missing-value counts, whole-table and per column
//! - A preview of what dropping incomplete rows would leave
//! - Column listings by dtype for the exploration report

mod statistics;

pub use statistics::{ColumnStatistics, DescribeReport, STATISTIC_LABELS};
pub(crate) use statistics::quantile;

use crate::error::Result;
use crate::utils::{DtypeCategory, column_series, columns_of_category};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome of dropping every row that has at least one null, computed
/// without touching the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropPreview {
    pub rows_before: usize,
    pub rows_after: usize,
    /// Non-null count per column after the hypothetical drop, in column order.
    pub column_counts: Vec<(String, usize)>,
}

impl DropPreview {
    pub fn rows_dropped(&self) -> usize {
        self.rows_before - self.rows_after
    }
}

/// Overview printed by the exploration mode of the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorationReport {
    pub shape: (usize, usize),
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub has_missing: bool,
}

/// Stateless inspection helpers over a borrowed table.
pub struct DataProfiler;

impl DataProfiler {
    /// Total number of null cells across the table.
    pub fn count_missing(df: &DataFrame) -> usize {
        df.get_columns().iter().map(|col| col.null_count()).sum()
    }

    /// Number of null cells in one column.
    pub fn count_missing_in_column(df: &DataFrame, column: &str) -> Result<usize> {
        Ok(column_series(df, column)?.null_count())
    }

    /// Whether any cell in the table is null.
    pub fn has_missing(df: &DataFrame) -> bool {
        df.get_columns().iter().any(|col| col.null_count() > 0)
    }

    /// Compute what would remain if every row containing a null were dropped.
    pub fn preview_drop_missing_rows(df: &DataFrame) -> Result<DropPreview> {
        let remaining = df.drop_nulls::<String>(None)?;
        let column_counts = remaining
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.len() - col.null_count()))
            .collect();

        Ok(DropPreview {
            rows_before: df.height(),
            rows_after: remaining.height(),
            column_counts,
        })
    }

    /// Names of numeric columns.
    pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
        columns_of_category(df, DtypeCategory::Numeric)
    }

    /// Names of text (categorical) columns.
    pub fn categorical_columns(df: &DataFrame) -> Vec<String> {
        columns_of_category(df, DtypeCategory::Text)
    }

    /// Rendered values of one column, nulls kept as `None`.
    pub fn column_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
        let series = column_series(df, column)?.cast(&DataType::String)?;
        Ok(series
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect())
    }

    /// Build the exploration overview.
    pub fn explore(df: &DataFrame) -> ExplorationReport {
        ExplorationReport {
            shape: df.shape(),
            numeric_columns: Self::numeric_columns(df),
            categorical_columns: Self::categorical_columns(df),
            has_missing: Self::has_missing(df),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df![
            "date" => ["2013/07/01", "2013/07/02", "2013/07/03", "2013/07/04"],
            "MaxTemp" => [Some(35.0), None, Some(38.0), Some(36.0)],
            "Events" => [None, Some("Rain"), None, Some("Fog")],
        ]
        .unwrap()
    }

    #[test]
    fn test_count_missing() {
        let df = sample();
        assert_eq!(DataProfiler::count_missing(&df), 3);
        assert_eq!(DataProfiler::count_missing_in_column(&df, "Events").unwrap(), 2);
        assert_eq!(DataProfiler::count_missing_in_column(&df, "date").unwrap(), 0);
        assert!(DataProfiler::has_missing(&df));
    }

    #[test]
    fn test_count_missing_unknown_column() {
        let err = DataProfiler::count_missing_in_column(&sample(), "Nope").unwrap_err();
        assert!(err.is_column_not_found());
    }

    #[test]
    fn test_preview_drop_does_not_mutate() {
        let df = sample();
        let preview = DataProfiler::preview_drop_missing_rows(&df).unwrap();

        // Only 2013/07/04 is complete
        assert_eq!(preview.rows_before, 4);
        assert_eq!(preview.rows_after, 1);
        assert_eq!(preview.rows_dropped(), 3);
        assert_eq!(preview.column_counts[1], ("MaxTemp".to_string(), 1));
        assert_eq!(df.height(), 4);
    }

    #[test]
    fn test_explore() {
        let report = DataProfiler::explore(&sample());
        assert_eq!(report.shape, (4, 3));
        assert_eq!(report.numeric_columns, vec!["MaxTemp"]);
        assert_eq!(report.categorical_columns, vec!["date", "Events"]);
        assert!(report.has_missing);
    }

    #[test]
    fn test_column_values() {
        let values = DataProfiler::column_values(&sample(), "Events").unwrap();
        assert_eq!(values[0], None);
        assert_eq!(values[1].as_deref(), Some("Rain"));
    }
}
