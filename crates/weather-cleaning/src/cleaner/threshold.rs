//! Hard-limit checks for physically impossible readings.
//!
//! Values strictly above a fixed limit are discarded (set to null) rather
//! than capped or used to drop the row. No statistical outlier model is
//! involved.

use crate::error::Result;
use crate::utils::numeric_series;
use polars::prelude::*;
use tracing::{debug, info};

/// Rows where `column > limit`. Nulls never match.
pub fn find_outliers(df: &DataFrame, column: &str, limit: f64) -> Result<DataFrame> {
    let series = numeric_series(df, column)?;
    let mask = series.f64()?.gt(limit);
    let rows = df.filter(&mask)?;
    debug!("{} rows in '{}' above {}", rows.height(), column, limit);
    Ok(rows)
}

/// Null out every value of `column` above `limit`.
///
/// The column becomes Float64; values at or below the limit and existing
/// nulls are kept. Returns the number of cells flushed.
pub fn null_above_threshold(df: &mut DataFrame, column: &str, limit: f64) -> Result<usize> {
    let series = numeric_series(df, column)?;
    let float_ca = series.f64()?;

    let mut flushed = 0;
    let values: Vec<Option<f64>> = float_ca
        .into_iter()
        .map(|v| match v {
            Some(val) if val > limit => {
                flushed += 1;
                None
            }
            other => other,
        })
        .collect();

    df.replace(column, Series::new(column.into(), values))?;

    info!(
        "Flushed {} values above {} in '{}' to null",
        flushed, limit, column
    );
    Ok(flushed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    fn weather() -> DataFrame {
        df![
            "date" => ["2013/07/01", "2013/07/02", "2013/07/03", "2013/07/04", "2013/07/05"],
            "MaxTemp" => [Some(35), Some(80), None, Some(42), Some(43)],
            "Events" => ["Rain", "Sun", "Fog", "Rain", "Sun"],
        ]
        .unwrap()
    }

    fn max_temps(df: &DataFrame) -> Vec<Option<f64>> {
        df.column("MaxTemp")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_find_outliers() {
        let df = weather();
        let rows = find_outliers(&df, "MaxTemp", 42.2).unwrap();

        assert_eq!(rows.height(), 2);
        let dates: Vec<Option<&str>> = rows
            .column("date")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(dates, vec![Some("2013/07/02"), Some("2013/07/05")]);
        // Read-only
        assert_eq!(df.height(), 5);
    }

    #[test]
    fn test_find_outliers_none_above() {
        let rows = find_outliers(&weather(), "MaxTemp", 100.0).unwrap();
        assert_eq!(rows.height(), 0);
    }

    #[test]
    fn test_null_above_threshold() {
        let mut df = weather();
        let flushed = null_above_threshold(&mut df, "MaxTemp", 42.2).unwrap();

        assert_eq!(flushed, 2);
        assert_eq!(
            max_temps(&df),
            vec![Some(35.0), None, None, Some(42.0), None]
        );
        // Other columns untouched
        assert_eq!(df.column("Events").unwrap().null_count(), 0);
    }

    #[test]
    fn test_null_above_threshold_leaves_nothing_above_limit() {
        let mut df = weather();
        null_above_threshold(&mut df, "MaxTemp", 42.2).unwrap();

        assert!(max_temps(&df).into_iter().flatten().all(|v| v <= 42.2));
        assert_eq!(find_outliers(&df, "MaxTemp", 42.2).unwrap().height(), 0);
    }

    #[test]
    fn test_null_above_threshold_is_stable() {
        let mut df = weather();
        null_above_threshold(&mut df, "MaxTemp", 42.2).unwrap();
        let again = null_above_threshold(&mut df, "MaxTemp", 42.2).unwrap();
        assert_eq!(again, 0);
    }

    #[test]
    fn test_threshold_on_text_column() {
        let mut df = weather();
        let err = null_above_threshold(&mut df, "Events", 1.0).unwrap_err();
        assert!(matches!(err, PipelineError::NotNumeric(_)));
    }

    #[test]
    fn test_threshold_unknown_column() {
        let err = find_outliers(&weather(), "MinTemp", 0.0).unwrap_err();
        assert!(err.is_column_not_found());
    }
}
