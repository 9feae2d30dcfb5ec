//! Shared helpers for column lookups, dtype classification and null fills.

use crate::error::{PipelineError, Result};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for the exploration listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// String/text type
    Text,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Get the category of a DataType; `None` for dates, booleans and the rest.
pub fn get_dtype_category(dtype: &DataType) -> Option<DtypeCategory> {
    if is_numeric_dtype(dtype) {
        Some(DtypeCategory::Numeric)
    } else if matches!(dtype, DataType::String) {
        Some(DtypeCategory::Text)
    } else {
        None
    }
}

// =============================================================================
// Column Access
// =============================================================================

/// Fetch a column as a materialized Series, mapping absence to `ColumnNotFound`.
pub fn column_series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|col| col.as_materialized_series())
        .map_err(|_| PipelineError::ColumnNotFound(name.to_string()))
}

/// Fetch a numeric column cast to Float64.
pub fn numeric_series(df: &DataFrame, name: &str) -> Result<Series> {
    let series = column_series(df, name)?;
    if !is_numeric_dtype(series.dtype()) {
        return Err(PipelineError::NotNumeric(name.to_string()));
    }
    Ok(series.cast(&DataType::Float64)?)
}

/// Names of the columns whose dtype falls in `category`.
pub fn columns_of_category(df: &DataFrame, category: DtypeCategory) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| get_dtype_category(col.dtype()) == Some(category))
        .map(|col| col.name().to_string())
        .collect()
}

// =============================================================================
// Null Fill Utilities
// =============================================================================

/// Fill null values in a numeric Series, producing Float64.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let float_series = series.cast(&DataType::Float64)?;
    let values: Vec<Option<f64>> = float_series
        .f64()?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Fill null values with a text marker, producing a String Series.
///
/// Non-null values keep their textual rendering from a String cast.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let str_series = series.cast(&DataType::String)?;
    let values: Vec<String> = str_series
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value).to_string())
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Date));
    }

    #[test]
    fn test_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::Int64), Some(DtypeCategory::Numeric));
        assert_eq!(get_dtype_category(&DataType::String), Some(DtypeCategory::Text));
        assert_eq!(get_dtype_category(&DataType::Date), None);
        assert_eq!(get_dtype_category(&DataType::Boolean), None);
    }

    #[test]
    fn test_column_series_missing() {
        let df = df!["a" => [1, 2]].unwrap();
        let err = column_series(&df, "b").unwrap_err();
        assert!(matches!(err, PipelineError::ColumnNotFound(name) if name == "b"));
    }

    #[test]
    fn test_numeric_series_rejects_text() {
        let df = df!["Events" => ["Rain", "Fog"]].unwrap();
        assert!(matches!(
            numeric_series(&df, "Events"),
            Err(PipelineError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_columns_of_category() {
        let df = df![
            "date" => ["1997/01/01"],
            "MaxTemp" => [7],
            "Events" => ["Rain"],
        ]
        .unwrap();
        assert_eq!(
            columns_of_category(&df, DtypeCategory::Text),
            vec!["date", "Events"]
        );
        assert_eq!(columns_of_category(&df, DtypeCategory::Numeric), vec!["MaxTemp"]);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1i64), None, Some(3)]);
        let filled = fill_numeric_nulls(&series, -99.0).unwrap();

        assert_eq!(filled.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = filled.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(-99.0), Some(3.0)]);
    }

    #[test]
    fn test_fill_string_nulls_widens_numbers() {
        let series = Series::new("MaxTemp".into(), &[Some(31i64), None]);
        let filled = fill_string_nulls(&series, "NoValue").unwrap();

        assert_eq!(filled.dtype(), &DataType::String);
        let values: Vec<Option<&str>> = filled.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("31"), Some("NoValue")]);
    }
}
