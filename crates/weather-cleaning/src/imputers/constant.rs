//! Constant-value imputation.

use crate::config::FillValue;
use crate::error::Result;
use crate::utils::{column_series, fill_numeric_nulls, fill_string_nulls, is_numeric_dtype};
use polars::prelude::*;
use tracing::info;

/// Fills the missing cells of a single column with a constant.
pub struct ConstantImputer;

impl ConstantImputer {
    /// Replace every null in `column` with `value`; returns the number of
    /// cells filled.
    ///
    /// A numeric value keeps a numeric column numeric (as Float64). A text
    /// value, or any value on a non-numeric column, turns the column into
    /// strings. A column without nulls is left exactly as it is.
    pub fn fill_missing(df: &mut DataFrame, column: &str, value: &FillValue) -> Result<usize> {
        let series = column_series(df, column)?;
        let missing = series.null_count();
        if missing == 0 {
            return Ok(0);
        }

        let filled = match value {
            FillValue::Number(n) if is_numeric_dtype(series.dtype()) => {
                fill_numeric_nulls(series, *n)?
            }
            FillValue::Number(n) => fill_string_nulls(series, &n.to_string())?,
            FillValue::Text(text) => fill_string_nulls(series, text)?,
        };

        df.replace(column, filled)?;

        info!("Filled {} missing values in '{}' with '{}'", missing, column, value);
        Ok(missing)
    }
}
