//! Table-narrowing and value-cleaning operations.
//!
//! This module provides:
//! - Positional column selection and renaming
//! - Threshold flushing of physically impossible values
//! - Date string conversion and year/month decomposition

mod converters;
mod threshold;

pub use converters::{derive_year_month, parse_date_column, MONTH_COLUMN, YEAR_COLUMN};
pub use threshold::{find_outliers, null_above_threshold};

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use tracing::debug;

/// Keep exactly `columns`, in that order.
pub fn select_columns<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<DataFrame> {
    let available = df.get_column_names();
    if let Some(missing) = columns
        .iter()
        .map(AsRef::as_ref)
        .find(|name| !available.iter().any(|c| c.as_str() == *name))
    {
        return Err(PipelineError::ColumnNotFound(missing.to_string()));
    }

    let names: Vec<PlSmallStr> = columns.iter().map(|s| s.as_ref().into()).collect();
    let selected = df.select(names)?;
    debug!("Selected {} columns", selected.width());
    Ok(selected)
}

/// Rename every column positionally.
pub fn rename_columns<S: AsRef<str>>(df: &mut DataFrame, new_names: &[S]) -> Result<()> {
    if new_names.len() != df.width() {
        return Err(PipelineError::ShapeMismatch {
            expected: df.width(),
            actual: new_names.len(),
        });
    }

    let names: Vec<PlSmallStr> = new_names.iter().map(|s| s.as_ref().into()).collect();
    df.set_column_names(names)?;
    debug!("Renamed columns to {:?}", df.get_column_names());
    Ok(())
}
