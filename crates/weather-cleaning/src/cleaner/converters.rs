//! Date conversion functions.

use crate::error::{PipelineError, Result};
use crate::utils::column_series;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use tracing::{debug, warn};

/// Name of the derived year column.
pub const YEAR_COLUMN: &str = "Year";
/// Name of the derived month column.
pub const MONTH_COLUMN: &str = "Month";

/// Days between 0001-01-01 (CE day 1) and 1970-01-01, the Date epoch.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(EPOCH_DAYS_FROM_CE)?)
}

/// Convert a string column to `Date` using a chrono format string.
///
/// Strings that do not match `format` become null; their count is returned
/// and logged. A column that is already `Date` is left as-is.
pub fn parse_date_column(df: &mut DataFrame, column: &str, format: &str) -> Result<usize> {
    let series = column_series(df, column)?;
    if series.dtype() == &DataType::Date {
        debug!("Column '{}' already holds dates", column);
        return Ok(0);
    }

    let str_series = series.cast(&DataType::String)?;
    let mut unparsed = 0;
    let days: Vec<Option<i32>> = str_series
        .str()?
        .into_iter()
        .map(|opt_val| {
            let val = opt_val?;
            match NaiveDate::parse_from_str(val.trim(), format) {
                Ok(date) => Some(date_to_epoch_days(date)),
                Err(_) => {
                    unparsed += 1;
                    None
                }
            }
        })
        .collect();

    let dates = Series::new(column.into(), days).cast(&DataType::Date)?;
    df.replace(column, dates)?;

    if unparsed > 0 {
        warn!(
            "{} values in '{}' did not match '{}' and were set to null",
            unparsed, column, format
        );
    }
    Ok(unparsed)
}

/// Append `Year` and `Month` Int32 columns computed from a `Date` column.
///
/// Null dates yield null year and month. Existing `Year`/`Month` columns are
/// replaced.
pub fn derive_year_month(df: &mut DataFrame, date_column: &str) -> Result<()> {
    let series = column_series(df, date_column)?;
    if series.dtype() != &DataType::Date {
        return Err(PipelineError::NotADateColumn(date_column.to_string()));
    }

    let days = series.cast(&DataType::Int32)?;
    let (years, months): (Vec<Option<i32>>, Vec<Option<i32>>) = days
        .i32()?
        .into_iter()
        .map(|d| match d.and_then(epoch_days_to_date) {
            Some(date) => (Some(date.year()), Some(date.month() as i32)),
            None => (None, None),
        })
        .unzip();

    df.with_column(Series::new(YEAR_COLUMN.into(), years))?;
    df.with_column(Series::new(MONTH_COLUMN.into(), months))?;
    debug!("Derived {} and {} from '{}'", YEAR_COLUMN, MONTH_COLUMN, date_column);
    Ok(())
}
