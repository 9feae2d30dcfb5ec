//! Descriptive statistics for numeric columns.

use crate::error::Result;
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary statistics of one numeric column, nulls excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStatistics {
    /// Compute statistics over a series of any numeric dtype.
    pub fn from_series(series: &Series) -> Result<Self> {
        let float_series = series.cast(&DataType::Float64)?;
        let mut values: Vec<f64> = float_series.f64()?.into_iter().flatten().collect();
        values.sort_by(|a, b| a.total_cmp(b));

        let count = values.len();
        let mean = mean(&values);

        Ok(Self {
            name: series.name().to_string(),
            count,
            mean,
            std: calculate_std(&values, mean),
            min: values.first().copied(),
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values.last().copied(),
        })
    }
}

/// Statistics for every numeric column of a table, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeReport {
    pub columns: Vec<ColumnStatistics>,
}

/// Row labels of [`DescribeReport::to_dataframe`].
pub const STATISTIC_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

impl DescribeReport {
    /// Describe every numeric column of `df`; other columns are skipped.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let columns = df
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| ColumnStatistics::from_series(col.as_materialized_series()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { columns })
    }

    /// Look up the statistics of a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnStatistics> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Render the report as a table: one `statistic` label column, then one
    /// Float64 column per described column.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::new("statistic".into(), STATISTIC_LABELS));

        for stats in &self.columns {
            let values = [
                Some(stats.count as f64),
                stats.mean,
                stats.std,
                stats.min,
                stats.q25,
                stats.median,
                stats.q75,
                stats.max,
            ];
            columns.push(Column::new(stats.name.as_str().into(), values));
        }

        Ok(DataFrame::new(columns)?)
    }
}

impl fmt::Display for DescribeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_dataframe() {
            Ok(df) => write!(f, "{}", df),
            Err(_) => write!(f, "<describe report unavailable>"),
        }
    }
}

fn mean(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    Some(sorted.iter().sum::<f64>() / sorted.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub(crate) fn calculate_std(values: &[f64], mean: Option<f64>) -> Option<f64> {
    let mean = mean?;
    let n = values.len() as f64;

    if n <= 1.0 {
        return None;
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

/// Quantile with linear interpolation between the two nearest ranks.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== calculate_std tests ====================

    #[test]
    fn test_calculate_std_basic() {
        // Mean = 3, sample variance = 10 / 4 = 2.5
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let std = calculate_std(&values, Some(3.0)).unwrap();
        assert!((std - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_std_single_value() {
        assert_eq!(calculate_std(&[5.0], Some(5.0)), None);
    }

    #[test]
    fn test_calculate_std_identical_values() {
        let std = calculate_std(&[5.0, 5.0, 5.0, 5.0], Some(5.0)).unwrap();
        assert_eq!(std, 0.0);
    }

    // ==================== quantile tests ====================

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile(&sorted, 0.75), Some(3.25));
    }

    #[test]
    fn test_quantile_bounds() {
        let sorted = [-3.0, 10.0, 80.0];
        assert_eq!(quantile(&sorted, 0.0), Some(-3.0));
        assert_eq!(quantile(&sorted, 1.0), Some(80.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    // ==================== describe tests ====================

    #[test]
    fn test_column_statistics_skips_nulls() {
        let series = Series::new("MaxTemp".into(), &[Some(10i64), None, Some(20), Some(80)]);
        let stats = ColumnStatistics::from_series(&series).unwrap();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, Some(10.0));
        assert_eq!(stats.max, Some(80.0));
        assert_eq!(stats.median, Some(20.0));
        assert!((stats.mean.unwrap() - 110.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_column_statistics_all_null() {
        let series = Series::new("CloudCover".into(), &[None::<f64>, None]);
        let stats = ColumnStatistics::from_series(&series).unwrap();

        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.max, None);
    }

    #[test]
    fn test_describe_only_numeric_columns() {
        let df = df![
            "date" => ["1997/01/01", "1997/01/02"],
            "MeanTemp" => [5, 7],
            "Events" => [Some("Rain"), None],
        ]
        .unwrap();

        let report = DescribeReport::from_dataframe(&df).unwrap();
        assert_eq!(report.columns.len(), 1);
        assert_eq!(report.column("MeanTemp").unwrap().mean, Some(6.0));
        assert!(report.column("Events").is_none());
    }

    #[test]
    fn test_describe_to_dataframe_shape() {
        let df = df![
            "MinTemp" => [1.0, 2.0, 3.0],
            "MaxTemp" => [10.0, 20.0, 30.0],
        ]
        .unwrap();

        let table = DescribeReport::from_dataframe(&df)
            .unwrap()
            .to_dataframe()
            .unwrap();

        assert_eq!(table.shape(), (8, 3));
        let labels: Vec<Option<&str>> = table
            .column("statistic")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(labels[0], Some("count"));
        assert_eq!(labels[7], Some("max"));
    }
}
