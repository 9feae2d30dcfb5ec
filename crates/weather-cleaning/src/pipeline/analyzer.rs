//! The owned weather table and its operations.

use crate::cleaner;
use crate::config::FillValue;
use crate::error::Result;
use crate::imputers::ConstantImputer;
use crate::io;
use crate::pipeline::progress::{Phase, PhaseReporter, PhaseUpdate};
use crate::profiler::{DataProfiler, DescribeReport, DropPreview, ExplorationReport};
use crate::reporting;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Single owner of the weather table for one run.
///
/// Every mutating operation takes `&mut self`; read-only inspections borrow.
/// The current [`Phase`] is tracked and reported but not enforced.
///
/// # Example
///
/// ```rust,ignore
/// use weather_cleaning::{Analyzer, FillValue};
///
/// let mut analyzer = Analyzer::from_csv("data/weather_madrid.csv")?;
/// analyzer.select_columns(&["CET", "Max TemperatureC", "Events"])?;
/// analyzer.rename_columns(&["date", "MaxTemp", "Events"])?;
/// analyzer.null_above_threshold("MaxTemp", 42.2)?;
/// analyzer.fill_missing("Events", &FillValue::from("NoEvent"))?;
/// analyzer.parse_date_column("date", "%Y/%m/%d")?;
/// analyzer.derive_year_month("date")?;
/// analyzer.export("data/weather_madrid_clean.csv")?;
/// ```
pub struct Analyzer {
    df: DataFrame,
    phase: Phase,
    reporter: Option<Arc<dyn PhaseReporter>>,
}

static_assertions::assert_impl_all!(Analyzer: Send);

impl Analyzer {
    /// Take ownership of a raw table.
    pub fn new(df: DataFrame) -> Self {
        Self {
            df,
            phase: Phase::Raw,
            reporter: None,
        }
    }

    /// Load a raw table from CSV.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(io::load_csv(path)?))
    }

    /// Attach a phase reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn PhaseReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_inner(self) -> DataFrame {
        self.df
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn transition(&mut self, phase: Phase, message: impl Into<String>) {
        let update = PhaseUpdate::new(self.phase, phase, message);
        if update.is_out_of_order() {
            debug!("Phase {} entered from {}", update.phase, update.previous);
        }
        debug!("[{}] {}", update.phase.display_name(), update.message);

        self.phase = phase;
        if let Some(reporter) = &self.reporter {
            reporter.report(update);
        }
    }

    // ------------------------------------------------------------------
    // Narrowing
    // ------------------------------------------------------------------

    /// Keep exactly `columns`, in that order.
    pub fn select_columns<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<()> {
        self.df = cleaner::select_columns(&self.df, columns)?;
        self.transition(
            Phase::Selected,
            format!("Kept {} columns", self.df.width()),
        );
        Ok(())
    }

    /// Rename all columns positionally.
    pub fn rename_columns<S: AsRef<str>>(&mut self, new_names: &[S]) -> Result<()> {
        cleaner::rename_columns(&mut self.df, new_names)?;
        self.transition(Phase::Renamed, "Columns renamed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Summary statistics of every numeric column.
    pub fn describe(&self) -> Result<DescribeReport> {
        let report = DescribeReport::from_dataframe(&self.df)?;
        info!("Describing {} numeric columns", report.columns.len());
        debug!("\n{}", report);
        Ok(report)
    }

    /// Rows where `column > limit`.
    pub fn find_outliers(&self, column: &str, limit: f64) -> Result<DataFrame> {
        cleaner::find_outliers(&self.df, column, limit)
    }

    /// Write a box plot of `column` under `graphs_dir`.
    pub fn plot_distribution(&self, column: &str, graphs_dir: impl AsRef<Path>) -> Result<PathBuf> {
        reporting::draw_boxplot(&self.df, column, graphs_dir)
    }

    /// Total null cells.
    pub fn count_missing(&self) -> usize {
        DataProfiler::count_missing(&self.df)
    }

    /// Null cells in one column.
    pub fn count_missing_in_column(&self, column: &str) -> Result<usize> {
        DataProfiler::count_missing_in_column(&self.df, column)
    }

    /// What dropping every incomplete row would leave; the table is unchanged.
    pub fn preview_drop_missing_rows(&self) -> Result<DropPreview> {
        DataProfiler::preview_drop_missing_rows(&self.df)
    }

    pub fn has_missing(&self) -> bool {
        DataProfiler::has_missing(&self.df)
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        DataProfiler::numeric_columns(&self.df)
    }

    pub fn categorical_columns(&self) -> Vec<String> {
        DataProfiler::categorical_columns(&self.df)
    }

    /// Shape, column listings and null presence in one report.
    pub fn explore(&self) -> ExplorationReport {
        DataProfiler::explore(&self.df)
    }

    /// Raw values of the date column.
    pub fn date_values(&self, column: &str) -> Result<Vec<Option<String>>> {
        DataProfiler::column_values(&self.df, column)
    }

    /// HTML table of the first `rows` rows.
    pub fn write_html_preview(&self, path: impl AsRef<Path>, rows: usize) -> Result<PathBuf> {
        reporting::write_html_preview(&self.df, path, rows)
    }

    // ------------------------------------------------------------------
    // Cleaning
    // ------------------------------------------------------------------

    /// Null every value of `column` above `limit`; returns the cells flushed.
    pub fn null_above_threshold(&mut self, column: &str, limit: f64) -> Result<usize> {
        let flushed = cleaner::null_above_threshold(&mut self.df, column, limit)?;
        self.transition(
            Phase::Cleaned,
            format!("{} values above {} flushed in '{}'", flushed, limit, column),
        );
        Ok(flushed)
    }

    /// Fill the nulls of `column` with `value`; returns the cells filled.
    pub fn fill_missing(&mut self, column: &str, value: &FillValue) -> Result<usize> {
        let filled = ConstantImputer::fill_missing(&mut self.df, column, value)?;
        self.transition(
            Phase::Imputed,
            format!("{} missing values filled in '{}'", filled, column),
        );
        Ok(filled)
    }

    /// Parse `column` as dates; returns the number of unparseable values.
    pub fn parse_date_column(&mut self, column: &str, format: &str) -> Result<usize> {
        cleaner::parse_date_column(&mut self.df, column, format)
    }

    /// Add `Year` and `Month` from a parsed date column.
    pub fn derive_year_month(&mut self, date_column: &str) -> Result<()> {
        cleaner::derive_year_month(&mut self.df, date_column)?;
        self.transition(
            Phase::DateDecomposed,
            format!("Year and Month derived from '{}'", date_column),
        );
        Ok(())
    }

    /// Write the table as CSV, overwriting `path`.
    pub fn export(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        io::write_csv(&mut self.df, path)?;
        self.transition(Phase::Exported, format!("Written to {}", path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::progress::ClosurePhaseReporter;
    use std::sync::Mutex;

    fn raw() -> DataFrame {
        df![
            "CET" => ["2013/07/03", "2013/07/04"],
            "Max TemperatureC" => [30, 80],
            "Events" => [Some("Rain"), None],
            "Wind" => [3, 4],
        ]
        .unwrap()
    }

    #[test]
    fn test_starts_raw() {
        let analyzer = Analyzer::new(raw());
        assert_eq!(analyzer.phase(), Phase::Raw);
        assert_eq!(analyzer.df().width(), 4);
    }

    #[test]
    fn test_select_rename_keeps_data() {
        let mut analyzer = Analyzer::new(raw());
        analyzer.select_columns(&["CET", "Max TemperatureC", "Events"]).unwrap();
        analyzer.rename_columns(&["date", "MaxTemp", "Events"]).unwrap();

        assert_eq!(analyzer.phase(), Phase::Renamed);
        assert_eq!(analyzer.df().width(), 3);
        let max: Vec<Option<i32>> = analyzer
            .df()
            .column("MaxTemp")
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(max, vec![Some(30), Some(80)]);
    }

    #[test]
    fn test_failed_operation_keeps_phase() {
        let mut analyzer = Analyzer::new(raw());
        assert!(analyzer.select_columns(&["Humidity"]).is_err());
        assert_eq!(analyzer.phase(), Phase::Raw);
        assert_eq!(analyzer.df().width(), 4);
    }

    #[test]
    fn test_full_sequence_reports_phases() {
        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = phases.clone();
        let reporter = Arc::new(ClosurePhaseReporter::new(move |update: PhaseUpdate| {
            sink.lock().unwrap().push(update.phase);
        }));

        let dir = tempfile::tempdir().unwrap();
        let mut analyzer = Analyzer::new(raw()).with_reporter(reporter);
        analyzer.select_columns(&["CET", "Max TemperatureC", "Events"]).unwrap();
        analyzer.rename_columns(&["date", "MaxTemp", "Events"]).unwrap();
        assert_eq!(analyzer.null_above_threshold("MaxTemp", 42.2).unwrap(), 1);
        assert_eq!(analyzer.count_missing(), 2);
        analyzer.fill_missing("Events", &FillValue::from("NoEvent")).unwrap();
        analyzer.fill_missing("MaxTemp", &FillValue::from("NoValue")).unwrap();
        assert!(!analyzer.has_missing());
        analyzer.parse_date_column("date", "%Y/%m/%d").unwrap();
        analyzer.derive_year_month("date").unwrap();
        analyzer.export(dir.path().join("clean.csv")).unwrap();

        assert_eq!(
            *phases.lock().unwrap(),
            vec![
                Phase::Selected,
                Phase::Renamed,
                Phase::Cleaned,
                Phase::Imputed,
                Phase::Imputed,
                Phase::DateDecomposed,
                Phase::Exported,
            ]
        );
        assert_eq!(analyzer.df().width(), 5);
    }

    #[test]
    fn test_inspection_is_read_only() {
        let analyzer = Analyzer::new(raw());
        let before = analyzer.df().clone();

        analyzer.describe().unwrap();
        analyzer.find_outliers("Max TemperatureC", 42.2).unwrap();
        analyzer.preview_drop_missing_rows().unwrap();

        assert!(analyzer.df().equals_missing(&before));
        assert_eq!(analyzer.phase(), Phase::Raw);
    }
}
