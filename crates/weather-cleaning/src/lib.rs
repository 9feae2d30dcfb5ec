//! Weather Cleaning Library
//!
//! Cleans the Madrid daily weather CSV with Polars: keeps and renames the
//! useful columns, flushes physically impossible temperatures to missing,
//! fills missing values with markers, splits the date into `Year` and
//! `Month` and writes the result back to CSV.
//!
//! # Overview
//!
//! - **Analyzer**: single owner of the table, one method per cleaning or
//!   inspection operation, with advisory [`Phase`] tracking
//! - **Pipeline**: the fixed run driven by a [`PipelineConfig`]
//! - **Profiling**: describe statistics, missing counts, drop previews
//! - **Reporting**: HTML preview, PNG box plots and a JSON
//!   run report
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use weather_cleaning::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::builder()
//!     .input_path("data/weather_madrid.csv")
//!     .output_path("data/weather_madrid_clean.csv")
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_phase(|update| println!("[{}] {}", update.phase, update.message))
//!     .build()?
//!     .run()?;
//!
//! println!("{} values flushed, {} cells filled", result.flushed_cells, result.total_filled());
//! ```
//!
//! # Step by step
//!
//! ```rust,ignore
//! use weather_cleaning::{Analyzer, FillValue};
//!
//! let mut analyzer = Analyzer::from_csv("data/weather_madrid.csv")?;
//! analyzer.select_columns(&["CET", "Max TemperatureC", "Events"])?;
//! analyzer.rename_columns(&["date", "MaxTemp", "Events"])?;
//!
//! println!("{}", analyzer.describe()?);
//! println!("{}", analyzer.find_outliers("MaxTemp", 42.2)?);
//!
//! analyzer.null_above_threshold("MaxTemp", 42.2)?;
//! analyzer.fill_missing("Events", &FillValue::from("NoEvent"))?;
//! analyzer.parse_date_column("date", "%Y/%m/%d")?;
//! analyzer.derive_year_month("date")?;
//! analyzer.export("data/weather_madrid_clean.csv")?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    ConfigValidationError, FillRule, FillValue, PipelineConfig, PipelineConfigBuilder,
    ThresholdRule,
};
pub use error::{PipelineError, ResultExt};
pub use imputers::ConstantImputer;
pub use pipeline::{
    Analyzer, ClosurePhaseReporter, Phase, Pipeline, PipelineBuilder, PhaseReporter, PhaseUpdate,
};
pub use profiler::{ColumnStatistics, DataProfiler, DescribeReport, DropPreview, ExplorationReport};
pub use reporting::{ReportGenerator, RunReport};
pub use types::{FillOutcome, PipelineResult};
pub use utils::{DtypeCategory, get_dtype_category, is_numeric_dtype};
