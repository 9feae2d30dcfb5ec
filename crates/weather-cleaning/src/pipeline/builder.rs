//! The fixed cleaning run over one weather CSV.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::io;
use crate::pipeline::analyzer::Analyzer;
use crate::pipeline::progress::{ClosurePhaseReporter, PhaseReporter, PhaseUpdate};
use crate::types::{FillOutcome, PipelineResult};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Runs the configured cleaning sequence end to end.
///
/// Use [`Pipeline::builder()`] to create a pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use weather_cleaning::{Pipeline, PipelineConfig};
///
/// let result = Pipeline::builder()
///     .config(PipelineConfig::builder().graphs_dir("out/graphs").build()?)
///     .on_phase(|update| println!("[{}] {}", update.phase, update.message))
///     .build()?
///     .run()?;
///
/// println!("{} cells flushed", result.flushed_cells);
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    phase_reporter: Option<Arc<dyn PhaseReporter>>,
}

static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load `input_path` and process it.
    pub fn run(&self) -> Result<PipelineResult> {
        let df = io::load_csv(&self.config.input_path)?;
        self.process(df)
    }

    /// Process an already loaded raw table and export it to `output_path`.
    pub fn process(&self, df: DataFrame) -> Result<PipelineResult> {
        self.process_internal(df).inspect_err(|e| error!("Pipeline error: {}", e))
    }

    fn process_internal(&self, df: DataFrame) -> Result<PipelineResult> {
        let start_time = Instant::now();
        let config = &self.config;
        info!("Starting cleaning pipeline...");

        let (rows_before, columns_before) = df.shape();
        let mut processing_steps: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        let mut analyzer = Analyzer::new(df);
        if let Some(reporter) = &self.phase_reporter {
            analyzer = analyzer.with_reporter(reporter.clone());
        }
        processing_steps.push(format!("Loaded {} rows x {} columns", rows_before, columns_before));

        // Step 1: HTML preview of the raw table
        let html_preview = match &config.html_preview_path {
            Some(path) => {
                let written = analyzer.write_html_preview(path, config.preview_rows)?;
                processing_steps.push(format!("HTML preview written to {}", written.display()));
                Some(written.to_string_lossy().to_string())
            }
            None => None,
        };

        // Step 2: Narrow and rename
        info!("Selecting {} columns...", config.selected_columns.len());
        analyzer.select_columns(&config.selected_columns)?;
        analyzer.rename_columns(&config.column_names)?;
        processing_steps.push(format!(
            "Selected and renamed {} columns",
            config.column_names.len()
        ));

        // Step 3: Describe before any cleaning
        let describe = analyzer.describe()?;

        // Step 4: Physical limit
        let rule = &config.threshold;
        let outliers = analyzer.find_outliers(&rule.column, rule.limit)?;
        if outliers.height() > 0 {
            info!(
                "{} rows with {} > {}:\n{}",
                outliers.height(),
                rule.column,
                rule.limit,
                outliers
            );
        }

        let mut plots = Vec::new();
        if config.draw_plots {
            let path = analyzer.plot_distribution(&rule.column, &config.graphs_dir)?;
            processing_steps.push(format!("Box plot of {} written", rule.column));
            plots.push(path.to_string_lossy().to_string());
        }

        let flushed_cells = analyzer.null_above_threshold(&rule.column, rule.limit)?;
        processing_steps.push(format!(
            "Flushed {} values of {} above {}",
            flushed_cells, rule.column, rule.limit
        ));

        // Step 5: Missing values
        let missing_before_fill = analyzer.count_missing();
        let drop_preview = analyzer.preview_drop_missing_rows()?;
        info!(
            "{} missing cells; dropping incomplete rows would keep {} of {} rows",
            missing_before_fill, drop_preview.rows_after, drop_preview.rows_before
        );
        for (column, count) in &drop_preview.column_counts {
            debug!("  {}: {} non-null after drop", column, count);
        }

        let mut fills = Vec::with_capacity(config.fill_rules.len());
        for fill in &config.fill_rules {
            let missing_before = analyzer.count_missing_in_column(&fill.column)?;
            let filled = analyzer.fill_missing(&fill.column, &fill.value)?;
            processing_steps.push(format!(
                "Filled {} missing values in {} with '{}'",
                filled, fill.column, fill.value
            ));
            fills.push(FillOutcome {
                column: fill.column.clone(),
                value: fill.value.clone(),
                missing_before,
                filled,
            });
        }
        let missing_after_fill = analyzer.count_missing();

        // Step 6: Dates
        let unparsed_dates = analyzer.parse_date_column(&config.date_column, &config.date_format)?;
        if unparsed_dates > 0 {
            warnings.push(format!(
                "{} values of '{}' did not match {}",
                unparsed_dates, config.date_column, config.date_format
            ));
        }
        analyzer.derive_year_month(&config.date_column)?;
        processing_steps.push(format!("Derived Year and Month from {}", config.date_column));

        // Step 7: Export
        analyzer.export(&config.output_path)?;
        processing_steps.push(format!("Exported to {}", config.output_path.display()));

        let (rows_after, columns_after) = analyzer.df().shape();
        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!("Pipeline completed in {}ms", duration_ms);

        Ok(PipelineResult {
            input_path: config.input_path.to_string_lossy().to_string(),
            output_path: config.output_path.to_string_lossy().to_string(),
            rows_before,
            columns_before,
            rows_after,
            columns_after,
            describe,
            outlier_rows: outliers.height(),
            flushed_cells,
            missing_before_fill,
            missing_after_fill,
            drop_preview,
            fills,
            unparsed_dates,
            html_preview,
            plots,
            processing_steps,
            warnings,
            final_phase: analyzer.phase(),
            duration_ms,
        })
    }
}

/// Builder for constructing a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    phase_reporter: Option<Arc<dyn PhaseReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a reporter receiving every phase transition.
    pub fn phase_reporter(mut self, reporter: Arc<dyn PhaseReporter>) -> Self {
        self.phase_reporter = Some(reporter);
        self
    }

    /// Set a phase callback closure.
    ///
    /// For more complex scenarios, use [`phase_reporter`](Self::phase_reporter).
    pub fn on_phase<F>(mut self, callback: F) -> Self
    where
        F: Fn(PhaseUpdate) + Send + Sync + 'static,
    {
        self.phase_reporter = Some(Arc::new(ClosurePhaseReporter::new(callback)));
        self
    }

    /// Build the pipeline, validating the configuration.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            phase_reporter: self.phase_reporter,
        })
    }
}
