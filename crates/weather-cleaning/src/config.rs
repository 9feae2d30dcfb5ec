//! Configuration types for the weather cleaning pipeline.
//!
//! The defaults reproduce the Madrid daily weather cleaning run: twelve
//! columns selected and shortened, `MaxTemp` above 42.2 °C flushed, `Events`
//! and `MaxTemp` filled with text markers, and `date` parsed as `%Y/%m/%d`.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Highest temperature ever recorded in Madrid, in °C.
pub const MADRID_MAX_TEMPERATURE_C: f64 = 42.2;

/// Original CSV headers kept by the default selection, in output order.
pub const DEFAULT_SELECTED_COLUMNS: [&str; 12] = [
    "CET",
    "Mean TemperatureC",
    "Min TemperatureC",
    "Max TemperatureC",
    "Mean Humidity",
    "Max Humidity",
    "Min Humidity",
    "MeanDew PointC",
    "Min DewpointC",
    "Dew PointC",
    "CloudCover",
    "Events",
];

/// Short names assigned positionally to [`DEFAULT_SELECTED_COLUMNS`].
pub const DEFAULT_COLUMN_NAMES: [&str; 12] = [
    "date",
    "MeanTemp",
    "MinTemp",
    "MaxTemp",
    "MeanHum",
    "MaxHum",
    "MinHum",
    "MeanDew",
    "MinDew",
    "Dew",
    "CloudCover",
    "Events",
];

/// Value written into missing cells by a fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillValue {
    /// Numeric sentinel; keeps numeric columns numeric.
    Number(f64),
    /// Text marker; widens numeric columns to strings.
    Text(String),
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FillValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for FillValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Replace every missing cell of `column` with `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillRule {
    pub column: String,
    pub value: FillValue,
}

impl FillRule {
    pub fn new(column: impl Into<String>, value: impl Into<FillValue>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Values of `column` strictly above `limit` are physically impossible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub column: String,
    pub limit: f64,
}

impl ThresholdRule {
    pub fn new(column: impl Into<String>, limit: f64) -> Self {
        Self {
            column: column.into(),
            limit,
        }
    }
}

/// Configuration for a pipeline run.
///
/// Use [`PipelineConfig::builder()`] for a fluent setup, or deserialize one
/// from JSON (every field has a default).
///
/// # Example
///
/// ```rust,ignore
/// use weather_cleaning::config::{PipelineConfig, ThresholdRule};
///
/// let config = PipelineConfig::builder()
///     .input_path("data/weather_madrid.csv")
///     .threshold(ThresholdRule::new("MaxTemp", 42.2))
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Source CSV.
    /// Default: "data/weather_madrid.csv"
    pub input_path: PathBuf,

    /// Destination of the cleaned CSV (overwritten).
    /// Default: "data/weather_madrid_clean.csv"
    pub output_path: PathBuf,

    /// Where to write an HTML table of the first rows, if anywhere.
    /// Default: None
    pub html_preview_path: Option<PathBuf>,

    /// Number of rows in the HTML preview.
    /// Default: 100
    pub preview_rows: usize,

    /// Directory receiving `<column>_boxplot.png` files.
    /// Default: "data/graphs"
    pub graphs_dir: PathBuf,

    /// Whether to draw a box plot of the threshold column before flushing.
    /// Default: true
    pub draw_plots: bool,

    /// Original headers to keep, in order.
    pub selected_columns: Vec<String>,

    /// Positional new names for the selected columns.
    pub column_names: Vec<String>,

    /// Physical limit check applied after renaming.
    /// Default: MaxTemp > 42.2
    pub threshold: ThresholdRule,

    /// Missing-value fills, applied in order.
    /// Default: Events -> "NoEvent", MaxTemp -> "NoValue"
    pub fill_rules: Vec<FillRule>,

    /// Renamed column holding the date strings.
    /// Default: "date"
    pub date_column: String,

    /// chrono format of the date strings.
    /// Default: "%Y/%m/%d"
    pub date_format: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/weather_madrid.csv"),
            output_path: PathBuf::from("data/weather_madrid_clean.csv"),
            html_preview_path: None,
            preview_rows: 100,
            graphs_dir: PathBuf::from("data/graphs"),
            draw_plots: true,
            selected_columns: DEFAULT_SELECTED_COLUMNS.iter().map(|s| s.to_string()).collect(),
            column_names: DEFAULT_COLUMN_NAMES.iter().map(|s| s.to_string()).collect(),
            threshold: ThresholdRule::new("MaxTemp", MADRID_MAX_TEMPERATURE_C),
            fill_rules: vec![
                FillRule::new("Events", "NoEvent"),
                FillRule::new("MaxTemp", "NoValue"),
            ],
            date_column: "date".to_string(),
            date_format: "%Y/%m/%d".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.selected_columns.is_empty() {
            return Err(ConfigValidationError::EmptySelection);
        }

        if self.selected_columns.len() != self.column_names.len() {
            return Err(ConfigValidationError::RenameLengthMismatch {
                selected: self.selected_columns.len(),
                names: self.column_names.len(),
            });
        }

        if !self.threshold.limit.is_finite() {
            return Err(ConfigValidationError::InvalidLimit(self.threshold.limit));
        }

        if self.preview_rows == 0 {
            return Err(ConfigValidationError::InvalidPreviewRows);
        }

        if self.date_format.trim().is_empty() {
            return Err(ConfigValidationError::EmptyDateFormat);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Column selection must not be empty")]
    EmptySelection,

    #[error("Rename list has {names} names but {selected} columns are selected")]
    RenameLengthMismatch { selected: usize, names: usize },

    #[error("Invalid threshold limit: {0} (must be finite)")]
    InvalidLimit(f64),

    #[error("Preview row count must be at least 1")]
    InvalidPreviewRows,

    #[error("Date format must not be empty")]
    EmptyDateFormat,
}

impl From<ConfigValidationError> for PipelineError {
    fn from(err: ConfigValidationError) -> Self {
        PipelineError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    html_preview_path: Option<PathBuf>,
    preview_rows: Option<usize>,
    graphs_dir: Option<PathBuf>,
    draw_plots: Option<bool>,
    selected_columns: Option<Vec<String>>,
    column_names: Option<Vec<String>>,
    threshold: Option<ThresholdRule>,
    fill_rules: Option<Vec<FillRule>>,
    date_column: Option<String>,
    date_format: Option<String>,
}

impl PipelineConfigBuilder {
    /// Set the source CSV path.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the destination CSV path.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Write an HTML preview of the raw table to `path`.
    pub fn html_preview_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.html_preview_path = Some(path.into());
        self
    }

    /// Set the number of rows in the HTML preview.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set the box plot output directory.
    pub fn graphs_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.graphs_dir = Some(path.into());
        self
    }

    /// Enable or disable box plot rendering.
    pub fn draw_plots(mut self, draw: bool) -> Self {
        self.draw_plots = Some(draw);
        self
    }

    /// Set the original headers to keep.
    pub fn selected_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the positional new names.
    pub fn column_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the physical limit rule.
    pub fn threshold(mut self, rule: ThresholdRule) -> Self {
        self.threshold = Some(rule);
        self
    }

    /// Replace the fill rules.
    pub fn fill_rules(mut self, rules: Vec<FillRule>) -> Self {
        self.fill_rules = Some(rules);
        self
    }

    /// Set the renamed date column.
    pub fn date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = Some(column.into());
        self
    }

    /// Set the chrono format used to parse dates.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            input_path: self.input_path.unwrap_or(defaults.input_path),
            output_path: self.output_path.unwrap_or(defaults.output_path),
            html_preview_path: self.html_preview_path,
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
            graphs_dir: self.graphs_dir.unwrap_or(defaults.graphs_dir),
            draw_plots: self.draw_plots.unwrap_or(defaults.draw_plots),
            selected_columns: self.selected_columns.unwrap_or(defaults.selected_columns),
            column_names: self.column_names.unwrap_or(defaults.column_names),
            threshold: self.threshold.unwrap_or(defaults.threshold),
            fill_rules: self.fill_rules.unwrap_or(defaults.fill_rules),
            date_column: self.date_column.unwrap_or(defaults.date_column),
            date_format: self.date_format.unwrap_or(defaults.date_format),
        };

        config.validate()?;
        Ok(config)
    }
}
