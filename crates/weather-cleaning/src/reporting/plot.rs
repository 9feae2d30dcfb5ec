//! Box plot rendering.
//!
//! The plot is rasterized straight into a PNG: a horizontal box from the
//! first to the third quartile, a median bar, whiskers at the furthest values
//! within 1.5 IQR of the box and a dot for every value beyond them.

use crate::error::{PipelineError, Result, ResultExt};
use crate::profiler::quantile;
use crate::utils::numeric_series;
use image::{ImageFormat, Rgb, RgbImage};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const PLOT_WIDTH: u32 = 800;
pub const PLOT_HEIGHT: u32 = 400;

const MARGIN: u32 = 60;
const BOX_CENTER: u32 = PLOT_HEIGHT / 2;
const BOX_HALF_HEIGHT: u32 = 60;
const CAP_HALF_HEIGHT: u32 = 25;
const TICK_LENGTH: u32 = 6;
const OUTLIER_RADIUS: u32 = 4;
const WHISKER_FACTOR: f64 = 1.5;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const BOX_FILL: Rgb<u8> = Rgb([76, 114, 176]);
const INK: Rgb<u8> = Rgb([40, 40, 40]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);

/// Quartiles and Tukey whiskers of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value not below `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value not above `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    /// Values beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// Summarize the finite values; `None` when there are none.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25)?;
        let median = quantile(&sorted, 0.5)?;
        let q3 = quantile(&sorted, 0.75)?;

        let reach = WHISKER_FACTOR * (q3 - q1);
        let fences = (q1 - reach)..=(q3 + reach);

        let lower_whisker = sorted.iter().copied().find(|v| fences.contains(v)).unwrap_or(q1);
        let upper_whisker = sorted.iter().rev().copied().find(|v| fences.contains(v)).unwrap_or(q3);
        let outliers = sorted.into_iter().filter(|v| !fences.contains(v)).collect();

        Some(Self {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }

    /// Smallest and largest value drawn, outliers included.
    fn extent(&self) -> (f64, f64) {
        let low = self.outliers.iter().copied().fold(self.lower_whisker, f64::min);
        let high = self.outliers.iter().copied().fold(self.upper_whisker, f64::max);
        (low, high)
    }
}

/// Where the box plot of `column` lands inside `graphs_dir`.
pub fn boxplot_path(graphs_dir: impl AsRef<Path>, column: &str) -> PathBuf {
    graphs_dir.as_ref().join(format!("{}_boxplot.png", column))
}

/// Render the distribution of `column` as a box plot and write it to
/// `<graphs_dir>/<column>_boxplot.png`. Nulls are left out.
///
/// # Errors
///
/// `ColumnNotFound` / `NotNumeric` for a bad column, `PlotFailed` when the
/// column has no values or the PNG cannot be encoded.
pub fn draw_boxplot(df: &DataFrame, column: &str, graphs_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let series = numeric_series(df, column)?;
    let values: Vec<f64> = series.f64()?.into_iter().flatten().collect();

    let summary = BoxSummary::from_values(&values).ok_or_else(|| {
        PipelineError::PlotFailed(format!("Column '{}' has no values to plot", column))
    })?;
    debug!("Box plot of '{}': {:?}", column, summary);

    let graphs_dir = graphs_dir.as_ref();
    fs::create_dir_all(graphs_dir).context(format!("Creating {}", graphs_dir.display()))?;
    let path = boxplot_path(graphs_dir, column);

    render(&summary)
        .save_with_format(&path, ImageFormat::Png)
        .map_err(|e| PipelineError::PlotFailed(format!("{}: {}", path.display(), e)))?;

    info!("Box plot written: {}", path.display());
    Ok(path)
}

fn render(summary: &BoxSummary) -> RgbImage {
    let mut canvas = Canvas::new(summary);
    let baseline = PLOT_HEIGHT - MARGIN;

    let step = nice_step(canvas.high - canvas.low);
    let mut tick = (canvas.low / step).ceil() * step;
    while tick <= canvas.high {
        let x = canvas.x(tick);
        canvas.fill_rect(x, x, MARGIN, baseline, GRID);
        canvas.fill_rect(x, x, baseline, baseline + TICK_LENGTH, INK);
        tick += step;
    }
    canvas.fill_rect(MARGIN, PLOT_WIDTH - MARGIN, baseline, baseline + 1, INK);

    let q1 = canvas.x(summary.q1);
    let q3 = canvas.x(summary.q3);
    let low = canvas.x(summary.lower_whisker);
    let high = canvas.x(summary.upper_whisker);
    let top = BOX_CENTER - BOX_HALF_HEIGHT;
    let bottom = BOX_CENTER + BOX_HALF_HEIGHT;

    // Whiskers with caps
    canvas.fill_rect(low, q1, BOX_CENTER, BOX_CENTER + 1, INK);
    canvas.fill_rect(q3, high, BOX_CENTER, BOX_CENTER + 1, INK);
    for cap in [low, high] {
        canvas.fill_rect(
            cap,
            cap + 1,
            BOX_CENTER - CAP_HALF_HEIGHT,
            BOX_CENTER + CAP_HALF_HEIGHT,
            INK,
        );
    }

    // Box, outline, median
    canvas.fill_rect(q1, q3, top, bottom, BOX_FILL);
    canvas.fill_rect(q1, q3, top, top + 1, INK);
    canvas.fill_rect(q1, q3, bottom - 1, bottom, INK);
    canvas.fill_rect(q1, q1 + 1, top, bottom, INK);
    canvas.fill_rect(q3.saturating_sub(1), q3, top, bottom, INK);
    let median = canvas.x(summary.median);
    canvas.fill_rect(median.saturating_sub(1), median + 1, top, bottom, INK);

    for value in &summary.outliers {
        let x = canvas.x(*value);
        canvas.dot(x, BOX_CENTER, OUTLIER_RADIUS, INK);
    }

    canvas.image
}

/// Tick spacing of 1, 2 or 5 times a power of ten, about eight per span.
fn nice_step(span: f64) -> f64 {
    let raw = span / 8.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;

    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Image plus the value range mapped onto its plot area.
struct Canvas {
    image: RgbImage,
    low: f64,
    high: f64,
}

impl Canvas {
    fn new(summary: &BoxSummary) -> Self {
        let (min, max) = summary.extent();
        let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
        Self {
            image: RgbImage::from_pixel(PLOT_WIDTH, PLOT_HEIGHT, BACKGROUND),
            low: min - pad,
            high: max + pad,
        }
    }

    /// Horizontal pixel of `value`, clamped to the plot area.
    fn x(&self, value: f64) -> u32 {
        let t = ((value - self.low) / (self.high - self.low)).clamp(0.0, 1.0);
        MARGIN + (t * f64::from(PLOT_WIDTH - 2 * MARGIN)).round() as u32
    }

    /// Fill the inclusive rectangle, clipped to the image.
    fn fill_rect(&mut self, x0: u32, x1: u32, y0: u32, y1: u32, color: Rgb<u8>) {
        for x in x0.min(x1)..=x0.max(x1).min(PLOT_WIDTH - 1) {
            for y in y0.min(y1)..=y0.max(y1).min(PLOT_HEIGHT - 1) {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    fn dot(&mut self, cx: u32, cy: u32, radius: u32, color: Rgb<u8>) {
        for x in cx.saturating_sub(radius)..=(cx + radius).min(PLOT_WIDTH - 1) {
            for y in cy.saturating_sub(radius)..=(cy + radius).min(PLOT_HEIGHT - 1) {
                if x.abs_diff(cx).pow(2) + y.abs_diff(cy).pow(2) <= radius * radius {
                    self.image.put_pixel(x, y, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxplot_path() {
        assert_eq!(
            boxplot_path("data/graphs", "MaxTemp"),
            PathBuf::from("data/graphs/MaxTemp_boxplot.png")
        );
    }

    #[test]
    fn test_box_summary_whiskers_and_outliers() {
        let values = [9.0, 1.0, 2.0, 3.0, 100.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let summary = BoxSummary::from_values(&values).unwrap();

        assert_eq!(summary.q1, 3.25);
        assert_eq!(summary.median, 5.5);
        assert_eq!(summary.q3, 7.75);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 9.0);
        assert_eq!(summary.outliers, vec![100.0]);
    }

    #[test]
    fn test_box_summary_single_value() {
        let summary = BoxSummary::from_values(&[36.0]).unwrap();
        assert_eq!(summary.q1, 36.0);
        assert_eq!(summary.q3, 36.0);
        assert_eq!(summary.lower_whisker, 36.0);
        assert_eq!(summary.upper_whisker, 36.0);
        assert!(summary.outliers.is_empty());
    }

    #[test]
    fn test_box_summary_needs_finite_values() {
        assert!(BoxSummary::from_values(&[]).is_none());
        assert!(BoxSummary::from_values(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(8.0), 1.0);
        assert_eq!(nice_step(47.0), 10.0);
        assert_eq!(nice_step(30.0), 5.0);
    }

    #[test]
    fn test_render_draws_box_and_median() {
        let values: Vec<f64> = (0..=10).map(|i| f64::from(i) * 10.0).collect();
        let summary = BoxSummary::from_values(&values).unwrap();
        let image = render(&summary);
        let canvas = Canvas::new(&summary);

        assert_eq!(image.dimensions(), (PLOT_WIDTH, PLOT_HEIGHT));
        assert_eq!(*image.get_pixel(0, 0), BACKGROUND);

        let inside_box = (canvas.x(summary.q1) + canvas.x(summary.median)) / 2;
        assert_eq!(*image.get_pixel(inside_box, BOX_CENTER), BOX_FILL);
        assert_eq!(*image.get_pixel(canvas.x(summary.median), BOX_CENTER), INK);
    }

    #[test]
    fn test_draw_boxplot_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let graphs = dir.path().join("graphs");
        let df = df!["MaxTemp" => [Some(35.0), Some(36.0), None, Some(80.0), Some(33.0)]].unwrap();

        let path = draw_boxplot(&df, "MaxTemp", &graphs).unwrap();

        assert_eq!(path, graphs.join("MaxTemp_boxplot.png"));
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
        assert_eq!(
            image::image_dimensions(&path).unwrap(),
            (PLOT_WIDTH, PLOT_HEIGHT)
        );
    }

    #[test]
    fn test_draw_boxplot_errors() {
        let dir = tempfile::tempdir().unwrap();
        let df = df![
            "MaxTemp" => [None::<f64>, None],
            "Events" => ["Rain", "Fog"],
        ]
        .unwrap();

        let err = draw_boxplot(&df, "MinTemp", dir.path()).unwrap_err();
        assert!(err.is_column_not_found());

        let err = draw_boxplot(&df, "Events", dir.path()).unwrap_err();
        assert_eq!(err.error_code(), "NOT_NUMERIC");

        let err = draw_boxplot(&df, "MaxTemp", dir.path()).unwrap_err();
        assert_eq!(err.error_code(), "PLOT_FAILED");
        assert!(!boxplot_path(dir.path(), "MaxTemp").exists());
    }
}
