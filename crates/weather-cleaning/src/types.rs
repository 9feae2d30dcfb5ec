use crate::config::FillValue;
use crate::pipeline::Phase;
use crate::profiler::{DescribeReport, DropPreview};
use serde::{Deserialize, Serialize};

/// What one fill rule did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillOutcome {
    pub column: String,
    pub value: FillValue,
    /// Nulls in the column right before the fill.
    pub missing_before: usize,
    /// Cells actually filled.
    pub filled: usize,
}

/// Summary of one pipeline run.
///
/// Serialized as-is into the JSON run report.
///
/// # Example
///
/// ```rust,ignore
/// let result = Pipeline::builder().build()?.run()?;
/// println!(
///     "{} values flushed, {} cells filled in {}ms",
///     result.flushed_cells,
///     result.total_filled(),
///     result.duration_ms
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub input_path: String,
    pub output_path: String,

    /// Shape of the raw table.
    pub rows_before: usize,
    pub columns_before: usize,
    /// Shape of the exported table.
    pub rows_after: usize,
    pub columns_after: usize,

    /// Statistics of the renamed table, before any cleaning.
    pub describe: DescribeReport,

    /// Rows above the threshold, found before flushing.
    pub outlier_rows: usize,
    /// Cells set to null by the threshold.
    pub flushed_cells: usize,

    /// Null cells across the table before and after filling.
    pub missing_before_fill: usize,
    pub missing_after_fill: usize,
    /// Hypothetical drop of incomplete rows; never applied.
    pub drop_preview: DropPreview,
    pub fills: Vec<FillOutcome>,

    /// Date values that did not match the configured format.
    pub unparsed_dates: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_preview: Option<String>,
    pub plots: Vec<String>,

    pub processing_steps: Vec<String>,
    pub warnings: Vec<String>,
    pub final_phase: Phase,
    pub duration_ms: u64,
}

impl PipelineResult {
    /// Cells filled across all fill rules.
    pub fn total_filled(&self) -> usize {
        self.fills.iter().map(|f| f.filled).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> PipelineResult {
        PipelineResult {
            input_path: "data/weather_madrid.csv".to_string(),
            output_path: "data/weather_madrid_clean.csv".to_string(),
            rows_before: 6812,
            columns_before: 23,
            rows_after: 6812,
            columns_after: 14,
            describe: DescribeReport::default(),
            outlier_rows: 1,
            flushed_cells: 1,
            missing_before_fill: 5000,
            missing_after_fill: 2500,
            drop_preview: DropPreview {
                rows_before: 6812,
                rows_after: 1200,
                column_counts: vec![("date".to_string(), 1200)],
            },
            fills: vec![
                FillOutcome {
                    column: "Events".to_string(),
                    value: FillValue::from("NoEvent"),
                    missing_before: 5000,
                    filled: 5000,
                },
                FillOutcome {
                    column: "MaxTemp".to_string(),
                    value: FillValue::from("NoValue"),
                    missing_before: 4,
                    filled: 4,
                },
            ],
            unparsed_dates: 0,
            html_preview: None,
            plots: Vec::new(),
            processing_steps: vec!["load".to_string()],
            warnings: Vec::new(),
            final_phase: Phase::Exported,
            duration_ms: 42,
        }
    }

    #[test]
    fn test_total_filled() {
        assert_eq!(result().total_filled(), 5004);
    }

    #[test]
    fn test_result_serialization() {
        let json = serde_json::to_value(result()).unwrap();
        assert_eq!(json["final_phase"], "exported");
        assert_eq!(json["fills"][0]["value"], "NoEvent");
        assert_eq!(json["drop_preview"]["rows_after"], 1200);
        assert!(json.get("html_preview").is_none());
    }
}
