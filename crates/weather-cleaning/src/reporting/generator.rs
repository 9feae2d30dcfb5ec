//! JSON run report.

use crate::error::{Result, ResultExt};
use crate::types::PipelineResult;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// A [`PipelineResult`] stamped with the time the report was generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: String,
    #[serde(flatten)]
    pub result: PipelineResult,
}

impl RunReport {
    pub fn new(result: PipelineResult) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            result,
        }
    }
}

/// Writes run reports to disk.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Build the report for `result`.
    pub fn build_report(result: &PipelineResult) -> RunReport {
        RunReport::new(result.clone())
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(report: &RunReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// Write the report for `result` to `path` as pretty JSON.
    pub fn write_report(result: &PipelineResult, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
        }

        let report = Self::build_report(result);
        let mut file = File::create(path).context(format!("Creating {}", path.display()))?;
        file.write_all(Self::to_json(&report)?.as_bytes())
            .context(format!("Writing {}", path.display()))?;

        info!("Report saved: {}", path.display());
        Ok(path.to_path_buf())
    }
}
