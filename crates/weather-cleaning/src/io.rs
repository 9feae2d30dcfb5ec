//! CSV input and output.

use crate::error::{PipelineError, Result, ResultExt};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load a CSV file with a header row.
///
/// Column types are inferred from every row, so a text marker far down an
/// otherwise numeric column still loads. Empty fields become nulls. A missing file is reported as an IO error before
/// polars gets involved.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PipelineError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    info!("Loading dataset from: {}", path.display());

    let quoted = CsvReadOptions::default()
        .with_infer_schema_length(None)
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish();

    let df = match quoted {
        Ok(df) => df,
        Err(e) => {
            debug!("Quoted CSV loading failed, retrying without quotes: {}", e);
            CsvReadOptions::default()
                .with_infer_schema_length(None)
                .with_has_header(true)
                .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
                .finish()
                .context(format!("Reading {}", path.display()))?
        }
    };

    info!("Dataset loaded successfully: {:?}", df.shape());
    Ok(df)
}

/// Write `df` as CSV with a header row, overwriting `path`.
///
/// Missing parent directories are created.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
    }

    let mut file = File::create(path).context(format!("Creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}
