//! HTML table preview of a DataFrame.

use crate::error::{Result, ResultExt};
use polars::prelude::*;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        other => match other.get_str() {
            Some(s) => s.to_string(),
            None => other.to_string(),
        },
    }
}

/// Render the first `rows` rows of `df` as an HTML `<table>`.
///
/// The first column of each body row is the zero-based row index; null
/// cells are left empty.
pub fn render_html_table(df: &DataFrame, rows: usize) -> Result<String> {
    let head = df.head(Some(rows));
    let mut html = String::from("<table border=\"1\" class=\"dataframe\">\n  <thead>\n    <tr>\n      <th></th>\n");

    for name in head.get_column_names() {
        let _ = writeln!(html, "      <th>{}</th>", escape_html(name.as_str()));
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");

    for row in 0..head.height() {
        let _ = writeln!(html, "    <tr>\n      <th>{}</th>", row);
        for col in head.get_columns() {
            let value = col.get(row)?;
            let _ = writeln!(html, "      <td>{}</td>", escape_html(&render_cell(&value)));
        }
        html.push_str("    </tr>\n");
    }

    html.push_str("  </tbody>\n</table>\n");
    Ok(html)
}

/// Write the first `rows` rows of `df` as HTML to `path`.
pub fn write_html_preview(df: &DataFrame, path: impl AsRef<Path>, rows: usize) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
    }

    let html = render_html_table(df, rows)?;
    fs::write(path, html).context(format!("Writing {}", path.display()))?;

    info!("HTML preview written: {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Fog<Rain & \"Snow\">"), "Fog&lt;Rain &amp; &quot;Snow&quot;&gt;");
    }

    #[test]
    fn test_render_limits_rows() {
        let df = df![
            "MaxTemp" => [1, 2, 3],
            "Events" => [Some("Rain"), None, Some("Fog")],
        ]
        .unwrap();

        let html = render_html_table(&df, 2).unwrap();
        assert!(html.contains("<th>MaxTemp</th>"));
        assert!(html.contains("<td>Rain</td>"));
        assert!(html.contains("<td></td>"));
        assert!(!html.contains("Fog"));
        assert_eq!(html.matches("<tr>").count(), 3);
    }

    #[test]
    fn test_write_html_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview/weather.html");
        let df = df!["CET" => ["1997/1/1"]].unwrap();

        let written = write_html_preview(&df, &path, 100).unwrap();
        let content = std::fs::read_to_string(written).unwrap();
        assert!(content.contains("<td>1997/1/1</td>"));
    }
}
