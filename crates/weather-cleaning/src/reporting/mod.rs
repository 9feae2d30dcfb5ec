//! Output artifacts besides the cleaned CSV.
//!
//! - [`write_html_preview`]: first rows of the table as an HTML page
//! - [`draw_boxplot`]: distribution of one column as a PNG box plot
//! - [`ReportGenerator`]: the run summary as pretty JSON

mod generator;
mod html;
mod plot;

pub use generator::{ReportGenerator, RunReport};
pub use html::{render_html_table, write_html_preview};
pub use plot::{BoxSummary, PLOT_HEIGHT, PLOT_WIDTH, boxplot_path, draw_boxplot};
