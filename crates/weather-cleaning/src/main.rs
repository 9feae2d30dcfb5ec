//! CLI entry point for the weather cleaning pipeline.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use weather_cleaning::{
    Analyzer, Pipeline, PipelineConfig, PipelineResult, ReportGenerator, ThresholdRule,
};

/// Number of date values shown by `--explore`.
const EXPLORE_DATE_SAMPLE: usize = 5;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean the Madrid daily weather CSV",
    long_about = "Selects and renames the weather columns, flushes physically impossible \
                  temperatures, fills missing values, splits the date into Year and Month \
                  and writes the cleaned CSV.\n\n\
                  EXAMPLES:\n  \
                  # Default paths\n  \
                  weather-cleaning\n\n  \
                  # Custom input and output, no box plot\n  \
                  weather-cleaning -i weather.csv -o clean.csv --no-plot\n\n  \
                  # Only look at the data\n  \
                  weather-cleaning --explore"
)]
struct Args {
    /// Weather CSV to clean [default: data/weather_madrid.csv]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Destination of the cleaned CSV [default: data/weather_madrid_clean.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON pipeline configuration; explicit flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write an HTML table of the first rows of the raw data
    #[arg(long)]
    html_preview: Option<PathBuf>,

    /// Directory for box plots [default: data/graphs]
    #[arg(long)]
    graphs_dir: Option<PathBuf>,

    /// Skip the box plot of the threshold column
    #[arg(long)]
    no_plot: bool,

    /// Column checked against the physical limit [default: MaxTemp]
    #[arg(long)]
    threshold_column: Option<String>,

    /// Values strictly above this are set to missing [default: 42.2]
    #[arg(long)]
    threshold: Option<f64>,

    /// chrono format of the date column [default: %Y/%m/%d]
    #[arg(long)]
    date_format: Option<String>,

    /// Print an overview of the columns and exit without writing
    #[arg(long)]
    explore: bool,

    /// Write the run summary as JSON to this path
    #[arg(long)]
    emit_report: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings, errors and the final summary
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    let config = build_config(&args)?;

    if !config.input_path.exists() {
        return Err(anyhow!("Input file not found: {}", config.input_path.display()));
    }

    if args.explore {
        return run_explore(&config);
    }

    let pipeline = Pipeline::builder().config(config).build()?;
    let result = pipeline.run().context("Cleaning pipeline failed")?;

    if let Some(path) = &args.emit_report {
        let report_path = ReportGenerator::write_report(&result, path)?;
        info!("Report written to: {}", report_path.display());
    }

    print_summary(&result);
    Ok(())
}

/// Layer explicit CLI flags over the JSON config (or the defaults).
fn build_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            PipelineConfig::from_json_file(path)?
        }
        None => PipelineConfig::default(),
    };

    if let Some(input) = &args.input {
        config.input_path = input.clone();
    }
    if let Some(output) = &args.output {
        config.output_path = output.clone();
    }
    if let Some(path) = &args.html_preview {
        config.html_preview_path = Some(path.clone());
    }
    if let Some(dir) = &args.graphs_dir {
        config.graphs_dir = dir.clone();
    }
    if args.no_plot {
        config.draw_plots = false;
    }
    if args.threshold_column.is_some() || args.threshold.is_some() {
        config.threshold = ThresholdRule::new(
            args.threshold_column
                .clone()
                .unwrap_or_else(|| config.threshold.column.clone()),
            args.threshold.unwrap_or(config.threshold.limit),
        );
    }
    if let Some(format) = &args.date_format {
        config.date_format = format.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Print the exploration overview of the renamed table.
///
/// Uses `println!` on purpose: this output is the point of `--explore`
/// and must show regardless of the log level.
fn run_explore(config: &PipelineConfig) -> Result<()> {
    let mut analyzer = Analyzer::from_csv(&config.input_path)?;
    analyzer.select_columns(&config.selected_columns)?;
    analyzer.rename_columns(&config.column_names)?;

    let report = analyzer.explore();
    let (rows, cols) = report.shape;

    println!("\n{}", "=".repeat(80));
    println!("EXPLORATION - {}", config.input_path.display());
    println!("{}\n", "=".repeat(80));

    println!("Shape: {} rows x {} columns", rows, cols);
    println!();

    println!("NUMERIC COLUMNS");
    println!("{}", "-".repeat(40));
    for name in &report.numeric_columns {
        println!("  {}", name);
    }
    println!();

    println!("CATEGORICAL COLUMNS");
    println!("{}", "-".repeat(40));
    for name in &report.categorical_columns {
        println!("  {}", name);
    }
    println!();

    println!("DATES ({})", config.date_column);
    println!("{}", "-".repeat(40));
    let dates = analyzer.date_values(&config.date_column)?;
    for value in dates.iter().take(EXPLORE_DATE_SAMPLE) {
        println!("  {}", value.as_deref().unwrap_or("<missing>"));
    }
    if dates.len() > EXPLORE_DATE_SAMPLE {
        println!("  ... and {} more", dates.len() - EXPLORE_DATE_SAMPLE);
    }
    println!();

    println!("MISSING VALUES");
    println!("{}", "-".repeat(40));
    if report.has_missing {
        println!("  {} missing cells", analyzer.count_missing());
        for name in analyzer.df().get_column_names() {
            let count = analyzer.count_missing_in_column(name.as_str())?;
            if count > 0 {
                println!("  {:<15} {}", name.as_str(), count);
            }
        }
    } else {
        println!("  None");
    }
    println!();

    println!("{}", analyzer.describe()?);
    println!("{}", "=".repeat(80));
    Ok(())
}

/// Print a human-readable summary of the run.
fn print_summary(result: &PipelineResult) {
    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        result.input_path, result.rows_before, result.columns_before
    );
    println!(
        "Output: {} ({} rows x {} columns)",
        result.output_path, result.rows_after, result.columns_after
    );
    println!();

    println!("Processing Summary:");
    println!("  Duration: {}ms", result.duration_ms);
    println!(
        "  Threshold: {} rows above the limit, {} values flushed",
        result.outlier_rows, result.flushed_cells
    );
    println!(
        "  Missing: {} -> {} cells",
        result.missing_before_fill, result.missing_after_fill
    );
    println!(
        "  Dropping incomplete rows would have kept {} of {} rows",
        result.drop_preview.rows_after, result.drop_preview.rows_before
    );
    for fill in &result.fills {
        println!(
            "  Filled {} of {} missing in {} with '{}'",
            fill.filled, fill.missing_before, fill.column, fill.value
        );
    }
    if result.unparsed_dates > 0 {
        println!("  Unparsed dates: {}", result.unparsed_dates);
    }
    for plot in &result.plots {
        println!("  Box plot: {}", plot);
    }
    if let Some(preview) = &result.html_preview {
        println!("  HTML preview: {}", preview);
    }
    println!();

    if !result.warnings.is_empty() {
        println!("Warnings:");
        for warning in &result.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    println!("Use --emit-report to save the JSON run summary");
    println!("{}", "=".repeat(80));
}
