//! CLI entry point for descriptive statistics and one-way ANOVA.

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use stat_summary::{
    AnalysisConfig, AnovaReport, AnovaSelection, Dataset, ReportGenerator, SummaryReport,
    load_csv,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Descriptive statistics and one-way ANOVA for CSV files",
    long_about = "Summarize every column of a CSV file, or run a one-way ANOVA of a \
                  numeric response over a grouping column.\n\n\
                  EXAMPLES:\n  \
                  # Summary table for every column\n  \
                  stat-summary summary -i data.csv\n\n  \
                  # ANOVA of yield by fertilizer, with a JSON report\n  \
                  stat-summary anova -i data.csv --response yield --group fertilizer -r\n\n  \
                  # Machine-readable output\n  \
                  stat-summary --json summary -i data.csv | jq '.table[0]'"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Only show warnings and errors in the log
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable tables
    ///
    /// Disables all logs; only outputs the report JSON. Files requested with
    /// --csv or --emit-report are still written.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Descriptive statistics for every column
    Summary(SummaryArgs),
    /// One-way ANOVA of a response column over a grouping column
    Anova(AnovaArgs),
}

/// Options shared by both subcommands.
#[derive(Args, Debug)]
struct CommonArgs {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: String,

    /// Output directory for reports and tables
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Write the formatted tables as CSV to the output directory
    #[arg(long)]
    csv: bool,

    /// Text shown for statistics that cannot be computed
    #[arg(long, default_value = "-")]
    placeholder: String,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Decimal places in the summary table
    #[arg(long, default_value = "2")]
    decimals: u32,

    /// Bins in the per-column sparkline
    #[arg(long, default_value = "8")]
    bins: usize,
}

#[derive(Args, Debug)]
struct AnovaArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Numeric response column
    #[arg(long)]
    response: String,

    /// Grouping column
    #[arg(long)]
    group: String,

    /// Boxplot canvas width
    #[arg(long, default_value = "800")]
    width: f64,

    /// Boxplot canvas height
    #[arg(long, default_value = "350")]
    height: f64,

    /// Decimal places for sums of squares, mean squares, F and means
    #[arg(long, default_value = "4")]
    decimals: u32,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.quiet, cli.json);

    match &cli.command {
        Command::Summary(args) => run_summary(args, cli.json),
        Command::Anova(args) => run_anova(args, cli.json),
    }
}

fn run_summary(args: &SummaryArgs, json: bool) -> Result<()> {
    let config = AnalysisConfig::builder()
        .summary_decimals(args.decimals)
        .histogram_bins(args.bins)
        .placeholder(&args.common.placeholder)
        .output_dir(&args.common.output)
        .build()?;

    let dataset = load_input(&args.common.input)?;
    let report = ReportGenerator::build_summary_report(&args.common.input, &dataset, &config);

    let generator = ReportGenerator::from_config(&config);
    let stem = extract_file_stem(&args.common.input);
    if args.common.csv {
        let path = generator.write_summary_csv(&report, &stem)?;
        info!("Summary table written to: {}", path.display());
    }
    if args.common.emit_report {
        let path = generator.write_report_to_file(&report, &stem)?;
        info!("Report written to: {}", path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary_table(&report);
    }
    Ok(())
}

fn run_anova(args: &AnovaArgs, json: bool) -> Result<()> {
    let config = AnalysisConfig::builder()
        .anova_decimals(args.decimals)
        .plot_size(args.width, args.height)
        .placeholder(&args.common.placeholder)
        .output_dir(&args.common.output)
        .build()?;

    let dataset = load_input(&args.common.input)?;
    let selection = AnovaSelection::new(&args.response, &args.group);
    let report = match ReportGenerator::build_anova_report(
        &args.common.input,
        &dataset,
        &selection,
        &config,
    ) {
        Ok(report) => report,
        Err(e) if e.is_selection_error() => {
            return Err(anyhow!(
                "{}\nAvailable columns: {}",
                e,
                dataset.columns().join(", ")
            ));
        }
        Err(e) => return Err(e.into()),
    };

    if !report.is_conclusive() {
        warn!(
            "F statistic is undefined for this selection ({} groups, {} values)",
            report.result.group_count(),
            report.result.total_count
        );
    }

    let generator = ReportGenerator::from_config(&config);
    let stem = extract_file_stem(&args.common.input);
    if args.common.csv {
        for path in generator.write_anova_csv(&report, &stem)? {
            info!("ANOVA table written to: {}", path.display());
        }
    }
    if args.common.emit_report {
        let path = generator.write_report_to_file(&report, &stem)?;
        info!("Report written to: {}", path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_anova_tables(&report);
    }
    Ok(())
}

fn load_input(input: &str) -> Result<Dataset> {
    if !Path::new(input).exists() {
        return Err(anyhow!("Input file not found: {}", input));
    }
    Ok(load_csv(PathBuf::from(input))?)
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Render histogram counts as a row of block characters.
fn sparkline(heights: &[f64]) -> String {
    const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    heights
        .iter()
        .map(|&h| {
            if h <= 0.0 {
                ' '
            } else {
                BLOCKS[((h * 7.0).round() as usize).min(7)]
            }
        })
        .collect()
}

/// Print the summary table.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn print_summary_table(report: &SummaryReport) {
    println!();
    println!("{}", "=".repeat(110));
    println!("DESCRIPTIVE STATISTICS");
    println!("{}", "=".repeat(110));
    println!(
        "Input: {} ({} rows x {} columns)",
        report.input_file, report.rows, report.columns
    );
    println!();

    println!(
        "{:<18} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>8} {:>8} {:>7}  {}",
        "Variable", "Mean", "SD", "Median", "Min", "Max", "CV", "Skew", "Kurt", "%NA", "Hist"
    );
    println!("{}", "-".repeat(110));

    for row in &report.table {
        println!(
            "{:<18} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>8} {:>8} {:>7}  {}",
            truncate_str(&row.variable, 18),
            row.mean,
            row.sd,
            row.median,
            row.minimum,
            row.maximum,
            row.cv,
            row.skewness,
            row.kurtosis,
            row.pct_na,
            sparkline(&row.histogram.normalized())
        );
    }

    println!();
    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(110));
}

/// Print the ANOVA and group means tables.
fn print_anova_tables(report: &AnovaReport) {
    println!();
    println!("{}", "=".repeat(80));
    println!("ONE-WAY ANOVA: {} by {}", report.response, report.group);
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "{:<10} {:>14} {:>6} {:>14} {:>12} {:>12}",
        "Source", "SS", "df", "MS", "F", "p-value"
    );
    println!("{}", "-".repeat(72));
    for line in &report.table {
        println!(
            "{:<10} {:>14} {:>6} {:>14} {:>12} {:>12}",
            line.source, line.ss, line.df, line.ms, line.f, line.p_value
        );
    }
    println!();

    println!("{:<24} {:>8} {:>14}", "Group", "n", "Mean");
    println!("{}", "-".repeat(48));
    for group in &report.group_means {
        println!(
            "{:<24} {:>8} {:>14}",
            truncate_str(&group.group, 24),
            group.n,
            group.mean
        );
    }
    println!();

    let boxes = report
        .boxplot
        .groups
        .iter()
        .filter(|g| g.glyph.is_some())
        .count();
    println!(
        "Boxplot: {} boxes, {} shapes on a {}x{} canvas",
        boxes,
        report.boxplot.shapes.len(),
        report.boxplot.dimensions.width,
        report.boxplot.dimensions.height
    );
    println!("Use --emit-report to save the boxplot geometry as JSON");
    println!("{}", "=".repeat(80));
}
