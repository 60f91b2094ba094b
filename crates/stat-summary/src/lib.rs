//! Descriptive Statistics and One-Way ANOVA
//!
//! Summary statistics, one-way analysis of variance and boxplot geometry for
//! tabular data, built on Polars for CSV input and output.
//!
//! # Overview
//!
//! - **Coercion**: every raw cell becomes a finite number or `NaN`, never an error
//! - **Column Summaries**: mean, sd, median, min, max, cv, skewness, kurtosis and missing rate
//! - **Grouping**: split a response column by a grouping column in first-seen order
//! - **ANOVA**: between/within sums of squares, F statistic and p-value
//! - **Boxplots**: nearest-rank quartiles laid out as plain drawing shapes
//! - **Reporting**: rounded tables, CSV export and JSON reports
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use stat_summary::{load_csv, AnalysisConfig, AnovaSelection, ReportGenerator};
//!
//! let dataset = load_csv("data/crops.csv")?;
//! let config = AnalysisConfig::default();
//!
//! // Per-column summary
//! let summary = ReportGenerator::build_summary_report("data/crops.csv", &dataset, &config);
//! for row in &summary.table {
//!     println!("{}: mean {}, sd {}", row.variable, row.mean, row.sd);
//! }
//!
//! // One-way ANOVA
//! let selection = AnovaSelection::new("yield", "fertilizer");
//! let report = ReportGenerator::build_anova_report("data/crops.csv", &dataset, &selection, &config)?;
//! println!("F = {}, p = {}", report.table[0].f, report.table[0].p_value);
//! ```
//!
//! # Degenerate Data
//!
//! Numeric edge cases never raise. An empty column has a `NaN` mean, a
//! single value has `sd = 0`, a single group has `NaN` for F and p. Only
//! structural problems, like naming a column that does not exist, return a
//! [`StatsError`].

pub mod config;
pub mod dataset;
pub mod error;
pub mod reporting;
pub mod stats;

// Re-exports for convenient access
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use dataset::{Dataset, Record, load_csv, parse_csv};
pub use error::{Result as StatsResult, ResultExt, StatsError};
pub use reporting::{
    AnovaReport, AnovaTableLine, GroupMeanLine, ReportGenerator, SummaryReport, SummaryRow,
    format_value,
};
pub use stats::{
    AnovaResult, AnovaSelection, BoxplotGeometry, ColumnSummary, Histogram, Partition,
    PlotDimensions, Quartiles, Shape,
};
