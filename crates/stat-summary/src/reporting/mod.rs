//! Report generation module.
//!
//! Turns full-precision statistics into display tables and writes them out.
//!
//! # Reports
//!
//! [`SummaryReport`] and [`AnovaReport`] are used for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use stat_summary::reporting::ReportGenerator;
//! use stat_summary::stats::AnovaSelection;
//!
//! let selection = AnovaSelection::new("yield", "fertilizer");
//! let report = ReportGenerator::build_anova_report("data/crops.csv", &dataset, &selection, &config)?;
//!
//! // Print as JSON
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! // Or write to file
//! let generator = ReportGenerator::from_config(&config);
//! generator.write_report_to_file(&report, "crops")?;
//! ```

mod format;
mod generator;

pub use format::{format_cell, format_value, round_to};
pub use generator::{
    AnovaReport, AnovaTableLine, GroupMeanLine, ReportGenerator, SummaryReport, SummaryRow,
};
