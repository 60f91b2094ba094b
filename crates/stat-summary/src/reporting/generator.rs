use super::format::{format_cell, format_value};
use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::error::{Result, ResultExt};
use crate::stats::{
    AnovaResult, AnovaSelection, BoxplotGeometry, ColumnSummary, Histogram, NumericSeries,
    PlotDimensions, summarize_dataset,
};
use chrono::Local;
use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Summary Report Types
// ============================================================================

/// One formatted line of the descriptive summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub variable: String,
    pub mean: String,
    pub sd: String,
    pub median: String,
    pub minimum: String,
    pub maximum: String,
    pub cv: String,
    pub skewness: String,
    pub kurtosis: String,
    pub pct_na: String,
    /// Sparkline counts for the column's finite values.
    pub histogram: Histogram,
    /// Full-size histogram of the same values.
    pub distribution: Histogram,
}

/// Descriptive statistics for every column of a dataset.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    pub rows: usize,
    pub columns: usize,
    /// Rounding applied to `table`
    pub decimals: u32,
    /// Formatted rows, one per column
    pub table: Vec<SummaryRow>,
    /// Full-precision values behind `table`
    pub summaries: Vec<ColumnSummary>,
}

// ============================================================================
// ANOVA Report Types
// ============================================================================

/// One formatted line of the ANOVA table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaTableLine {
    pub source: String,
    pub ss: String,
    pub df: String,
    pub ms: String,
    pub f: String,
    pub p_value: String,
}

/// One formatted line of the group means table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMeanLine {
    pub group: String,
    pub n: usize,
    pub mean: String,
}

/// One-way ANOVA of a response column over a grouping column.
#[derive(Debug, Clone, Serialize)]
pub struct AnovaReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    pub response: String,
    pub group: String,
    /// Between / Within / Total, formatted
    pub table: Vec<AnovaTableLine>,
    pub group_means: Vec<GroupMeanLine>,
    /// Full-precision decomposition
    pub result: AnovaResult,
    /// Declarative drawing of the boxplot
    pub boxplot: BoxplotGeometry,
}

impl AnovaReport {
    /// Whether F and p could be computed.
    pub fn is_conclusive(&self) -> bool {
        self.result.p_value.is_finite()
    }
}

// ============================================================================
// Report Generator
// ============================================================================

pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    /// Create a new ReportGenerator writing into `output_dir`.
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Create a generator for the configured output directory.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.output_dir.clone())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Summarize every column of `dataset`.
    pub fn build_summary_report(
        input_file: &str,
        dataset: &Dataset,
        config: &AnalysisConfig,
    ) -> SummaryReport {
        let summaries = summarize_dataset(dataset);
        let decimals = config.summary_decimals;
        let blank = config.placeholder.as_str();

        let table = summaries
            .iter()
            .enumerate()
            .map(|(index, s)| {
                let series =
                    NumericSeries::from_cells(dataset.rows().iter().map(|row| row.get(index)));
                let finite = series.finite();
                SummaryRow {
                    variable: s.variable.clone(),
                    mean: format_value(s.mean, decimals, blank),
                    sd: format_value(s.sd, decimals, blank),
                    median: format_value(s.median, decimals, blank),
                    minimum: format_value(s.minimum, decimals, blank),
                    maximum: format_value(s.maximum, decimals, blank),
                    cv: format_value(s.cv, decimals, blank),
                    skewness: format_value(s.skewness, decimals, blank),
                    kurtosis: format_value(s.kurtosis, decimals, blank),
                    pct_na: format_value(s.pct_na, decimals, blank),
                    histogram: Histogram::new(&finite, config.histogram_bins),
                    distribution: Histogram::full(&finite),
                }
            })
            .collect();

        SummaryReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            rows: dataset.height(),
            columns: dataset.width(),
            decimals,
            table,
            summaries,
        }
    }

    /// Validate `selection`, run the ANOVA and lay out the boxplot.
    pub fn build_anova_report(
        input_file: &str,
        dataset: &Dataset,
        selection: &AnovaSelection,
        config: &AnalysisConfig,
    ) -> Result<AnovaReport> {
        let partition = selection.partition(dataset).context(format!(
            "Selecting response '{}' by group '{}'",
            selection.response, selection.group
        ))?;
        let result = AnovaResult::compute(&partition);
        let boxplot = BoxplotGeometry::build(&partition, PlotDimensions::from(config));

        let decimals = config.anova_decimals;
        let blank = config.placeholder.as_str();

        let table = result
            .table()
            .iter()
            .map(|row| AnovaTableLine {
                source: row.source.display_name().to_string(),
                ss: format_value(row.sum_of_squares, decimals, blank),
                df: row.df.to_string(),
                ms: format_cell(row.mean_square, decimals, blank),
                f: format_cell(row.f_statistic, decimals, blank),
                p_value: format_cell(row.p_value, config.p_value_decimals, blank),
            })
            .collect();

        let group_means = result
            .group_means()
            .into_iter()
            .map(|g| GroupMeanLine {
                mean: format_value(g.mean, decimals, blank),
                group: g.group,
                n: g.n,
            })
            .collect();

        Ok(AnovaReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            response: selection.response.clone(),
            group: selection.group.clone(),
            table,
            group_means,
            result,
            boxplot,
        })
    }

    /// Write the formatted summary table as `{base}_summary.csv`.
    pub fn write_summary_csv(&self, report: &SummaryReport, base_name: &str) -> Result<PathBuf> {
        let rows = report.table.as_slice();
        let mut df = DataFrame::new(vec![
            text_column("variable", rows, |r| r.variable.as_str()),
            text_column("mean", rows, |r| r.mean.as_str()),
            text_column("sd", rows, |r| r.sd.as_str()),
            text_column("median", rows, |r| r.median.as_str()),
            text_column("minimum", rows, |r| r.minimum.as_str()),
            text_column("maximum", rows, |r| r.maximum.as_str()),
            text_column("cv", rows, |r| r.cv.as_str()),
            text_column("skewness", rows, |r| r.skewness.as_str()),
            text_column("kurtosis", rows, |r| r.kurtosis.as_str()),
            text_column("pct_na", rows, |r| r.pct_na.as_str()),
        ])
        .context("Building summary table")?;

        self.write_csv(&mut df, &format!("{}_summary.csv", base_name))
    }

    /// Write the formatted ANOVA and group means tables as
    /// `{base}_anova.csv` and `{base}_group_means.csv`.
    pub fn write_anova_csv(&self, report: &AnovaReport, base_name: &str) -> Result<Vec<PathBuf>> {
        let table = report.table.as_slice();
        let mut anova_df = DataFrame::new(vec![
            text_column("source", table, |r| r.source.as_str()),
            text_column("ss", table, |r| r.ss.as_str()),
            text_column("df", table, |r| r.df.as_str()),
            text_column("ms", table, |r| r.ms.as_str()),
            text_column("f", table, |r| r.f.as_str()),
            text_column("p_value", table, |r| r.p_value.as_str()),
        ])
        .context("Building ANOVA table")?;

        let means = report.group_means.as_slice();
        let counts: Vec<u64> = means.iter().map(|g| g.n as u64).collect();
        let mut means_df = DataFrame::new(vec![
            text_column("group", means, |g| g.group.as_str()),
            Column::new("n".into(), counts),
            text_column("mean", means, |g| g.mean.as_str()),
        ])
        .context("Building group means table")?;

        Ok(vec![
            self.write_csv(&mut anova_df, &format!("{}_anova.csv", base_name))?,
            self.write_csv(&mut means_df, &format!("{}_group_means.csv", base_name))?,
        ])
    }

    fn write_csv(&self, df: &mut DataFrame, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let output_path = self.output_dir.join(file_name);
        let mut file = File::create(&output_path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(df)
            .context(format!("Writing {}", output_path.display()))?;

        info!("Table saved: {}", output_path.display());
        Ok(output_path)
    }

    /// Write a report to a JSON file.
    ///
    /// The report is written to the output directory with the specified base name.
    /// For example, if `report_base_name` is "train", the file will be "train_report.json".
    pub fn write_report_to_file<T: Serialize>(
        &self,
        report: &T,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

impl From<&AnalysisConfig> for PlotDimensions {
    fn from(config: &AnalysisConfig) -> Self {
        Self::new(config.plot_width, config.plot_height, config.plot_padding)
    }
}

fn text_column<T>(name: &str, rows: &[T], field: impl Fn(&T) -> &str) -> Column {
    let values: Vec<&str> = rows.iter().map(field).collect();
    Column::new(name.into(), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scenario_a() -> Dataset {
        Dataset::from_records(vec![
            vec![("y", Some("1")), ("g", Some("A"))],
            vec![("y", Some("2")), ("g", Some("A"))],
            vec![("y", Some("3")), ("g", Some("B"))],
            vec![("y", Some("4")), ("g", Some("B"))],
        ])
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "stat_summary_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    // ==================== summary report tests ====================

    #[test]
    fn test_summary_report_rows() {
        let mut dataset = Dataset::new(["x"]);
        for cell in [Some("1"), Some("2"), Some(""), Some("x"), None] {
            dataset.push_row([cell]);
        }
        let report =
            ReportGenerator::build_summary_report("in.csv", &dataset, &AnalysisConfig::default());

        assert_eq!(report.rows, 5);
        assert_eq!(report.columns, 1);
        let row = &report.table[0];
        assert_eq!(row.mean, "1.5");
        assert_eq!(row.pct_na, "60");
        assert_eq!(row.skewness, "0");
        assert_eq!(row.histogram.total(), 2);
        assert_eq!(row.histogram.counts.len(), 8);
        assert_eq!(row.distribution.counts.len(), 4);
        assert_eq!(row.distribution.total(), 2);
    }

    #[test]
    fn test_summary_report_placeholder_for_text_column() {
        let dataset = Dataset::from_records(vec![
            vec![("name", Some("alpha"))],
            vec![("name", Some("beta"))],
        ]);
        let config = AnalysisConfig::builder().placeholder("n/a").build().unwrap();
        let report = ReportGenerator::build_summary_report("in.csv", &dataset, &config);

        let row = &report.table[0];
        assert_eq!(row.mean, "n/a");
        assert_eq!(row.cv, "n/a");
        assert_eq!(row.sd, "0");
        assert!(row.histogram.is_empty());
    }

    // ==================== ANOVA report tests ====================

    #[test]
    fn test_anova_report_scenario_a() {
        let report = ReportGenerator::build_anova_report(
            "in.csv",
            &scenario_a(),
            &AnovaSelection::new("y", "g"),
            &AnalysisConfig::default(),
        )
        .unwrap();

        let sources: Vec<&str> = report.table.iter().map(|l| l.source.as_str()).collect();
        assert_eq!(sources, vec!["Between", "Within", "Total"]);
        assert_eq!(
            report.table[0],
            AnovaTableLine {
                source: "Between".to_string(),
                ss: "4".to_string(),
                df: "1".to_string(),
                ms: "4".to_string(),
                f: "8".to_string(),
                p_value: "0.105573".to_string(),
            }
        );
        assert_eq!(report.table[1].f, "-");
        assert_eq!(report.table[2].df, "3");
        assert_eq!(report.table[2].ms, "-");
        assert_eq!(report.group_means[1].mean, "3.5");
        assert_eq!(report.boxplot.groups.len(), 2);
        assert!(report.is_conclusive());
    }

    #[test]
    fn test_anova_report_rejects_bad_selection() {
        let err = ReportGenerator::build_anova_report(
            "in.csv",
            &scenario_a(),
            &AnovaSelection::new("y", "y"),
            &AnalysisConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SELECTION");
    }

    #[test]
    fn test_anova_report_single_group_is_inconclusive() {
        let dataset = Dataset::from_records(vec![
            vec![("y", Some("1")), ("g", Some("A"))],
            vec![("y", Some("2")), ("g", Some("A"))],
        ]);
        let report = ReportGenerator::build_anova_report(
            "in.csv",
            &dataset,
            &AnovaSelection::new("y", "g"),
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert!(!report.is_conclusive());
        assert_eq!(report.table[0].ms, "-");
        assert_eq!(report.table[0].p_value, "-");
    }

    #[test]
    fn test_anova_report_uses_configured_canvas() {
        let config = AnalysisConfig::builder()
            .plot_size(600.0, 300.0)
            .plot_padding(30.0)
            .build()
            .unwrap();
        assert_eq!(
            PlotDimensions::from(&config),
            PlotDimensions::new(600.0, 300.0, 30.0)
        );

        let report = ReportGenerator::build_anova_report(
            "in.csv",
            &scenario_a(),
            &AnovaSelection::new("y", "g"),
            &config,
        )
        .unwrap();
        assert_eq!(report.boxplot.dimensions.width, 600.0);
        assert_eq!(report.boxplot.dimensions.padding, 30.0);
    }

    // ==================== file output tests ====================

    #[test]
    fn test_write_summary_csv() {
        let dir = temp_dir("summary_csv");
        let report = ReportGenerator::build_summary_report(
            "in.csv",
            &scenario_a(),
            &AnalysisConfig::default(),
        );
        let path = ReportGenerator::new(dir.clone())
            .write_summary_csv(&report, "scenario")
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("variable,mean,sd,median,minimum,maximum,cv,skewness,kurtosis,pct_na")
        );
        assert!(lines.next().unwrap().starts_with("y,2.5,"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = temp_dir("report_json");
        let report = ReportGenerator::build_anova_report(
            "in.csv",
            &scenario_a(),
            &AnovaSelection::new("y", "g"),
            &AnalysisConfig::default(),
        )
        .unwrap();
        let path = ReportGenerator::new(dir.clone())
            .write_report_to_file(&report, "scenario")
            .unwrap();

        assert!(path.ends_with("scenario_report.json"));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["response"], "y");
        assert_eq!(json["result"]["df_within"], 2);
        assert!(json["boxplot"]["shapes"].is_array());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_anova_csv() {
        let dir = temp_dir("anova_csv");
        let report = ReportGenerator::build_anova_report(
            "in.csv",
            &scenario_a(),
            &AnovaSelection::new("y", "g"),
            &AnalysisConfig::default(),
        )
        .unwrap();
        let paths = ReportGenerator::new(dir.clone())
            .write_anova_csv(&report, "scenario")
            .unwrap();

        assert_eq!(paths.len(), 2);
        let anova = fs::read_to_string(&paths[0]).unwrap();
        assert!(anova.contains("Between,4,1,4,8,0.105573"));
        let means = fs::read_to_string(&paths[1]).unwrap();
        assert!(means.contains("A,2,1.5"));
        let _ = fs::remove_dir_all(&dir);
    }
}
