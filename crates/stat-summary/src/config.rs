//! Configuration types for analysis output.
//!
//! The statistics themselves are always computed at full precision. This
//! configuration only controls how results are rounded for display, how the
//! boxplot canvas is sized, and where reports are written.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest number of decimals accepted for display rounding.
pub const MAX_DECIMALS: u32 = 12;

/// Configuration for summary and ANOVA reports.
///
/// Use [`AnalysisConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use stat_summary::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .summary_decimals(3)
///     .plot_size(600.0, 300.0)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Decimals used for the descriptive summary table.
    /// Default: 2
    pub summary_decimals: u32,

    /// Decimals used for sums of squares, mean squares, F and group means.
    /// Default: 4
    pub anova_decimals: u32,

    /// Decimals used for the p-value.
    /// Default: 6
    pub p_value_decimals: u32,

    /// Number of bins in the per-column sparkline histogram.
    /// Default: 8
    pub histogram_bins: usize,

    /// Boxplot canvas width in drawing units.
    /// Default: 800
    pub plot_width: f64,

    /// Boxplot canvas height in drawing units.
    /// Default: 350
    pub plot_height: f64,

    /// Blank margin around the plot area.
    /// Default: 40
    pub plot_padding: f64,

    /// Text shown in place of a degenerate (NaN) statistic.
    /// Default: "-"
    pub placeholder: String,

    /// Output directory for generated reports.
    /// Default: "./outputs"
    pub output_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            summary_decimals: 2,
            anova_decimals: 4,
            p_value_decimals: 6,
            histogram_bins: 8,
            plot_width: 800.0,
            plot_height: 350.0,
            plot_padding: 40.0,
            placeholder: "-".to_string(),
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("summary_decimals", self.summary_decimals),
            ("anova_decimals", self.anova_decimals),
            ("p_value_decimals", self.p_value_decimals),
        ] {
            if value > MAX_DECIMALS {
                return Err(ConfigValidationError::InvalidDecimals {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidHistogramBins(
                self.histogram_bins,
            ));
        }

        let inner_width = self.plot_width - 2.0 * self.plot_padding;
        let inner_height = self.plot_height - 2.0 * self.plot_padding;
        if !(inner_width > 0.0 && inner_height > 0.0) || self.plot_padding < 0.0 {
            return Err(ConfigValidationError::InvalidPlotSize {
                width: self.plot_width,
                height: self.plot_height,
                padding: self.plot_padding,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid decimals for '{field}': {value} (must be at most {MAX_DECIMALS})")]
    InvalidDecimals { field: String, value: u32 },

    #[error("Invalid histogram bins: {0} (must be at least 1)")]
    InvalidHistogramBins(usize),

    #[error(
        "Invalid plot size {width}x{height} with padding {padding} (plot area must be positive)"
    )]
    InvalidPlotSize { width: f64, height: f64, padding: f64 },
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    summary_decimals: Option<u32>,
    anova_decimals: Option<u32>,
    p_value_decimals: Option<u32>,
    histogram_bins: Option<usize>,
    plot_width: Option<f64>,
    plot_height: Option<f64>,
    plot_padding: Option<f64>,
    placeholder: Option<String>,
    output_dir: Option<PathBuf>,
}

impl AnalysisConfigBuilder {
    /// Set the rounding used by the summary table.
    pub fn summary_decimals(mut self, decimals: u32) -> Self {
        self.summary_decimals = Some(decimals);
        self
    }

    /// Set the rounding used by the ANOVA table and group means.
    pub fn anova_decimals(mut self, decimals: u32) -> Self {
        self.anova_decimals = Some(decimals);
        self
    }

    /// Set the rounding used for the p-value.
    pub fn p_value_decimals(mut self, decimals: u32) -> Self {
        self.p_value_decimals = Some(decimals);
        self
    }

    /// Set the number of sparkline histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the boxplot canvas size.
    pub fn plot_size(mut self, width: f64, height: f64) -> Self {
        self.plot_width = Some(width);
        self.plot_height = Some(height);
        self
    }

    /// Set the blank margin around the plot area.
    pub fn plot_padding(mut self, padding: f64) -> Self {
        self.plot_padding = Some(padding);
        self
    }

    /// Set the text shown for degenerate statistics.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the output directory for reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            summary_decimals: self.summary_decimals.unwrap_or(defaults.summary_decimals),
            anova_decimals: self.anova_decimals.unwrap_or(defaults.anova_decimals),
            p_value_decimals: self.p_value_decimals.unwrap_or(defaults.p_value_decimals),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            plot_width: self.plot_width.unwrap_or(defaults.plot_width),
            plot_height: self.plot_height.unwrap_or(defaults.plot_height),
            plot_padding: self.plot_padding.unwrap_or(defaults.plot_padding),
            placeholder: self.placeholder.unwrap_or(defaults.placeholder),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.summary_decimals, 2);
        assert_eq!(config.anova_decimals, 4);
        assert_eq!(config.p_value_decimals, 6);
        assert_eq!(config.histogram_bins, 8);
        assert_eq!(config.placeholder, "-");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AnalysisConfig::builder()
            .summary_decimals(3)
            .plot_size(600.0, 300.0)
            .placeholder("n/a")
            .output_dir("reports")
            .build()
            .unwrap();

        assert_eq!(config.summary_decimals, 3);
        assert_eq!(config.plot_width, 600.0);
        assert_eq!(config.plot_height, 300.0);
        assert_eq!(config.placeholder, "n/a");
        assert_eq!(config.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn test_validation_invalid_decimals() {
        let result = AnalysisConfig::builder().p_value_decimals(20).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidDecimals { value: 20, .. }
        ));
    }

    #[test]
    fn test_validation_zero_bins() {
        let result = AnalysisConfig::builder().histogram_bins(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidHistogramBins(0)
        ));
    }

    #[test]
    fn test_validation_plot_smaller_than_padding() {
        let result = AnalysisConfig::builder()
            .plot_size(60.0, 300.0)
            .plot_padding(40.0)
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidPlotSize { .. }
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "summary_decimals": 3,
            "anova_decimals": 5,
            "p_value_decimals": 4,
            "histogram_bins": 10,
            "plot_width": 640.0,
            "plot_height": 320.0,
            "plot_padding": 30.0,
            "placeholder": "",
            "output_dir": "custom_output"
        }"#;

        let config: AnalysisConfig =
            serde_json::from_str(json).expect("Should deserialize from host JSON");
        assert_eq!(config.summary_decimals, 3);
        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.placeholder, "");
        assert_eq!(config.output_dir.to_str().unwrap(), "custom_output");
        assert!(config.validate().is_ok());
    }
}
