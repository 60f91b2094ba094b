//! Descriptive statistics for a single column.
//!
//! All functions take the finite values of a column and never fail. Empty or
//! too-short inputs resolve to fixed values: `NaN` for location statistics,
//! `0.0` for spread and shape statistics.

use super::coercion::{coerce_column, is_missing};
use crate::dataset::Dataset;
use crate::error::Result;
use serde::Serialize;
use tracing::debug;

/// Arithmetic mean. `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (divisor `n - 1`).
///
/// Returns `0.0` when there are fewer than two values so that dependent
/// statistics such as the coefficient of variation stay finite.
pub fn std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }
    // A constant series has exactly zero spread even when the mean rounds.
    if values.iter().all(|&x| x == values[0]) {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}

/// Median, averaging the two middle values for even lengths.
pub fn median(values: &[f64]) -> f64 {
    let sorted = sorted_copy(values);
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Smallest value. `NaN` for an empty slice.
pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(f64::NAN)
}

/// Largest value. `NaN` for an empty slice.
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(f64::NAN)
}

/// Coefficient of variation in percent, `100 * sd / mean`.
///
/// `NaN` when the mean is zero or undefined.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m == 0.0 || m.is_nan() {
        return f64::NAN;
    }
    100.0 * std_dev(values) / m
}

/// Adjusted Fisher-Pearson sample skewness.
///
/// `0.0` when there are fewer than three values or no spread.
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return 0.0;
    }
    let s = std_dev(values);
    if s == 0.0 {
        return 0.0;
    }
    let m = mean(values);
    let n = n as f64;
    let sum_cubes: f64 = values.iter().map(|x| ((x - m) / s).powi(3)).sum();
    n / ((n - 1.0) * (n - 2.0)) * sum_cubes
}

/// Bias-corrected excess kurtosis (normal distribution scores 0).
///
/// `0.0` when there are fewer than four values or no spread.
pub fn kurtosis(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 4 {
        return 0.0;
    }
    let s = std_dev(values);
    if s == 0.0 {
        return 0.0;
    }
    let m = mean(values);
    let n = n as f64;
    let sum_fourths: f64 = values.iter().map(|x| ((x - m) / s).powi(4)).sum();
    let scale = n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0));
    let correction = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    scale * sum_fourths - correction
}

/// Percentage of null, absent or empty cells in a raw column.
///
/// Unparsable text is not counted: only the raw cell is inspected.
pub fn percent_missing<'a, I>(cells: I) -> f64
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let (total, missing) = cells
        .into_iter()
        .fold((0usize, 0usize), |(total, missing), cell| {
            (total + 1, missing + usize::from(is_missing(cell)))
        });
    if total == 0 {
        return 0.0;
    }
    missing as f64 / total as f64 * 100.0
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Descriptive summary of one column.
///
/// Fields hold full-precision values; `NaN` marks an undefined statistic
/// and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub variable: String,
    pub mean: f64,
    pub sd: f64,
    pub median: f64,
    pub minimum: f64,
    pub maximum: f64,
    /// Coefficient of variation in percent.
    pub cv: f64,
    pub skewness: f64,
    /// Excess kurtosis.
    pub kurtosis: f64,
    /// Percentage of missing raw cells.
    pub pct_na: f64,
}

impl ColumnSummary {
    /// Summarize a raw column.
    pub fn from_cells(variable: impl Into<String>, cells: &[Option<&str>]) -> Self {
        let series = coerce_column(cells.iter().copied());
        let values = series.finite();

        Self {
            variable: variable.into(),
            mean: mean(&values),
            sd: std_dev(&values),
            median: median(&values),
            minimum: min(&values),
            maximum: max(&values),
            cv: coefficient_of_variation(&values),
            skewness: skewness(&values),
            kurtosis: kurtosis(&values),
            pct_na: percent_missing(cells.iter().copied()),
        }
    }

    /// Whether the column had no usable numeric value at all.
    pub fn is_non_numeric(&self) -> bool {
        self.mean.is_nan()
    }
}

/// Summarize one named column of a dataset.
pub fn summarize_column(dataset: &Dataset, name: &str) -> Result<ColumnSummary> {
    let cells = dataset.column(name)?;
    Ok(ColumnSummary::from_cells(name, &cells))
}

/// Summarize every column of a dataset, in column order.
pub fn summarize_dataset(dataset: &Dataset) -> Vec<ColumnSummary> {
    debug!(
        "Summarizing {} columns over {} rows",
        dataset.width(),
        dataset.height()
    );
    dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let cells: Vec<Option<&str>> =
                dataset.rows().iter().map(|row| row.get(index)).collect();
            ColumnSummary::from_cells(name.as_str(), &cells)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    // ==================== empty and tiny inputs ====================

    #[test]
    fn test_empty_series() {
        let empty: [f64; 0] = [];
        assert!(mean(&empty).is_nan());
        assert!(median(&empty).is_nan());
        assert!(min(&empty).is_nan());
        assert!(max(&empty).is_nan());
        assert_eq!(std_dev(&empty), 0.0);
        assert!(coefficient_of_variation(&empty).is_nan());
        assert_eq!(skewness(&empty), 0.0);
        assert_eq!(kurtosis(&empty), 0.0);
    }

    #[test]
    fn test_single_value() {
        let values = [5.0];
        assert_eq!(mean(&values), 5.0);
        assert_eq!(std_dev(&values), 0.0);
        assert_eq!(median(&values), 5.0);
        assert_eq!(coefficient_of_variation(&values), 0.0);
        assert_eq!(skewness(&values), 0.0);
        assert_eq!(kurtosis(&values), 0.0);
    }

    #[test]
    fn test_constant_series() {
        let values = [4.0; 6];
        assert_eq!(std_dev(&values), 0.0);
        assert_eq!(skewness(&values), 0.0);
        assert_eq!(kurtosis(&values), 0.0);
        assert_eq!(coefficient_of_variation(&values), 0.0);

        let zeros = [0.0; 6];
        assert!(coefficient_of_variation(&zeros).is_nan());

        // 0.1 does not survive summation exactly
        let tenths = [0.1; 7];
        assert_eq!(std_dev(&tenths), 0.0);
        assert_eq!(skewness(&tenths), 0.0);
        assert_eq!(kurtosis(&tenths), 0.0);
    }

    // ==================== location and spread ====================

    #[test]
    fn test_mean_and_std_dev() {
        // Mean = 3, variance = 10 / 4 = 2.5
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_close(mean(&values), 3.0);
        assert_close(std_dev(&values), 2.5f64.sqrt());
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_min_max() {
        let values = [3.0, -1.5, 8.0, 2.0];
        assert_eq!(min(&values), -1.5);
        assert_eq!(max(&values), 8.0);
    }

    #[test]
    fn test_coefficient_of_variation() {
        // sd = sqrt(2.5), mean = 3
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_close(coefficient_of_variation(&values), 100.0 * 2.5f64.sqrt() / 3.0);
    }

    // ==================== shape ====================

    #[test]
    fn test_skewness_symmetric_is_zero() {
        assert_close(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]), 0.0);
    }

    #[test]
    fn test_skewness_right_tail() {
        // n = 5, mean = 2.8, sample variance = 64.8 / 4
        let values = [1.0, 1.0, 1.0, 1.0, 10.0];
        let s = 16.2f64.sqrt();
        let cubes: f64 = values.iter().map(|x| ((x - 2.8) / s).powi(3)).sum();
        let expected = 5.0 / (4.0 * 3.0) * cubes;
        assert_close(skewness(&values), expected);
        assert!(skewness(&values) > 2.0);
    }

    #[test]
    fn test_skewness_needs_three_values() {
        assert_eq!(skewness(&[1.0, 10.0]), 0.0);
    }

    #[test]
    fn test_kurtosis_uniform_is_negative() {
        // 1..=4: mean 2.5, sd^2 = 5/3
        // excess kurtosis of [1, 2, 3, 4] with bias correction = -1.2
        assert_close(kurtosis(&[1.0, 2.0, 3.0, 4.0]), -1.2);
    }

    #[test]
    fn test_kurtosis_needs_four_values() {
        assert_eq!(kurtosis(&[1.0, 2.0, 9.0]), 0.0);
    }

    // ==================== missing rate ====================

    #[test]
    fn test_percent_missing_counts_raw_cells() {
        let cells = [Some("1"), Some("2"), Some(""), Some("x"), None];
        assert_close(percent_missing(cells), 60.0);
    }

    #[test]
    fn test_percent_missing_empty_column() {
        assert_eq!(percent_missing(std::iter::empty()), 0.0);
    }

    // ==================== column summaries ====================

    #[test]
    fn test_column_summary_mixed_cells() {
        let cells = [Some("1"), Some("2"), Some(""), Some("x"), None];
        let summary = ColumnSummary::from_cells("y", &cells);

        assert_eq!(summary.variable, "y");
        assert_close(summary.mean, 1.5);
        assert_close(summary.median, 1.5);
        assert_eq!(summary.minimum, 1.0);
        assert_eq!(summary.maximum, 2.0);
        assert_close(summary.pct_na, 60.0);
        assert_eq!(summary.skewness, 0.0);
    }

    #[test]
    fn test_column_summary_text_column() {
        let cells = [Some("a"), Some("b"), Some("c")];
        let summary = ColumnSummary::from_cells("label", &cells);

        assert!(summary.is_non_numeric());
        assert_eq!(summary.sd, 0.0);
        assert!(summary.cv.is_nan());
        assert_eq!(summary.pct_na, 0.0);
    }

    #[test]
    fn test_summarize_dataset_in_column_order() {
        let dataset = Dataset::from_records(vec![
            vec![("b", Some("1")), ("a", Some("10"))],
            vec![("b", Some("3")), ("a", None)],
        ]);

        let summaries = summarize_dataset(&dataset);
        let names: Vec<_> = summaries.iter().map(|s| s.variable.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_close(summaries[0].mean, 2.0);
        assert_close(summaries[1].pct_na, 50.0);
    }

    #[test]
    fn test_summarize_unknown_column() {
        let dataset = Dataset::new(["a"]);
        assert!(summarize_column(&dataset, "b").is_err());
    }
}
