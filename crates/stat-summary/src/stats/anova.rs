//! One-way analysis of variance.
//!
//! [`AnovaResult::compute`] never fails. Degenerate inputs (a single group,
//! groups with one member each, no spread within groups) leave the affected
//! fields as `NaN`, which hosts render as a placeholder.

use super::descriptive;
use super::distribution::f_survival;
use super::partition::Partition;
use serde::Serialize;
use tracing::debug;

/// ANOVA decomposition for one response/group selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaResult {
    /// Group names in first-seen order.
    pub group_names: Vec<String>,
    /// Finite values per group.
    pub counts: Vec<usize>,
    /// Total finite values (`N`).
    pub total_count: usize,
    /// Per-group means, `NaN` for an empty group.
    pub means: Vec<f64>,
    /// Count-weighted mean of the group means.
    pub overall_mean: f64,
    pub ss_between: f64,
    pub ss_within: f64,
    pub ss_total: f64,
    /// `k - 1`; negative only when there are no groups.
    pub df_between: i64,
    /// `N - k`; negative when some groups are empty.
    pub df_within: i64,
    pub ms_between: f64,
    pub ms_within: f64,
    pub f_statistic: f64,
    /// Upper-tail probability of `f_statistic` under `F(df_between, df_within)`.
    pub p_value: f64,
}

impl AnovaResult {
    /// Decompose the variance of a partitioned response.
    pub fn compute(partition: &Partition) -> Self {
        let groups = partition.groups();
        let k = groups.len();

        let group_names: Vec<String> = groups.iter().map(|g| g.name.clone()).collect();
        let counts: Vec<usize> = groups.iter().map(|g| g.len()).collect();
        let total_count: usize = counts.iter().sum();
        let means: Vec<f64> = groups.iter().map(|g| descriptive::mean(&g.values)).collect();

        // Empty groups contribute nothing; their NaN mean must not leak.
        let weighted_sum: f64 = means
            .iter()
            .zip(&counts)
            .filter(|&(_, &n)| n > 0)
            .map(|(&m, &n)| m * n as f64)
            .sum();
        let overall_mean = if total_count > 0 {
            weighted_sum / total_count as f64
        } else {
            f64::NAN
        };

        let ss_between: f64 = means
            .iter()
            .zip(&counts)
            .filter(|&(_, &n)| n > 0)
            .map(|(&m, &n)| n as f64 * (m - overall_mean).powi(2))
            .sum();

        let ss_within: f64 = groups
            .iter()
            .zip(&means)
            .map(|(g, &m)| g.values.iter().map(|x| (x - m).powi(2)).sum::<f64>())
            .sum();

        let ss_total = ss_between + ss_within;
        let df_between = k as i64 - 1;
        let df_within = total_count as i64 - k as i64;

        let ms_between = guarded_ratio(ss_between, df_between);
        let ms_within = guarded_ratio(ss_within, df_within);
        let f_statistic = if ms_within == 0.0 || ms_within.is_nan() || ms_between.is_nan() {
            f64::NAN
        } else {
            ms_between / ms_within
        };
        let p_value = f_survival(f_statistic, df_between as f64, df_within as f64);

        debug!(
            "ANOVA over {} groups, N = {}: F = {}, p = {}",
            k, total_count, f_statistic, p_value
        );

        Self {
            group_names,
            counts,
            total_count,
            means,
            overall_mean,
            ss_between,
            ss_within,
            ss_total,
            df_between,
            df_within,
            ms_between,
            ms_within,
            f_statistic,
            p_value,
        }
    }

    /// Number of groups (`k`).
    pub fn group_count(&self) -> usize {
        self.group_names.len()
    }

    /// Degrees of freedom of the total sum of squares (`N - 1`).
    pub fn df_total(&self) -> i64 {
        self.total_count as i64 - 1
    }

    /// The Between / Within / Total rows of the classic ANOVA table.
    ///
    /// Cells that do not apply to a row (MS of the total, F and p outside the
    /// between row) are `None`.
    pub fn table(&self) -> [AnovaTableRow; 3] {
        [
            AnovaTableRow {
                source: VarianceSource::Between,
                sum_of_squares: self.ss_between,
                df: self.df_between,
                mean_square: Some(self.ms_between),
                f_statistic: Some(self.f_statistic),
                p_value: Some(self.p_value),
            },
            AnovaTableRow {
                source: VarianceSource::Within,
                sum_of_squares: self.ss_within,
                df: self.df_within,
                mean_square: Some(self.ms_within),
                f_statistic: None,
                p_value: None,
            },
            AnovaTableRow {
                source: VarianceSource::Total,
                sum_of_squares: self.ss_total,
                df: self.df_total(),
                mean_square: None,
                f_statistic: None,
                p_value: None,
            },
        ]
    }

    /// `(group, n, mean)` rows in group order.
    pub fn group_means(&self) -> Vec<GroupMean> {
        self.group_names
            .iter()
            .zip(&self.counts)
            .zip(&self.means)
            .map(|((name, &n), &mean)| GroupMean {
                group: name.clone(),
                n,
                mean,
            })
            .collect()
    }
}

/// Mean square `SS / df`, or `NaN` when `df <= 0`.
///
/// A negative `df` (more groups than usable values) is treated like zero
/// rather than producing a signed mean square.
fn guarded_ratio(sum_of_squares: f64, df: i64) -> f64 {
    if df <= 0 {
        f64::NAN
    } else {
        sum_of_squares / df as f64
    }
}

/// Row label of the ANOVA table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceSource {
    Between,
    Within,
    Total,
}

impl VarianceSource {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Between => "Between",
            Self::Within => "Within",
            Self::Total => "Total",
        }
    }
}

/// One row of the ANOVA table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnovaTableRow {
    pub source: VarianceSource,
    pub sum_of_squares: f64,
    pub df: i64,
    pub mean_square: Option<f64>,
    pub f_statistic: Option<f64>,
    pub p_value: Option<f64>,
}

/// Count and mean of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub group: String,
    pub n: usize,
    pub mean: f64,
}
