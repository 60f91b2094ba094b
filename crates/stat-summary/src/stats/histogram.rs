//! Equal-width histograms for per-column sparklines and full-size plots.

use serde::Serialize;

/// Bins used by the summary sparkline.
pub const SPARK_BINS: usize = 8;

/// Bin counts over the range of the finite values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    /// One count per bin. Empty when there were no finite values.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Count finite `values` into `bins` equal-width bins over `[min, max]`.
    ///
    /// The maximum falls into the last bin. A constant series lands entirely
    /// in the first bin.
    pub fn new(values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return Self {
                min: f64::NAN,
                max: f64::NAN,
                counts: Vec::new(),
            };
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = if max > min { max - min } else { 1.0 };

        let mut counts = vec![0; bins];
        for x in finite {
            let idx = (((x - min) / range) * bins as f64).floor() as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        Self { min, max, counts }
    }

    /// The 8-bin histogram shown next to each summary row.
    pub fn spark(values: &[f64]) -> Self {
        Self::new(values, SPARK_BINS)
    }

    /// Full-size histogram with [`suggested_bin_count`] bins for the number
    /// of finite values.
    pub fn full(values: &[f64]) -> Self {
        let n = values.iter().filter(|v| v.is_finite()).count();
        Self::new(values, suggested_bin_count(n))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Bar heights scaled so the fullest bin is 1.0.
    pub fn normalized(&self) -> Vec<f64> {
        let peak = self.counts.iter().copied().max().unwrap_or(0);
        if peak == 0 {
            return vec![0.0; self.counts.len()];
        }
        self.counts.iter().map(|&c| c as f64 / peak as f64).collect()
    }
}

/// Bin count for a full-size histogram of `n` values: `2·√n` clamped to `[4, 30]`.
pub fn suggested_bin_count(n: usize) -> usize {
    let raw = ((n as f64).sqrt() * 2.0).min(30.0).floor() as usize;
    raw.max(4)
}
