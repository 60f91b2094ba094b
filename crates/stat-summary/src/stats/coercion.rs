//! Uniform conversion of raw cells to numbers.
//!
//! Missing and unusable cells become `f64::NAN`. Coercion is total: it never
//! fails and never panics.

/// Convert one raw cell to a finite number or `NaN`.
///
/// Null, empty and whitespace-only cells, unparsable text, and values that
/// parse to an infinity or NaN all map to `NaN`.
///
/// ```
/// use stat_summary::stats::coercion::coerce;
///
/// assert_eq!(coerce(Some(" 2.5 ")), 2.5);
/// assert!(coerce(Some("x")).is_nan());
/// assert!(coerce(Some("inf")).is_nan());
/// assert!(coerce(None).is_nan());
/// ```
pub fn coerce(cell: Option<&str>) -> f64 {
    let Some(text) = cell else {
        return f64::NAN;
    };
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => f64::NAN,
    }
}

/// Whether a raw cell counts as missing (null, absent or empty string).
pub fn is_missing(cell: Option<&str>) -> bool {
    cell.is_none_or(str::is_empty)
}

/// Coerce a whole raw column, keeping one entry per row.
pub fn coerce_column<'a, I>(cells: I) -> NumericSeries
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    NumericSeries::from_cells(cells)
}

/// A coerced column: one entry per row, `NaN` marks a missing value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericSeries {
    values: Vec<f64>,
}

impl NumericSeries {
    /// Coerce every cell of a raw column.
    pub fn from_cells<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        Self {
            values: cells.into_iter().map(coerce).collect(),
        }
    }

    /// Row count, including missing entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All entries, `NaN` included.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// The finite subsequence, in row order.
    pub fn finite(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|v| v.is_finite()).collect()
    }

    /// Number of entries that coerced to `NaN`.
    pub fn nan_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_finite()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(coerce(Some("1")), 1.0);
        assert_eq!(coerce(Some("-3.25")), -3.25);
        assert_eq!(coerce(Some("1e3")), 1000.0);
        assert_eq!(coerce(Some("  7  ")), 7.0);
    }

    #[test]
    fn test_coerce_missing_and_garbage() {
        assert!(coerce(None).is_nan());
        assert!(coerce(Some("")).is_nan());
        assert!(coerce(Some("   ")).is_nan());
        assert!(coerce(Some("x")).is_nan());
        assert!(coerce(Some("12abc")).is_nan());
        assert!(coerce(Some("NaN")).is_nan());
        assert!(coerce(Some("-infinity")).is_nan());
    }

    #[test]
    fn test_is_missing() {
        assert!(is_missing(None));
        assert!(is_missing(Some("")));
        assert!(!is_missing(Some(" ")));
        assert!(!is_missing(Some("x")));
    }

    #[test]
    fn test_series_keeps_row_count() {
        let series = coerce_column([Some("1"), Some("2"), Some(""), Some("x"), None]);
        assert_eq!(series.len(), 5);
        assert_eq!(series.finite(), vec![1.0, 2.0]);
        assert_eq!(series.nan_count(), 3);
    }
}
