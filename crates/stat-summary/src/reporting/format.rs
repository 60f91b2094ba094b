//! Display rounding for report tables.

/// Round `value` to `decimals` places, halves away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // Collapse -0.0 so it never prints with a sign.
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Format a statistic for display.
///
/// Non-finite values become `placeholder`. Finite values are rounded and
/// printed without trailing zeros, so `2.50` shows as `2.5`.
///
/// ```
/// use stat_summary::reporting::format_value;
///
/// assert_eq!(format_value(1.23456, 2, "-"), "1.23");
/// assert_eq!(format_value(3.0, 4, "-"), "3");
/// assert_eq!(format_value(f64::NAN, 4, "-"), "-");
/// ```
pub fn format_value(value: f64, decimals: u32, placeholder: &str) -> String {
    if !value.is_finite() {
        return placeholder.to_string();
    }
    round_to(value, decimals).to_string()
}

/// Format an optional table cell; `None` is shown as `placeholder`.
pub fn format_cell(value: Option<f64>, decimals: u32, placeholder: &str) -> String {
    value.map_or_else(
        || placeholder.to_string(),
        |v| format_value(v, decimals, placeholder),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(-0.001, 2), 0.0);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1.5, 2, "-"), "1.5");
        assert_eq!(format_value(60.0, 2, "-"), "60");
        assert_eq!(format_value(0.10557280900008414, 6, "-"), "0.105573");
        assert_eq!(format_value(-0.0004, 2, "-"), "0");
        assert_eq!(format_value(f64::INFINITY, 2, "n/a"), "n/a");
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(None, 4, "-"), "-");
        assert_eq!(format_cell(Some(f64::NAN), 4, ""), "");
        assert_eq!(format_cell(Some(8.0), 4, "-"), "8");
    }
}
