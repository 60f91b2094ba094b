//! F-distribution tail probabilities.

use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Upper-tail probability `P(X > f)` of the F-distribution with
/// `(df1, df2)` degrees of freedom.
///
/// `NaN` when `f` is NaN or either degree of freedom is not positive.
/// `f <= 0` gives 1 and an infinite `f` gives 0.
pub fn f_survival(f: f64, df1: f64, df2: f64) -> f64 {
    if f.is_nan() || !(df1 > 0.0 && df2 > 0.0) {
        return f64::NAN;
    }
    if f <= 0.0 {
        return 1.0;
    }
    if f.is_infinite() {
        return 0.0;
    }

    match FisherSnedecor::new(df1, df2) {
        Ok(dist) => dist.sf(f).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}
