//! Statistical math utilities for performance metric calculations.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Calculate mean of a slice of floats.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Calculate population standard deviation (divides by `n`).
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values.iter().map(|v| (v - avg) * (v - avg)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Calculate downside deviation: population standard deviation of the
/// strictly negative values only. `None` when there are none.
pub fn downside_deviation(values: &[f64]) -> Option<f64> {
    let negative_returns: Vec<f64> = values.iter().copied().filter(|v| *v < 0.0).collect();
    population_std_dev(&negative_returns)
}

/// Ratio of two counts, NaN when the denominator is zero.
pub fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        f64::NAN
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Lossy conversion for ratio math on monetary values.
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
