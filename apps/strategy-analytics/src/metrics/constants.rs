//! Constants for performance metric calculations.

/// Standard trading-year length used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Percent units per unit return (`pnl_percentage` is expressed in percent).
pub const PERCENT: f64 = 100.0;

/// Deviations at or below this are treated as zero variance.
pub const TOLERANCE: f64 = 1e-12;
