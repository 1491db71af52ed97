//! Formatting utilities for metrics display.

use rust_decimal::Decimal;

/// Format a monetary amount with 2 decimal places.
#[must_use]
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Format a fraction as a percentage string, "N/A" when undefined.
#[must_use]
pub fn format_pct(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}%", value * 100.0)
    } else {
        "N/A".to_string()
    }
}

/// Format a ratio with 2 decimal places, "N/A" when undefined.
#[must_use]
pub fn format_ratio(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "N/A".to_string()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_money(dec!(1234.5)), "1234.50");
        assert_eq!(format_money(dec!(-0.125)), "-0.12");
        assert_eq!(format_pct(0.1523), "15.23%");
        assert_eq!(format_pct(f64::NAN), "N/A");
        assert_eq!(format_ratio(2.345_6), "2.35");
        assert_eq!(format_ratio(f64::NAN), "N/A");
    }
}
