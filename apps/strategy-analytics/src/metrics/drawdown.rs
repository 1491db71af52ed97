//! Cumulative profit and drawdown analysis.

use rust_decimal::Decimal;

use crate::records::TradeDay;

use super::constants::PERCENT;
use super::math::to_f64;
use super::types::{CumulativePoint, DrawdownPoint};

/// Result of a single pass over the cumulative profit series.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownAnalysis {
    pub cumulative: Vec<CumulativePoint>,
    pub series: Vec<DrawdownPoint>,
    pub max_drawdown: Decimal,
    pub max_drawdown_pct: f64,
    pub max_duration: usize,
}

/// Walk the days in order, tracking the running peak.
///
/// The series starts at the first day's profit (no artificial zero). A
/// drawdown run starts on a day strictly below the prior peak and lasts
/// until a day strictly above it, or the end of the series.
///
/// Running totals saturate at the `Decimal` bounds instead of overflowing.
pub fn analyze(days: &[TradeDay]) -> DrawdownAnalysis {
    let mut cumulative = Vec::with_capacity(days.len());
    let mut series = Vec::with_capacity(days.len());

    let mut running = Decimal::ZERO;
    let mut peak: Option<Decimal> = None;
    let mut max_drawdown = Decimal::ZERO;
    let mut peak_at_max = Decimal::ZERO;

    let mut in_drawdown = false;
    let mut run_length = 0usize;
    let mut max_duration = 0usize;

    for day in days {
        running = running.saturating_add(day.profit);

        let current_peak = match peak {
            None => running,
            Some(p) if running > p => {
                in_drawdown = false;
                run_length = 0;
                running
            }
            Some(p) => {
                if in_drawdown {
                    run_length += 1;
                } else if running < p {
                    in_drawdown = true;
                    run_length = 1;
                }
                max_duration = max_duration.max(run_length);
                p
            }
        };
        peak = Some(current_peak);

        let drawdown = current_peak.saturating_sub(running);
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
            peak_at_max = current_peak;
        }

        cumulative.push(CumulativePoint {
            date: day.date,
            value: running,
        });
        series.push(DrawdownPoint {
            date: day.date,
            cumulative: running,
            peak: current_peak,
            drawdown,
        });
    }

    let max_drawdown_pct = if days.is_empty() {
        f64::NAN
    } else if max_drawdown.is_zero() {
        0.0
    } else if peak_at_max > Decimal::ZERO {
        to_f64(max_drawdown) / to_f64(peak_at_max) * PERCENT
    } else {
        f64::NAN
    };

    DrawdownAnalysis {
        cumulative,
        series,
        max_drawdown,
        max_drawdown_pct,
        max_duration,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};
    use rust_decimal_macros::dec;

    use super::*;

    fn days(profits: &[Decimal]) -> Vec<TradeDay> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        profits
            .iter()
            .enumerate()
            .map(|(i, p)| TradeDay::new(start + Days::new(i as u64), *p, 0.0))
            .collect()
    }

    fn values(analysis: &DrawdownAnalysis) -> Vec<Decimal> {
        analysis.cumulative.iter().map(|p| p.value).collect()
    }

    #[test]
    fn test_three_day_scenario() {
        let analysis = analyze(&days(&[dec!(100.0), dec!(150.0), dec!(-50.0)]));

        assert_eq!(values(&analysis), vec![dec!(100.0), dec!(250.0), dec!(200.0)]);
        assert_eq!(analysis.max_drawdown, dec!(50.0));
        assert_eq!(analysis.max_duration, 1);
        assert!((analysis.max_drawdown_pct - 20.0).abs() < 1e-9);
        assert_eq!(analysis.series[2].peak, dec!(250.0));
    }

    #[test]
    fn test_monotonic_series_has_no_drawdown() {
        let analysis = analyze(&days(&[dec!(10), dec!(0), dec!(5), dec!(20)]));
        assert_eq!(analysis.max_drawdown, Decimal::ZERO);
        assert_eq!(analysis.max_duration, 0);
        assert!(analysis.max_drawdown_pct.abs() < f64::EPSILON);
    }

    #[test]
    fn test_equal_to_peak_extends_run_until_strictly_above() {
        // cum: 100, 50, 100, 100, 120
        let analysis = analyze(&days(&[
            dec!(100),
            dec!(-50),
            dec!(50),
            dec!(0),
            dec!(20),
        ]));
        assert_eq!(analysis.max_duration, 3);
        assert_eq!(analysis.max_drawdown, dec!(50));
    }

    #[test]
    fn test_unrecovered_run_counts_to_end() {
        // cum: 100, 90, 80, 95
        let analysis = analyze(&days(&[dec!(100), dec!(-10), dec!(-10), dec!(15)]));
        assert_eq!(analysis.max_duration, 3);
        assert_eq!(analysis.max_drawdown, dec!(20));
    }

    #[test]
    fn test_longest_run_wins_over_deepest() {
        // cum: 10, 0 (deep, 1 day), 20, 19, 18, 17, 25
        let analysis = analyze(&days(&[
            dec!(10),
            dec!(-10),
            dec!(20),
            dec!(-1),
            dec!(-1),
            dec!(-1),
            dec!(8),
        ]));
        assert_eq!(analysis.max_drawdown, dec!(10));
        assert_eq!(analysis.max_duration, 3);
        assert!((analysis.max_drawdown_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_start_uses_first_day_as_peak() {
        // cum: -50, -80, -20
        let analysis = analyze(&days(&[dec!(-50), dec!(-30), dec!(60)]));
        assert_eq!(analysis.max_drawdown, dec!(30));
        assert_eq!(analysis.max_duration, 1);
        assert!(analysis.max_drawdown_pct.is_nan());
    }

    #[test]
    fn test_tiny_peak_then_large_loss() {
        let analysis = analyze(&days(&[
            dec!(0.0000001),
            dec!(-100000000000000000000000),
        ]));

        assert_eq!(analysis.max_duration, 1);
        assert!(analysis.max_drawdown >= dec!(99999999999999999999999));
        assert!(analysis.max_drawdown_pct.is_finite());
        assert!(analysis.max_drawdown_pct > 1e30);
    }

    #[test]
    fn test_running_total_saturates() {
        let analysis = analyze(&days(&[Decimal::MAX, Decimal::MAX, Decimal::MIN]));

        assert_eq!(analysis.cumulative[1].value, Decimal::MAX);
        assert_eq!(analysis.series[2].peak, Decimal::MAX);
        assert_eq!(analysis.max_drawdown, Decimal::MAX);
        assert!((analysis.max_drawdown_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_series() {
        let analysis = analyze(&[]);
        assert!(analysis.cumulative.is_empty());
        assert!(analysis.series.is_empty());
        assert_eq!(analysis.max_drawdown, Decimal::ZERO);
        assert_eq!(analysis.max_duration, 0);
        assert!(analysis.max_drawdown_pct.is_nan());
    }
}
