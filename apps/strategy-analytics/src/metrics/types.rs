//! Core types for strategy performance metrics.

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;

/// Weekdays in report order.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday.
#[must_use]
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Cumulative profit point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CumulativePoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Running sum of profit up to and including this date.
    pub value: Decimal,
}

/// Drawdown tracking point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawdownPoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Cumulative profit.
    pub cumulative: Decimal,
    /// Running peak of cumulative profit so far.
    pub peak: Decimal,
    /// Decline from the peak (non-negative).
    pub drawdown: Decimal,
}

/// Profit aggregated for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayProfit {
    /// Weekday.
    pub weekday: Weekday,
    /// Sum of profit on this weekday (zero when no data).
    pub profit: Decimal,
    /// Number of days contributing.
    pub days: usize,
}

/// Summary statistics over a set of per-trade returns.
///
/// All float fields are NaN when `count` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeStats {
    /// Number of recorded trades.
    pub count: usize,
    /// Mean return (percent).
    pub mean: f64,
    /// Worst trade return.
    pub min: f64,
    /// Best trade return.
    pub max: f64,
    /// Fraction of trades with a positive return.
    pub win_rate: f64,
}

impl Default for TradeStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            win_rate: f64::NAN,
        }
    }
}

/// Trade statistics for one `Trade_N` slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotStats {
    /// Slot number N.
    pub slot: u32,
    /// Statistics over recorded returns in this slot.
    pub stats: TradeStats,
}

/// Mean of one strategy parameter over the days where it is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterMean {
    /// Parameter column name.
    pub name: String,
    /// Mean of present values (NaN when never present).
    pub mean: f64,
    /// Number of days where the parameter was present.
    pub observations: usize,
}

/// Performance report for one (possibly filtered) record set.
///
/// Created fresh for every computation and never mutated afterwards.
/// Numerically undefined metrics are NaN rather than errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    /// Strategy identifier of the source record set.
    pub strategy_id: String,
    /// Number of trading days.
    pub day_count: usize,
    /// First trading date.
    pub first_date: Option<NaiveDate>,
    /// Last trading date.
    pub last_date: Option<NaiveDate>,

    // Profit metrics
    /// Sum of daily profit.
    pub total_profit: Decimal,
    /// Sum of daily percentage returns (additive).
    pub total_pnl_percentage: f64,
    /// Mean trades per day.
    pub avg_trades_per_day: f64,
    /// Fraction of days with positive profit (e.g. 0.55 = 55%).
    pub win_rate: f64,

    // Risk-adjusted metrics
    /// Annualized Sharpe ratio.
    pub sharpe_ratio: f64,
    /// Annualized Sortino ratio.
    pub sortino_ratio: f64,

    // Drawdown metrics
    /// Largest peak-to-trough decline of cumulative profit (non-negative).
    pub max_drawdown: Decimal,
    /// Largest decline as a percentage of the peak it fell from.
    pub max_drawdown_pct: f64,
    /// Longest drawdown run, in trading days.
    pub max_drawdown_duration: usize,

    // Series
    /// Cumulative profit, one point per day.
    pub cumulative_profit: Vec<CumulativePoint>,
    /// Drawdown from running peak, one point per day.
    pub drawdown_series: Vec<DrawdownPoint>,
    /// Profit by weekday, Monday to Sunday.
    pub weekday_profit: Vec<WeekdayProfit>,
    /// Daily percentage returns in date order.
    pub daily_returns: Vec<f64>,
    /// All recorded per-trade returns, flattened in date then slot order.
    pub trade_returns: Vec<f64>,

    // Breakdowns
    /// Statistics over all recorded trades.
    pub trade_stats: TradeStats,
    /// Statistics per `Trade_N` slot, ascending.
    pub slot_stats: Vec<SlotStats>,
    /// Mean of each strategy parameter.
    pub parameter_means: Vec<ParameterMean>,
}

impl MetricsReport {
    /// Whether the source record set had no days.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.day_count == 0
    }

    /// Profit aggregated for one weekday.
    #[must_use]
    pub fn profit_on(&self, weekday: Weekday) -> Decimal {
        self.weekday_profit
            .iter()
            .find(|w| w.weekday == weekday)
            .map_or(Decimal::ZERO, |w| w.profit)
    }

    /// Cumulative profit values without dates.
    #[must_use]
    pub fn cumulative_values(&self) -> Vec<Decimal> {
        self.cumulative_profit.iter().map(|p| p.value).collect()
    }

    /// Final cumulative profit, zero when empty.
    #[must_use]
    pub fn final_cumulative(&self) -> Decimal {
        self.cumulative_profit
            .last()
            .map_or(Decimal::ZERO, |p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_order_and_names() {
        let names: Vec<&str> = WEEKDAYS.iter().map(|w| weekday_name(*w)).collect();
        assert_eq!(
            names,
            vec![
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday"
            ]
        );
    }

    #[test]
    fn test_trade_stats_default_is_nan() {
        let stats = TradeStats::default();
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
        assert!(stats.win_rate.is_nan());
    }
}
