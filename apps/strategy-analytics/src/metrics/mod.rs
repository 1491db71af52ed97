//! Performance metrics for daily strategy records.
//!
//! Implements the standard dashboard metrics:
//! - Total profit and additive percentage return
//! - Win rate and average trades per day
//! - Sharpe and Sortino ratios (annualized, population std)
//! - Maximum drawdown amount, percentage, and duration
//! - Weekday profit aggregate and return distributions
//! - Per-trade statistics by slot and strategy parameter means

mod calculator;
mod constants;
mod drawdown;
mod format;
mod math;
mod types;

pub use calculator::{MetricsEngine, compute};
pub use constants::TRADING_DAYS_PER_YEAR;
pub use format::{format_money, format_pct, format_ratio};
pub use types::{
    CumulativePoint, DrawdownPoint, MetricsReport, ParameterMean, SlotStats, TradeStats,
    WEEKDAYS, WeekdayProfit, weekday_name,
};
