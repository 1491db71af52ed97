//! Metrics engine for daily strategy records.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::config::MetricsConfig;
use crate::records::{RecordSet, TradeDay};

use super::constants::{PERCENT, TOLERANCE, TRADING_DAYS_PER_YEAR};
use super::drawdown;
use super::math::{downside_deviation, mean, population_std_dev, ratio};
use super::types::{MetricsReport, ParameterMean, SlotStats, TradeStats, WEEKDAYS, WeekdayProfit};

/// Computes [`MetricsReport`]s from record sets.
///
/// Stateless apart from its annualization settings; one engine can be
/// shared across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsEngine {
    periods_per_year: f64,
    risk_free_rate: f64,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self {
            periods_per_year: TRADING_DAYS_PER_YEAR,
            risk_free_rate: 0.0,
        }
    }
}

impl MetricsEngine {
    /// Create an engine with explicit annualization settings.
    ///
    /// `risk_free_rate` is an annual fraction (0.05 = 5%).
    #[must_use]
    pub const fn new(periods_per_year: f64, risk_free_rate: f64) -> Self {
        Self {
            periods_per_year,
            risk_free_rate,
        }
    }

    /// Create an engine from the `metrics` config section.
    #[must_use]
    pub fn from_config(config: &MetricsConfig) -> Self {
        Self::new(f64::from(config.periods_per_year), config.risk_free_rate)
    }

    /// Periods used to annualize ratios.
    #[must_use]
    pub const fn periods_per_year(&self) -> f64 {
        self.periods_per_year
    }

    /// Annual risk-free rate.
    #[must_use]
    pub const fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Compute every metric for a record set.
    ///
    /// Never fails: metrics undefined for the input are NaN.
    #[must_use]
    pub fn compute(&self, record_set: &RecordSet) -> MetricsReport {
        let days = record_set.days();
        let day_count = days.len();

        let total_profit = days
            .iter()
            .fold(Decimal::ZERO, |acc, d| acc.saturating_add(d.profit));
        let daily_returns: Vec<f64> = days.iter().map(|d| d.pnl_percentage).collect();
        let total_pnl_percentage: f64 = daily_returns.iter().sum();

        let total_trades: u64 = days.iter().map(|d| u64::from(d.trade_count)).sum();
        let avg_trades_per_day = if day_count == 0 {
            f64::NAN
        } else {
            total_trades as f64 / day_count as f64
        };
        let win_rate = ratio(days.iter().filter(|d| d.is_win()).count(), day_count);

        let analysis = drawdown::analyze(days);
        let trade_returns: Vec<f64> = days.iter().flat_map(TradeDay::returns).collect();

        MetricsReport {
            strategy_id: record_set.strategy_id().to_string(),
            day_count,
            first_date: days.first().map(|d| d.date),
            last_date: days.last().map(|d| d.date),
            total_profit,
            total_pnl_percentage,
            avg_trades_per_day,
            win_rate,
            sharpe_ratio: self.sharpe(&daily_returns),
            sortino_ratio: self.sortino(&daily_returns),
            max_drawdown: analysis.max_drawdown,
            max_drawdown_pct: analysis.max_drawdown_pct,
            max_drawdown_duration: analysis.max_duration,
            cumulative_profit: analysis.cumulative,
            drawdown_series: analysis.series,
            weekday_profit: weekday_profit(days),
            trade_stats: trade_stats(&trade_returns),
            trade_returns,
            daily_returns,
            slot_stats: slot_stats(days),
            parameter_means: parameter_means(record_set),
        }
    }

    /// Per-period risk-free return in percent units.
    fn risk_free_per_period(&self) -> f64 {
        self.risk_free_rate * PERCENT / self.periods_per_year
    }

    /// Sharpe = (mean - rf) / std * sqrt(P)
    fn sharpe(&self, returns: &[f64]) -> f64 {
        if returns.len() < 2 {
            return f64::NAN;
        }
        let (Some(avg), Some(std)) = (mean(returns), population_std_dev(returns)) else {
            return f64::NAN;
        };
        if std <= TOLERANCE {
            return f64::NAN;
        }
        (avg - self.risk_free_per_period()) / std * self.periods_per_year.sqrt()
    }

    /// Sortino = (mean - rf) / downside deviation * sqrt(P)
    fn sortino(&self, returns: &[f64]) -> f64 {
        if returns.len() < 2 {
            return f64::NAN;
        }
        let (Some(avg), Some(downside)) = (mean(returns), downside_deviation(returns)) else {
            return f64::NAN;
        };
        if downside <= TOLERANCE {
            return f64::NAN;
        }
        (avg - self.risk_free_per_period()) / downside * self.periods_per_year.sqrt()
    }
}

/// Compute a report with the default engine (252 periods, zero risk-free rate).
#[must_use]
pub fn compute(record_set: &RecordSet) -> MetricsReport {
    MetricsEngine::default().compute(record_set)
}

fn weekday_profit(days: &[TradeDay]) -> Vec<WeekdayProfit> {
    let mut buckets: Vec<WeekdayProfit> = WEEKDAYS
        .iter()
        .map(|w| WeekdayProfit {
            weekday: *w,
            profit: Decimal::ZERO,
            days: 0,
        })
        .collect();

    for day in days {
        let bucket = &mut buckets[day.weekday().num_days_from_monday() as usize];
        bucket.profit = bucket.profit.saturating_add(day.profit);
        bucket.days += 1;
    }
    buckets
}

fn trade_stats(returns: &[f64]) -> TradeStats {
    let Some(avg) = mean(returns) else {
        return TradeStats::default();
    };
    TradeStats {
        count: returns.len(),
        mean: avg,
        min: returns.iter().copied().fold(f64::INFINITY, f64::min),
        max: returns.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        win_rate: ratio(returns.iter().filter(|r| **r > 0.0).count(), returns.len()),
    }
}

fn slot_stats(days: &[TradeDay]) -> Vec<SlotStats> {
    let mut by_slot: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for trade in days.iter().flat_map(|d| &d.trade_returns) {
        by_slot.entry(trade.slot).or_default().push(trade.return_pct);
    }
    by_slot
        .into_iter()
        .map(|(slot, returns)| SlotStats {
            slot,
            stats: trade_stats(&returns),
        })
        .collect()
}

fn parameter_means(record_set: &RecordSet) -> Vec<ParameterMean> {
    record_set
        .parameter_names()
        .iter()
        .map(|name| {
            let values: Vec<f64> = record_set
                .days()
                .iter()
                .filter_map(|d| d.strategy_params.get(name))
                .collect();
            ParameterMean {
                name: name.clone(),
                mean: mean(&values).unwrap_or(f64::NAN),
                observations: values.len(),
            }
        })
        .collect()
}
