//! Core record types: one `TradeDay` per date, grouped into a `RecordSet`.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// A single recorded trade return, tagged with its `Trade_N` slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeReturn {
    /// 1-based slot number (the N of `Trade_N`).
    pub slot: u32,
    /// Percentage return of the trade.
    pub return_pct: f64,
}

/// Strategy-specific parameters for one day.
///
/// Ordered as they appeared in the input header. A `None` value means the
/// cell was blank, which is distinct from a zero-valued parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams(Vec<(String, Option<f64>)>);

impl StrategyParams {
    /// Create an empty parameter map.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a parameter value.
    pub fn push(&mut self, name: impl Into<String>, value: Option<f64>) {
        self.0.push((name.into(), value));
    }

    /// Builder-style variant of [`StrategyParams::push`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Option<f64>) -> Self {
        self.push(name, value);
        self
    }

    /// Value of a parameter, `None` if absent or unknown.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| *v)
    }

    /// Whether the parameter column exists for this day (even if blank).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    /// Iterate over `(name, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.0.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Number of parameter columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameter columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One day's trading outcome for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDay {
    /// Calendar date.
    pub date: NaiveDate,
    /// Signed monetary profit.
    pub profit: Decimal,
    /// Signed percentage return for the day (0.2 = 0.2%).
    pub pnl_percentage: f64,
    /// Capital base for the day.
    pub trade_capital: Decimal,
    /// Opaque strategy parameters.
    pub strategy_params: StrategyParams,
    /// Number of trades executed.
    pub trade_count: u32,
    /// Recorded per-trade returns in slot order. Unrecorded slots are absent.
    pub trade_returns: Vec<TradeReturn>,
}

impl TradeDay {
    /// Create a day with no parameters and no trades.
    #[must_use]
    pub fn new(date: NaiveDate, profit: Decimal, pnl_percentage: f64) -> Self {
        Self {
            date,
            profit,
            pnl_percentage,
            trade_capital: Decimal::ZERO,
            strategy_params: StrategyParams::new(),
            trade_count: 0,
            trade_returns: Vec::new(),
        }
    }

    /// Set the capital base.
    #[must_use]
    pub const fn with_capital(mut self, capital: Decimal) -> Self {
        self.trade_capital = capital;
        self
    }

    /// Set strategy parameters.
    #[must_use]
    pub fn with_params(mut self, params: StrategyParams) -> Self {
        self.strategy_params = params;
        self
    }

    /// Set the trade count and recorded returns.
    #[must_use]
    pub fn with_trades(mut self, trade_count: u32, trade_returns: Vec<TradeReturn>) -> Self {
        self.trade_count = trade_count;
        self.trade_returns = trade_returns;
        self
    }

    /// Weekday of this day's date.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Whether the day closed with a positive profit.
    #[must_use]
    pub fn is_win(&self) -> bool {
        self.profit > Decimal::ZERO
    }

    /// Recorded trade returns without slot information.
    pub fn returns(&self) -> impl Iterator<Item = f64> + '_ {
        self.trade_returns.iter().map(|t| t.return_pct)
    }

    /// Largest slot number recorded for this day.
    #[must_use]
    pub fn max_slot(&self) -> Option<u32> {
        self.trade_returns.iter().map(|t| t.slot).max()
    }
}

/// Kind of data-quality problem found at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataQualityIssue {
    /// More trade returns were recorded than `No_of_Trades` declares.
    TradeCountMismatch {
        /// Declared trade count.
        declared: u32,
        /// Non-blank `Trade_N` cells.
        recorded: usize,
    },
}

impl std::fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TradeCountMismatch { declared, recorded } => write!(
                f,
                "{recorded} trade returns recorded but No_of_Trades is {declared}"
            ),
        }
    }
}

/// A non-fatal data-quality warning attached to a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityWarning {
    /// Date of the affected row.
    pub date: NaiveDate,
    /// What was wrong.
    pub issue: DataQualityIssue,
}

/// The ordered history of trade days for one strategy.
///
/// Days are sorted ascending and dates are unique. A `RecordSet` is never
/// mutated after construction; filtering builds a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    strategy_id: String,
    days: Vec<TradeDay>,
    parameter_names: Vec<String>,
    warnings: Vec<DataQualityWarning>,
}

impl RecordSet {
    /// Build a record set from unsorted days.
    ///
    /// Parameter names are collected from the days in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::DuplicateDate`] if two days share a date.
    pub fn from_days(strategy_id: impl Into<String>, days: Vec<TradeDay>) -> Result<Self> {
        let mut parameter_names: Vec<String> = Vec::new();
        for day in &days {
            for (name, _) in day.strategy_params.iter() {
                if !parameter_names.iter().any(|n| n == name) {
                    parameter_names.push(name.to_string());
                }
            }
        }
        Self::assemble(strategy_id.into(), days, parameter_names, Vec::new())
    }

    /// An empty record set.
    #[must_use]
    pub fn empty(strategy_id: impl Into<String>) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            days: Vec::new(),
            parameter_names: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Sort, check uniqueness and wrap. Row numbers in errors refer to the
    /// original (unsorted) position.
    pub(crate) fn assemble(
        strategy_id: String,
        days: Vec<TradeDay>,
        parameter_names: Vec<String>,
        warnings: Vec<DataQualityWarning>,
    ) -> Result<Self> {
        let mut indexed: Vec<(usize, TradeDay)> = days.into_iter().enumerate().collect();
        indexed.sort_by_key(|(idx, day)| (day.date, *idx));

        for pair in indexed.windows(2) {
            if pair[0].1.date == pair[1].1.date {
                return Err(AnalyticsError::DuplicateDate {
                    row: pair[0].0.max(pair[1].0) + 1,
                    date: pair[1].1.date,
                });
            }
        }

        let mut warnings = warnings;
        warnings.sort_by_key(|w| w.date);

        Ok(Self {
            strategy_id,
            days: indexed.into_iter().map(|(_, day)| day).collect(),
            parameter_names,
            warnings,
        })
    }

    /// Derive a subset that keeps this set's identity and metadata.
    /// `days` must already be a sorted subsequence of `self.days`.
    pub(crate) fn derive(&self, days: Vec<TradeDay>) -> Self {
        let warnings = self
            .warnings
            .iter()
            .filter(|w| days.binary_search_by_key(&w.date, |d| d.date).is_ok())
            .cloned()
            .collect();

        Self {
            strategy_id: self.strategy_id.clone(),
            days,
            parameter_names: self.parameter_names.clone(),
            warnings,
        }
    }

    /// Strategy identifier.
    #[must_use]
    pub fn strategy_id(&self) -> &str {
        &self.strategy_id
    }

    /// Days in ascending date order.
    #[must_use]
    pub fn days(&self) -> &[TradeDay] {
        &self.days
    }

    /// Strategy parameter column names in header order.
    #[must_use]
    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    /// Data-quality warnings collected at load time.
    #[must_use]
    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    /// Number of days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether there are no days.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// First and last date, `None` when empty.
    #[must_use]
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.days.first(), self.days.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// Largest `Trade_N` slot recorded on any day.
    #[must_use]
    pub fn max_trade_slot(&self) -> u32 {
        self.days
            .iter()
            .filter_map(TradeDay::max_slot)
            .max()
            .unwrap_or(0)
    }
}

/// Earliest first date and latest last date across several record sets.
#[must_use]
pub fn date_span_of(sets: &[RecordSet]) -> Option<(NaiveDate, NaiveDate)> {
    sets.iter()
        .filter_map(RecordSet::date_span)
        .reduce(|(lo, hi), (first, last)| (lo.min(first), hi.max(last)))
}
