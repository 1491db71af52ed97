//! Result types for strategy comparison.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{AnalyticsError, ErrorKind};
use crate::metrics::MetricsReport;

/// Outcome for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonOutcome {
    /// Metrics were computed.
    Ok(Box<MetricsReport>),
    /// Loading or filtering failed.
    Failed {
        /// Stable kind of the captured error.
        kind: ErrorKind,
        /// Human-readable message.
        message: String,
    },
}

impl From<AnalyticsError> for ComparisonOutcome {
    fn from(err: AnalyticsError) -> Self {
        Self::Failed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// One row of a comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    /// Strategy identifier.
    pub strategy_id: String,
    /// Report or failure marker.
    pub outcome: ComparisonOutcome,
}

impl ComparisonEntry {
    /// The report, if this strategy succeeded.
    #[must_use]
    pub fn report(&self) -> Option<&MetricsReport> {
        match &self.outcome {
            ComparisonOutcome::Ok(report) => Some(&**report),
            ComparisonOutcome::Failed { .. } => None,
        }
    }

    /// Whether this strategy succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.outcome, ComparisonOutcome::Ok(_))
    }
}

/// Per-strategy outcomes in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonTable {
    entries: Vec<ComparisonEntry>,
}

impl ComparisonTable {
    /// Wrap entries, keeping their order.
    #[must_use]
    pub const fn new(entries: Vec<ComparisonEntry>) -> Self {
        Self { entries }
    }

    /// All entries in input order.
    #[must_use]
    pub fn entries(&self) -> &[ComparisonEntry] {
        &self.entries
    }

    /// Number of strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no strategies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a strategy by identifier.
    #[must_use]
    pub fn get(&self, strategy_id: &str) -> Option<&ComparisonEntry> {
        self.entries.iter().find(|e| e.strategy_id == strategy_id)
    }

    /// Successful reports only.
    #[must_use]
    pub fn successful(&self) -> Vec<&MetricsReport> {
        self.entries.iter().filter_map(ComparisonEntry::report).collect()
    }

    /// Failed entries only.
    #[must_use]
    pub fn failed(&self) -> Vec<&ComparisonEntry> {
        self.entries.iter().filter(|e| !e.is_ok()).collect()
    }

    /// Best report by Sharpe ratio. NaN ratios never win.
    #[must_use]
    pub fn best_by_sharpe(&self) -> Option<&MetricsReport> {
        self.successful()
            .into_iter()
            .filter(|r| !r.sharpe_ratio.is_nan())
            .reduce(|best, r| {
                if r.sharpe_ratio.partial_cmp(&best.sharpe_ratio) == Some(Ordering::Greater) {
                    r
                } else {
                    best
                }
            })
    }

    /// Best report by total profit.
    #[must_use]
    pub fn best_by_profit(&self) -> Option<&MetricsReport> {
        self.successful()
            .into_iter()
            .reduce(|best, r| if r.total_profit > best.total_profit { r } else { best })
    }
}
