// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call,
        clippy::format_push_string
    )
)]

//! Strategy Analytics - Rust Core Library
//!
//! Performance and risk metrics for algorithmic trading strategies, computed
//! from per-strategy daily trading records.
//!
//! # Pipeline
//!
//! - **records**: typed daily records, the delimited-text loader, and the
//!   date-range / weekday filter
//! - **metrics**: the pure metrics engine (P&L, win rate, Sharpe, Sortino,
//!   drawdown, weekday and per-trade breakdowns)
//! - **comparator**: independent per-strategy evaluation, optionally on a
//!   rayon pool, with failures isolated per strategy
//! - **export**: delimited rows plus a summary block, and JSON reports
//!
//! Everything above is synchronous and free of file-system access; the
//! binary owns I/O, configuration loading, and subscriber installation.
//!
//! # Example
//!
//! ```rust,ignore
//! use strategy_analytics::{Exporter, FilterCriteria, compute, filter, load_record_set};
//!
//! let records = load_record_set("alpha", &std::fs::read("data/alpha.csv")?)?;
//! let filtered = filter(&records, &FilterCriteria::new().weekday_labels(&["Monday"])?)?;
//! let report = compute(&filtered);
//! let csv = Exporter::default().export(&filtered, &report)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Multi-strategy comparison.
pub mod comparator;

/// YAML configuration with environment variable interpolation.
pub mod config;

/// Typed errors and stable error kinds.
pub mod error;

/// Delimited-text and JSON export.
pub mod export;

/// Performance metrics engine.
pub mod metrics;

/// Daily trading records, loader, and filter.
pub mod records;

/// Tracing subscriber setup.
pub mod telemetry;

pub use comparator::{
    Comparator, ComparisonEntry, ComparisonOutcome, ComparisonTable, StrategySource, compare,
    compare_sources,
};
pub use config::{Config, ConfigError, load_config, load_config_from_string};
pub use error::{AnalyticsError, ErrorKind, Result};
pub use export::{Exporter, export_file_name, report_to_json};
pub use metrics::{MetricsEngine, MetricsReport, compute};
pub use records::{
    FilterCriteria, LoaderOptions, RecordSet, RecordSetLoader, TradeDay, filter, filter_range,
    load_record_set,
};
