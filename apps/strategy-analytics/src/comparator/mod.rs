//! Side-by-side comparison of several strategies.
//!
//! Each strategy is processed independently: one failing input becomes a
//! failed entry and never aborts the others. Output order always matches
//! input order.
//!
//! # Thread Pool Configuration
//!
//! Jobs run on rayon's global pool once their count reaches
//! `comparator.min_parallel_jobs`. A non-zero `comparator.max_threads`
//! builds a dedicated pool for the call instead. Sequential and parallel
//! runs produce identical tables.
//!
//! # Example
//!
//! ```ignore
//! use strategy_analytics::comparator::{StrategySource, compare_sources};
//! use strategy_analytics::records::FilterCriteria;
//!
//! let sources = vec![
//!     StrategySource::new("alpha", std::fs::read("data/alpha.csv")?),
//!     StrategySource::new("beta", std::fs::read("data/beta.csv")?),
//! ];
//! let table = compare_sources(&sources, &FilterCriteria::new());
//! ```

mod executor;
mod result;
mod types;

pub use executor::{Comparator, compare, compare_sources};
pub use result::{ComparisonEntry, ComparisonOutcome, ComparisonTable};
pub use types::StrategySource;
