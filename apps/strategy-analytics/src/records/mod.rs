//! Daily trading records: typed model, loader, and filter.
//!
//! - [`RecordSetLoader`] parses delimited text into a validated [`RecordSet`]
//! - [`filter`] restricts a record set by inclusive date range and weekday set
//!
//! Record sets are immutable; every operation returns a new value.

mod filter;
mod loader;
mod types;

pub use filter::{
    ALL_WEEKDAYS_LABEL, FilterCriteria, filter, filter_range, parse_weekday,
    parse_weekday_labels,
};
pub use loader::{
    DATE_COLUMN, DEFAULT_MAX_ROWS, KNOWN_PARAMETER_COLUMNS, LoaderOptions, MAX_PROFIT_MAGNITUDE,
    PNL_PERCENTAGE_COLUMN, PROFIT_COLUMN, RecordSetLoader, TRADE_CAPITAL_COLUMN,
    TRADE_COLUMN_PREFIX, TRADE_COUNT_COLUMN, load_record_set,
};
pub use types::{
    DataQualityIssue, DataQualityWarning, RecordSet, StrategyParams, TradeDay, TradeReturn,
    date_span_of,
};
