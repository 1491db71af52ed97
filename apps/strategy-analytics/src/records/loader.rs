//! Delimited-text loader for per-strategy daily records.
//!
//! The loader takes raw bytes plus an externally supplied strategy id and
//! has no file-system concerns. Expected header columns:
//!
//! - Required: `Date`, `Profit`, `Pnl_Percentage`, `Trade_Capital`, `No_of_Trades`
//! - `Trade_<N>` for N = 1, 2, 3, … (blank cells permitted)
//! - Any other column is an opaque numeric strategy parameter (blank = absent)

use std::io::Read;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info, warn};

use crate::config::DataConfig;
use crate::error::{AnalyticsError, Result};

use super::types::{
    DataQualityIssue, DataQualityWarning, RecordSet, StrategyParams, TradeDay, TradeReturn,
};

/// `Date` column header.
pub const DATE_COLUMN: &str = "Date";
/// `Profit` column header.
pub const PROFIT_COLUMN: &str = "Profit";
/// `Pnl_Percentage` column header.
pub const PNL_PERCENTAGE_COLUMN: &str = "Pnl_Percentage";
/// `Trade_Capital` column header.
pub const TRADE_CAPITAL_COLUMN: &str = "Trade_Capital";
/// `No_of_Trades` column header.
pub const TRADE_COUNT_COLUMN: &str = "No_of_Trades";
/// Prefix of per-trade return columns.
pub const TRADE_COLUMN_PREFIX: &str = "Trade_";

/// Strategy parameter columns known from the production datasets.
///
/// Any non-reserved column is accepted; a header missing one of these is
/// only logged at debug level.
pub const KNOWN_PARAMETER_COLUMNS: [&str; 5] = [
    "Index_Distance",
    "Profit_booking_Morning",
    "Profit_booking_AfterNoon",
    "Trailing_Percaentage",
    "Profit_booking_AfterNoon_apprx",
];

/// Largest accepted `Profit` magnitude; larger cells are malformed numbers.
pub const MAX_PROFIT_MAGNITUDE: Decimal = dec!(1000000000000000);

/// Default maximum number of data rows per input.
pub const DEFAULT_MAX_ROWS: usize = 100_000;

/// Loader policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Maximum number of data rows accepted.
    pub max_rows: usize,
    /// Return an empty record set instead of `EmptyInput`.
    pub allow_empty: bool,
    /// Field delimiter.
    pub delimiter: u8,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            allow_empty: false,
            delimiter: b',',
        }
    }
}

impl From<&DataConfig> for LoaderOptions {
    fn from(config: &DataConfig) -> Self {
        Self {
            max_rows: config.max_rows,
            allow_empty: config.allow_empty,
            delimiter: config.delimiter_byte().unwrap_or(b','),
        }
    }
}

/// Column positions resolved from the header row.
#[derive(Debug)]
struct ColumnLayout {
    date: usize,
    profit: usize,
    pnl_percentage: usize,
    trade_capital: usize,
    trade_count: usize,
    /// `(index, name)` in header order.
    params: Vec<(usize, String)>,
    /// `(slot, index)` sorted by slot.
    trades: Vec<(u32, usize)>,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let names: Vec<String> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                // Strip a UTF-8 byte-order mark from the first header cell
                let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.trim().to_string()
            })
            .collect();

        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(AnalyticsError::MalformedInput(format!(
                    "duplicate column '{name}'"
                )));
            }
        }

        let find = |column: &str| {
            names
                .iter()
                .position(|n| n == column)
                .ok_or_else(|| AnalyticsError::MissingColumn(column.to_string()))
        };

        let date = find(DATE_COLUMN)?;
        let profit = find(PROFIT_COLUMN)?;
        let pnl_percentage = find(PNL_PERCENTAGE_COLUMN)?;
        let trade_capital = find(TRADE_CAPITAL_COLUMN)?;
        let trade_count = find(TRADE_COUNT_COLUMN)?;
        let reserved = [date, profit, pnl_percentage, trade_capital, trade_count];

        let mut params = Vec::new();
        let mut trades = Vec::new();
        for (idx, name) in names.iter().enumerate() {
            if reserved.contains(&idx) || name.is_empty() {
                continue;
            }
            match trade_slot(name) {
                Some(slot) => trades.push((slot, idx)),
                None => params.push((idx, name.clone())),
            }
        }
        trades.sort_unstable_by_key(|(slot, _)| *slot);

        Ok(Self {
            date,
            profit,
            pnl_percentage,
            trade_capital,
            trade_count,
            params,
            trades,
        })
    }

    fn parameter_names(&self) -> Vec<String> {
        self.params.iter().map(|(_, name)| name.clone()).collect()
    }

    fn missing_known_parameters(&self) -> Vec<&'static str> {
        KNOWN_PARAMETER_COLUMNS
            .into_iter()
            .filter(|known| !self.params.iter().any(|(_, name)| name == known))
            .collect()
    }
}

/// Slot number of a `Trade_<N>` header, N >= 1.
fn trade_slot(name: &str) -> Option<u32> {
    let suffix = name.strip_prefix(TRADE_COLUMN_PREFIX)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse::<u32>().ok().filter(|n| *n >= 1)
}

/// Parse an ISO date, or the date part of an ISO date-time.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    // "2024-06-18 00:00:00" / "2024-06-18T09:15:00"
    let (head, rest) = value.split_at_checked(10)?;
    if rest.starts_with(' ') || rest.starts_with('T') {
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    } else {
        None
    }
}

fn parse_f64(row: usize, column: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AnalyticsError::malformed_number(row, column, value))
}

fn parse_decimal(row: usize, column: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| AnalyticsError::malformed_number(row, column, value))
}

fn parse_count(row: usize, column: &str, value: &str) -> Result<u32> {
    if let Ok(count) = value.parse::<u32>() {
        return Ok(count);
    }
    // Exported frames sometimes carry integer columns as floats ("3.0")
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) => {
            Ok(v as u32)
        }
        _ => Err(AnalyticsError::malformed_number(row, column, value)),
    }
}

/// Loader for one strategy's daily records.
#[derive(Debug, Clone, Default)]
pub struct RecordSetLoader {
    options: LoaderOptions,
}

impl RecordSetLoader {
    /// Create a loader with the given policy.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Loader policy.
    #[must_use]
    pub const fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Load a record set from an in-memory byte buffer.
    ///
    /// # Errors
    ///
    /// Fails fast with the first [`AnalyticsError`] encountered; no partial
    /// record set is returned.
    pub fn load(&self, strategy_id: &str, bytes: &[u8]) -> Result<RecordSet> {
        self.load_reader(strategy_id, bytes)
    }

    /// Load a record set from any reader.
    ///
    /// # Errors
    ///
    /// Same as [`RecordSetLoader::load`].
    pub fn load_reader<R: Read>(&self, strategy_id: &str, reader: R) -> Result<RecordSet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let layout = ColumnLayout::from_headers(csv_reader.headers()?)?;
        debug!(
            strategy = strategy_id,
            params = layout.params.len(),
            trade_slots = layout.trades.len(),
            "Resolved column layout"
        );
        let missing = layout.missing_known_parameters();
        if !missing.is_empty() {
            debug!(strategy = strategy_id, ?missing, "Known parameter columns absent");
        }

        let mut days = Vec::new();
        let mut warnings = Vec::new();

        for (idx, record) in csv_reader.records().enumerate() {
            let row = idx + 1;
            if row > self.options.max_rows {
                return Err(AnalyticsError::InputTooLarge {
                    max_rows: self.options.max_rows,
                });
            }

            let record = record?;
            let day = parse_row(row, &layout, &record)?;

            let recorded = day.trade_returns.len();
            if recorded > day.trade_count as usize {
                let issue = DataQualityIssue::TradeCountMismatch {
                    declared: day.trade_count,
                    recorded,
                };
                warn!(strategy = strategy_id, date = %day.date, row, "{issue}");
                warnings.push(DataQualityWarning {
                    date: day.date,
                    issue,
                });
            }

            days.push(day);
        }

        if days.is_empty() && !self.options.allow_empty {
            return Err(AnalyticsError::EmptyInput);
        }

        let record_set = RecordSet::assemble(
            strategy_id.to_string(),
            days,
            layout.parameter_names(),
            warnings,
        )?;

        info!(
            strategy = strategy_id,
            days = record_set.len(),
            warnings = record_set.warnings().len(),
            "Loaded record set"
        );

        Ok(record_set)
    }
}

fn parse_row(row: usize, layout: &ColumnLayout, record: &csv::StringRecord) -> Result<TradeDay> {
    let cell = |idx: usize| record.get(idx).unwrap_or("");

    let date_cell = cell(layout.date);
    let date = parse_date(date_cell).ok_or_else(|| AnalyticsError::MalformedDate {
        row,
        value: date_cell.to_string(),
    })?;

    let profit_cell = cell(layout.profit);
    let profit = parse_decimal(row, PROFIT_COLUMN, profit_cell)?;
    if profit.abs() > MAX_PROFIT_MAGNITUDE {
        return Err(AnalyticsError::malformed_number(row, PROFIT_COLUMN, profit_cell));
    }
    let pnl_percentage = parse_f64(row, PNL_PERCENTAGE_COLUMN, cell(layout.pnl_percentage))?;

    let capital_cell = cell(layout.trade_capital);
    let trade_capital = parse_decimal(row, TRADE_CAPITAL_COLUMN, capital_cell)?;
    if trade_capital < Decimal::ZERO {
        return Err(AnalyticsError::malformed_number(
            row,
            TRADE_CAPITAL_COLUMN,
            capital_cell,
        ));
    }

    let trade_count = parse_count(row, TRADE_COUNT_COLUMN, cell(layout.trade_count))?;

    let mut strategy_params = StrategyParams::new();
    for (idx, name) in &layout.params {
        let value = cell(*idx);
        let parsed = if value.is_empty() {
            None
        } else {
            Some(parse_f64(row, name, value)?)
        };
        strategy_params.push(name.clone(), parsed);
    }

    let mut trade_returns = Vec::new();
    for (slot, idx) in &layout.trades {
        let value = cell(*idx);
        if value.is_empty() {
            continue;
        }
        let column = format!("{TRADE_COLUMN_PREFIX}{slot}");
        trade_returns.push(TradeReturn {
            slot: *slot,
            return_pct: parse_f64(row, &column, value)?,
        });
    }

    Ok(TradeDay {
        date,
        profit,
        pnl_percentage,
        trade_capital,
        strategy_params,
        trade_count,
        trade_returns,
    })
}

/// Load with default options.
///
/// # Errors
///
/// See [`RecordSetLoader::load`].
pub fn load_record_set(strategy_id: &str, bytes: &[u8]) -> Result<RecordSet> {
    RecordSetLoader::default().load(strategy_id, bytes)
}
