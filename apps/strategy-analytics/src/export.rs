//! Delimited-text and JSON export of record sets and reports.
//!
//! The exporter only formats values it is given; it never recomputes a
//! metric.

use rust_decimal::Decimal;
use tracing::info;

use crate::comparator::{ComparisonOutcome, ComparisonTable};
use crate::config::ExportConfig;
use crate::error::{AnalyticsError, Result};
use crate::metrics::MetricsReport;
use crate::records::{
    DATE_COLUMN, PNL_PERCENTAGE_COLUMN, PROFIT_COLUMN, RecordSet, TRADE_CAPITAL_COLUMN,
    TRADE_COLUMN_PREFIX, TRADE_COUNT_COLUMN, TradeDay,
};

/// Marker row that opens the summary block.
pub const SUMMARY_MARKER: &str = "# Summary";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default file name for a filtered export.
#[must_use]
pub fn export_file_name(strategy_id: &str) -> String {
    format!("{strategy_id}_filtered.csv")
}

/// Serialize a full report as pretty JSON. NaN metrics become `null`.
///
/// # Errors
///
/// Returns [`AnalyticsError::ExportFailed`] if serialization fails.
pub fn report_to_json(report: &MetricsReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| AnalyticsError::ExportFailed(e.to_string()))
}

/// Writes record sets and reports as delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exporter {
    delimiter: u8,
}

impl Default for Exporter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl Exporter {
    /// Create an exporter with the given field delimiter.
    #[must_use]
    pub const fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Create an exporter from the `export` config section.
    #[must_use]
    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.delimiter_byte().unwrap_or(b','))
    }

    /// Field delimiter.
    #[must_use]
    pub const fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Export the rows of a record set followed by the report's summary block.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::ExportFailed`] if the writer fails.
    pub fn export(&self, record_set: &RecordSet, report: &MetricsReport) -> Result<String> {
        let mut out = self.rows(record_set)?;
        out.push('\n');
        out.push_str(&self.summary(report)?);

        info!(
            strategy_id = %record_set.strategy_id(),
            rows = record_set.len(),
            "Exported record set"
        );
        Ok(out)
    }

    /// Export a comparison table, one summary row per strategy.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::ExportFailed`] if the writer fails.
    pub fn export_comparison(&self, table: &ComparisonTable) -> Result<String> {
        let mut wtr = self.writer();
        let mut header = vec!["Strategy", "Status"];
        header.extend(SCALAR_LABELS);
        header.push("Error");
        write(&mut wtr, &header)?;

        for entry in table.entries() {
            let mut record = vec![entry.strategy_id.clone()];
            match &entry.outcome {
                ComparisonOutcome::Ok(report) => {
                    record.push("OK".to_string());
                    record.extend(scalar_values(report));
                    record.push(String::new());
                }
                ComparisonOutcome::Failed { kind, message } => {
                    record.push(kind.reason().to_string());
                    record.extend(std::iter::repeat_n(String::new(), SCALAR_LABELS.len()));
                    record.push(message.clone());
                }
            }
            write(&mut wtr, &record)?;
        }

        finish(wtr)
    }

    fn rows(&self, record_set: &RecordSet) -> Result<String> {
        let params = record_set.parameter_names();
        let max_slot = record_set.max_trade_slot();

        let mut wtr = self.writer();
        let mut header: Vec<String> = [
            DATE_COLUMN,
            PROFIT_COLUMN,
            PNL_PERCENTAGE_COLUMN,
            TRADE_CAPITAL_COLUMN,
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
        header.extend(params.iter().cloned());
        header.push(TRADE_COUNT_COLUMN.to_string());
        header.extend((1..=max_slot).map(|n| format!("{TRADE_COLUMN_PREFIX}{n}")));
        write(&mut wtr, &header)?;

        for day in record_set.days() {
            write(&mut wtr, &day_record(day, params, max_slot))?;
        }

        finish(wtr)
    }

    fn summary(&self, report: &MetricsReport) -> Result<String> {
        let mut wtr = self.writer();
        write(&mut wtr, &[SUMMARY_MARKER])?;
        write(&mut wtr, &["Metric", "Value"])?;
        for (label, value) in SCALAR_LABELS.iter().zip(scalar_values(report)) {
            write(&mut wtr, &[(*label).to_string(), value])?;
        }
        finish(wtr)
    }

    fn writer(&self) -> csv::Writer<Vec<u8>> {
        csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_writer(Vec::new())
    }
}

const SCALAR_LABELS: [&str; 12] = [
    "Total Profit",
    "Total Pnl Percentage",
    "Average Trades Per Day",
    "Win Rate",
    "Sharpe Ratio",
    "Sortino Ratio",
    "Max Drawdown",
    "Max Drawdown Percentage",
    "Max Drawdown Duration",
    "Trading Days",
    "First Date",
    "Last Date",
];

fn scalar_values(report: &MetricsReport) -> Vec<String> {
    let date = |d: Option<chrono::NaiveDate>| {
        d.map_or_else(String::new, |d| d.format(DATE_FORMAT).to_string())
    };
    vec![
        money(report.total_profit),
        report.total_pnl_percentage.to_string(),
        report.avg_trades_per_day.to_string(),
        report.win_rate.to_string(),
        report.sharpe_ratio.to_string(),
        report.sortino_ratio.to_string(),
        money(report.max_drawdown),
        report.max_drawdown_pct.to_string(),
        report.max_drawdown_duration.to_string(),
        report.day_count.to_string(),
        date(report.first_date),
        date(report.last_date),
    ]
}

fn day_record(day: &TradeDay, params: &[String], max_slot: u32) -> Vec<String> {
    let mut record = vec![
        day.date.format(DATE_FORMAT).to_string(),
        money(day.profit),
        day.pnl_percentage.to_string(),
        money(day.trade_capital),
    ];
    record.extend(
        params
            .iter()
            .map(|name| day.strategy_params.get(name).map_or_else(String::new, |v| v.to_string())),
    );
    record.push(day.trade_count.to_string());
    record.extend((1..=max_slot).map(|slot| {
        day.trade_returns
            .iter()
            .find(|t| t.slot == slot)
            .map_or_else(String::new, |t| t.return_pct.to_string())
    }));
    record
}

fn money(value: Decimal) -> String {
    value.normalize().to_string()
}

fn write<I, T>(wtr: &mut csv::Writer<Vec<u8>>, record: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    wtr.write_record(record)
        .map_err(|e| AnalyticsError::ExportFailed(e.to_string()))
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr
        .into_inner()
        .map_err(|e| AnalyticsError::ExportFailed(e.to_string()))?;
    String::from_utf8(data).map_err(|e| AnalyticsError::ExportFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::comparator::{StrategySource, compare_sources};
    use crate::metrics::compute;
    use crate::records::{FilterCriteria, StrategyParams, TradeReturn};

    fn sample() -> RecordSet {
        let d1 = NaiveDate::from_ymd_opt(2024, 6, 17).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 6, 18).unwrap();
        let days = vec![
            TradeDay::new(d1, dec!(100.50), 0.2)
                .with_capital(dec!(50000))
                .with_params(
                    StrategyParams::new()
                        .with("Index_Distance", Some(150.0))
                        .with("Trailing_Percaentage", None),
                )
                .with_trades(
                    2,
                    vec![
                        TradeReturn { slot: 1, return_pct: 0.1 },
                        TradeReturn { slot: 2, return_pct: 0.1 },
                    ],
                ),
            TradeDay::new(d2, dec!(-20), -0.04)
                .with_capital(dec!(50000))
                .with_params(
                    StrategyParams::new()
                        .with("Index_Distance", None)
                        .with("Trailing_Percaentage", Some(0.5)),
                )
                .with_trades(2, vec![TradeReturn { slot: 2, return_pct: -0.04 }]),
        ];
        RecordSet::from_days("alpha", days).unwrap()
    }

    #[test]
    fn test_row_layout() {
        let rs = sample();
        let out = Exporter::default().export(&rs, &compute(&rs)).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(
            lines[0],
            "Date,Profit,Pnl_Percentage,Trade_Capital,Index_Distance,Trailing_Percaentage,No_of_Trades,Trade_1,Trade_2"
        );
        assert_eq!(lines[1], "2024-06-17,100.5,0.2,50000,150,,2,0.1,0.1");
        assert_eq!(lines[2], "2024-06-18,-20,-0.04,50000,,0.5,2,,-0.04");
    }

    #[test]
    fn test_summary_block() {
        let rs = sample();
        let out = Exporter::default().export(&rs, &compute(&rs)).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[3], "");
        assert_eq!(lines[4], SUMMARY_MARKER);
        assert_eq!(lines[5], "Metric,Value");
        assert_eq!(lines[6], "Total Profit,80.5");
        assert!(lines.contains(&"Max Drawdown,20"));
        assert!(lines.contains(&"Max Drawdown Duration,1"));
        assert!(lines.contains(&"Trading Days,2"));
        assert!(lines.contains(&"First Date,2024-06-17"));
        // One negative day: Sortino is undefined.
        assert!(lines.contains(&"Sortino Ratio,NaN"));
        assert_eq!(lines.len(), 6 + SCALAR_LABELS.len());
    }

    #[test]
    fn test_empty_record_set_export() {
        let rs = RecordSet::empty("none");
        let out = Exporter::default().export(&rs, &compute(&rs)).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Date,Profit,Pnl_Percentage,Trade_Capital,No_of_Trades");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], SUMMARY_MARKER);
        assert!(lines.contains(&"Win Rate,NaN"));
        assert!(lines.contains(&"First Date,"));
    }

    #[test]
    fn test_custom_delimiter() {
        let rs = sample();
        let out = Exporter::new(b';').export(&rs, &compute(&rs)).unwrap();
        assert!(out.starts_with("Date;Profit;Pnl_Percentage;Trade_Capital;"));
        assert!(out.contains("Metric;Value"));
    }

    #[test]
    fn test_from_config_delimiter() {
        let config = ExportConfig {
            delimiter: "\t".to_string(),
            output_dir: "out".to_string(),
        };
        assert_eq!(Exporter::from_config(&config).delimiter(), b'\t');
    }

    #[test]
    fn test_export_comparison() {
        let good = "Date,Profit,Pnl_Percentage,Trade_Capital,No_of_Trades\n2024-01-02,10,0.1,1000,1\n";
        let bad = "Date,Profit,Pnl_Percentage,Trade_Capital,No_of_Trades\n2024-13-02,10,0.1,1000,1\n";
        let table = compare_sources(
            &[StrategySource::new("good", good), StrategySource::new("bad", bad)],
            &FilterCriteria::new(),
        );

        let out = Exporter::default().export_comparison(&table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Strategy,Status,Total Profit,"));
        assert!(lines[1].starts_with("good,OK,10,"));
        assert!(lines[2].starts_with("bad,MALFORMED_DATE,"));
        assert!(lines[2].contains("malformed date"));
    }

    #[test]
    fn test_report_to_json() {
        let rs = sample();
        let json = report_to_json(&compute(&rs)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["strategy_id"], "alpha");
        assert_eq!(value["day_count"], 2);
        assert!(value["sortino_ratio"].is_null());
        assert_eq!(value["weekday_profit"].as_array().map(Vec::len), Some(7));
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("alpha"), "alpha_filtered.csv");
    }
}
