//! End-to-end pipeline tests: file → loader → filter → engine → exporter.

#![allow(clippy::unwrap_used)]

use std::fs;

use chrono::{NaiveDate, Weekday};
use rust_decimal_macros::dec;

use strategy_analytics::comparator::{Comparator, StrategySource};
use strategy_analytics::config::load_config;
use strategy_analytics::export::SUMMARY_MARKER;
use strategy_analytics::records::{FilterCriteria, LoaderOptions, RecordSetLoader};
use strategy_analytics::{
    ErrorKind, Exporter, MetricsEngine, compute, export_file_name, filter, load_record_set,
};

const ALPHA: &str = "\
Date,Profit,Pnl_Percentage,Trade_Capital,Index_Distance,Profit_booking_Morning,No_of_Trades,Trade_1,Trade_2
2024-03-04,100.0,0.2,50000,150,0.4,2,0.12,0.08
2024-03-05,150.0,0.3,50000,150,,1,0.3,
2024-03-06,-50.0,-0.1,50000,,0.4,2,-0.05,-0.05
2024-03-11,25.5,0.05,50000,200,0.5,1,0.05,
";

#[test]
fn test_file_round_trip_through_export() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("alpha.csv");
    fs::write(&input, ALPHA).unwrap();

    let bytes = fs::read(&input).unwrap();
    let records = load_record_set("alpha", &bytes).unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(
        records.parameter_names(),
        ["Index_Distance", "Profit_booking_Morning"]
    );

    let report = compute(&records);
    let text = Exporter::default().export(&records, &report).unwrap();

    let output = dir.path().join(export_file_name("alpha"));
    fs::write(&output, &text).unwrap();
    let written = fs::read_to_string(&output).unwrap();

    // The rows section re-loads to the same days.
    let (rows, summary) = written.split_once("\n\n").unwrap();
    let reloaded = load_record_set("alpha", rows.as_bytes()).unwrap();
    assert_eq!(reloaded.days(), records.days());
    assert_eq!(reloaded.parameter_names(), records.parameter_names());

    let summary: Vec<&str> = summary.lines().collect();
    assert_eq!(summary[0], SUMMARY_MARKER);
    assert_eq!(summary[1], "Metric,Value");
    assert!(summary.contains(&"Total Profit,225.5"));
    assert!(summary.contains(&"Max Drawdown,50"));
    assert!(summary.contains(&"Trading Days,4"));
}

#[test]
fn test_three_day_scenario_from_text() {
    let text = "\
Date,Profit,Pnl_Percentage,Trade_Capital,No_of_Trades
2024-01-01,100.0,0.2,10000,1
2024-01-02,150.0,0.3,10000,1
2024-01-03,-50.0,-0.1,10000,1
";
    let report = compute(&load_record_set("three", text.as_bytes()).unwrap());

    assert_eq!(report.total_profit, dec!(200));
    assert!((report.win_rate - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(
        report.cumulative_values(),
        vec![dec!(100), dec!(250), dec!(200)]
    );
    assert_eq!(report.max_drawdown, dec!(50));
    assert_eq!(report.max_drawdown_duration, 1);
}

#[test]
fn test_weekday_filter_pipeline() {
    let records = load_record_set("alpha", ALPHA.as_bytes()).unwrap();
    let criteria = FilterCriteria::new()
        .weekday_labels(&["Monday"])
        .unwrap();
    let mondays = filter(&records, &criteria).unwrap();

    // 2024-03-04 and 2024-03-11 are Mondays.
    assert_eq!(mondays.len(), 2);
    let report = compute(&mondays);
    assert_eq!(report.total_profit, dec!(125.5));
    assert_eq!(report.profit_on(Weekday::Mon), dec!(125.5));
    assert_eq!(report.profit_on(Weekday::Tue), dec!(0));

    let index = &report.parameter_means[0];
    assert_eq!(index.name, "Index_Distance");
    assert_eq!(index.observations, 2);
    assert!((index.mean - 175.0).abs() < f64::EPSILON);
}

#[test]
fn test_empty_file_policy() {
    let header_only = "Date,Profit,Pnl_Percentage,Trade_Capital,No_of_Trades\n";

    let err = load_record_set("empty", header_only.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);

    let loader = RecordSetLoader::new(LoaderOptions {
        allow_empty: true,
        ..LoaderOptions::default()
    });
    let records = loader.load("empty", header_only.as_bytes()).unwrap();
    let report = compute(&records);
    assert!(report.is_empty());
    assert!(report.sharpe_ratio.is_nan());
    assert_eq!(report.weekday_profit.len(), 7);
}

#[test]
fn test_config_file_drives_components() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        r#"
data:
  allow_empty: true
metrics:
  periods_per_year: 365
comparator:
  min_parallel_jobs: 1
  max_threads: 2
export:
  delimiter: ";"
"#,
    )
    .unwrap();

    let config = load_config(Some(path.to_str().unwrap())).unwrap();
    let engine = MetricsEngine::from_config(&config.metrics);
    assert!((engine.periods_per_year() - 365.0).abs() < f64::EPSILON);

    let sources = vec![
        StrategySource::new("alpha", ALPHA),
        StrategySource::new(
            "empty",
            "Date,Profit,Pnl_Percentage,Trade_Capital,No_of_Trades\n",
        ),
        StrategySource::new("broken", "Date,Profit\n2024-01-01,1\n"),
    ];
    let from = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let table = Comparator::from_config(&config)
        .compare_sources(&sources, &FilterCriteria::new().from(from));

    assert_eq!(table.len(), 3);
    assert_eq!(table.successful().len(), 2);
    assert!(table.get("empty").is_some_and(|e| e.is_ok()));
    assert_eq!(table.failed()[0].strategy_id, "broken");

    let Some(alpha) = table.get("alpha").and_then(|e| e.report()) else {
        panic!("alpha should succeed");
    };
    assert_eq!(alpha.day_count, 3);

    let csv = Exporter::from_config(&config.export)
        .export_comparison(&table)
        .unwrap();
    assert!(csv.starts_with("Strategy;Status;"));
    assert!(csv.contains("broken;MISSING_COLUMN;"));
}

#[test]
fn test_semicolon_export_reloads_through_config() {
    let config = strategy_analytics::load_config_from_string(
        r#"
data:
  delimiter: ";"
export:
  delimiter: ";"
"#,
    )
    .unwrap();

    let records = load_record_set("alpha", ALPHA.as_bytes()).unwrap();
    let report = compute(&records);
    let text = Exporter::from_config(&config.export)
        .export(&records, &report)
        .unwrap();
    let (rows, _) = text.split_once("\n\n").unwrap();
    assert!(rows.starts_with("Date;Profit;"));

    let loader = RecordSetLoader::new(LoaderOptions::from(&config.data));
    let reloaded = loader.load("alpha", rows.as_bytes()).unwrap();
    assert_eq!(reloaded.days(), records.days());
}
