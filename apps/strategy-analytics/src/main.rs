//! Strategy Analytics Binary
//!
//! Computes performance metrics for strategies stored as one delimited file
//! per strategy in the configured data directory.
//!
//! # Usage
//!
//! ```bash
//! # Summary for one strategy (data/alpha.csv), Mondays and Fridays in 2024
//! strategy-analytics summary alpha --from 2024-01-01 --to 2024-12-31 --weekday Monday,Friday
//!
//! # Compare every strategy in the data directory
//! strategy-analytics compare --output exports/comparison.csv
//!
//! # Export filtered rows plus summary (exports/alpha_filtered.csv)
//! strategy-analytics --config config.yaml export alpha --from 2024-06-01
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter, overrides `observability.logging.level`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use strategy_analytics::config::{Config, load_config};
use strategy_analytics::metrics::{format_money, format_pct, format_ratio, weekday_name};
use strategy_analytics::telemetry::init_tracing;
use strategy_analytics::{
    Comparator, ComparisonOutcome, ComparisonTable, Exporter, FilterCriteria, LoaderOptions,
    MetricsEngine, MetricsReport, RecordSet, RecordSetLoader, StrategySource, export_file_name,
    filter, report_to_json,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "strategy-analytics")]
#[command(about = "Performance and risk metrics for algorithmic trading strategies", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a YAML config file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the metrics report for one strategy
    Summary {
        /// Strategy identifier (file stem in the data directory)
        strategy: String,

        #[command(flatten)]
        filter: FilterArgs,

        /// Print the full report as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Compare every strategy in the data directory
    Compare {
        #[command(flatten)]
        filter: FilterArgs,

        /// Also write the comparison table to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write filtered rows and the summary block as delimited text
    Export {
        /// Strategy identifier (file stem in the data directory)
        strategy: String,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output path (default: <export.output_dir>/<strategy>_filtered.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Start date, inclusive (YYYY-MM-DD)
    #[arg(short = 'f', long)]
    from: Option<NaiveDate>,

    /// End date, inclusive (YYYY-MM-DD)
    #[arg(short, long)]
    to: Option<NaiveDate>,

    /// Weekdays to keep (e.g. Monday,Friday or All)
    #[arg(short, long, value_delimiter = ',')]
    weekday: Vec<String>,
}

impl FilterArgs {
    fn criteria(&self) -> Result<FilterCriteria> {
        let criteria = FilterCriteria::new().between(self.from, self.to);
        if self.weekday.is_empty() {
            return Ok(criteria);
        }
        Ok(criteria.weekday_labels(self.weekday.as_slice())?)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => load_config(Some(path)).with_context(|| format!("loading {path}"))?,
        None => Config::default(),
    };
    init_tracing(&config.observability.logging).context("initializing tracing")?;

    match cli.command {
        Commands::Summary {
            strategy,
            filter,
            json,
        } => run_summary(&config, &strategy, &filter, json),
        Commands::Compare { filter, output } => run_compare(&config, &filter, output.as_deref()),
        Commands::Export {
            strategy,
            filter,
            output,
        } => run_export(&config, &strategy, &filter, output),
    }
}

fn run_summary(config: &Config, strategy: &str, args: &FilterArgs, json: bool) -> Result<()> {
    let (_, report) = load_and_compute(config, strategy, args)?;
    if json {
        println!("{}", report_to_json(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn run_compare(config: &Config, args: &FilterArgs, output: Option<&Path>) -> Result<()> {
    let criteria = args.criteria()?;
    let sources = read_sources(config)?;
    if sources.is_empty() {
        bail!(
            "no *.{} files found in {}",
            config.data.extension,
            config.data.directory
        );
    }

    let table = Comparator::from_config(config).compare_sources(&sources, &criteria);
    print_table(&table);

    if let Some(path) = output {
        let text = Exporter::from_config(&config.export).export_comparison(&table)?;
        write_file(path, &text)?;
        info!(path = %path.display(), "Wrote comparison table");
    }
    Ok(())
}

fn run_export(
    config: &Config,
    strategy: &str,
    args: &FilterArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    let (filtered, report) = load_and_compute(config, strategy, args)?;
    let text = Exporter::from_config(&config.export).export(&filtered, &report)?;

    let path = output
        .unwrap_or_else(|| Path::new(&config.export.output_dir).join(export_file_name(strategy)));
    write_file(&path, &text)?;
    println!("{}", path.display());
    Ok(())
}

fn load_and_compute(
    config: &Config,
    strategy: &str,
    args: &FilterArgs,
) -> Result<(RecordSet, MetricsReport)> {
    let criteria = args.criteria()?;
    let path = strategy_path(config, strategy);
    let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;

    let loader = RecordSetLoader::new(LoaderOptions::from(&config.data));
    let records = loader
        .load(strategy, &bytes)
        .with_context(|| format!("loading {}", path.display()))?;
    let filtered = filter(&records, &criteria)?;
    let report = MetricsEngine::from_config(&config.metrics).compute(&filtered);
    Ok((filtered, report))
}

fn strategy_path(config: &Config, strategy: &str) -> PathBuf {
    Path::new(&config.data.directory).join(format!("{strategy}.{}", config.data.extension))
}

/// Read every strategy file in the data directory, sorted by file name.
fn read_sources(config: &Config) -> Result<Vec<StrategySource>> {
    let dir = Path::new(&config.data.directory);
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(&config.data.extension))
        })
        .collect();
    paths.sort();

    paths
        .into_iter()
        .filter_map(|path| {
            let stem = path.file_stem()?.to_string_lossy().into_owned();
            Some((stem, path))
        })
        .map(|(stem, path)| {
            let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            Ok(StrategySource::new(stem, bytes))
        })
        .collect()
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn print_report(report: &MetricsReport) {
    println!("Strategy: {}", report.strategy_id);
    match (report.first_date, report.last_date) {
        (Some(first), Some(last)) => {
            println!("Period: {first} to {last} ({} days)", report.day_count);
        }
        _ => println!("Period: no data"),
    }
    println!();
    println!("Total Profit:           {}", format_money(report.total_profit));
    println!("Total P&L %:            {:.2}%", report.total_pnl_percentage);
    println!("Avg Trades / Day:       {}", format_ratio(report.avg_trades_per_day));
    println!("Win Rate:               {}", format_pct(report.win_rate));
    println!("Sharpe Ratio:           {}", format_ratio(report.sharpe_ratio));
    println!("Sortino Ratio:          {}", format_ratio(report.sortino_ratio));
    println!("Max Drawdown:           {}", format_money(report.max_drawdown));
    println!(
        "Max Drawdown %:         {}",
        format_pct(report.max_drawdown_pct / 100.0)
    );
    println!("Max Drawdown Duration:  {} days", report.max_drawdown_duration);

    println!();
    println!("Profit by weekday:");
    for day in &report.weekday_profit {
        println!(
            "  {:<10} {:>14}  ({} days)",
            weekday_name(day.weekday),
            format_money(day.profit),
            day.days
        );
    }

    if report.trade_stats.count > 0 {
        println!();
        println!("Trade returns by position:");
        for slot in &report.slot_stats {
            println!(
                "  Trade_{:<3} n={:<5} mean={:>8} min={:>8} max={:>8} win={}",
                slot.slot,
                slot.stats.count,
                format_ratio(slot.stats.mean),
                format_ratio(slot.stats.min),
                format_ratio(slot.stats.max),
                format_pct(slot.stats.win_rate)
            );
        }
    }

    if !report.parameter_means.is_empty() {
        println!();
        println!("Strategy parameters (mean):");
        for param in &report.parameter_means {
            println!(
                "  {:<32} {:>10}  ({} days)",
                param.name,
                format_ratio(param.mean),
                param.observations
            );
        }
    }
}

fn print_table(table: &ComparisonTable) {
    println!(
        "{:<24} {:>14} {:>9} {:>8} {:>8} {:>14} {:>6}",
        "Strategy", "Profit", "Win %", "Sharpe", "Sortino", "Max DD", "DD d"
    );
    for entry in table.entries() {
        match &entry.outcome {
            ComparisonOutcome::Ok(r) => println!(
                "{:<24} {:>14} {:>9} {:>8} {:>8} {:>14} {:>6}",
                entry.strategy_id,
                format_money(r.total_profit),
                format_pct(r.win_rate),
                format_ratio(r.sharpe_ratio),
                format_ratio(r.sortino_ratio),
                format_money(r.max_drawdown),
                r.max_drawdown_duration
            ),
            ComparisonOutcome::Failed { kind, message } => {
                println!("{:<24} FAILED {kind}: {message}", entry.strategy_id);
            }
        }
    }
    if let Some(best) = table.best_by_sharpe() {
        println!();
        println!("Best by Sharpe: {}", best.strategy_id);
    }
}
