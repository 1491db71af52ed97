//! Multi-strategy comparison executor using Rayon.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{Level, debug, info, span, warn};

use crate::config::{ComparatorConfig, Config};
use crate::error::Result;
use crate::metrics::{MetricsEngine, MetricsReport};
use crate::records::{FilterCriteria, LoaderOptions, RecordSet, RecordSetLoader, filter};

use super::result::{ComparisonEntry, ComparisonOutcome, ComparisonTable};
use super::types::StrategySource;

/// Runs the metrics engine over several strategies independently.
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    config: ComparatorConfig,
    engine: MetricsEngine,
    loader: RecordSetLoader,
}

impl Comparator {
    /// Create a comparator.
    #[must_use]
    pub const fn new(
        config: ComparatorConfig,
        engine: MetricsEngine,
        loader: RecordSetLoader,
    ) -> Self {
        Self {
            config,
            engine,
            loader,
        }
    }

    /// Build from the full configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.comparator.clone(),
            MetricsEngine::from_config(&config.metrics),
            RecordSetLoader::new(LoaderOptions::from(&config.data)),
        )
    }

    /// Comparator settings.
    #[must_use]
    pub const fn config(&self) -> &ComparatorConfig {
        &self.config
    }

    /// Compute a report for every already-loaded record set.
    #[must_use]
    pub fn compare(&self, record_sets: &[RecordSet]) -> ComparisonTable {
        self.run(record_sets, |rs| {
            let _span = span!(Level::DEBUG, "compare_job", strategy_id = %rs.strategy_id()).entered();
            let report = self.engine.compute(rs);
            debug!(days = report.day_count, "Computed metrics");
            ComparisonEntry {
                strategy_id: rs.strategy_id().to_string(),
                outcome: ComparisonOutcome::Ok(Box::new(report)),
            }
        })
    }

    /// Load, filter, and compute each source, isolating failures.
    ///
    /// A source that fails to load or filter becomes a failed entry; the
    /// other strategies are unaffected.
    #[must_use]
    pub fn compare_sources(
        &self,
        sources: &[StrategySource],
        criteria: &FilterCriteria,
    ) -> ComparisonTable {
        self.run(sources, |source| {
            let _span =
                span!(Level::DEBUG, "compare_job", strategy_id = %source.strategy_id).entered();
            let outcome = match self.evaluate(source, criteria) {
                Ok(report) => ComparisonOutcome::Ok(Box::new(report)),
                Err(err) => {
                    warn!(
                        strategy_id = %source.strategy_id,
                        kind = %err.kind(),
                        error = %err,
                        "Strategy failed"
                    );
                    err.into()
                }
            };
            ComparisonEntry {
                strategy_id: source.strategy_id.clone(),
                outcome,
            }
        })
    }

    fn evaluate(&self, source: &StrategySource, criteria: &FilterCriteria) -> Result<MetricsReport> {
        let record_set = self.loader.load(&source.strategy_id, &source.bytes)?;
        let filtered = filter(&record_set, criteria)?;
        debug!(
            loaded = record_set.len(),
            kept = filtered.len(),
            "Filtered record set"
        );
        Ok(self.engine.compute(&filtered))
    }

    /// Dispatch jobs sequentially or in parallel; output order is input order.
    fn run<T, F>(&self, jobs: &[T], job: F) -> ComparisonTable
    where
        T: Sync,
        F: Fn(&T) -> ComparisonEntry + Sync + Send,
    {
        if jobs.is_empty() {
            return ComparisonTable::default();
        }

        let start = Instant::now();
        let parallel = jobs.len() >= self.config.min_parallel_jobs;

        info!(
            jobs = jobs.len(),
            parallel,
            threads = self.effective_thread_count(),
            "Starting comparison"
        );

        let entries: Vec<ComparisonEntry> = if parallel {
            self.run_parallel(jobs, &job)
        } else {
            jobs.iter().map(&job).collect()
        };

        let table = ComparisonTable::new(entries);
        info!(
            succeeded = table.successful().len(),
            failed = table.failed().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Comparison complete"
        );
        table
    }

    fn run_parallel<T, F>(&self, jobs: &[T], job: &F) -> Vec<ComparisonEntry>
    where
        T: Sync,
        F: Fn(&T) -> ComparisonEntry + Sync + Send,
    {
        if self.config.max_threads > 0 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.max_threads)
                .build()
            {
                Ok(pool) => return pool.install(|| jobs.par_iter().map(job).collect()),
                Err(e) => {
                    warn!(error = %e, "Failed to build dedicated thread pool, using global pool");
                }
            }
        }
        jobs.par_iter().map(job).collect()
    }

    /// Get effective thread count.
    #[must_use]
    pub fn effective_thread_count(&self) -> usize {
        if self.config.max_threads > 0 {
            self.config.max_threads
        } else {
            rayon::current_num_threads()
        }
    }
}

/// Compare already-loaded record sets with default settings.
#[must_use]
pub fn compare(record_sets: &[RecordSet]) -> ComparisonTable {
    Comparator::default().compare(record_sets)
}

/// Load, filter, and compare raw sources with default settings.
#[must_use]
pub fn compare_sources(sources: &[StrategySource], criteria: &FilterCriteria) -> ComparisonTable {
    Comparator::default().compare_sources(sources, criteria)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::error::ErrorKind;

    const HEADER: &str = "Date,Profit,Pnl_Percentage,Trade_Capital,No_of_Trades,Trade_1\n";

    fn good_csv(offset: i64) -> String {
        let mut csv = HEADER.to_string();
        for day in 1..=9 {
            let profit = (day * 7 + offset) % 23 - 9;
            csv.push_str(&format!(
                "2024-02-{day:02},{profit},{:.2},10000,1,{:.2}\n",
                profit as f64 / 100.0,
                profit as f64 / 50.0
            ));
        }
        csv
    }

    fn malformed_csv() -> String {
        format!("{HEADER}2024-02-01,10,0.1,1000,1,0.1\nnot-a-date,5,0.05,1000,1,0.05\n")
    }

    fn sequential() -> Comparator {
        Comparator::new(
            ComparatorConfig {
                max_threads: 0,
                min_parallel_jobs: usize::MAX,
            },
            MetricsEngine::default(),
            RecordSetLoader::default(),
        )
    }

    fn parallel(max_threads: usize) -> Comparator {
        Comparator::new(
            ComparatorConfig {
                max_threads,
                min_parallel_jobs: 1,
            },
            MetricsEngine::default(),
            RecordSetLoader::default(),
        )
    }

    #[test]
    fn test_malformed_date_is_isolated() {
        let sources = vec![
            StrategySource::new("bad", malformed_csv()),
            StrategySource::new("good", good_csv(0)),
        ];
        let table = compare_sources(&sources, &FilterCriteria::new());

        assert_eq!(table.len(), 2);
        let ids: Vec<&str> = table.entries().iter().map(|e| e.strategy_id.as_str()).collect();
        assert_eq!(ids, vec!["bad", "good"]);

        match &table.entries()[0].outcome {
            ComparisonOutcome::Failed { kind, .. } => assert_eq!(*kind, ErrorKind::MalformedDate),
            ComparisonOutcome::Ok(_) => panic!("malformed source should fail"),
        }
        let Some(report) = table.entries()[1].report() else {
            panic!("good source should succeed");
        };
        assert_eq!(report.day_count, 9);
    }

    #[test]
    fn test_filter_applies_to_every_source() {
        let sources = vec![
            StrategySource::new("a", good_csv(0)),
            StrategySource::new("b", good_csv(5)),
        ];
        let from = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        let table = sequential().compare_sources(&sources, &FilterCriteria::new().from(from).to(to));

        for report in table.successful() {
            assert_eq!(report.day_count, 3);
        }
        assert_eq!(table.successful().len(), 2);
    }

    #[test]
    fn test_inverted_range_fails_each_entry() {
        let sources = vec![StrategySource::new("a", good_csv(0))];
        let from = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();
        let table = compare_sources(&sources, &FilterCriteria::new().from(from).to(to));

        assert_eq!(table.failed().len(), 1);
        assert!(matches!(
            table.entries()[0].outcome,
            ComparisonOutcome::Failed {
                kind: ErrorKind::InvalidRange,
                ..
            }
        ));
    }

    #[test]
    fn test_sequential_and_parallel_identical() {
        let sources: Vec<StrategySource> = (0..8)
            .map(|i| {
                if i == 3 {
                    StrategySource::new(format!("s{i}"), malformed_csv())
                } else {
                    StrategySource::new(format!("s{i}"), good_csv(i))
                }
            })
            .collect();
        let criteria = FilterCriteria::new();

        let seq = serde_json::to_value(sequential().compare_sources(&sources, &criteria)).unwrap();
        let par = serde_json::to_value(parallel(0).compare_sources(&sources, &criteria)).unwrap();
        let pool = serde_json::to_value(parallel(2).compare_sources(&sources, &criteria)).unwrap();

        assert_eq!(seq, par);
        assert_eq!(seq, pool);
    }

    #[test]
    fn test_compare_loaded_record_sets() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let a = RecordSet::from_days(
            "a",
            vec![crate::records::TradeDay::new(start, dec!(5), 0.5)],
        )
        .unwrap();
        let b = RecordSet::empty("b");

        let table = compare(&[a, b]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.successful().len(), 2);
        assert_eq!(table.entries()[0].strategy_id, "a");
        assert!(table.entries()[1].report().is_some_and(MetricsReport::is_empty));
    }

    #[test]
    fn test_extreme_profits_do_not_abort_other_strategies() {
        let oversized = format!(
            "{HEADER}2024-02-01,70000000000000000000000000000,0.1,1000,1,0.1\n\
             2024-02-02,70000000000000000000000000000,0.1,1000,1,0.1\n"
        );
        let tiny_peak = format!(
            "{HEADER}2024-02-01,0.0000001,0.1,1000,1,0.1\n\
             2024-02-02,-1000000000000000,-0.1,1000,1,-0.1\n"
        );
        let sources = vec![
            StrategySource::new("oversized", oversized),
            StrategySource::new("tiny_peak", tiny_peak),
            StrategySource::new("good", good_csv(0)),
        ];

        for comparator in [sequential(), parallel(0)] {
            let table = comparator.compare_sources(&sources, &FilterCriteria::new());

            assert_eq!(table.len(), 3);
            assert!(matches!(
                table.entries()[0].outcome,
                ComparisonOutcome::Failed {
                    kind: ErrorKind::MalformedNumber,
                    ..
                }
            ));
            let Some(tiny) = table.entries()[1].report() else {
                panic!("tiny peak source should succeed");
            };
            assert!(tiny.max_drawdown_pct.is_finite());
            assert!(table.entries()[2].report().is_some_and(|r| r.day_count == 9));
        }

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let huge = dec!(70000000000000000000000000000);
        let saturating = RecordSet::from_days(
            "saturating",
            vec![
                crate::records::TradeDay::new(start, huge, 0.1),
                crate::records::TradeDay::new(start + chrono::Days::new(1), huge, 0.1),
            ],
        )
        .unwrap();
        let table = compare(&[saturating, RecordSet::empty("empty")]);
        assert_eq!(table.successful().len(), 2);
    }

    #[test]
    fn test_empty_input_yields_empty_table() {
        assert!(compare(&[]).is_empty());
        assert!(compare_sources(&[], &FilterCriteria::new()).is_empty());
    }

    #[test]
    fn test_effective_thread_count() {
        assert_eq!(parallel(3).effective_thread_count(), 3);
        assert!(parallel(0).effective_thread_count() >= 1);
    }
}
