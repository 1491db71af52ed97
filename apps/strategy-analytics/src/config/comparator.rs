//! Parallelism settings for multi-strategy comparison.

use serde::{Deserialize, Serialize};

/// Comparator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparatorConfig {
    /// Worker threads for a dedicated pool. 0 uses the global rayon pool.
    #[serde(default)]
    pub max_threads: usize,
    /// Run sequentially below this many strategies.
    #[serde(default = "default_min_parallel_jobs")]
    pub min_parallel_jobs: usize,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            min_parallel_jobs: default_min_parallel_jobs(),
        }
    }
}

const fn default_min_parallel_jobs() -> usize {
    4
}
