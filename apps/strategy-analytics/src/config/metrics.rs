//! Annualization settings for risk-adjusted ratios.

use serde::{Deserialize, Serialize};

/// Metrics engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Trading periods per year used to annualize Sharpe and Sortino.
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
    /// Annual risk-free rate as a fraction (0.05 = 5%).
    #[serde(default)]
    pub risk_free_rate: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            periods_per_year: default_periods_per_year(),
            risk_free_rate: 0.0,
        }
    }
}

const fn default_periods_per_year() -> u32 {
    252
}
