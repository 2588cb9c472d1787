use serde::{Deserialize, Serialize};

/// Fairness weighting parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeightPolicy {
    /// Selections older than this many days no longer reduce the weight.
    pub recency_window_days: i64,
    /// Fraction of the base weight a just-picked restaurant keeps.
    pub floor_fraction: f64,
    pub base_weight: f64,
}

impl Default for WeightPolicy {
    fn default() -> Self {
        Self {
            recency_window_days: 30,
            floor_fraction: 0.1,
            base_weight: 1.0,
        }
    }
}

/// Engine tuning persisted alongside the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// How many completed decisions to load as weight history.
    pub history_limit: usize,
    pub weights: WeightPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: 100,
            weights: WeightPolicy::default(),
        }
    }
}
