//! Poll store configuration

use crate::aggregate::AggregationMode;

/// Category assigned to polls created without one
pub const DEFAULT_CATEGORY: &str = "General";

/// Poll store configuration options
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// How per-option distributions are derived
    pub aggregation: AggregationMode,

    /// Category used when a create request omits it
    pub default_category: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            aggregation: AggregationMode::FullScan,
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Set the aggregation mode
    pub fn aggregation(mut self, mode: AggregationMode) -> Self {
        self.aggregation = mode;
        self
    }

    /// Set the default category
    pub fn default_category(mut self, category: impl Into<String>) -> Self {
        self.default_category = category.into();
        self
    }
}
