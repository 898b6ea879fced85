//! Fan-out hub configuration

/// Hub configuration options
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Outbound frames buffered per subscriber before it counts as lagged
    pub subscriber_queue_capacity: usize,

    /// Maximum concurrent subscribers (0 = unlimited)
    pub max_subscribers: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            subscriber_queue_capacity: 256,
            max_subscribers: 0, // Unlimited
        }
    }
}

impl HubConfig {
    /// Set the per-subscriber queue capacity (at least 1)
    pub fn subscriber_queue_capacity(mut self, capacity: usize) -> Self {
        self.subscriber_queue_capacity = capacity.max(1);
        self
    }

    /// Set maximum subscribers
    pub fn max_subscribers(mut self, max: usize) -> Self {
        self.max_subscribers = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HubConfig::default();

        assert_eq!(config.subscriber_queue_capacity, 256);
        assert_eq!(config.max_subscribers, 0);
    }

    #[test]
    fn test_builder_queue_capacity_floor() {
        // mpsc::channel panics on zero capacity
        let config = HubConfig::default().subscriber_queue_capacity(0);

        assert_eq!(config.subscriber_queue_capacity, 1);
    }

    #[test]
    fn test_builder_chaining() {
        let config = HubConfig::default()
            .subscriber_queue_capacity(16)
            .max_subscribers(100);

        assert_eq!(config.subscriber_queue_capacity, 16);
        assert_eq!(config.max_subscribers, 100);
    }
}
