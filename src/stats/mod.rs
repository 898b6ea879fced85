//! Statistics for polls and the fan-out hub

pub mod metrics;

pub(crate) use metrics::HubCounters;
pub use metrics::{HubStats, PollStats};
