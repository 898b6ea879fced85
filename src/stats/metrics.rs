//! Statistics for polls and fan-out

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::Distribution;
use crate::store::{PollEntry, PollId};

/// Per-poll statistics view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollStats {
    pub poll_id: PollId,
    pub total_votes: u64,
    pub total_likes: u64,
    pub vote_distribution: Distribution,
    pub created_at: DateTime<Utc>,
}

impl PollStats {
    /// Build from an entry the caller holds a lock on
    pub fn from_entry(entry: &PollEntry) -> Self {
        let agg = entry.aggregate();
        Self {
            poll_id: entry.id(),
            total_votes: agg.vote_count,
            total_likes: agg.like_count,
            vote_distribution: agg.vote_distribution,
            created_at: entry.poll().created_at(),
        }
    }
}

/// Live fan-out counters, updated by the subscriber registry
#[derive(Debug, Default)]
pub(crate) struct HubCounters {
    pub events_broadcast: AtomicU64,
    pub frames_delivered: AtomicU64,
    pub subscribers_dropped: AtomicU64,
    pub subscribers_total: AtomicU64,
}

impl HubCounters {
    pub fn snapshot(&self, active_subscribers: usize) -> HubStats {
        HubStats {
            events_broadcast: self.events_broadcast.load(Ordering::Relaxed),
            frames_delivered: self.frames_delivered.load(Ordering::Relaxed),
            subscribers_dropped: self.subscribers_dropped.load(Ordering::Relaxed),
            subscribers_total: self.subscribers_total.load(Ordering::Relaxed),
            active_subscribers,
        }
    }
}

/// Fan-out statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HubStats {
    /// Events pushed through the registry
    pub events_broadcast: u64,
    /// Frames enqueued to individual subscribers
    pub frames_delivered: u64,
    /// Subscribers removed after a failed delivery
    pub subscribers_dropped: u64,
    /// Subscribers ever registered
    pub subscribers_total: u64,
    /// Currently registered subscribers
    pub active_subscribers: usize,
}

impl HubStats {
    /// Average number of frames per broadcast event
    pub fn fanout_ratio(&self) -> f64 {
        if self.events_broadcast == 0 {
            0.0
        } else {
            self.frames_delivered as f64 / self.events_broadcast as f64
        }
    }
}
