//! Subscriber registry
//!
//! Tracks connected viewers. Each viewer owns a bounded outbound queue that a
//! transport task drains; broadcasting only enqueues, so it never waits on a
//! socket.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use parking_lot::RwLock;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::stats::{HubCounters, HubStats};

use super::config::HubConfig;

/// Unique identifier for a registered subscriber
pub type SubscriberId = u64;

/// Result of handing one frame to one subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Frame enqueued
    Delivered,
    /// Receiving side is gone
    Closed,
    /// Queue full; the viewer is not keeping up
    Lagged,
}

/// Summary of one broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub dropped: usize,
}

/// Receiving half handed to the transport of one viewer
///
/// `recv` yields `None` once the registry has dropped this subscriber.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<Bytes>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next frame
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.rx.recv().await
    }

    /// Take a frame if one is queued
    pub fn try_recv(&mut self) -> Option<Bytes> {
        self.rx.try_recv().ok()
    }
}

/// Live set of connected viewers
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<SubscriberId, mpsc::Sender<Bytes>>>,
    next_id: AtomicU64,
    config: HubConfig,
    counters: HubCounters,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    pub fn with_config(config: HubConfig) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            config,
            counters: HubCounters::default(),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Register a new viewer
    ///
    /// The viewer sees every broadcast that starts after this returns.
    /// Returns `None` when `max_subscribers` is reached.
    pub fn add(&self) -> Option<Subscription> {
        let mut subscribers = self.subscribers.write();

        if self.config.max_subscribers > 0 && subscribers.len() >= self.config.max_subscribers {
            tracing::warn!(
                limit = self.config.max_subscribers,
                "Subscriber rejected: limit reached"
            );
            return None;
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.config.subscriber_queue_capacity);
        subscribers.insert(id, tx);
        self.counters.subscribers_total.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            subscriber = id,
            subscribers = subscribers.len(),
            "Subscriber added"
        );

        Some(Subscription { id, rx })
    }

    /// Deregister a viewer; returns whether it was registered
    pub fn remove(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.write().remove(&id).is_some();
        if removed {
            tracing::debug!(subscriber = id, "Subscriber removed");
        }
        removed
    }

    /// Deliver `frame` to every registered viewer
    ///
    /// The read lock is held for the whole pass, so the recipient set is fixed
    /// for this call: concurrent adds and removes wait until it ends. Enqueueing
    /// never blocks, which keeps that window short. Viewers whose delivery
    /// fails are removed afterwards; failures never reach the caller.
    pub fn broadcast(&self, frame: &Bytes) -> BroadcastReport {
        let mut failed = Vec::new();
        let mut report = BroadcastReport::default();

        {
            let subscribers = self.subscribers.read();
            for (&id, tx) in subscribers.iter() {
                match deliver(tx, frame.clone()) {
                    DeliveryOutcome::Delivered => report.delivered += 1,
                    outcome => failed.push((id, outcome)),
                }
            }
        }

        if !failed.is_empty() {
            let mut subscribers = self.subscribers.write();
            for (id, outcome) in failed {
                if subscribers.remove(&id).is_some() {
                    report.dropped += 1;
                    tracing::warn!(subscriber = id, outcome = ?outcome, "Subscriber dropped");
                }
            }
        }

        self.counters.events_broadcast.fetch_add(1, Ordering::Relaxed);
        self.counters
            .frames_delivered
            .fetch_add(report.delivered as u64, Ordering::Relaxed);
        self.counters
            .subscribers_dropped
            .fetch_add(report.dropped as u64, Ordering::Relaxed);

        report
    }

    /// Number of registered viewers
    pub fn len(&self) -> usize {
        self.subscribers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> HubStats {
        self.counters.snapshot(self.len())
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn deliver(tx: &mpsc::Sender<Bytes>, frame: Bytes) -> DeliveryOutcome {
    match tx.try_send(frame) {
        Ok(()) => DeliveryOutcome::Delivered,
        Err(TrySendError::Closed(_)) => DeliveryOutcome::Closed,
        Err(TrySendError::Full(_)) => DeliveryOutcome::Lagged,
    }
}
