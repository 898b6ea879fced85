//! Broadcast hub
//!
//! Runs one "mutate, aggregate, notify" unit per external change. The event is
//! published from inside the store's commit hook, while the poll's exclusive
//! lock is still held, so every viewer receives a poll's events in the order
//! the store committed them.

use std::sync::Arc;

use crate::error::PollError;
use crate::store::{
    Commit, Dislike, Like, OptionLike, Poll, PollId, PollSnapshot, PollStore, StoreConfig, Vote,
};

use super::config::HubConfig;
use super::event::PollEvent;
use super::subscriber::{BroadcastReport, SubscriberRegistry, Subscription};

/// Couples the poll store with the subscriber registry
pub struct BroadcastHub {
    store: Arc<PollStore>,
    subscribers: Arc<SubscriberRegistry>,
}

impl BroadcastHub {
    pub fn new(store: Arc<PollStore>, subscribers: Arc<SubscriberRegistry>) -> Self {
        Self { store, subscribers }
    }

    pub fn with_config(store_config: StoreConfig, hub_config: HubConfig) -> Self {
        Self::new(
            Arc::new(PollStore::with_config(store_config)),
            Arc::new(SubscriberRegistry::with_config(hub_config)),
        )
    }

    /// The underlying store, for read-only queries
    pub fn store(&self) -> &Arc<PollStore> {
        &self.store
    }

    pub fn subscribers(&self) -> &Arc<SubscriberRegistry> {
        &self.subscribers
    }

    /// Register a viewer; `None` when the subscriber limit is reached
    pub fn subscribe(&self) -> Option<Subscription> {
        self.subscribers.add()
    }

    /// Encode and fan out one event
    ///
    /// Delivery problems stay here: they are logged and never turn a committed
    /// mutation into a failure.
    fn publish(subscribers: &SubscriberRegistry, event: PollEvent) -> BroadcastReport {
        let frame = match event.encode() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(
                    poll_id = %event.poll_id(),
                    event = event.kind(),
                    error = %e,
                    "Failed to encode event"
                );
                return BroadcastReport::default();
            }
        };

        let report = subscribers.broadcast(&frame);
        tracing::debug!(
            poll_id = %event.poll_id(),
            event = event.kind(),
            delivered = report.delivered,
            dropped = report.dropped,
            "Event broadcast"
        );
        report
    }

    pub async fn create_poll(
        &self,
        question: impl Into<String>,
        options: Vec<String>,
        category: Option<String>,
    ) -> Result<PollSnapshot, PollError> {
        let subscribers = &self.subscribers;
        let (commit, _) = self
            .store
            .create_poll_then(question, options, category, |commit| {
                let poll = PollSnapshot {
                    poll: commit.record.clone(),
                    aggregate: commit.aggregate.clone(),
                };
                Self::publish(subscribers, PollEvent::PollCreated { poll })
            })
            .await?;

        Ok(PollSnapshot {
            poll: commit.record,
            aggregate: commit.aggregate,
        })
    }

    pub async fn record_vote(
        &self,
        poll_id: PollId,
        option_index: i64,
    ) -> Result<Commit<Vote>, PollError> {
        let subscribers = &self.subscribers;
        let (commit, _) = self
            .store
            .record_vote_then(poll_id, option_index, |commit| {
                Self::publish(
                    subscribers,
                    PollEvent::VoteCast {
                        poll_id,
                        aggregate: commit.aggregate.clone(),
                    },
                )
            })
            .await?;
        Ok(commit)
    }

    pub async fn record_like(&self, poll_id: PollId) -> Result<Commit<Like>, PollError> {
        let subscribers = &self.subscribers;
        let (commit, _) = self
            .store
            .record_like_then(poll_id, |commit| {
                Self::publish(
                    subscribers,
                    PollEvent::PollLiked {
                        poll_id,
                        aggregate: commit.aggregate.clone(),
                    },
                )
            })
            .await?;
        Ok(commit)
    }

    pub async fn record_dislike(&self, poll_id: PollId) -> Result<Commit<Dislike>, PollError> {
        let subscribers = &self.subscribers;
        let (commit, _) = self
            .store
            .record_dislike_then(poll_id, |commit| {
                Self::publish(
                    subscribers,
                    PollEvent::PollDisliked {
                        poll_id,
                        aggregate: commit.aggregate.clone(),
                    },
                )
            })
            .await?;
        Ok(commit)
    }

    pub async fn record_option_like(
        &self,
        poll_id: PollId,
        option_index: i64,
    ) -> Result<Commit<OptionLike>, PollError> {
        let subscribers = &self.subscribers;
        let (commit, _) = self
            .store
            .record_option_like_then(poll_id, option_index, |commit| {
                Self::publish(
                    subscribers,
                    PollEvent::OptionLiked {
                        poll_id,
                        aggregate: commit.aggregate.clone(),
                    },
                )
            })
            .await?;
        Ok(commit)
    }

    pub async fn delete_poll(&self, poll_id: PollId) -> Result<Commit<Poll>, PollError> {
        let subscribers = &self.subscribers;
        let (commit, _) = self
            .store
            .delete_poll_then(poll_id, |_| {
                Self::publish(subscribers, PollEvent::PollDeleted { poll_id })
            })
            .await?;
        Ok(commit)
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::with_config(StoreConfig::default(), HubConfig::default())
    }
}
