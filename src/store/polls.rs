//! Poll store implementation
//!
//! The canonical registry of polls and their child records. All mutation and
//! invariant enforcement happens here.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::aggregate::Aggregate;
use crate::error::PollError;
use crate::stats::PollStats;

use super::config::StoreConfig;
use super::entry::{PollEntry, PollState};
use super::record::{Dislike, Like, OptionLike, Poll, PollId, PollSnapshot, Vote};

type EntryRef = Arc<RwLock<PollEntry>>;

/// Result of a committed mutation
///
/// Carries the appended (or removed) record and the full aggregate of the
/// poll as it stood right after the commit.
#[derive(Debug, Clone)]
pub struct Commit<T> {
    pub poll_id: PollId,
    pub record: T,
    pub aggregate: Aggregate,
}

/// Central store for all polls
///
/// The id map sits behind a coarse `RwLock` that is held only to insert,
/// remove or look up an entry. Each entry has its own `RwLock`, so mutations
/// on different polls never contend with each other.
///
/// The `*_then` variants run a hook with the fresh `Commit` while the poll's
/// exclusive lock is still held. Anything the hook does is therefore ordered
/// exactly like the commits of that poll.
pub struct PollStore {
    /// Map of poll id to poll entry
    polls: RwLock<HashMap<PollId, EntryRef>>,

    /// Creation sequence counter
    next_seq: AtomicU64,

    /// Configuration
    config: StoreConfig,
}

impl PollStore {
    /// Create a new poll store with default configuration
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a new poll store with custom configuration
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            polls: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
            config,
        }
    }

    /// Get the store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    async fn entry(&self, poll_id: PollId) -> Result<EntryRef, PollError> {
        let polls = self.polls.read().await;
        polls
            .get(&poll_id)
            .cloned()
            .ok_or(PollError::NotFound(poll_id))
    }

    /// Create a poll
    ///
    /// Fails with `InvalidArgument` when `options` is empty. A missing
    /// category falls back to the configured default.
    pub async fn create_poll(
        &self,
        question: impl Into<String>,
        options: Vec<String>,
        category: Option<String>,
    ) -> Result<PollSnapshot, PollError> {
        let (commit, ()) = self
            .create_poll_then(question, options, category, |_| ())
            .await?;
        Ok(PollSnapshot {
            poll: commit.record,
            aggregate: commit.aggregate,
        })
    }

    /// Create a poll and run `on_commit` before any other operation can
    /// reach it
    pub async fn create_poll_then<F, R>(
        &self,
        question: impl Into<String>,
        options: Vec<String>,
        category: Option<String>,
        on_commit: F,
    ) -> Result<(Commit<Poll>, R), PollError>
    where
        F: FnOnce(&Commit<Poll>) -> R,
    {
        if options.is_empty() {
            return Err(PollError::InvalidArgument(
                "a poll needs at least one option".to_string(),
            ));
        }

        let category = category.unwrap_or_else(|| self.config.default_category.clone());
        let poll = Poll::new(question.into(), options, category);
        let poll_id = poll.id();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);

        let entry_arc = Arc::new(RwLock::new(PollEntry::new(
            poll,
            seq,
            self.config.aggregation,
        )));

        // Not yet reachable, so this cannot contend
        let entry = entry_arc.write().await;

        self.polls
            .write()
            .await
            .insert(poll_id, Arc::clone(&entry_arc));

        tracing::info!(
            poll_id = %poll_id,
            options = entry.poll.option_count(),
            category = entry.poll.category(),
            "Poll created"
        );

        let commit = Commit {
            poll_id,
            record: entry.poll.clone(),
            aggregate: entry.aggregate(),
        };
        let hooked = on_commit(&commit);

        Ok((commit, hooked))
    }

    /// Get a poll with its current aggregate
    pub async fn get_poll(&self, poll_id: PollId) -> Result<PollSnapshot, PollError> {
        let entry_arc = self.entry(poll_id).await?;
        let entry = entry_arc.read().await;
        entry.ensure_active()?;
        Ok(entry.snapshot())
    }

    /// List every poll with its aggregate, in creation order
    ///
    /// Each snapshot is consistent for its own poll; the list as a whole is
    /// not a single point-in-time view across polls.
    pub async fn list_polls(&self) -> Vec<PollSnapshot> {
        let entries: Vec<EntryRef> = self.polls.read().await.values().cloned().collect();

        let mut snapshots = Vec::with_capacity(entries.len());
        for entry_arc in entries {
            let entry = entry_arc.read().await;
            if entry.state == PollState::Active {
                snapshots.push((entry.seq, entry.snapshot()));
            }
        }

        snapshots.sort_by_key(|(seq, _)| *seq);
        snapshots.into_iter().map(|(_, snapshot)| snapshot).collect()
    }

    /// Get the stats view of a poll
    pub async fn poll_stats(&self, poll_id: PollId) -> Result<PollStats, PollError> {
        let entry_arc = self.entry(poll_id).await?;
        let entry = entry_arc.read().await;
        entry.ensure_active()?;
        Ok(PollStats::from_entry(&entry))
    }

    /// Number of live polls
    pub async fn poll_count(&self) -> usize {
        self.polls.read().await.len()
    }

    /// Validate, append and re-aggregate under the poll's exclusive lock
    async fn mutate<T, A, F, R>(
        &self,
        poll_id: PollId,
        apply: A,
        on_commit: F,
    ) -> Result<(Commit<T>, R), PollError>
    where
        A: FnOnce(&mut PollEntry) -> Result<T, PollError>,
        F: FnOnce(&Commit<T>) -> R,
    {
        let entry_arc = self.entry(poll_id).await?;
        let mut entry = entry_arc.write().await;

        // Deleted between lookup and lock
        entry.ensure_active()?;

        let record = apply(&mut entry)?;
        let commit = Commit {
            poll_id,
            record,
            aggregate: entry.aggregate(),
        };
        let hooked = on_commit(&commit);

        Ok((commit, hooked))
    }

    /// Record a vote for `option_index`
    ///
    /// Fails with `NotFound` or `InvalidOption`; either way nothing is appended.
    pub async fn record_vote(
        &self,
        poll_id: PollId,
        option_index: i64,
    ) -> Result<Commit<Vote>, PollError> {
        let (commit, ()) = self.record_vote_then(poll_id, option_index, |_| ()).await?;
        Ok(commit)
    }

    pub async fn record_vote_then<F, R>(
        &self,
        poll_id: PollId,
        option_index: i64,
        on_commit: F,
    ) -> Result<(Commit<Vote>, R), PollError>
    where
        F: FnOnce(&Commit<Vote>) -> R,
    {
        self.mutate(
            poll_id,
            |entry| {
                let index = entry.check_option(option_index)?;
                let vote = entry.push_vote(index).clone();
                tracing::debug!(poll_id = %poll_id, option_index = index, "Vote recorded");
                Ok(vote)
            },
            on_commit,
        )
        .await
    }

    /// Record a like on the poll
    pub async fn record_like(&self, poll_id: PollId) -> Result<Commit<Like>, PollError> {
        let (commit, ()) = self.record_like_then(poll_id, |_| ()).await?;
        Ok(commit)
    }

    pub async fn record_like_then<F, R>(
        &self,
        poll_id: PollId,
        on_commit: F,
    ) -> Result<(Commit<Like>, R), PollError>
    where
        F: FnOnce(&Commit<Like>) -> R,
    {
        self.mutate(
            poll_id,
            |entry| {
                let like = entry.push_like().clone();
                tracing::debug!(poll_id = %poll_id, "Like recorded");
                Ok(like)
            },
            on_commit,
        )
        .await
    }

    /// Record a dislike on the poll
    pub async fn record_dislike(&self, poll_id: PollId) -> Result<Commit<Dislike>, PollError> {
        let (commit, ()) = self.record_dislike_then(poll_id, |_| ()).await?;
        Ok(commit)
    }

    pub async fn record_dislike_then<F, R>(
        &self,
        poll_id: PollId,
        on_commit: F,
    ) -> Result<(Commit<Dislike>, R), PollError>
    where
        F: FnOnce(&Commit<Dislike>) -> R,
    {
        self.mutate(
            poll_id,
            |entry| {
                let dislike = entry.push_dislike().clone();
                tracing::debug!(poll_id = %poll_id, "Dislike recorded");
                Ok(dislike)
            },
            on_commit,
        )
        .await
    }

    /// Record a like on a single option
    ///
    /// Same contract as `record_vote`.
    pub async fn record_option_like(
        &self,
        poll_id: PollId,
        option_index: i64,
    ) -> Result<Commit<OptionLike>, PollError> {
        let (commit, ()) = self
            .record_option_like_then(poll_id, option_index, |_| ())
            .await?;
        Ok(commit)
    }

    pub async fn record_option_like_then<F, R>(
        &self,
        poll_id: PollId,
        option_index: i64,
        on_commit: F,
    ) -> Result<(Commit<OptionLike>, R), PollError>
    where
        F: FnOnce(&Commit<OptionLike>) -> R,
    {
        self.mutate(
            poll_id,
            |entry| {
                let index = entry.check_option(option_index)?;
                let like = entry.push_option_like(index).clone();
                tracing::debug!(poll_id = %poll_id, option_index = index, "Option like recorded");
                Ok(like)
            },
            on_commit,
        )
        .await
    }

    /// Delete a poll and every child record
    pub async fn delete_poll(&self, poll_id: PollId) -> Result<Commit<Poll>, PollError> {
        let (commit, ()) = self.delete_poll_then(poll_id, |_| ()).await?;
        Ok(commit)
    }

    /// Delete a poll and run `on_commit` before releasing its lock
    ///
    /// The entry is retired under its own lock before the id leaves the map, so
    /// a concurrent operation either completes against the live poll first or
    /// observes `NotFound` afterwards. The map lock is only taken for the
    /// removal itself and never while waiting on the entry.
    pub async fn delete_poll_then<F, R>(
        &self,
        poll_id: PollId,
        on_commit: F,
    ) -> Result<(Commit<Poll>, R), PollError>
    where
        F: FnOnce(&Commit<Poll>) -> R,
    {
        let entry_arc = self.entry(poll_id).await?;
        let mut entry = entry_arc.write().await;
        entry.ensure_active()?;
        entry.retire();

        // Entry lock, then map lock; no path waits on an entry under the map lock
        self.polls.write().await.remove(&poll_id);

        tracing::info!(poll_id = %poll_id, "Poll deleted");

        let commit = Commit {
            poll_id,
            record: entry.poll.clone(),
            aggregate: entry.aggregate(),
        };
        let hooked = on_commit(&commit);

        Ok((commit, hooked))
    }
}

impl Default for PollStore {
    fn default() -> Self {
        Self::new()
    }
}
