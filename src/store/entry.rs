//! Poll entry and state types
//!
//! This module defines the per-poll state stored in the poll store. Each entry
//! sits behind its own lock; everything in here assumes the caller holds it.

use crate::aggregate::{self, Aggregate, AggregationMode, Counters};
use crate::error::PollError;

use super::record::{Dislike, Like, OptionLike, Poll, PollId, PollSnapshot, Vote};

/// State of a poll entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Poll accepts records and reads
    Active,
    /// Poll was deleted; terminal
    Deleted,
}

/// Entry for a single poll in the store
#[derive(Debug)]
pub struct PollEntry {
    /// The immutable poll definition
    pub(super) poll: Poll,

    /// Creation sequence number, used for list ordering
    pub(super) seq: u64,

    pub(super) votes: Vec<Vote>,
    pub(super) likes: Vec<Like>,
    pub(super) dislikes: Vec<Dislike>,
    pub(super) option_likes: Vec<OptionLike>,

    /// Maintained only in incremental aggregation mode
    counters: Option<Counters>,

    /// Current poll state
    pub(super) state: PollState,
}

impl PollEntry {
    /// Create a new entry with empty child collections
    pub(super) fn new(poll: Poll, seq: u64, mode: AggregationMode) -> Self {
        let counters = match mode {
            AggregationMode::FullScan => None,
            AggregationMode::Incremental => Some(Counters::default()),
        };

        Self {
            poll,
            seq,
            votes: Vec::new(),
            likes: Vec::new(),
            dislikes: Vec::new(),
            option_likes: Vec::new(),
            counters,
            state: PollState::Active,
        }
    }

    pub fn id(&self) -> PollId {
        self.poll.id()
    }

    pub fn poll(&self) -> &Poll {
        &self.poll
    }

    /// Fail with `NotFound` unless the entry is active
    pub(super) fn ensure_active(&self) -> Result<(), PollError> {
        match self.state {
            PollState::Active => Ok(()),
            PollState::Deleted => Err(PollError::NotFound(self.id())),
        }
    }

    /// Validate an option index against this poll's option range
    pub(super) fn check_option(&self, index: i64) -> Result<usize, PollError> {
        let option_count = self.poll.option_count();
        usize::try_from(index)
            .ok()
            .filter(|&i| i < option_count)
            .ok_or(PollError::InvalidOption {
                poll_id: self.id(),
                index,
                option_count,
            })
    }

    pub(super) fn push_vote(&mut self, option_index: usize) -> &Vote {
        if let Some(counters) = self.counters.as_mut() {
            counters.record_vote(option_index);
        }
        let vote = Vote::new(self.id(), option_index);
        self.votes.push(vote);
        &self.votes[self.votes.len() - 1]
    }

    pub(super) fn push_option_like(&mut self, option_index: usize) -> &OptionLike {
        if let Some(counters) = self.counters.as_mut() {
            counters.record_option_like(option_index);
        }
        let like = OptionLike::new(self.id(), option_index);
        self.option_likes.push(like);
        &self.option_likes[self.option_likes.len() - 1]
    }

    pub(super) fn push_like(&mut self) -> &Like {
        let like = Like::new(self.id());
        self.likes.push(like);
        &self.likes[self.likes.len() - 1]
    }

    pub(super) fn push_dislike(&mut self) -> &Dislike {
        let dislike = Dislike::new(self.id());
        self.dislikes.push(dislike);
        &self.dislikes[self.dislikes.len() - 1]
    }

    /// Mark deleted and discard every child collection
    pub(super) fn retire(&mut self) {
        self.state = PollState::Deleted;
        self.votes = Vec::new();
        self.likes = Vec::new();
        self.dislikes = Vec::new();
        self.option_likes = Vec::new();
        if let Some(counters) = self.counters.as_mut() {
            *counters = Counters::default();
        }
    }

    /// Current aggregate
    ///
    /// Counts are always the collection lengths; distributions come from the
    /// maintained counters when present, otherwise from a full scan.
    pub fn aggregate(&self) -> Aggregate {
        match &self.counters {
            Some(counters) => Aggregate {
                vote_count: aggregate::count(&self.votes),
                like_count: aggregate::count(&self.likes),
                dislike_count: aggregate::count(&self.dislikes),
                vote_distribution: counters.votes.clone(),
                option_like_counts: counters.option_likes.clone(),
            },
            None => aggregate::aggregate(
                &self.votes,
                &self.likes,
                &self.dislikes,
                &self.option_likes,
            ),
        }
    }

    pub fn snapshot(&self) -> PollSnapshot {
        PollSnapshot {
            poll: self.poll.clone(),
            aggregate: self.aggregate(),
        }
    }
}
