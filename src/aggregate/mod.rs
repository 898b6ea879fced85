//! Aggregation over poll record collections
//!
//! Pure functions that derive counts and per-option distributions from a
//! poll's append-only record collections. Distributions are sparse: options
//! with no records are omitted. The store calls these after every mutation,
//! inside the same per-poll exclusive scope as the append.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::{Dislike, Like, OptionChoice, OptionLike, Vote};

/// Sparse mapping of option index to record count
pub type Distribution = BTreeMap<usize, u64>;

/// How the store derives per-option distributions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Rescan the record collection on every call
    #[default]
    FullScan,
    /// Maintain counter maps updated alongside each append
    Incremental,
}

/// Derived summary for one poll at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub vote_count: u64,
    pub like_count: u64,
    pub dislike_count: u64,
    pub vote_distribution: Distribution,
    pub option_like_counts: Distribution,
}

/// Number of records in a collection
pub fn count<T>(records: &[T]) -> u64 {
    records.len() as u64
}

/// Tally records by option index
pub fn tally<R: OptionChoice>(records: &[R]) -> Distribution {
    let mut distribution = Distribution::new();
    for record in records {
        increment(&mut distribution, record.option_index());
    }
    distribution
}

/// Add one record for `index` to a distribution
pub fn increment(distribution: &mut Distribution, index: usize) {
    *distribution.entry(index).or_insert(0) += 1;
}

/// Sum of all counts in a distribution
pub fn total(distribution: &Distribution) -> u64 {
    distribution.values().sum()
}

/// Full-scan aggregate over all four collections
pub fn aggregate(
    votes: &[Vote],
    likes: &[Like],
    dislikes: &[Dislike],
    option_likes: &[OptionLike],
) -> Aggregate {
    Aggregate {
        vote_count: count(votes),
        like_count: count(likes),
        dislike_count: count(dislikes),
        vote_distribution: tally(votes),
        option_like_counts: tally(option_likes),
    }
}

/// Incrementally maintained distributions
///
/// Must be updated inside the same exclusive scope as the append it mirrors.
#[derive(Debug, Clone, Default)]
pub struct Counters {
    pub votes: Distribution,
    pub option_likes: Distribution,
}

impl Counters {
    pub fn record_vote(&mut self, option_index: usize) {
        increment(&mut self.votes, option_index);
    }

    pub fn record_option_like(&mut self, option_index: usize) {
        increment(&mut self.option_likes, option_index);
    }
}
