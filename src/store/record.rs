//! Poll and child record types
//!
//! A `Poll` is immutable once created. Child records (votes, likes, dislikes,
//! option likes) are append-only and are only ever discarded together with
//! their poll.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::Aggregate;

/// Opaque unique identifier for a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollId(Uuid);

impl PollId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PollId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PollId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A poll: question, fixed option list, category and creation time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Poll {
    id: PollId,
    question: String,
    options: Vec<String>,
    category: String,
    created_at: DateTime<Utc>,
}

impl Poll {
    pub(crate) fn new(question: String, options: Vec<String>, category: String) -> Self {
        Self {
            id: PollId::new(),
            question,
            options,
            category,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> PollId {
        self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Option labels, in creation order
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Number of options; valid option indices are `0..option_count()`
    pub fn option_count(&self) -> usize {
        self.options.len()
    }
}

/// Records that reference one of the poll's options
pub trait OptionChoice {
    fn option_index(&self) -> usize;
}

/// A single vote for an option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vote {
    pub id: Uuid,
    pub poll_id: PollId,
    pub option_index: usize,
    pub timestamp: DateTime<Utc>,
}

impl Vote {
    pub(crate) fn new(poll_id: PollId, option_index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            poll_id,
            option_index,
            timestamp: Utc::now(),
        }
    }
}

impl OptionChoice for Vote {
    fn option_index(&self) -> usize {
        self.option_index
    }
}

/// A like on a single option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionLike {
    pub id: Uuid,
    pub poll_id: PollId,
    pub option_index: usize,
    pub timestamp: DateTime<Utc>,
}

impl OptionLike {
    pub(crate) fn new(poll_id: PollId, option_index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            poll_id,
            option_index,
            timestamp: Utc::now(),
        }
    }
}

impl OptionChoice for OptionLike {
    fn option_index(&self) -> usize {
        self.option_index
    }
}

/// A like on the poll as a whole
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Like {
    pub id: Uuid,
    pub poll_id: PollId,
    pub timestamp: DateTime<Utc>,
}

impl Like {
    pub(crate) fn new(poll_id: PollId) -> Self {
        Self {
            id: Uuid::new_v4(),
            poll_id,
            timestamp: Utc::now(),
        }
    }
}

/// A dislike on the poll as a whole
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dislike {
    pub id: Uuid,
    pub poll_id: PollId,
    pub timestamp: DateTime<Utc>,
}

impl Dislike {
    pub(crate) fn new(poll_id: PollId) -> Self {
        Self {
            id: Uuid::new_v4(),
            poll_id,
            timestamp: Utc::now(),
        }
    }
}

/// A poll together with its aggregate at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollSnapshot {
    #[serde(flatten)]
    pub poll: Poll,
    #[serde(flatten)]
    pub aggregate: Aggregate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_id_roundtrips_through_string() {
        let id = PollId::new();
        let parsed: PollId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<PollId>().is_err());
    }

    #[test]
    fn test_poll_ids_are_unique() {
        let a = Poll::new("q".into(), vec!["a".into()], "General".into());
        let b = Poll::new("q".into(), vec!["a".into()], "General".into());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_snapshot_serializes_flat() {
        let poll = Poll::new(
            "Best fruit?".into(),
            vec!["Apple".into(), "Banana".into()],
            "Food".into(),
        );
        let snapshot = PollSnapshot {
            poll: poll.clone(),
            aggregate: Aggregate::default(),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["id"], poll.id().to_string());
        assert_eq!(json["question"], "Best fruit?");
        assert_eq!(json["options"][1], "Banana");
        assert_eq!(json["category"], "Food");
        assert_eq!(json["vote_count"], 0);
        assert!(json["vote_distribution"].as_object().unwrap().is_empty());
    }
}
