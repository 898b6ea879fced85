//! Event types pushed to subscribers
//!
//! Every event carries the full aggregate of the affected poll, never a
//! delta, so any single event brings a viewer up to date for that poll.

use bytes::Bytes;
use serde::Serialize;

use crate::aggregate::Aggregate;
use crate::store::{PollId, PollSnapshot};

/// A committed state transition, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PollEvent {
    PollCreated {
        poll: PollSnapshot,
    },
    VoteCast {
        poll_id: PollId,
        #[serde(flatten)]
        aggregate: Aggregate,
    },
    PollLiked {
        poll_id: PollId,
        #[serde(flatten)]
        aggregate: Aggregate,
    },
    PollDisliked {
        poll_id: PollId,
        #[serde(flatten)]
        aggregate: Aggregate,
    },
    OptionLiked {
        poll_id: PollId,
        #[serde(flatten)]
        aggregate: Aggregate,
    },
    PollDeleted {
        poll_id: PollId,
    },
}

impl PollEvent {
    /// Wire discriminant
    pub fn kind(&self) -> &'static str {
        match self {
            PollEvent::PollCreated { .. } => "poll_created",
            PollEvent::VoteCast { .. } => "vote_cast",
            PollEvent::PollLiked { .. } => "poll_liked",
            PollEvent::PollDisliked { .. } => "poll_disliked",
            PollEvent::OptionLiked { .. } => "option_liked",
            PollEvent::PollDeleted { .. } => "poll_deleted",
        }
    }

    pub fn poll_id(&self) -> PollId {
        match self {
            PollEvent::PollCreated { poll } => poll.poll.id(),
            PollEvent::VoteCast { poll_id, .. }
            | PollEvent::PollLiked { poll_id, .. }
            | PollEvent::PollDisliked { poll_id, .. }
            | PollEvent::OptionLiked { poll_id, .. }
            | PollEvent::PollDeleted { poll_id } => *poll_id,
        }
    }

    /// Serialize once into a frame shared by every subscriber queue
    ///
    /// `Bytes` is reference counted, so fan-out clones the handle, not the
    /// JSON text.
    pub fn encode(&self) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(Bytes::from)
    }
}
