//! Poll store
//!
//! The store holds canonical poll state and is the only place it is mutated.
//! Aggregates are recomputed inside the same lock scope as each append, so a
//! reader never sees a count without its record or a record without its count.
//!
//! # Architecture
//!
//! ```text
//!                           PollStore
//!                 ┌──────────────────────────────┐
//!                 │ polls: RwLock<HashMap<Id,    │   coarse: insert / delete /
//!                 │   Arc<RwLock<PollEntry {     │   lookup only
//!                 │     poll, votes, likes,      │
//!                 │     dislikes, option_likes,  │   fine: one lock per poll,
//!                 │   }>>                        │   held for validate → append
//!                 │ >>                           │   → aggregate → hook
//!                 └──────────────┬───────────────┘
//!                                │
//!          ┌─────────────────────┼─────────────────────┐
//!          ▼                     ▼                     ▼
//!   record_vote(P1)       record_vote(P1)       record_like(P2)
//!   (serialised with the one beside it)         (independent)
//! ```

pub mod config;
pub mod entry;
pub mod polls;
pub mod record;

pub use config::{StoreConfig, DEFAULT_CATEGORY};
pub use entry::{PollEntry, PollState};
pub use record::{Dislike, Like, OptionChoice, OptionLike, Poll, PollId, PollSnapshot, Vote};
pub use polls::{Commit, PollStore};
