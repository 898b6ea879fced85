//! Real-time fan-out of poll state
//!
//! The hub pairs the poll store with the live set of viewers. Each committed
//! mutation produces exactly one event, serialised once and enqueued to every
//! viewer's outbound queue.
//!
//! # Architecture
//!
//! ```text
//!   mutation ──► BroadcastHub ──► PollStore::*_then
//!                                   │  per-poll lock held
//!                                   ▼
//!                              commit hook
//!                                   │  PollEvent::encode() → Bytes
//!                                   ▼
//!                          SubscriberRegistry::broadcast
//!                     ┌─────────────┼─────────────┐
//!                     ▼             ▼             ▼
//!                  queue A       queue B       queue C   (bounded mpsc)
//!                     │             │             │
//!                  socket        socket        socket    (transport tasks)
//! ```
//!
//! A viewer whose queue is closed or full is removed on the spot; the other
//! viewers and the mutation caller are unaffected.

pub mod broadcast;
pub mod config;
pub mod event;
pub mod subscriber;

pub use broadcast::BroadcastHub;
pub use config::HubConfig;
pub use event::PollEvent;
pub use subscriber::{
    BroadcastReport, DeliveryOutcome, SubscriberId, SubscriberRegistry, Subscription,
};
