//! Live poll tallies with real-time fan-out
//!
//! An in-memory poll store paired with a broadcast hub that pushes every
//! committed change to all connected viewers.
//!
//! - [`store`]: canonical poll state, one lock per poll plus a coarse id map
//! - [`aggregate`]: counts and per-option distributions
//! - [`hub`]: subscriber registry and the mutate-then-notify hub
//! - [`server`]: HTTP + WebSocket ingress built on axum
//!
//! For a single poll, every viewer receives events in the order the store
//! committed the corresponding mutations. State lives for the lifetime of
//! the process only.
//!
//! ```no_run
//! use livepoll::{PollServer, ServerConfig};
//!
//! # async fn run() -> livepoll::Result<()> {
//! let server = PollServer::new(ServerConfig::from_env());
//! server.run_until(async {
//!     let _ = tokio::signal::ctrl_c().await;
//! }).await
//! # }
//! ```

pub mod aggregate;
pub mod error;
pub mod hub;
pub mod server;
pub mod stats;
pub mod store;

pub use aggregate::{Aggregate, AggregationMode, Distribution};
pub use error::{Error, PollError, Result};
pub use hub::{BroadcastHub, HubConfig, PollEvent, SubscriberRegistry, Subscription};
pub use server::{PollServer, ServerConfig};
pub use stats::{HubStats, PollStats};
pub use store::{Commit, Poll, PollId, PollSnapshot, PollStore, StoreConfig};
