//! HTTP and WebSocket ingress

pub mod config;
pub mod error;
pub mod listener;
pub mod routes;
pub mod ws;

pub use config::{InvalidBindAddr, ServerConfig};
pub use error::ApiError;
pub use listener::PollServer;
pub use routes::router;
