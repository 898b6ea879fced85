//! Error types
//!
//! `PollError` is the caller-visible taxonomy of the poll core. Every variant is
//! synchronous and non-retryable: repeating the call with the same input yields
//! the same error. `Error` is the crate-level error that also covers transport
//! failures of the server.

use thiserror::Error;

use crate::store::PollId;

/// Errors returned by poll store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// Referenced poll does not exist (never created, or already deleted)
    #[error("Poll not found: {0}")]
    NotFound(PollId),

    /// Structurally invalid creation request
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Option index outside the poll's option range
    #[error("Invalid option index {index} for poll {poll_id} ({option_count} options)")]
    InvalidOption {
        poll_id: PollId,
        index: i64,
        option_count: usize,
    },
}

impl PollError {
    /// Whether retrying the same request could succeed. Always false.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Poll(#[from] PollError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
