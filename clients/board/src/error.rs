//! Custom error types for the board client

use thiserror::Error;
use uuid::Uuid;

/// Custom error type for the board client
#[derive(Error, Debug)]
pub enum BoardError {
    /// The request never completed
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a failure envelope
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A protected call was made without a token
    #[error("Not authenticated")]
    Unauthenticated,

    /// The response envelope did not carry the expected payload
    #[error("Malformed response: {0}")]
    Protocol(String),

    /// A mutation referenced a task the local cache does not hold
    #[error("Task {0} is not in the local cache")]
    UnknownTask(Uuid),
}
