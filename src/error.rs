//! Custom error types for pullist.

use thiserror::Error;

/// Errors that can occur in pullist.
#[derive(Error, Debug)]
pub enum PullistError {
    /// Request could not be sent or its body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Response body was not a valid app list.
    #[error("invalid feed response: {0}")]
    InvalidFeed(#[from] serde_json::Error),
}
