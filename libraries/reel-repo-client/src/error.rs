//! Error types for the repository contents client.

use thiserror::Error;

/// Errors that can occur when talking to the repository contents API.
#[derive(Error, Debug)]
pub enum RepoClientError {
    /// HTTP request failed (connect, timeout, protocol)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The requested path does not exist in the repository
    #[error("Path not found in repository: {0:?}")]
    NotFound(String),

    /// The contents API throttled the caller
    #[error("Rate limited by the contents API")]
    RateLimited {
        /// Seconds to wait, when the API said so via `Retry-After`
        retry_after_secs: Option<u64>,
    },

    /// The API returned a non-success status outside the mapped cases
    #[error("Contents API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, as returned by the API
        message: String,
    },

    /// The response body did not match the expected listing shape
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Owner/repo/branch configuration was rejected
    #[error("Invalid repository configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for repository client operations.
pub type Result<T> = std::result::Result<T, RepoClientError>;
