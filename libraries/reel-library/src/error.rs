//! Error types for library resolution.

use reel_repo_client::RepoClientError;
use thiserror::Error;

/// Errors that abort a library build.
///
/// Only the root listing is fatal; per-subdirectory failures are handled
/// inside the resolver and never surface here.
#[derive(Error, Debug)]
pub enum LibraryError {
    /// The root listing failed, so no library can be derived
    #[error("Failed to list repository root: {0}")]
    Root(#[source] RepoClientError),
}

/// Result type for library resolution.
pub type Result<T> = std::result::Result<T, LibraryError>;
