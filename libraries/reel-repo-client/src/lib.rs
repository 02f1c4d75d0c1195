//! Reel Player - Repository Contents Client
//!
//! HTTP client for the code-hosting "contents" API that Reel Player
//! derives its library from.
//!
//! The client does exactly two things:
//! - [`RepoClient::list_entries`] lists one directory of the repository
//!   tree and returns typed entries (`file` / `dir`);
//! - [`RepoClient::raw_url`] resolves a repository path to the stable
//!   raw-download URL handed to the audio sink.
//!
//! There is no retry logic: a [`RepoClientError::RateLimited`] or network
//! failure is terminal for that call, and the caller decides whether to
//! retry, skip a sibling path, or abort.
//!
//! # Example
//!
//! ```ignore
//! use reel_repo_client::{RepoClient, RepoConfig};
//!
//! let client = RepoClient::new(RepoConfig::new("octocat", "jukebox", "main"))?;
//! let entries = client.list_entries("").await?;
//! for entry in entries.iter().filter(|e| e.is_dir()) {
//!     println!("playlist candidate: {}", entry.name);
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::RepoClient;
pub use error::{RepoClientError, Result};
pub use types::{EntryKind, RepoConfig, RepoEntry};
