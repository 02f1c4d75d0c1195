//! Request and response types for the contents API.

use serde::{Deserialize, Serialize};

/// Repository coordinates, supplied once at startup.
///
/// These three strings are the client's entire configuration surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Repository owner (user or organisation)
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// Branch the listings and raw URLs are pinned to
    pub branch: String,
}

impl RepoConfig {
    /// Create a configuration from owner, repository, and branch names.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }
}

/// Kind of a directory entry, as reported by the contents API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file
    File,

    /// Directory
    Dir,

    /// Anything else the API reports (symlinks, submodules); ignored
    /// by the library resolver
    #[serde(other)]
    Other,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoEntry {
    /// Entry name within its directory
    pub name: String,

    /// Repository-relative path
    pub path: String,

    /// Entry kind
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl RepoEntry {
    /// Whether this entry is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Whether this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}
