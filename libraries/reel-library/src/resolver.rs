//! Two-level repository walk.

use crate::error::{LibraryError, Result};
use futures_util::future::join_all;
use reel_core::{is_audio_file, Library, Playlist, Track, ROOT_PLAYLIST};
use reel_repo_client::{RepoClient, RepoEntry};
use tracing::{debug, warn};

/// Outcome of a library build.
#[derive(Debug)]
pub enum LibraryOutcome {
    /// At least one playlist was resolved.
    Library(Library),

    /// The repository holds no qualifying audio anywhere. A valid terminal
    /// state, distinct from a failed build.
    Empty,
}

impl LibraryOutcome {
    /// The resolved library, if any playlist was found.
    pub fn into_library(self) -> Option<Library> {
        match self {
            LibraryOutcome::Library(library) => Some(library),
            LibraryOutcome::Empty => None,
        }
    }
}

/// Resolves a repository snapshot into a [`Library`].
pub struct LibraryResolver {
    client: RepoClient,
}

impl LibraryResolver {
    /// Create a resolver over a repository client.
    pub fn new(client: RepoClient) -> Self {
        Self { client }
    }

    /// The underlying repository client.
    pub fn client(&self) -> &RepoClient {
        &self.client
    }

    /// Build the library from the current repository state.
    ///
    /// Lists the root, then every root-level directory, concurrently.
    /// Root loose audio files become the [`ROOT_PLAYLIST`], placed first;
    /// each directory with at least one audio file becomes a playlist in
    /// listing order. Directories that fail to list are logged and
    /// skipped; directories without audio are omitted silently.
    pub async fn build(&self) -> Result<LibraryOutcome> {
        let root = self
            .client
            .list_entries("")
            .await
            .map_err(LibraryError::Root)?;

        let (dirs, files): (Vec<RepoEntry>, Vec<RepoEntry>) =
            root.into_iter().partition(RepoEntry::is_dir);

        let mut playlists = Vec::new();

        let root_tracks = self.tracks_from(files);
        if !root_tracks.is_empty() {
            playlists.push(Playlist::new(ROOT_PLAYLIST, root_tracks));
        }

        // Sibling listings go out concurrently; completions are independent
        // and a failure skips only its own directory.
        let listings = join_all(dirs.iter().map(|dir| self.client.list_entries(&dir.path))).await;

        for (dir, listing) in dirs.iter().zip(listings) {
            match listing {
                Ok(entries) => {
                    let tracks = self.tracks_from(entries);
                    if tracks.is_empty() {
                        debug!(dir = %dir.path, "No qualifying audio files, omitting directory");
                    } else {
                        playlists.push(Playlist::new(dir.name.clone(), tracks));
                    }
                }
                Err(e) => {
                    warn!(dir = %dir.path, error = %e, "Failed to list directory, skipping");
                }
            }
        }

        if playlists.is_empty() {
            debug!("Repository resolved to an empty library");
            Ok(LibraryOutcome::Empty)
        } else {
            debug!(playlists = playlists.len(), "Library resolved");
            Ok(LibraryOutcome::Library(Library::new(playlists)))
        }
    }

    fn tracks_from(&self, entries: Vec<RepoEntry>) -> Vec<Track> {
        entries
            .into_iter()
            .filter(|e| e.is_file() && is_audio_file(&e.name))
            .map(|e| {
                let url = self.client.raw_url(&e.path);
                Track {
                    name: e.name,
                    path: e.path,
                    url,
                }
            })
            .collect()
    }
}
