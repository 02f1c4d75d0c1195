//! Library domain types

use serde::{Deserialize, Serialize};

/// Name of the synthetic playlist collecting loose audio files found at the
/// repository root. Always listed first when present.
pub const ROOT_PLAYLIST: &str = "Root";

/// File extensions that qualify a repository file as a playable track.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a"];

/// Check whether a file name carries one of the supported audio extensions.
///
/// Matching is case-insensitive (`Song.MP3` qualifies). Files without an
/// extension never qualify.
pub fn is_audio_file(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.iter().any(|e| *e == ext)
        })
        .unwrap_or(false)
}

/// One playable audio file resolved from the repository.
///
/// Immutable once constructed; owned by the [`Library`] that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// File name, as listed by the repository
    pub name: String,

    /// Repository-relative path
    pub path: String,

    /// Fully resolved streamable URL
    pub url: String,
}

/// An ordered sequence of tracks keyed by a directory name.
///
/// Track order matches the repository listing order and is stable for the
/// lifetime of the owning [`Library`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Directory name, or [`ROOT_PLAYLIST`] for loose root files
    pub name: String,

    /// Tracks in repository listing order
    pub tracks: Vec<Track>,
}

impl Playlist {
    /// Create a playlist from a name and its tracks.
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        Self {
            name: name.into(),
            tracks,
        }
    }

    /// Number of tracks in the playlist.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the playlist holds no tracks.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// The full set of playlists resolved from one repository snapshot.
///
/// Playlist names are unique and their order establishes the display and
/// navigation order. Built once per load; immutable until the next reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    playlists: Vec<Playlist>,
}

impl Library {
    /// Create a library from an ordered list of playlists.
    ///
    /// Duplicate playlist names resolve to the first occurrence on lookup;
    /// the resolver never produces duplicates.
    pub fn new(playlists: Vec<Playlist>) -> Self {
        Self { playlists }
    }

    /// All playlists in display order.
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    /// Playlist names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.playlists.iter().map(|p| p.name.as_str())
    }

    /// Look up a playlist by name.
    pub fn playlist(&self, name: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.name == name)
    }

    /// Look up a track by playlist name and index.
    pub fn track(&self, playlist: &str, index: usize) -> Option<&Track> {
        self.playlist(playlist).and_then(|p| p.tracks.get(index))
    }

    /// Whether `(playlist, index)` resolves to a live track.
    pub fn contains(&self, playlist: &str, index: usize) -> bool {
        self.track(playlist, index).is_some()
    }

    /// Number of playlists.
    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    /// Whether the library holds no playlists.
    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }
}
