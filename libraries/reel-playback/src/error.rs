//! Error types for playback management.

use thiserror::Error;

/// Playback errors.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Requested playlist is not in the library
    #[error("Playlist not found: {0:?}")]
    PlaylistNotFound(String),

    /// Requested index is outside the playlist
    #[error("Track index {index} out of bounds for playlist {playlist:?}")]
    IndexOutOfBounds {
        /// Playlist the index was resolved against
        playlist: String,
        /// Offending index
        index: usize,
    },

    /// Every track in the playlist failed to load; recovery gave up after
    /// one full lap
    #[error("No playable track in playlist {playlist:?} after {attempts} attempts")]
    PlaylistExhausted {
        /// Playlist that was exhausted
        playlist: String,
        /// Number of load attempts made (equals the playlist length)
        attempts: usize,
    },

    /// Operation requires a loaded track
    #[error("No track loaded")]
    NoTrackLoaded,

    /// The audio sink rejected an operation
    #[error("Audio sink error: {0}")]
    Sink(String),
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
