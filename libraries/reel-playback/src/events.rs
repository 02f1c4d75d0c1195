//! Playback events
//!
//! Change notifications accumulated on the controller and drained by the
//! presentation layer
//! ([`PlaybackController::take_events`](crate::PlaybackController::take_events)).

use crate::types::Transport;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Transport state changed
    StateChanged {
        /// The new transport state
        transport: Transport,
    },

    /// A different track became the current one
    TrackChanged {
        /// Playlist the track belongs to
        playlist: String,
        /// Track index within the playlist
        index: usize,
        /// Track name, for display
        name: String,
    },

    /// One track failed to load or play; recovery skipped past it
    TrackFailed {
        /// Playlist the track belongs to
        playlist: String,
        /// Track index within the playlist
        index: usize,
        /// Sink-reported failure
        message: String,
    },

    /// Every track in the playlist failed; playback gave up
    PlaylistExhausted {
        /// The exhausted playlist
        playlist: String,
    },

    /// Queue contents changed (entry added or consumed)
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Periodic position report while playing
    PositionUpdate {
        /// Current position in milliseconds
        position_ms: u64,
        /// Track duration in milliseconds, when known
        duration_ms: Option<u64>,
    },
}
