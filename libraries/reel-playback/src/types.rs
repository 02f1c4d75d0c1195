//! Core types for playback management

use reel_core::{format_duration, format_timestamp};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transport state of the audio sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    /// No track loaded
    Idle,

    /// A track is being fetched/decoded
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track, position retained
    Paused,

    /// The last load or playback attempt failed
    Errored,
}

/// What `next()` consults first when the current playlist is exhausted.
///
/// The queue-versus-wraparound ordering is a policy choice, not an
/// emergent behavior; both variants are supported and tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdvancePolicy {
    /// At the playlist boundary, consume a pending queue entry before
    /// wrapping back to index 0. The default.
    #[default]
    QueueFirst,

    /// Always wrap within the current playlist; the queue is never
    /// consulted implicitly.
    WrapOnly,
}

/// Configuration for the playback controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Queue-versus-wraparound ordering at the playlist boundary
    pub advance_policy: AdvancePolicy,
}

/// A pending "play next" reference into the library.
///
/// Entries are weak: they hold a playlist name and index, never a track,
/// so a library reload naturally invalidates them. Validation happens on
/// dequeue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Playlist name the entry points into
    pub playlist: String,

    /// Track index within that playlist
    pub index: usize,
}

/// Read-only snapshot of the playback state.
///
/// Exactly one of these views exists per controller; it is the single
/// source of truth for what the sink is doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    /// Currently selected playlist, if any
    pub playlist: Option<String>,

    /// Currently selected track index, if any
    pub index: Option<usize>,

    /// Transport state
    pub transport: Transport,

    /// Playback position within the current track
    pub position: Duration,

    /// Duration of the current track, when known
    pub duration: Option<Duration>,
}

/// Progress snapshot for rendering a position indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Playback position within the current track
    pub position: Duration,

    /// Total track duration, when known
    pub duration: Option<Duration>,
}

impl Progress {
    /// Render as `mm:ss / mm:ss`, with unknown duration as `00:00`.
    pub fn label(&self) -> String {
        format!(
            "{} / {}",
            format_timestamp(self.position.as_secs_f64()),
            format_duration(self.duration)
        )
    }

    /// Fraction played in `[0, 1]`, when the duration is known and
    /// non-zero.
    pub fn fraction(&self) -> Option<f64> {
        let duration = self.duration?;
        if duration.is_zero() {
            return None;
        }
        Some((self.position.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0))
    }
}
