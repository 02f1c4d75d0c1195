//! Playback controller - transport state machine
//!
//! Owns the audio sink, the library snapshot, and the play queue, and is
//! the single mutation path for all of them. The presentation layer calls
//! the command methods and reads snapshots; nothing else touches the sink.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::queue::Queue;
use crate::sink::{AudioSink, DurationCache, SinkError};
use crate::types::{AdvancePolicy, PlaybackConfig, PlaybackStatus, Progress, Transport};
use reel_core::{Library, Track};
use std::time::Duration;
use tracing::{debug, warn};

/// Ticket for one in-flight load.
///
/// Stamped by [`PlaybackController::begin_load`] with the load generation
/// current at issue time. [`PlaybackController::finish_load`] applies a
/// completion only while its token is still the newest — a later
/// `begin_load` supersedes every earlier token, so a stale completion
/// cannot overwrite the winning selection no matter when it arrives.
#[derive(Debug)]
pub struct LoadToken {
    generation: u64,
    playlist: String,
    index: usize,
    url: String,
}

impl LoadToken {
    /// URL the sink should stream for this load.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// How a load completion was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadResolution {
    /// The track is now playing
    Playing,

    /// A newer selection superseded this load; the completion was
    /// discarded
    Superseded,

    /// The track failed to load
    Failed,
}

/// Central playback state machine wrapping one audio sink.
pub struct PlaybackController<S: AudioSink> {
    library: Library,
    queue: Queue,
    sink: S,
    durations: DurationCache,
    policy: AdvancePolicy,

    playlist: Option<String>,
    index: Option<usize>,
    transport: Transport,
    duration: Option<Duration>,

    generation: u64,
    seeking: bool,
    last_position: Duration,

    pending_events: Vec<PlaybackEvent>,
}

impl<S: AudioSink> PlaybackController<S> {
    /// Create a controller with the default configuration.
    pub fn new(library: Library, sink: S) -> Self {
        Self::with_config(library, sink, PlaybackConfig::default())
    }

    /// Create a controller with an explicit configuration.
    pub fn with_config(library: Library, sink: S, config: PlaybackConfig) -> Self {
        Self {
            library,
            queue: Queue::new(),
            sink,
            durations: DurationCache::new(),
            policy: config.advance_policy,
            playlist: None,
            index: None,
            transport: Transport::Idle,
            duration: None,
            generation: 0,
            seeking: false,
            last_position: Duration::ZERO,
            pending_events: Vec::new(),
        }
    }

    // === Read accessors (the presentation boundary) ===

    /// The library snapshot playback runs against.
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// The pending play-next queue.
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Read-only snapshot of the playback state.
    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            playlist: self.playlist.clone(),
            index: self.index,
            transport: self.transport,
            position: self.last_position,
            duration: self.duration,
        }
    }

    /// The currently selected track, if the selection still resolves.
    pub fn current_track(&self) -> Option<&Track> {
        match (&self.playlist, self.index) {
            (Some(playlist), Some(index)) => self.library.track(playlist, index),
            _ => None,
        }
    }

    /// Current progress for rendering a position indicator.
    ///
    /// While a seek gesture is in progress the last reported position is
    /// repeated instead of the live sink position, so the indicator does
    /// not fight the drag.
    pub fn progress(&mut self) -> Progress {
        if !self.seeking {
            self.last_position = self.sink.position();
        }
        Progress {
            position: self.last_position,
            duration: self.duration,
        }
    }

    /// Drain the events accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // === Commands ===

    /// Select and play a track.
    ///
    /// Re-selecting the current track toggles instead of restarting:
    /// playing → paused, paused → playing. Any other selection starts a
    /// fresh load; if the track fails, recovery auto-advances through the
    /// playlist (with wraparound) and gives up with
    /// [`PlaybackError::PlaylistExhausted`] after one full lap.
    pub async fn select_track(&mut self, playlist: &str, index: usize) -> Result<()> {
        if !self.library.contains(playlist, index) {
            return Err(if self.library.playlist(playlist).is_none() {
                PlaybackError::PlaylistNotFound(playlist.to_string())
            } else {
                PlaybackError::IndexOutOfBounds {
                    playlist: playlist.to_string(),
                    index,
                }
            });
        }

        // Same-track toggle semantics. A re-select while Loading or
        // Errored falls through and supersedes instead.
        if self.is_current(playlist, index) {
            match self.transport {
                Transport::Playing => {
                    self.pause();
                    return Ok(());
                }
                Transport::Paused => {
                    self.resume();
                    return Ok(());
                }
                Transport::Idle | Transport::Loading | Transport::Errored => {}
            }
        }

        self.play_from(playlist.to_string(), index).await
    }

    /// Toggle between playing and paused. No-op in any other state.
    pub fn toggle_play_pause(&mut self) {
        match self.transport {
            Transport::Playing => self.pause(),
            Transport::Paused => self.resume(),
            Transport::Idle | Transport::Loading | Transport::Errored => {}
        }
    }

    /// Advance to the next track.
    ///
    /// Wraps around at the end of the playlist. Under
    /// [`AdvancePolicy::QueueFirst`], a pending queue entry is consumed
    /// at the boundary instead of wrapping. No-op without a current
    /// playlist.
    pub async fn next(&mut self) -> Result<()> {
        let Some((playlist, index)) = self.current() else {
            return Ok(());
        };
        let Some(len) = self.playlist_len(&playlist) else {
            return Ok(());
        };

        let at_boundary = index + 1 >= len;
        if at_boundary && self.policy == AdvancePolicy::QueueFirst {
            if let Some(entry) = self.queue.dequeue_next(&self.library) {
                self.push_event(PlaybackEvent::QueueChanged {
                    length: self.queue.len(),
                });
                return self.play_from(entry.playlist, entry.index).await;
            }
        }

        self.play_from(playlist, next_index(index, len)).await
    }

    /// Go back to the previous track, wrapping around at index 0.
    /// No-op without a current playlist.
    pub async fn previous(&mut self) -> Result<()> {
        let Some((playlist, index)) = self.current() else {
            return Ok(());
        };
        let Some(len) = self.playlist_len(&playlist) else {
            return Ok(());
        };

        self.play_from(playlist, previous_index(index, len)).await
    }

    /// Mark the start of a user seek gesture.
    ///
    /// Position reports freeze until the gesture commits via
    /// [`seek`](Self::seek), so reporting cannot feed back into the
    /// in-progress gesture.
    pub fn begin_seek_gesture(&mut self) {
        self.seeking = true;
    }

    /// Seek to `target_secs`, clamped into `[0, duration]`.
    ///
    /// Permitted only while a track is loaded (playing or paused). Also
    /// commits a pending seek gesture.
    pub fn seek(&mut self, target_secs: f64) -> Result<()> {
        if !matches!(self.transport, Transport::Playing | Transport::Paused) {
            return Err(PlaybackError::NoTrackLoaded);
        }

        let mut target = if target_secs.is_finite() {
            target_secs.max(0.0)
        } else {
            0.0
        };
        if let Some(duration) = self.duration {
            target = target.min(duration.as_secs_f64());
        }

        let position = Duration::from_secs_f64(target);
        self.sink
            .seek(position)
            .map_err(|e| PlaybackError::Sink(e.to_string()))?;
        self.last_position = position;
        self.seeking = false;
        Ok(())
    }

    /// Append a track to the play-next queue.
    pub fn enqueue(&mut self, playlist: &str, index: usize) -> Result<()> {
        if !self.library.contains(playlist, index) {
            return Err(if self.library.playlist(playlist).is_none() {
                PlaybackError::PlaylistNotFound(playlist.to_string())
            } else {
                PlaybackError::IndexOutOfBounds {
                    playlist: playlist.to_string(),
                    index,
                }
            });
        }
        self.queue.enqueue(playlist, index);
        self.push_event(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
        Ok(())
    }

    /// Drive end-of-track advance and periodic position reporting.
    ///
    /// Call from the event loop. When the sink reports the current track
    /// finished, advances exactly like [`next`](Self::next); otherwise
    /// emits a position update while playing.
    pub async fn tick(&mut self) -> Result<()> {
        if self.transport != Transport::Playing {
            return Ok(());
        }
        if self.sink.finished() {
            return self.next().await;
        }
        let position_ms = self.sink.position().as_millis() as u64;
        let duration_ms = self.duration.map(|d| d.as_millis() as u64);
        self.push_event(PlaybackEvent::PositionUpdate {
            position_ms,
            duration_ms,
        });
        Ok(())
    }

    /// Replace the library snapshot (after a reload).
    ///
    /// A current selection that no longer resolves is cleared and the
    /// sink stopped; duration probes are dropped with the old snapshot.
    /// Queue entries are left in place — they revalidate on dequeue.
    pub fn set_library(&mut self, library: Library) {
        self.library = library;
        self.durations.clear();

        let still_valid = match (&self.playlist, self.index) {
            (Some(playlist), Some(index)) => self.library.contains(playlist, index),
            _ => true,
        };
        if !still_valid {
            debug!("Current selection no longer resolves after reload, stopping");
            self.sink.stop();
            self.playlist = None;
            self.index = None;
            self.duration = None;
            self.last_position = Duration::ZERO;
            self.set_transport(Transport::Idle);
        }
    }

    /// Probe the duration of a library track, memoised per track path.
    pub async fn probe_duration(&mut self, playlist: &str, index: usize) -> Option<Duration> {
        let track = self.library.track(playlist, index)?;
        let (path, url) = (track.path.clone(), track.url.clone());
        self.durations.probe(&self.sink, &path, &url).await
    }

    // === Load lifecycle ===

    /// Start loading `(playlist, index)`: transition to `Loading` and
    /// stamp a new generation.
    ///
    /// The returned token must be handed back to
    /// [`finish_load`](Self::finish_load) together with the sink outcome.
    pub fn begin_load(&mut self, playlist: &str, index: usize) -> Result<LoadToken> {
        let track = self
            .library
            .track(playlist, index)
            .ok_or_else(|| PlaybackError::IndexOutOfBounds {
                playlist: playlist.to_string(),
                index,
            })?;
        let url = track.url.clone();

        self.generation += 1;
        self.playlist = Some(playlist.to_string());
        self.index = Some(index);
        self.duration = None;
        self.last_position = Duration::ZERO;
        self.seeking = false;
        self.set_transport(Transport::Loading);

        Ok(LoadToken {
            generation: self.generation,
            playlist: playlist.to_string(),
            index,
            url,
        })
    }

    /// Apply a load completion.
    ///
    /// A token superseded by a newer [`begin_load`](Self::begin_load) is
    /// discarded regardless of its outcome — the state set by the newer
    /// load stands.
    pub fn finish_load(
        &mut self,
        token: LoadToken,
        outcome: std::result::Result<Option<Duration>, SinkError>,
    ) -> LoadResolution {
        if token.generation != self.generation {
            debug!(
                playlist = %token.playlist,
                index = token.index,
                "Ignoring stale load completion"
            );
            return LoadResolution::Superseded;
        }

        match outcome {
            Ok(duration) => {
                self.duration = duration.or_else(|| self.sink.duration());
                self.set_transport(Transport::Playing);
                let name = self
                    .library
                    .track(&token.playlist, token.index)
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                self.push_event(PlaybackEvent::TrackChanged {
                    playlist: token.playlist,
                    index: token.index,
                    name,
                });
                LoadResolution::Playing
            }
            Err(e) => {
                warn!(
                    playlist = %token.playlist,
                    index = token.index,
                    error = %e,
                    "Track failed to load"
                );
                self.set_transport(Transport::Errored);
                self.push_event(PlaybackEvent::TrackFailed {
                    playlist: token.playlist,
                    index: token.index,
                    message: e.to_string(),
                });
                LoadResolution::Failed
            }
        }
    }

    // === Internals ===

    /// Load `start_index`, skipping forward with wraparound on failure.
    ///
    /// Makes at most one attempt per track in the playlist; a full lap
    /// without a playable track is a hard failure.
    async fn play_from(&mut self, playlist: String, start_index: usize) -> Result<()> {
        let Some(len) = self.playlist_len(&playlist) else {
            return Err(PlaybackError::PlaylistNotFound(playlist));
        };

        for attempt in 0..len {
            let index = (start_index + attempt) % len;
            let token = self.begin_load(&playlist, index)?;
            let outcome = self.sink.load(token.url()).await;
            match self.finish_load(token, outcome) {
                LoadResolution::Playing | LoadResolution::Superseded => return Ok(()),
                LoadResolution::Failed => {}
            }
        }

        self.set_transport(Transport::Errored);
        self.push_event(PlaybackEvent::PlaylistExhausted {
            playlist: playlist.clone(),
        });
        Err(PlaybackError::PlaylistExhausted {
            playlist,
            attempts: len,
        })
    }

    fn pause(&mut self) {
        self.sink.pause();
        self.set_transport(Transport::Paused);
    }

    fn resume(&mut self) {
        self.sink.resume();
        self.set_transport(Transport::Playing);
    }

    fn is_current(&self, playlist: &str, index: usize) -> bool {
        self.playlist.as_deref() == Some(playlist) && self.index == Some(index)
    }

    fn current(&self) -> Option<(String, usize)> {
        Some((self.playlist.clone()?, self.index?))
    }

    /// Length of a playlist, `None` when missing or empty.
    fn playlist_len(&self, playlist: &str) -> Option<usize> {
        match self.library.playlist(playlist) {
            Some(p) if !p.is_empty() => Some(p.len()),
            _ => None,
        }
    }

    fn set_transport(&mut self, transport: Transport) {
        if self.transport != transport {
            self.transport = transport;
            self.push_event(PlaybackEvent::StateChanged { transport });
        }
    }

    fn push_event(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }
}

/// Next index with wraparound.
fn next_index(index: usize, len: usize) -> usize {
    (index + 1) % len
}

/// Previous index with wraparound.
fn previous_index(index: usize, len: usize) -> usize {
    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

#[cfg(test)]
mod tests {
    use super::{next_index, previous_index};
    use proptest::prelude::*;

    #[test]
    fn wraparound_at_the_edges() {
        assert_eq!(next_index(2, 3), 0);
        assert_eq!(previous_index(0, 3), 2);
        assert_eq!(next_index(0, 1), 0);
        assert_eq!(previous_index(0, 1), 0);
    }

    proptest! {
        #[test]
        fn navigation_stays_in_bounds(index in 0usize..64, len in 1usize..64) {
            let index = index % len;
            prop_assert!(next_index(index, len) < len);
            prop_assert!(previous_index(index, len) < len);
        }

        #[test]
        fn previous_undoes_next(index in 0usize..64, len in 1usize..64) {
            let index = index % len;
            prop_assert_eq!(previous_index(next_index(index, len), len), index);
            prop_assert_eq!(next_index(previous_index(index, len), len), index);
        }
    }
}
