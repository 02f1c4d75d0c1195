//! Platform-agnostic audio sink trait
//!
//! Abstracts the one shared mutable audio resource. Implementors stream a
//! URL (the terminal player decodes fetched bytes with rodio; tests use a
//! scripted fake) and report position, duration, and completion back to
//! the controller.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Faults an audio sink can report for one track.
///
/// These are per-track conditions: the controller responds by skipping
/// forward, never by tearing itself down.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The source format is not playable by this sink
    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    /// The source was fetched but could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The source could not be fetched
    #[error("Network error: {0}")]
    Network(String),

    /// Seeking failed or is unsupported for the current source
    #[error("Seek failed: {0}")]
    Seek(String),
}

/// Result type for sink operations.
pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// The single streaming audio output.
///
/// Only the playback controller may call the mutating methods; the
/// presentation layer sees sink state exclusively through controller
/// snapshots.
#[async_trait]
pub trait AudioSink: Send {
    /// Assign `url` as the sink's source and start playback.
    ///
    /// Resolves once playback has started, reporting the track duration
    /// when the source metadata carries one.
    async fn load(&mut self, url: &str) -> SinkResult<Option<Duration>>;

    /// Pause playback, retaining the position.
    fn pause(&mut self);

    /// Resume paused playback.
    fn resume(&mut self);

    /// Stop playback and drop the current source.
    fn stop(&mut self);

    /// Seek within the current source.
    fn seek(&mut self, position: Duration) -> SinkResult<()>;

    /// Current playback position within the source.
    fn position(&self) -> Duration;

    /// Duration of the current source, when known.
    fn duration(&self) -> Option<Duration>;

    /// Whether the current source has played to completion.
    fn finished(&self) -> bool;

    /// Probe the duration of `url` without disturbing playback.
    ///
    /// `None` means unknown — unreachable, undecodable, or a format that
    /// does not carry a duration.
    async fn probe_duration(&self, url: &str) -> Option<Duration>;
}

/// Memoised duration probes, keyed by repository path.
///
/// Listing views want a duration per visible track; probing is a network
/// fetch, so each track is probed at most once per library snapshot.
#[derive(Debug, Default)]
pub struct DurationCache {
    entries: HashMap<String, Option<Duration>>,
}

impl DurationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe `url` through `sink`, memoising under `path`.
    ///
    /// Unknown outcomes are cached too: a track that failed to probe is
    /// not re-fetched every time a listing renders.
    pub async fn probe<S>(&mut self, sink: &S, path: &str, url: &str) -> Option<Duration>
    where
        S: AudioSink + ?Sized,
    {
        if let Some(cached) = self.entries.get(path) {
            return *cached;
        }
        let probed = sink.probe_duration(url).await;
        self.entries.insert(path.to_string(), probed);
        probed
    }

    /// Cached result for `path`, if probed before.
    pub fn get(&self, path: &str) -> Option<Option<Duration>> {
        self.entries.get(path).copied()
    }

    /// Drop all cached probes (on library reload).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
