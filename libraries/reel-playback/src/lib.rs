//! Reel Player - Playback Management
//!
//! The playback state machine and play queue driving a single streaming
//! audio sink.
//!
//! This crate provides:
//! - [`PlaybackController`]: transport state machine (idle / loading /
//!   playing / paused / errored), same-track toggle semantics, bounded
//!   auto-skip recovery for broken tracks, wraparound navigation, clamped
//!   seeking with a gesture guard, and progress reporting
//! - [`Queue`]: a FIFO of weak library references consumed as "play next"
//!   entries, validated against the live library on dequeue
//! - [`AudioSink`]: the platform seam — implementors stream a URL and
//!   report position, duration, and completion
//! - [`PlaybackEvent`]: change notifications drained by the presentation
//!   layer
//!
//! # Architecture
//!
//! The controller is the only owner of the sink: the presentation layer
//! reads snapshots ([`PlaybackController::status`],
//! [`PlaybackController::progress`]) and issues commands, and no other
//! mutation path exists. Loading is split into `begin_load` /
//! `finish_load` around an awaited sink call; each `begin_load` stamps a
//! new generation, and a completion carrying a stale generation is
//! discarded, so a superseded selection can never claim "now playing".
//!
//! # Example
//!
//! ```rust
//! use reel_core::{Library, Playlist, Track};
//! use reel_playback::PlaybackController;
//!
//! # fn library() -> Library {
//! #     Library::new(vec![Playlist::new(
//! #         "Mix",
//! #         vec![Track {
//! #             name: "a.mp3".into(),
//! #             path: "Mix/a.mp3".into(),
//! #             url: "https://example.com/Mix/a.mp3".into(),
//! #         }],
//! #     )])
//! # }
//! # struct NullSink;
//! # #[async_trait::async_trait]
//! # impl reel_playback::AudioSink for NullSink {
//! #     async fn load(&mut self, _url: &str) -> reel_playback::SinkResult<Option<std::time::Duration>> {
//! #         Ok(None)
//! #     }
//! #     fn pause(&mut self) {}
//! #     fn resume(&mut self) {}
//! #     fn stop(&mut self) {}
//! #     fn seek(&mut self, _position: std::time::Duration) -> reel_playback::SinkResult<()> {
//! #         Ok(())
//! #     }
//! #     fn position(&self) -> std::time::Duration { std::time::Duration::ZERO }
//! #     fn duration(&self) -> Option<std::time::Duration> { None }
//! #     fn finished(&self) -> bool { false }
//! #     async fn probe_duration(&self, _url: &str) -> Option<std::time::Duration> { None }
//! # }
//! # async fn demo() -> reel_playback::Result<()> {
//! let mut controller = PlaybackController::new(library(), NullSink);
//! controller.select_track("Mix", 0).await?;
//! controller.toggle_play_pause();
//! controller.next().await?;
//! # Ok(())
//! # }
//! ```

mod controller;
mod error;
mod events;
mod queue;
mod sink;
mod types;

pub use controller::{LoadResolution, LoadToken, PlaybackController};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use queue::Queue;
pub use sink::{AudioSink, DurationCache, SinkError, SinkResult};
pub use types::{AdvancePolicy, PlaybackConfig, PlaybackStatus, Progress, QueueEntry, Transport};
