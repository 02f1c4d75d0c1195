//! Reel Player Core
//!
//! Domain types shared by every Reel Player crate.
//!
//! The core crate defines the resolved music library — [`Track`],
//! [`Playlist`], [`Library`] — along with the audio-extension filter used
//! when resolving a repository tree and the `mm:ss` timestamp formatting
//! used by progress displays.
//!
//! A [`Library`] is a snapshot: it is built once per repository load and
//! replaced wholesale on reload. Everything that points back into it
//! (queue entries, the current selection) does so by playlist name and
//! index, and revalidates against the live snapshot before dereferencing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod time;
pub mod types;

pub use time::{format_duration, format_timestamp};
pub use types::{is_audio_file, Library, Playlist, Track, AUDIO_EXTENSIONS, ROOT_PLAYLIST};
