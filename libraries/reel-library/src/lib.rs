//! Reel Player - Library Resolution
//!
//! Walks a repository tree exactly two levels deep and produces the
//! in-memory [`Library`](reel_core::Library): every root-level directory
//! containing audio files becomes a playlist, and loose audio files at the
//! root form the synthetic `Root` playlist, always listed first.
//!
//! The two-level bound is deliberate: nested subdirectories are not
//! explored.
//!
//! Failure handling follows the listing granularity. A root listing
//! failure aborts the build; a subdirectory listing failure is logged and
//! skips only that directory. A repository with no qualifying audio at all
//! is not an error — it resolves to [`LibraryOutcome::Empty`] so callers
//! can render a "nothing to play" state.

mod error;
mod resolver;

pub use error::{LibraryError, Result};
pub use resolver::{LibraryOutcome, LibraryResolver};
