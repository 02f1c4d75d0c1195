//! Play-next queue
//!
//! A FIFO of weak references into the library, independent of the
//! currently selected playlist. Entries are best-effort, not contracts:
//! an entry whose playlist or index no longer resolves against the live
//! library is dropped silently on dequeue.

use crate::types::QueueEntry;
use reel_core::Library;
use std::collections::VecDeque;
use tracing::debug;

/// Ordered list of pending `(playlist, index)` references.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    entries: VecDeque<QueueEntry>,
}

impl Queue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to the back of the queue.
    pub fn enqueue(&mut self, playlist: impl Into<String>, index: usize) {
        self.entries.push_back(QueueEntry {
            playlist: playlist.into(),
            index,
        });
    }

    /// Pop the first entry that still resolves against `library`.
    ///
    /// Entries referencing a removed playlist or an out-of-range index
    /// are discarded on the way, not surfaced as errors.
    pub fn dequeue_next(&mut self, library: &Library) -> Option<QueueEntry> {
        while let Some(entry) = self.entries.pop_front() {
            if library.contains(&entry.playlist, entry.index) {
                return Some(entry);
            }
            debug!(
                playlist = %entry.playlist,
                index = entry.index,
                "Dropping stale queue entry"
            );
        }
        None
    }

    /// Pending entries in play order.
    pub fn entries(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    /// Number of pending entries (stale ones included until dequeued).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every pending entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_core::{Playlist, Track};

    fn track(name: &str) -> Track {
        Track {
            name: name.to_string(),
            path: format!("Mix/{name}"),
            url: format!("https://x/Mix/{name}"),
        }
    }

    fn library() -> Library {
        Library::new(vec![Playlist::new(
            "Mix",
            vec![track("a.mp3"), track("b.mp3")],
        )])
    }

    #[test]
    fn dequeues_in_fifo_order() {
        let mut queue = Queue::new();
        queue.enqueue("Mix", 1);
        queue.enqueue("Mix", 0);

        let library = library();
        assert_eq!(queue.dequeue_next(&library).unwrap().index, 1);
        assert_eq!(queue.dequeue_next(&library).unwrap().index, 0);
        assert!(queue.dequeue_next(&library).is_none());
    }

    #[test]
    fn stale_entries_are_dropped_silently() {
        let mut queue = Queue::new();
        queue.enqueue("Gone", 0); // playlist no longer exists
        queue.enqueue("Mix", 7); // index out of range
        queue.enqueue("Mix", 1); // still valid

        let entry = queue.dequeue_next(&library()).unwrap();
        assert_eq!(entry.playlist, "Mix");
        assert_eq!(entry.index, 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn all_stale_entries_drain_to_none() {
        let mut queue = Queue::new();
        queue.enqueue("Gone", 0);
        queue.enqueue("Gone", 1);

        assert!(queue.dequeue_next(&library()).is_none());
        assert!(queue.is_empty());
    }
}
