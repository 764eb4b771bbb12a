use std::collections::VecDeque;

use scrimsync_protocol::types::CaptureFolderRef;

/// Ordered collection of pending uploads, FIFO, insertion order preserved.
///
/// Invariant: no two entries with the same `(folder, user_id)` pair
/// coexist in the queue.
#[derive(Debug, Default)]
pub struct UploadQueue {
    items: VecDeque<CaptureFolderRef>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item` unless an equal entry is already queued.
    ///
    /// Returns whether an append occurred. Callers must also check the
    /// in-flight upload before admitting; the queue only knows its own
    /// contents.
    pub fn enqueue(&mut self, item: CaptureFolderRef) -> bool {
        if self.contains(&item) {
            return false;
        }
        self.items.push_back(item);
        true
    }

    /// Removes and returns the head of the queue, if any.
    pub fn dequeue_next(&mut self) -> Option<CaptureFolderRef> {
        self.items.pop_front()
    }

    /// Re-inserts an interrupted in-flight item at the head, preserving
    /// its priority over later-arrived work.
    pub fn requeue_front(&mut self, item: CaptureFolderRef) {
        if !self.contains(&item) {
            self.items.push_front(item);
        }
    }

    /// Whether an equal entry is already queued.
    pub fn contains(&self, item: &CaptureFolderRef) -> bool {
        self.items.contains(item)
    }

    /// Observable queue depth.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
