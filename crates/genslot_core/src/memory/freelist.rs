//! # Freelist
//!
//! FIFO queue of reclaimed slot indices.

use std::collections::VecDeque;

/// Queue of slot indices waiting to be reused.
///
/// Indices come back out in the order they were freed, so a slot that was
/// just released is reissued only after every slot released before it.
/// This widens the window before any one slot's generation is bumped again.
#[derive(Clone, Debug, Default)]
pub struct FreeList {
    queue: VecDeque<u32>,
}

impl FreeList {
    /// Creates an empty freelist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty freelist with room for `capacity` indices.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
        }
    }

    /// Returns the number of queued indices.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Checks if no index is waiting for reuse.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queues an index for reuse.
    #[inline]
    pub fn push(&mut self, index: u32) {
        debug_assert!(
            !self.queue.contains(&index),
            "index {index} freed twice"
        );
        self.queue.push_back(index);
    }

    /// Takes the oldest freed index.
    #[inline]
    pub fn pop(&mut self) -> Option<u32> {
        self.queue.pop_front()
    }

    /// Drops every queued index.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
