//! # FIFO tier for neutral-priority deferred events.

use std::collections::VecDeque;

/// Arrival-ordered queue of pending entries.
#[derive(Debug)]
pub struct StandardQueue<T> {
    items: VecDeque<T>,
}

impl<T> StandardQueue<T> {
    /// Creates an empty queue with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends an entry at the back.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.items.push_back(value);
    }

    /// Removes the oldest entry.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Default for StandardQueue<T> {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}
