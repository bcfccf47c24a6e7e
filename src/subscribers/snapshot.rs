//! # Reusable dispatch buffers.
//!
//! Each publish copies the live subscribers into a scratch buffer before
//! invoking anyone, so handlers may subscribe or dispose during dispatch.
//! Buffers come from a small per-cache pool: nested publishes of the same type
//! (a handler publishing again) each take their own buffer, and released
//! buffers keep their capacity for the next dispatch.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

/// Buffers kept around for reuse; extra buffers from deep nesting are dropped.
const MAX_IDLE_BUFFERS: usize = 8;

/// Pool of scratch buffers.
pub(crate) struct SnapshotPool<T> {
    idle: RefCell<Vec<Vec<T>>>,
}

impl<T> SnapshotPool<T> {
    pub(crate) fn new() -> Self {
        Self {
            idle: RefCell::new(Vec::new()),
        }
    }

    /// Takes an empty buffer with room for at least `capacity` items.
    pub(crate) fn acquire(&self, capacity: usize) -> Snapshot<'_, T> {
        let mut buf = self.idle.borrow_mut().pop().unwrap_or_default();
        buf.reserve(capacity);
        Snapshot { buf, pool: self }
    }

    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.idle.borrow().len()
    }
}

/// Buffer on loan from a [`SnapshotPool`]; cleared and returned on drop.
pub(crate) struct Snapshot<'a, T> {
    buf: Vec<T>,
    pool: &'a SnapshotPool<T>,
}

impl<T> Deref for Snapshot<'_, T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl<T> DerefMut for Snapshot<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl<T> Drop for Snapshot<'_, T> {
    fn drop(&mut self) {
        // items may run arbitrary drop code; clear before touching the pool
        self.buf.clear();
        let buf = std::mem::take(&mut self.buf);
        let mut idle = self.pool.idle.borrow_mut();
        if idle.len() < MAX_IDLE_BUFFERS {
            idle.push(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_is_reused_with_capacity() {
        let pool = SnapshotPool::<u32>::new();
        {
            let mut s = pool.acquire(16);
            s.extend(0..16);
            assert_eq!(s.len(), 16);
        }
        assert_eq!(pool.idle(), 1);

        let s = pool.acquire(4);
        assert!(s.is_empty());
        assert!(s.capacity() >= 16);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_nested_loans_get_distinct_buffers() {
        let pool = SnapshotPool::<u8>::new();
        let mut outer = pool.acquire(2);
        outer.push(1);
        {
            let mut inner = pool.acquire(2);
            inner.push(2);
            assert_eq!(outer.as_slice(), &[1]);
        }
        drop(outer);
        assert_eq!(pool.idle(), 2);
    }
}
