//! # Pooled containers for deferred events.
//!
//! A [`PooledEventSlot`] carries one deferred event from `queue` to the next
//! drain. Slots are taken from and returned to their type's
//! [`EventCache`](crate::subscribers::EventCache) free list, so steady-state
//! queueing does not allocate.
//!
//! ## Lifecycle
//! ```text
//! EventCache::create_queued_slot(data)   (pop free list or allocate)
//!        │
//!        ▼
//! StandardQueue / PriorityScheduler      (as Box<dyn QueuedSlot>)
//!        │
//!        ▼
//! DrainGuard: dispatch() ─► release()    (release runs on every exit path)
//!        │
//!        ▼
//! EventCache::return_queued_slot(slot)   (data cleared, pushed back unless full)
//! ```

use std::rc::Weak;

use crate::events::Event;
use crate::subscribers::EventCache;

/// Reusable container for one deferred event.
pub struct PooledEventSlot<E: Event> {
    data: Option<E>,
    cache: Weak<EventCache<E>>,
}

impl<E: Event> PooledEventSlot<E> {
    pub(crate) fn new(cache: Weak<EventCache<E>>) -> Self {
        Self { data: None, cache }
    }

    pub(crate) fn set(&mut self, data: E) {
        self.data = Some(data);
    }

    /// Clears the payload so nothing stale is observable on reuse.
    pub(crate) fn clear(&mut self) {
        self.data = None;
    }

    /// Payload currently held, if any.
    pub fn data(&self) -> Option<&E> {
        self.data.as_ref()
    }
}

/// Type-erased view of a pending slot, as held by the pending structures.
pub(crate) trait QueuedSlot {
    /// Fans the payload out to the owning cache's subscribers.
    fn dispatch(&self);

    /// Returns the slot to its owning cache's pool (or drops it if the cache is gone).
    fn release(self: Box<Self>);
}

impl<E: Event> QueuedSlot for PooledEventSlot<E> {
    fn dispatch(&self) {
        if let (Some(data), Some(cache)) = (self.data, self.cache.upgrade()) {
            cache.publish(&data);
        }
    }

    fn release(self: Box<Self>) {
        if let Some(cache) = self.cache.upgrade() {
            cache.return_queued_slot(self);
        }
    }
}

/// Processes one drained slot and returns it to its pool, even if dispatch unwinds.
pub(crate) struct DrainGuard {
    slot: Option<Box<dyn QueuedSlot>>,
}

impl DrainGuard {
    pub(crate) fn new(slot: Box<dyn QueuedSlot>) -> Self {
        Self { slot: Some(slot) }
    }

    pub(crate) fn process(self) {
        if let Some(slot) = self.slot.as_ref() {
            slot.dispatch();
        }
    }
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            slot.release();
        }
    }
}
