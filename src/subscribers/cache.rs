//! # EventCache: per-type subscriber set, slot pool and fan-out
//!
//! One [`EventCache`] exists per event type for the lifetime of the hub. It
//! owns the subscribers of that type, the free list of pooled slots and the
//! scratch buffers used for dispatch.
//!
//! ## What it guarantees
//! - `publish` snapshots live subscribers first, then calls each one in
//!   snapshot (= subscription) order.
//! - Subscribing or disposing from inside a handler never corrupts the
//!   running dispatch; a subscription disposed mid-dispatch gets no further calls.
//! - Panics inside handlers are caught per handler and reported through
//!   [`Host::log_error`]; the remaining handlers still run.
//! - Steady-state publish and queue cycles do not allocate.
//!
//! ## Diagram
//! ```text
//!    publish(&E)
//!        │  snapshot live subscribers ──► [scratch buffer]
//!        ├──► alive? ─► handler(&E)  (catch_unwind)
//!        ├──► alive? ─► handler(&E)  (catch_unwind)
//!        └──► alive? ─► handler(&E)  (catch_unwind)
//!        buffer cleared and returned to the pool
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use crate::events::{Event, Handler, Lifetime, PooledEventSlot};
use crate::host::Host;

use super::snapshot::SnapshotPool;
use super::Subscription;

/// Subscribers, pooled slots and dispatch buffers for event type `E`.
pub struct EventCache<E: Event> {
    me: Weak<EventCache<E>>,
    host: Rc<dyn Host>,
    subscribers: RefCell<BTreeMap<u64, Rc<Subscription<E>>>>,
    next_id: Cell<u64>,
    pool: RefCell<Vec<Box<PooledEventSlot<E>>>>,
    pool_capacity: usize,
    pool_floor: usize,
    snapshots: SnapshotPool<Rc<Subscription<E>>>,
}

impl<E: Event> EventCache<E> {
    /// Creates the cache for `E`.
    ///
    /// `pool_capacity` bounds the free list; `pool_floor` is the size below
    /// which [`Self::cleanup_pool`] never shrinks.
    pub(crate) fn new(host: Rc<dyn Host>, pool_capacity: usize, pool_floor: usize) -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            me: me.clone(),
            host,
            subscribers: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
            pool: RefCell::new(Vec::new()),
            pool_capacity,
            pool_floor,
            snapshots: SnapshotPool::new(),
        })
    }

    /// Registers `handler` and returns the new subscription.
    ///
    /// Registering the same handler twice yields two independent subscriptions.
    pub fn subscribe(&self, handler: &Handler<E>, lifetime: Lifetime) -> Rc<Subscription<E>> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let sub = Rc::new(Subscription::new(id, handler, lifetime, self.me.clone()));
        self.subscribers.borrow_mut().insert(id, Rc::clone(&sub));
        sub
    }

    /// Synchronous fan-out of `event` to every live subscriber.
    pub fn publish(&self, event: &E) {
        let snapshot = {
            let subs = self.subscribers.borrow();
            let mut snapshot = self.snapshots.acquire(subs.len());
            snapshot.extend(subs.values().filter(|s| s.is_alive()).cloned());
            snapshot
        };

        for sub in snapshot.iter() {
            self.invoke(sub, event);
        }
    }

    /// Calls one subscriber inside its own fault boundary.
    fn invoke(&self, sub: &Subscription<E>, event: &E) {
        // may have been disposed (or lost its handler) earlier in this dispatch
        if !sub.is_alive() {
            return;
        }
        let handler = match sub.handler() {
            Ok(h) => h,
            Err(err) => {
                self.host.log_error(&format!(
                    "[{}] subscription {}: {}",
                    err.as_label(),
                    sub.id(),
                    err.as_message()
                ));
                return;
            }
        };

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| (*handler)(event))) {
            self.host.log_error(&format!(
                "handler for {} panicked: {}",
                E::type_name(),
                panic_message(payload.as_ref())
            ));
        }
    }

    /// Takes a slot from the free list (or allocates one) and stores `data` in it.
    pub(crate) fn create_queued_slot(&self, data: E) -> Box<PooledEventSlot<E>> {
        let pooled = self.pool.borrow_mut().pop();
        let mut slot = pooled.unwrap_or_else(|| Box::new(PooledEventSlot::new(self.me.clone())));
        slot.set(data);
        slot
    }

    /// Clears `slot` and puts it back on the free list unless the pool is full.
    pub(crate) fn return_queued_slot(&self, mut slot: Box<PooledEventSlot<E>>) {
        slot.clear();
        let mut pool = self.pool.borrow_mut();
        if pool.len() < self.pool_capacity {
            pool.push(slot);
        }
    }

    /// Removes the subscription with `id`; no-op if absent.
    pub(crate) fn remove_subscription(&self, id: u64) {
        let removed = self.subscribers.borrow_mut().remove(&id);
        drop(removed);
    }

    /// Removes every subscription that is no longer alive; returns how many.
    pub fn cleanup_dead(&self) -> usize {
        let dead: Vec<u64> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|(_, s)| !s.is_alive())
            .map(|(id, _)| *id)
            .collect();
        if dead.is_empty() {
            return 0;
        }

        let removed: Vec<Rc<Subscription<E>>> = {
            let mut subs = self.subscribers.borrow_mut();
            dead.iter().filter_map(|id| subs.remove(id)).collect()
        };
        removed.len()
    }

    /// Shrinks the free list toward `max(floor, len / 2)`; returns how many slots were dropped.
    pub fn cleanup_pool(&self) -> usize {
        let mut pool = self.pool.borrow_mut();
        let target = self.pool_floor.max(pool.len() / 2);
        if pool.len() <= target {
            return 0;
        }
        let excess = pool.len() - target;
        pool.truncate(target);
        pool.shrink_to(target);
        excess
    }

    /// Number of registered subscriptions (alive or not yet swept).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Number of idle slots on the free list.
    pub fn pooled_slots(&self) -> usize {
        self.pool.borrow().len()
    }
}

/// Renders a panic payload for logging.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Type-erased maintenance surface stored in the type registry.
pub(crate) trait CacheMaintenance {
    fn cleanup_dead(&self) -> usize;
    fn cleanup_pool(&self) -> usize;
    fn subscriber_count(&self) -> usize;
    fn pooled_slots(&self) -> usize;
    fn event_name(&self) -> &'static str;
}

impl<E: Event> CacheMaintenance for EventCache<E> {
    fn cleanup_dead(&self) -> usize {
        EventCache::cleanup_dead(self)
    }

    fn cleanup_pool(&self) -> usize {
        EventCache::cleanup_pool(self)
    }

    fn subscriber_count(&self) -> usize {
        EventCache::subscriber_count(self)
    }

    fn pooled_slots(&self) -> usize {
        EventCache::pooled_slots(self)
    }

    fn event_name(&self) -> &'static str {
        E::type_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{handler, QueuedSlot};
    use crate::host::ManualHost;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Hit(u32);
    impl Event for Hit {}

    fn cache(host: &Rc<ManualHost>) -> Rc<EventCache<Hit>> {
        EventCache::new(host.clone(), 4, 2)
    }

    fn recorder() -> (Rc<RefCell<Vec<u32>>>, Handler<Hit>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        (seen, handler(move |e: &Hit| s.borrow_mut().push(e.0)))
    }

    #[test]
    fn test_publish_reaches_every_live_subscriber() {
        let host = ManualHost::new();
        let c = cache(&host);
        let (a, ha) = recorder();
        let (b, hb) = recorder();
        let _sa = c.subscribe(&ha, Lifetime::Weak);
        let _sb = c.subscribe(&hb, Lifetime::Strong);

        c.publish(&Hit(7));
        assert_eq!(*a.borrow(), vec![7]);
        assert_eq!(*b.borrow(), vec![7]);
    }

    #[test]
    fn test_same_handler_twice_is_two_entries() {
        let host = ManualHost::new();
        let c = cache(&host);
        let (seen, h) = recorder();
        let s1 = c.subscribe(&h, Lifetime::Strong);
        let _s2 = c.subscribe(&h, Lifetime::Strong);
        assert_eq!(c.subscriber_count(), 2);

        c.publish(&Hit(1));
        assert_eq!(*seen.borrow(), vec![1, 1]);

        s1.dispose();
        c.publish(&Hit(2));
        assert_eq!(*seen.borrow(), vec![1, 1, 2]);
    }

    #[test]
    fn test_panicking_handler_is_isolated() {
        let host = ManualHost::new();
        let c = cache(&host);
        let bad = handler(|_: &Hit| panic!("bad handler"));
        let (seen, good) = recorder();
        let _s1 = c.subscribe(&bad, Lifetime::Strong);
        let _s2 = c.subscribe(&good, Lifetime::Strong);

        c.publish(&Hit(3));
        assert_eq!(*seen.borrow(), vec![3]);

        let errors = host.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Hit"));
        assert!(errors[0].contains("bad handler"));
    }

    #[test]
    fn test_dispose_during_dispatch_skips_later_snapshot_entries() {
        let host = ManualHost::new();
        let c = cache(&host);
        let (seen, h2) = recorder();
        let victim: Rc<RefCell<Option<Rc<Subscription<Hit>>>>> = Rc::new(RefCell::new(None));

        let v = victim.clone();
        let h1 = handler(move |_: &Hit| {
            if let Some(sub) = v.borrow().as_ref() {
                sub.dispose();
            }
        });
        let _s1 = c.subscribe(&h1, Lifetime::Strong);
        let s2 = c.subscribe(&h2, Lifetime::Strong);
        *victim.borrow_mut() = Some(s2);

        c.publish(&Hit(9));
        assert!(seen.borrow().is_empty());
        assert_eq!(c.subscriber_count(), 1);
    }

    #[test]
    fn test_subscribe_during_dispatch_applies_to_next_publish() {
        let host = ManualHost::new();
        let c = cache(&host);
        let (seen, late) = recorder();

        let cc = Rc::downgrade(&c);
        let added = Rc::new(Cell::new(false));
        let first = handler(move |_: &Hit| {
            if let (false, Some(cache)) = (added.replace(true), cc.upgrade()) {
                cache.subscribe(&late, Lifetime::Strong);
            }
        });
        let _s = c.subscribe(&first, Lifetime::Strong);

        c.publish(&Hit(1));
        assert!(seen.borrow().is_empty());
        c.publish(&Hit(2));
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn test_cleanup_dead_removes_unreachable_weak() {
        let host = ManualHost::new();
        let c = cache(&host);
        let (_, weak) = recorder();
        let (_, strong) = recorder();
        let _w = c.subscribe(&weak, Lifetime::Weak);
        let _s = c.subscribe(&strong, Lifetime::Strong);

        assert_eq!(c.cleanup_dead(), 0);
        drop(weak);
        assert_eq!(c.subscriber_count(), 2);
        assert_eq!(c.cleanup_dead(), 1);
        assert_eq!(c.subscriber_count(), 1);
    }

    #[test]
    fn test_slots_are_cleared_and_bounded() {
        let host = ManualHost::new();
        let c = cache(&host);

        let slots: Vec<_> = (0..6).map(|i| c.create_queued_slot(Hit(i))).collect();
        assert_eq!(slots[5].data(), Some(&Hit(5)));
        for slot in slots {
            c.return_queued_slot(slot);
        }
        // capacity 4
        assert_eq!(c.pooled_slots(), 4);

        let reused = c.pool.borrow_mut().pop();
        let Some(reused) = reused else {
            panic!("pool should not be empty");
        };
        assert_eq!(reused.data(), None);
    }

    #[test]
    fn test_queued_slot_dispatch_and_release() {
        let host = ManualHost::new();
        let c = cache(&host);
        let (seen, h) = recorder();
        let _s = c.subscribe(&h, Lifetime::Strong);

        let slot: Box<dyn QueuedSlot> = c.create_queued_slot(Hit(42));
        slot.dispatch();
        slot.release();
        assert_eq!(*seen.borrow(), vec![42]);
        assert_eq!(c.pooled_slots(), 1);
    }

    #[test]
    fn test_cleanup_pool_halves_toward_floor() {
        let host = ManualHost::new();
        let c = EventCache::<Hit>::new(host.clone(), 100, 3);
        let slots: Vec<_> = (0..20).map(|i| c.create_queued_slot(Hit(i))).collect();
        for slot in slots {
            c.return_queued_slot(slot);
        }
        assert_eq!(c.cleanup_pool(), 10);
        assert_eq!(c.pooled_slots(), 10);
        assert_eq!(c.cleanup_pool(), 5);
        assert_eq!(c.cleanup_pool(), 2);
        assert_eq!(c.pooled_slots(), 3);
        assert_eq!(c.cleanup_pool(), 0);
        assert_eq!(c.pooled_slots(), 3);
    }
}
