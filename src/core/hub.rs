//! # Hub: typed publish/subscribe with deferred, prioritized delivery.
//!
//! The [`Hub`] orchestrates per-type caches, the two pending tiers and the
//! periodic maintenance driven by the host's tick.
//!
//! ## Architecture
//! ```text
//! publish(E) ───────────────────────────────► EventCache<E>::publish (now)
//!
//! queue(E, p) ─► EventCache<E>::create_queued_slot
//!                     │
//!                     ├─ p != 0 ─► PriorityScheduler (min-heap)
//!                     └─ p == 0 ─► StandardQueue (FIFO)
//!
//! Host tick ─► update()
//!               ├─► process_queued_events()
//!               │     ├─ drain PriorityScheduler (ascending priority)
//!               │     └─ drain StandardQueue     (arrival order)
//!               ├─► every `sweep_interval_ticks`: sweep_dead_subscriptions()
//!               └─► every `pool_shrink_interval`: shrink_pools()
//! ```
//!
//! ## Rules
//! - Every operation fails with [`HubError::Disposed`] after [`Hub::dispose`].
//! - Overflow and pressure are reported through the host and never returned as errors.
//! - No interior borrow is held while a handler runs: handlers may publish,
//!   queue, subscribe, unsubscribe or dispose re-entrantly.
//! - A queued event is delivered on the drain following its submission; events
//!   queued by handlers during a drain are picked up by the same drain when
//!   their tier has not been exhausted yet.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::core::{HubBuilder, HubConfig, TypeRegistry};
use crate::error::HubError;
use crate::events::{
    handler, DrainGuard, Event, Handler, Lifetime, PriorityScheduler, QueueOutcome, QueuedSlot,
    StandardQueue, NEUTRAL_PRIORITY,
};
use crate::host::Host;
use crate::subscribers::{CacheMaintenance, EventCache, SubscriptionHandle};

type PendingSlot = Box<dyn QueuedSlot>;

/// Point-in-time counters for a hub.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubStats {
    /// Event types with a cache.
    pub registered_types: usize,
    /// Registered subscriptions across all types (including not yet swept dead ones).
    pub subscriptions: usize,
    /// Deferred events waiting in the priority tier.
    pub pending_priority: usize,
    /// Deferred events waiting in the FIFO tier.
    pub pending_standard: usize,
    /// Idle pooled slots across all types.
    pub pooled_slots: usize,
}

struct HubInner {
    host: Rc<dyn Host>,
    config: HubConfig,
    disposed: Cell<bool>,
    registry: RefCell<TypeRegistry>,
    standard: RefCell<StandardQueue<PendingSlot>>,
    scheduler: RefCell<PriorityScheduler<PendingSlot>>,
    ticks_since_sweep: Cell<u32>,
    last_shrink: Cell<Duration>,
    /// Reused list of caches for maintenance passes.
    sweep_scratch: RefCell<Vec<Rc<dyn CacheMaintenance>>>,
}

/// Typed in-process event hub.
///
/// A cheap, clonable handle; clones share the same hub. The hub is
/// single-threaded (`!Send`) and is meant to be driven by one frame loop.
///
/// ## Example
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use tickbus::{handler, Event, Hub, Lifetime, ManualHost};
///
/// #[derive(Clone, Copy)]
/// struct Scored(i32);
/// impl Event for Scored {}
///
/// let host = ManualHost::new();
/// let hub = Hub::builder(host.clone()).build();
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let s = seen.clone();
/// let on_score = handler(move |e: &Scored| s.borrow_mut().push(e.0));
/// let sub = hub.subscribe(&on_score, Lifetime::Weak).unwrap();
///
/// hub.queue_with_priority(Scored(10), 10).unwrap();
/// hub.queue_with_priority(Scored(-5), -5).unwrap();
/// hub.queue(Scored(0)).unwrap();
/// hub.publish(Scored(99)).unwrap();
///
/// host.tick();
/// assert_eq!(*seen.borrow(), vec![99, -5, 10, 0]);
///
/// hub.unsubscribe(&sub).unwrap();
/// ```
#[derive(Clone)]
pub struct Hub {
    inner: Rc<HubInner>,
}

impl Hub {
    /// Starts building a hub bound to `host`.
    pub fn builder(host: Rc<dyn Host>) -> HubBuilder {
        HubBuilder::new(host)
    }

    /// Creates a hub and registers its per-tick maintenance with `host`.
    pub fn new(host: Rc<dyn Host>, config: HubConfig) -> Self {
        let registry = TypeRegistry::new(
            Rc::clone(&host),
            config.pool_capacity,
            config.pool_floor_clamped(),
        );
        let inner = Rc::new(HubInner {
            last_shrink: Cell::new(host.current_time()),
            host,
            disposed: Cell::new(false),
            registry: RefCell::new(registry),
            standard: RefCell::new(StandardQueue::default()),
            scheduler: RefCell::new(PriorityScheduler::default()),
            ticks_since_sweep: Cell::new(0),
            sweep_scratch: RefCell::new(Vec::new()),
            config,
        });

        let weak = Rc::downgrade(&inner);
        // unregisters itself once the hub is dropped or disposed
        inner.host.schedule_update(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return false;
            };
            let hub = Hub { inner };
            if hub.is_disposed() {
                return false;
            }
            if let Err(err) = hub.update() {
                tracing::trace!(target: "tickbus", label = err.as_label(), "tick skipped");
            }
            !hub.is_disposed()
        }));

        tracing::debug!(target: "tickbus", "hub created");
        Self { inner }
    }

    /// True if both handles refer to the same hub.
    pub(crate) fn same_hub(&self, other: &Hub) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    #[inline]
    fn ensure_live(&self) -> Result<(), HubError> {
        if self.inner.disposed.get() {
            Err(HubError::Disposed)
        } else {
            Ok(())
        }
    }

    fn cache<E: Event>(&self) -> Rc<EventCache<E>> {
        self.inner.registry.borrow_mut().get_or_create::<E>()
    }

    /// Delivers `event` to every live subscriber of `E` right now.
    pub fn publish<E: Event>(&self, event: E) -> Result<(), HubError> {
        self.ensure_live()?;
        let cache = self.cache::<E>();
        cache.publish(&event);
        Ok(())
    }

    /// Defers `event` to the next drain in the FIFO tier.
    pub fn queue<E: Event>(&self, event: E) -> Result<QueueOutcome, HubError> {
        self.queue_with_priority(event, NEUTRAL_PRIORITY)
    }

    /// Defers `event` to the next drain.
    ///
    /// `priority == 0` selects the FIFO tier; any other value the priority tier,
    /// where lower values are delivered first.
    ///
    /// When the pending limit is reached the event is dropped, an error is
    /// logged through the host and `Ok(QueueOutcome::Dropped)` is returned.
    pub fn queue_with_priority<E: Event>(
        &self,
        event: E,
        priority: i32,
    ) -> Result<QueueOutcome, HubError> {
        self.ensure_live()?;

        let cfg = &self.inner.config;
        let pending = self.pending_count();
        if pending >= cfg.max_queued_events {
            self.inner.host.log_error(&format!(
                "event queue overflow: {pending}/{} pending; dropped {}",
                cfg.max_queued_events,
                E::type_name()
            ));
            return Ok(QueueOutcome::Dropped);
        }
        if let Some(limit) = cfg.queue_warning_limit() {
            if pending >= limit {
                self.inner.host.log_warning(&format!(
                    "event queue under pressure: {pending}/{} pending",
                    cfg.max_queued_events
                ));
            }
        }

        let slot: PendingSlot = self.cache::<E>().create_queued_slot(event);
        if priority == NEUTRAL_PRIORITY {
            self.inner.standard.borrow_mut().push(slot);
        } else {
            self.inner.scheduler.borrow_mut().push(slot, priority);
        }
        Ok(QueueOutcome::Queued)
    }

    /// Registers `handler` for events of type `E`.
    ///
    /// With [`Lifetime::Weak`] the subscription lives only as long as the caller
    /// keeps `handler` alive; with [`Lifetime::Strong`] until disposed.
    pub fn subscribe<E: Event>(
        &self,
        handler: &Handler<E>,
        lifetime: Lifetime,
    ) -> Result<SubscriptionHandle, HubError> {
        self.ensure_live()?;
        let cache = self.cache::<E>();
        let sub = cache.subscribe(handler, lifetime);

        let threshold = self.inner.config.subscription_warning_threshold;
        let count = cache.subscriber_count();
        if cfg!(debug_assertions) && count > threshold {
            self.inner.host.log_warning(&format!(
                "{count} subscriptions for {} (threshold {threshold}); possible leak",
                E::type_name()
            ));
        }

        Ok(SubscriptionHandle::new(sub))
    }

    /// Registers a closure with a strong subscription.
    pub fn subscribe_fn<E: Event>(
        &self,
        f: impl Fn(&E) + 'static,
    ) -> Result<SubscriptionHandle, HubError> {
        let h = handler(f);
        self.subscribe(&h, Lifetime::Strong)
    }

    /// Disposes `handle`.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> Result<(), HubError> {
        self.ensure_live()?;
        handle.dispose();
        Ok(())
    }

    /// Drains the priority tier, then the FIFO tier; returns how many events were processed.
    pub fn process_queued_events(&self) -> Result<usize, HubError> {
        self.ensure_live()?;
        let mut processed = 0;

        loop {
            // borrow must end before the handlers run
            let next = self.inner.scheduler.borrow_mut().pop();
            let Some(slot) = next else { break };
            DrainGuard::new(slot).process();
            processed += 1;
        }

        loop {
            let next = self.inner.standard.borrow_mut().pop();
            let Some(slot) = next else { break };
            DrainGuard::new(slot).process();
            processed += 1;
        }

        Ok(processed)
    }

    /// Per-tick maintenance: drain, then sweep and shrink when due.
    pub fn update(&self) -> Result<(), HubError> {
        self.process_queued_events()?;

        let ticks = self.inner.ticks_since_sweep.get().saturating_add(1);
        if ticks >= self.inner.config.sweep_interval_clamped() {
            self.inner.ticks_since_sweep.set(0);
            self.sweep_dead_subscriptions()?;
        } else {
            self.inner.ticks_since_sweep.set(ticks);
        }

        let now = self.inner.host.current_time();
        if now.saturating_sub(self.inner.last_shrink.get()) > self.inner.config.pool_shrink_interval
        {
            self.inner.last_shrink.set(now);
            self.shrink_pools()?;
        }
        Ok(())
    }

    /// Removes dead subscriptions from every cache; returns how many.
    pub fn sweep_dead_subscriptions(&self) -> Result<usize, HubError> {
        self.ensure_live()?;
        let removed = self.for_each_cache(|c| c.cleanup_dead());
        if removed > 0 {
            tracing::debug!(target: "tickbus", removed, "swept dead subscriptions");
        }
        Ok(removed)
    }

    /// Shrinks every cache's slot pool; returns how many idle slots were dropped.
    pub fn shrink_pools(&self) -> Result<usize, HubError> {
        self.ensure_live()?;
        let dropped = self.for_each_cache(|c| c.cleanup_pool());
        if dropped > 0 {
            tracing::debug!(target: "tickbus", dropped, "shrank slot pools");
        }
        Ok(dropped)
    }

    /// Runs `f` over every cache without holding the registry borrow.
    fn for_each_cache(&self, f: impl Fn(&dyn CacheMaintenance) -> usize) -> usize {
        let mut caches = std::mem::take(&mut *self.inner.sweep_scratch.borrow_mut());
        self.inner.registry.borrow().collect_into(&mut caches);
        let total = caches.iter().map(|c| f(c.as_ref())).sum();
        caches.clear();
        *self.inner.sweep_scratch.borrow_mut() = caches;
        total
    }

    /// Disposes the hub: pending events are discarded and every cache is released.
    ///
    /// Idempotent. Later operations fail with [`HubError::Disposed`].
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        self.inner.scheduler.borrow_mut().clear();
        self.inner.standard.borrow_mut().clear();

        let caches = self.inner.registry.borrow_mut().take_all();
        let types = caches.len();
        drop(caches);
        self.inner.sweep_scratch.borrow_mut().clear();

        tracing::debug!(target: "tickbus", types, "hub disposed");
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Deferred events waiting across both tiers.
    pub fn pending_count(&self) -> usize {
        self.inner.scheduler.borrow().len() + self.inner.standard.borrow().len()
    }

    /// Registered subscriptions for `E` (0 if the type was never used).
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.inner
            .registry
            .borrow()
            .get::<E>()
            .map_or(0, |c| c.subscriber_count())
    }

    /// Idle pooled slots for `E` (0 if the type was never used).
    pub fn pooled_slots<E: Event>(&self) -> usize {
        self.inner
            .registry
            .borrow()
            .get::<E>()
            .map_or(0, |c| c.pooled_slots())
    }

    /// Snapshot of the hub's counters.
    pub fn stats(&self) -> HubStats {
        let mut stats = HubStats {
            pending_priority: self.inner.scheduler.borrow().len(),
            pending_standard: self.inner.standard.borrow().len(),
            ..HubStats::default()
        };
        let mut caches = Vec::new();
        let registry = self.inner.registry.borrow();
        registry.collect_into(&mut caches);
        stats.registered_types = registry.len();
        for c in &caches {
            stats.subscriptions += c.subscriber_count();
            stats.pooled_slots += c.pooled_slots();
        }
        stats
    }

    /// Configuration the hub was built with.
    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }
}

impl fmt::Debug for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("disposed", &self.is_disposed())
            .field("stats", &self.stats())
            .finish()
    }
}
