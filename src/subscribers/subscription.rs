//! # Subscriptions: one handler registration on one event cache.
//!
//! ```text
//! Active ──dispose()──► Disposed   (terminal, idempotent)
//! ```
//!
//! ## Liveness
//! - **Strong**: alive until disposed. Holds an owning clone of the handler.
//! - **Weak**: alive until disposed **and** while the handler's backing `Rc`
//!   is still held elsewhere. Liveness is checked lazily (at dispatch and at
//!   sweep time); nothing is notified when the handler is dropped.
//!
//! ## Disposal
//! The first `dispose()` removes the subscription from its owning cache;
//! later calls do nothing. A dispatch snapshot taken before disposal may
//! still hold the subscription, but the dispatch loop re-checks liveness
//! before every call, so a disposed subscription receives no further events.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::SubscriptionError;
use crate::events::{Event, Handler, Lifetime};

use super::EventCache;

/// Handler reference held by a subscription.
enum HandlerRef<E> {
    Strong(Handler<E>),
    Weak(Weak<dyn Fn(&E)>),
}

/// One registration of a handler on the cache for `E`.
pub struct Subscription<E: Event> {
    id: u64,
    handler: HandlerRef<E>,
    cache: Weak<EventCache<E>>,
    disposed: Cell<bool>,
}

impl<E: Event> Subscription<E> {
    pub(crate) fn new(
        id: u64,
        handler: &Handler<E>,
        lifetime: Lifetime,
        cache: Weak<EventCache<E>>,
    ) -> Self {
        let handler = match lifetime {
            Lifetime::Strong => HandlerRef::Strong(Rc::clone(handler)),
            Lifetime::Weak => HandlerRef::Weak(Rc::downgrade(handler)),
        };
        Self {
            id,
            handler,
            cache,
            disposed: Cell::new(false),
        }
    }

    /// Identifier unique within the owning cache.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// How the handler is held.
    pub fn lifetime(&self) -> Lifetime {
        match self.handler {
            HandlerRef::Strong(_) => Lifetime::Strong,
            HandlerRef::Weak(_) => Lifetime::Weak,
        }
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// True while the subscription should receive events.
    pub fn is_alive(&self) -> bool {
        if self.disposed.get() {
            return false;
        }
        match &self.handler {
            HandlerRef::Strong(_) => true,
            HandlerRef::Weak(w) => w.strong_count() > 0,
        }
    }

    /// Returns the callable handler.
    ///
    /// # Errors
    /// - [`SubscriptionError::NotSubscribed`] if disposed.
    /// - [`SubscriptionError::InvalidState`] if not disposed but the weak handler is gone;
    ///   callers are expected to check [`Self::is_alive`] first.
    pub fn handler(&self) -> Result<Handler<E>, SubscriptionError> {
        if self.disposed.get() {
            return Err(SubscriptionError::NotSubscribed);
        }
        match &self.handler {
            HandlerRef::Strong(h) => Ok(Rc::clone(h)),
            HandlerRef::Weak(w) => w
                .upgrade()
                .ok_or(SubscriptionError::InvalidState { event: E::type_name() }),
        }
    }

    /// Marks the subscription disposed and removes it from its cache (first call only).
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(cache) = self.cache.upgrade() {
            cache.remove_subscription(self.id);
        }
    }
}

impl<E: Event> fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &E::type_name())
            .field("id", &self.id)
            .field("lifetime", &self.lifetime())
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Type-erased view used by [`SubscriptionHandle`].
pub(crate) trait Disposable {
    fn dispose(&self);
    fn is_alive(&self) -> bool;
    fn is_disposed(&self) -> bool;
    fn event_type(&self) -> &'static str;
}

impl<E: Event> Disposable for Subscription<E> {
    fn dispose(&self) {
        Subscription::dispose(self);
    }

    fn is_alive(&self) -> bool {
        Subscription::is_alive(self)
    }

    fn is_disposed(&self) -> bool {
        Subscription::is_disposed(self)
    }

    fn event_type(&self) -> &'static str {
        E::type_name()
    }
}

/// Disposable handle returned by `subscribe`.
///
/// Dropping the handle does **not** cancel the subscription; call
/// [`SubscriptionHandle::dispose`] (or `Hub::unsubscribe`).
#[derive(Clone)]
pub struct SubscriptionHandle {
    inner: Rc<dyn Disposable>,
}

impl SubscriptionHandle {
    pub(crate) fn new<E: Event>(sub: Rc<Subscription<E>>) -> Self {
        Self { inner: sub }
    }

    /// Cancels the subscription. Idempotent.
    pub fn dispose(&self) {
        self.inner.dispose();
    }

    /// True while the subscription receives events.
    pub fn is_alive(&self) -> bool {
        self.inner.is_alive()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    /// Name of the subscribed event type.
    pub fn event_type(&self) -> &'static str {
        self.inner.event_type()
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("event", &self.event_type())
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::handler;

    #[derive(Clone, Copy)]
    struct Tick;
    impl Event for Tick {}

    fn detached(h: &Handler<Tick>, lifetime: Lifetime) -> Subscription<Tick> {
        Subscription::new(1, h, lifetime, Weak::new())
    }

    #[test]
    fn test_strong_outlives_caller_handler() {
        let h = handler(|_: &Tick| {});
        let sub = detached(&h, Lifetime::Strong);
        drop(h);
        assert!(sub.is_alive());
        assert!(sub.handler().is_ok());
        assert_eq!(sub.lifetime(), Lifetime::Strong);
    }

    #[test]
    fn test_weak_dies_with_handler() {
        let h = handler(|_: &Tick| {});
        let sub = detached(&h, Lifetime::Weak);
        assert!(sub.is_alive());
        drop(h);
        assert!(!sub.is_alive());
        assert!(!sub.is_disposed());
        assert!(matches!(
            sub.handler(),
            Err(SubscriptionError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_dispose_is_terminal_and_idempotent() {
        let h = handler(|_: &Tick| {});
        let sub = detached(&h, Lifetime::Strong);
        sub.dispose();
        sub.dispose();
        assert!(sub.is_disposed());
        assert!(!sub.is_alive());
        assert_eq!(sub.handler().err(), Some(SubscriptionError::NotSubscribed));
    }

    #[test]
    fn test_handle_reports_event_type() {
        let h = handler(|_: &Tick| {});
        let handle = SubscriptionHandle::new(Rc::new(detached(&h, Lifetime::Weak)));
        assert!(handle.event_type().ends_with("Tick"));
        assert!(handle.is_alive());
        handle.dispose();
        assert!(handle.is_disposed());
        assert!(!handle.is_alive());
    }
}
