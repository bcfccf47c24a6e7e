//! # Thread-local default hub.
//!
//! A convenience layer over an explicitly constructed [`Hub`]: the current
//! thread can bind at most one hub and reach it through free functions.
//!
//! ## Rules
//! - [`init`] fails with [`HubError::AlreadyInitialized`] while a live hub is bound.
//! - [`rebind`] replaces the bound hub explicitly; the previous one is disposed
//!   unless it is the hub being bound.
//! - [`shutdown`] disposes and unbinds; calling it again does nothing.
//! - Every forwarding function fails with [`HubError::NotInitialized`] when
//!   nothing is bound, and with [`HubError::Disposed`] if the bound hub was
//!   disposed directly.
//!
//! ## Example
//! ```rust
//! use tickbus::{global, Event, HubConfig, ManualHost};
//!
//! #[derive(Clone, Copy)]
//! struct Saved;
//! impl Event for Saved {}
//!
//! let host = ManualHost::new();
//! global::init(host.clone(), HubConfig::default()).unwrap();
//! let _sub = global::subscribe_fn(|_: &Saved| {}).unwrap();
//! global::publish(Saved).unwrap();
//! global::shutdown();
//! assert!(global::publish(Saved).is_err());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::{Hub, HubConfig};
use crate::error::HubError;
use crate::events::{Event, Handler, Lifetime, QueueOutcome};
use crate::host::Host;
use crate::subscribers::SubscriptionHandle;

thread_local! {
    static BOUND: RefCell<Option<Hub>> = const { RefCell::new(None) };
}

/// Builds a hub for `host` and binds it to the current thread.
pub fn init(host: Rc<dyn Host>, config: HubConfig) -> Result<Hub, HubError> {
    BOUND.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.as_ref().is_some_and(|hub| !hub.is_disposed()) {
            return Err(HubError::AlreadyInitialized);
        }
        let hub = Hub::new(host, config);
        *slot = Some(hub.clone());
        Ok(hub)
    })
}

/// Binds `hub`, disposing any previously bound hub.
///
/// Rebinding the hub that is already bound leaves it live.
pub fn rebind(hub: Hub) {
    let previous = BOUND.with(|slot| slot.borrow_mut().replace(hub.clone()));
    if let Some(previous) = previous.filter(|prev| !prev.same_hub(&hub)) {
        previous.dispose();
    }
}

/// Disposes and unbinds the current hub, if any.
pub fn shutdown() {
    let previous = BOUND.with(|slot| slot.borrow_mut().take());
    if let Some(previous) = previous {
        previous.dispose();
    }
}

/// Returns a handle to the bound hub.
pub fn hub() -> Result<Hub, HubError> {
    BOUND
        .with(|slot| slot.borrow().clone())
        .ok_or(HubError::NotInitialized)
}

/// True if a hub is bound (disposed or not).
pub fn is_bound() -> bool {
    BOUND.with(|slot| slot.borrow().is_some())
}

/// See [`Hub::publish`].
pub fn publish<E: Event>(event: E) -> Result<(), HubError> {
    hub()?.publish(event)
}

/// See [`Hub::queue`].
pub fn queue<E: Event>(event: E) -> Result<QueueOutcome, HubError> {
    hub()?.queue(event)
}

/// See [`Hub::queue_with_priority`].
pub fn queue_with_priority<E: Event>(event: E, priority: i32) -> Result<QueueOutcome, HubError> {
    hub()?.queue_with_priority(event, priority)
}

/// See [`Hub::subscribe`].
pub fn subscribe<E: Event>(
    handler: &Handler<E>,
    lifetime: Lifetime,
) -> Result<SubscriptionHandle, HubError> {
    hub()?.subscribe(handler, lifetime)
}

/// See [`Hub::subscribe_fn`].
pub fn subscribe_fn<E: Event>(f: impl Fn(&E) + 'static) -> Result<SubscriptionHandle, HubError> {
    hub()?.subscribe_fn(f)
}

/// See [`Hub::unsubscribe`].
pub fn unsubscribe(handle: &SubscriptionHandle) -> Result<(), HubError> {
    hub()?.unsubscribe(handle)
}

/// See [`Hub::process_queued_events`].
pub fn process_queued_events() -> Result<usize, HubError> {
    hub()?.process_queued_events()
}
