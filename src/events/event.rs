//! # Event model: the [`Event`] capability and handler types.
//!
//! An event is a small, immutable, copyable value with no identity. The hub
//! classifies events at compile time through the [`Event`] marker trait and
//! keys its per-type caches by [`TypeId`](std::any::TypeId).
//!
//! ## Priorities
//! Deferred events carry a signed priority:
//! - `0` ([`NEUTRAL_PRIORITY`]) routes to the FIFO tier;
//! - any other value routes to the priority tier (lower value served first).
//!
//! ## Example
//! ```rust
//! use tickbus::{handler, Event, Handler};
//!
//! #[derive(Clone, Copy, Debug)]
//! struct Damage {
//!     amount: u32,
//! }
//! impl Event for Damage {}
//!
//! let on_damage: Handler<Damage> = handler(|d: &Damage| {
//!     let _ = d.amount;
//! });
//! (on_damage)(&Damage { amount: 3 });
//! ```

use std::rc::Rc;

/// Priority that selects the FIFO tier for deferred events.
pub const NEUTRAL_PRIORITY: i32 = 0;

/// Marker capability for values that can travel through the hub.
///
/// Events are plain values: `Copy` so a single value fans out to any number of
/// handlers without cloning, and `'static` so their type identity is stable.
pub trait Event: Copy + 'static {
    /// Type name used in diagnostics.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Callable registered for events of type `E`.
///
/// The `Rc` is the backing storage of the handler: a weak subscription stays
/// alive only while some other `Rc` to the same handler exists.
pub type Handler<E> = Rc<dyn Fn(&E)>;

/// Builds a [`Handler`] from a closure.
pub fn handler<E: Event>(f: impl Fn(&E) + 'static) -> Handler<E> {
    Rc::new(f)
}

/// How a subscription holds on to its handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifetime {
    /// Non-owning reference; the subscription dies with the handler's last `Rc`.
    #[default]
    Weak,
    /// Owning reference; the subscription lives until disposed.
    Strong,
}

/// Result of a deferred submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOutcome {
    /// The event is pending and will be delivered on the next drain.
    Queued,
    /// The pending limit was reached; the event was dropped and an error logged.
    Dropped,
}

impl QueueOutcome {
    /// True if the event was accepted.
    #[inline]
    pub fn is_queued(&self) -> bool {
        matches!(self, QueueOutcome::Queued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    struct Ping;
    impl Event for Ping {}

    #[test]
    fn test_default_lifetime_is_weak() {
        assert_eq!(Lifetime::default(), Lifetime::Weak);
    }

    #[test]
    fn test_type_name_is_qualified() {
        assert!(Ping::type_name().ends_with("Ping"));
    }

    #[test]
    fn test_queue_outcome() {
        assert!(QueueOutcome::Queued.is_queued());
        assert!(!QueueOutcome::Dropped.is_queued());
    }
}
