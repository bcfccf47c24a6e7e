//! Events: the value model and the deferred-delivery structures.
//!
//! This module groups the event **data model** and the two **pending
//! structures** the hub drains on every tick.
//!
//! ## Contents
//! - [`Event`], [`Handler`], [`Lifetime`], [`QueueOutcome`] event classification and handler types
//! - [`PriorityScheduler`] min-heap tier for non-neutral priorities
//! - [`StandardQueue`] FIFO tier for the neutral priority
//! - [`PooledEventSlot`] pooled container carrying one deferred event
//!
//! ## Drain order
//! ```text
//! process_queued_events():
//!   PriorityScheduler ── pop until empty (ascending priority)
//!   StandardQueue     ── pop until empty (arrival order)
//! ```

mod event;
mod queue;
mod scheduler;
mod slot;

pub use event::{handler, Event, Handler, Lifetime, QueueOutcome, NEUTRAL_PRIORITY};
pub use queue::StandardQueue;
pub use scheduler::PriorityScheduler;
pub use slot::PooledEventSlot;

pub(crate) use slot::{DrainGuard, QueuedSlot};
