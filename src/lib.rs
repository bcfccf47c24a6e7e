//! # tickbus
//!
//! **tickbus** is a typed, in-process publish/subscribe hub for
//! latency-sensitive, frame-driven applications.
//!
//! Events are plain `Copy` values. They are delivered either immediately
//! (synchronous fan-out) or deferred to the next tick, with optional priority
//! ordering among deferred events. Deferred events travel in pooled slots, so
//! steady-state traffic does not allocate.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     publish(E)          queue(E, priority)          subscribe(handler)
//!         │                     │                             │
//!         ▼                     ▼                             ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Hub (single-threaded orchestrator)                               │
//! │  - TypeRegistry   (TypeId → EventCache<E>, created lazily)        │
//! │  - PriorityScheduler (min-heap, priority != 0)                    │
//! │  - StandardQueue     (FIFO, priority == 0)                        │
//! │  - maintenance counters (ticks since sweep, last pool shrink)     │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐         │
//!  │EventCache<A>│   │EventCache<B>│   │EventCache<C>│         │
//!  │ subscribers │   │ subscribers │   │ subscribers │         │
//!  │ slot pool   │   │ slot pool   │   │ slot pool   │         │
//!  └─────┬───────┘   └─────┬───────┘   └─────┬───────┘         │
//!        ▼                 ▼                 ▼                 ▼
//!   snapshot live     snapshot live     snapshot live      Host
//!   subscribers,      subscribers,      subscribers,   (time, log sinks,
//!   call each in a    call each in a    call each in a  per-tick hook)
//!   fault boundary    fault boundary    fault boundary
//! ```
//!
//! ### Tick
//! ```text
//! Host::schedule_update ──► Hub::update()
//!   ├─► process_queued_events()
//!   │     ├─ PriorityScheduler: pop until empty (lowest priority first)
//!   │     └─ StandardQueue:     pop until empty (arrival order)
//!   │        each slot: dispatch ─► return to its cache's pool
//!   ├─► every `sweep_interval_ticks` ticks: drop dead subscriptions
//!   └─► every `pool_shrink_interval`:       halve idle pools toward the floor
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types                                 |
//! |-------------------|---------------------------------------------------------------|-------------------------------------------|
//! | **Hub**           | Publish, queue, subscribe, drain, dispose.                    | [`Hub`], [`HubBuilder`], [`HubStats`]     |
//! | **Events**        | Event capability, handlers, subscription lifetimes.           | [`Event`], [`Handler`], [`Lifetime`]      |
//! | **Subscriptions** | Strong/weak registrations with explicit disposal.             | [`SubscriptionHandle`]                    |
//! | **Scheduling**    | Priority min-heap and FIFO tiers.                             | [`PriorityScheduler`], [`StandardQueue`]  |
//! | **Host**          | Time, logging sinks and the per-tick hook.                    | [`Host`], [`ManualHost`]                  |
//! | **Errors**        | Typed lifecycle errors.                                       | [`HubError`], [`SubscriptionError`]       |
//! | **Configuration** | Limits and maintenance cadence.                               | [`HubConfig`]                             |
//!
//! ## Optional features
//! - `ticker` _(default)_: exports [`IntervalHost`], a tokio-driven host.
//! - `global` _(default)_: exports the thread-local [`global`] facade.
//!
//! ## Example
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tickbus::{Event, Hub, ManualHost};
//!
//! #[derive(Clone, Copy)]
//! struct Jumped {
//!     height: u32,
//! }
//! impl Event for Jumped {}
//!
//! let host = ManualHost::new();
//! let hub = Hub::builder(host.clone()).build();
//!
//! let total = Rc::new(Cell::new(0));
//! let t = total.clone();
//! let sub = hub.subscribe_fn(move |e: &Jumped| t.set(t.get() + e.height)).unwrap();
//!
//! hub.publish(Jumped { height: 2 }).unwrap();   // delivered now
//! hub.queue(Jumped { height: 3 }).unwrap();     // delivered on the next tick
//! assert_eq!(total.get(), 2);
//!
//! host.tick();
//! assert_eq!(total.get(), 5);
//!
//! sub.dispose();
//! hub.dispose();
//! ```
mod core;
mod error;
mod events;
mod host;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{Hub, HubBuilder, HubConfig, HubStats};
pub use crate::error::{HubError, SubscriptionError};
pub use crate::events::{
    handler, Event, Handler, Lifetime, PriorityScheduler, QueueOutcome, StandardQueue,
    NEUTRAL_PRIORITY,
};
pub use crate::host::{Host, ManualHost, UpdateFn};
pub use crate::subscribers::SubscriptionHandle;

// Optional: tokio interval host.
// Enable with: `--features ticker`
#[cfg(feature = "ticker")]
pub use crate::host::IntervalHost;

// Optional: thread-local facade over one bound hub.
// Enable with: `--features global`
#[cfg(feature = "global")]
pub mod global;
