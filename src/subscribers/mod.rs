//! # Subscribers: subscriptions and per-type event caches.
//!
//! This module provides the [`Subscription`] lifetime model and the
//! [`EventCache`] that fans events out to subscribers of one type.
//!
//! ## Architecture
//! ```text
//! Hub::subscribe::<E>(handler, lifetime)
//!        │
//!        ▼
//! TypeRegistry ── TypeId(E) ──► EventCache<E>
//!                                  ├─ subscribers: id → Rc<Subscription<E>>
//!                                  ├─ pool: free list of PooledEventSlot<E>
//!                                  └─ snapshots: reusable dispatch buffers
//!
//! Subscription<E> ──(Strong) Rc<dyn Fn(&E)>
//!                 └─(Weak)   rc::Weak<dyn Fn(&E)>   (alive while caller keeps the Rc)
//! ```
//!
//! ## Subscription kinds
//! - **Strong** - owned by the hub until disposed
//! - **Weak** - follows the lifetime of the caller's handler `Rc`; swept lazily

mod cache;
mod snapshot;
mod subscription;

pub use cache::EventCache;
pub use subscription::{Subscription, SubscriptionHandle};

pub(crate) use cache::CacheMaintenance;
