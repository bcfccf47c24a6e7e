//! Hub core: orchestration, configuration and the type registry.
//!
//! The public API from this module is [`Hub`] (with [`HubBuilder`],
//! [`HubConfig`] and [`HubStats`]).
//!
//! Internal modules:
//! - [`hub`]: public operations, queue draining and periodic maintenance;
//! - [`registry`]: lazily created event caches keyed by type;
//! - [`builder`]: fluent construction bound to a host;
//! - [`config`]: limits and maintenance cadence.

mod builder;
mod config;
mod hub;
mod registry;

pub use builder::HubBuilder;
pub use config::HubConfig;
pub use hub::{Hub, HubStats};

pub(crate) use registry::TypeRegistry;
