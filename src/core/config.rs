//! # Hub configuration.
//!
//! Provides [`HubConfig`] centralized limits and maintenance cadence for a
//! [`Hub`](crate::Hub).
//!
//! ## Sentinel values
//! - `sweep_interval_ticks = 0` → treated as 1 (sweep every tick)
//! - `queue_warning_threshold >= max_queued_events` → pressure warnings never fire

use std::time::Duration;

/// Configuration for a hub.
///
/// Defines:
/// - **Pending limits**: hard cap and warning threshold for deferred events
/// - **Pooling**: per-type free-list capacity and shrink floor
/// - **Maintenance**: dead-subscription sweep and pool-shrink cadence
/// - **Diagnostics**: per-type subscription count warning (debug builds)
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks across the codebase.
#[derive(Clone, Debug)]
pub struct HubConfig {
    /// Maximum number of pending deferred events across both tiers.
    ///
    /// Once reached, new submissions are dropped (existing entries are kept)
    /// and an error is logged.
    pub max_queued_events: usize,

    /// Pending count at which each accepted submission logs a pressure warning.
    pub queue_warning_threshold: usize,

    /// Maximum idle slots kept per event type; extra returned slots are dropped.
    pub pool_capacity: usize,

    /// Pool shrinking never goes below this many idle slots.
    pub pool_floor: usize,

    /// Ticks between dead-subscription sweeps.
    pub sweep_interval_ticks: u32,

    /// Minimum host time between pool-shrink sweeps.
    pub pool_shrink_interval: Duration,

    /// Per-type subscription count above which `subscribe` logs a warning.
    ///
    /// Only checked in debug builds.
    pub subscription_warning_threshold: usize,
}

impl HubConfig {
    /// Returns the sweep interval clamped to a minimum of 1 tick.
    #[inline]
    pub fn sweep_interval_clamped(&self) -> u32 {
        self.sweep_interval_ticks.max(1)
    }

    /// Returns the pool floor, never above the pool capacity.
    #[inline]
    pub fn pool_floor_clamped(&self) -> usize {
        self.pool_floor.min(self.pool_capacity)
    }

    /// Returns the warning threshold as an `Option`.
    ///
    /// - `None` → the threshold is at or above the hard cap; no warnings
    /// - `Some(n)` → warn when `n` or more events are pending
    #[inline]
    pub fn queue_warning_limit(&self) -> Option<usize> {
        if self.queue_warning_threshold >= self.max_queued_events {
            None
        } else {
            Some(self.queue_warning_threshold)
        }
    }
}

impl Default for HubConfig {
    /// Default configuration:
    ///
    /// - `max_queued_events = 10000`
    /// - `queue_warning_threshold = 8000`
    /// - `pool_capacity = 4096`
    /// - `pool_floor = 32`
    /// - `sweep_interval_ticks = 60`
    /// - `pool_shrink_interval = 5s`
    /// - `subscription_warning_threshold = 256`
    fn default() -> Self {
        Self {
            max_queued_events: 10_000,
            queue_warning_threshold: 8_000,
            pool_capacity: 4096,
            pool_floor: 32,
            sweep_interval_ticks: 60,
            pool_shrink_interval: Duration::from_secs(5),
            subscription_warning_threshold: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = HubConfig::default();
        assert_eq!(cfg.max_queued_events, 10_000);
        assert_eq!(cfg.pool_capacity, 4096);
        assert_eq!(cfg.pool_floor_clamped(), 32);
        assert_eq!(cfg.sweep_interval_clamped(), 60);
        assert_eq!(cfg.queue_warning_limit(), Some(8_000));
    }

    #[test]
    fn test_sentinels_are_clamped() {
        let cfg = HubConfig {
            sweep_interval_ticks: 0,
            pool_capacity: 8,
            pool_floor: 32,
            queue_warning_threshold: 10,
            max_queued_events: 10,
            ..HubConfig::default()
        };
        assert_eq!(cfg.sweep_interval_clamped(), 1);
        assert_eq!(cfg.pool_floor_clamped(), 8);
        assert_eq!(cfg.queue_warning_limit(), None);
    }
}
