use std::rc::Rc;

use super::{Hub, HubConfig};
use crate::host::Host;

/// Builder for constructing a [`Hub`] bound to a host.
pub struct HubBuilder {
    host: Rc<dyn Host>,
    cfg: HubConfig,
}

impl HubBuilder {
    /// Creates a new builder with the default configuration.
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self {
            host,
            cfg: HubConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: HubConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the pending-event cap and its warning threshold.
    pub fn with_queue_limits(mut self, max: usize, warn_at: usize) -> Self {
        self.cfg.max_queued_events = max;
        self.cfg.queue_warning_threshold = warn_at;
        self
    }

    /// Sets the per-type pool capacity and shrink floor.
    pub fn with_pool_limits(mut self, capacity: usize, floor: usize) -> Self {
        self.cfg.pool_capacity = capacity;
        self.cfg.pool_floor = floor;
        self
    }

    /// Builds the hub and registers its tick with the host.
    pub fn build(self) -> Hub {
        Hub::new(self.host, self.cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ManualHost;

    #[test]
    fn test_builder_applies_limits() {
        let host = ManualHost::new();
        let hub = HubBuilder::new(host.clone())
            .with_queue_limits(50, 40)
            .with_pool_limits(16, 4)
            .build();
        assert_eq!(hub.config().max_queued_events, 50);
        assert_eq!(hub.config().queue_warning_threshold, 40);
        assert_eq!(hub.config().pool_capacity, 16);
        assert_eq!(hub.config().pool_floor, 4);
        assert_eq!(host.scheduled(), 1);
    }
}
