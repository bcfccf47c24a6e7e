//! # IntervalHost — tokio-driven frame ticks
//!
//! Fires scheduled updates from a [`tokio::time::interval`] until a
//! [`CancellationToken`] is cancelled. The hub is single-threaded, so the
//! future returned by [`IntervalHost::run`] is `!Send`: await it directly on a
//! current-thread runtime (or inside a `LocalSet`).
//!
//! ## Example
//! ```rust,no_run
//! use std::time::Duration;
//! use tickbus::{Hub, IntervalHost};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let host = IntervalHost::new(Duration::from_millis(16));
//!     let hub = Hub::builder(host.clone()).build();
//!
//!     let token = CancellationToken::new();
//!     let frames = host.run(token.clone()).await;
//!     println!("ran {frames} frames; disposed={}", hub.is_disposed());
//! }
//! ```

use std::rc::Rc;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::{Host, UpdateFn, UpdateList};

/// Host whose ticks come from a tokio interval.
pub struct IntervalHost {
    started: Instant,
    period: Duration,
    updates: UpdateList,
}

impl IntervalHost {
    /// Creates a host ticking every `period` (clamped to at least 1ms).
    #[must_use]
    pub fn new(period: Duration) -> Rc<Self> {
        Rc::new(Self {
            started: Instant::now(),
            period: period.max(Duration::from_millis(1)),
            updates: UpdateList::default(),
        })
    }

    /// Tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Drives scheduled updates until `token` is cancelled; returns the number of ticks fired.
    ///
    /// Missed ticks are skipped rather than burst.
    pub async fn run(&self, token: CancellationToken) -> u64 {
        let mut interval = time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut ticks = 0u64;
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = interval.tick() => {
                    self.updates.run_all();
                    ticks += 1;
                }
            }
        }
        tracing::debug!(target: "tickbus", ticks, "interval host stopped");
        ticks
    }
}

impl Host for IntervalHost {
    fn current_time(&self) -> Duration {
        self.started.elapsed()
    }

    fn log_error(&self, message: &str) {
        tracing::error!(target: "tickbus", %message);
    }

    fn log_warning(&self, message: &str) {
        tracing::warn!(target: "tickbus", %message);
    }

    fn schedule_update(&self, callback: UpdateFn) {
        self.updates.push(callback);
    }
}
