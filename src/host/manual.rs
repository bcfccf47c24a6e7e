//! # ManualHost — caller-driven host
//!
//! A [`Host`] for applications that own their frame loop (and for tests):
//! time only moves when the caller says so, and scheduled updates only run
//! when the caller calls [`ManualHost::tick`].
//!
//! Logged messages are forwarded to `tracing` and retained until taken with
//! [`ManualHost::take_errors`] / [`ManualHost::take_warnings`]. At most
//! [`ManualHost::RETAINED_MESSAGES`] of each kind are kept; older ones are
//! evicted first.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tickbus::{Hub, ManualHost};
//!
//! let host = ManualHost::new();
//! let hub = Hub::builder(host.clone()).build();
//!
//! // one frame
//! host.advance(Duration::from_millis(16));
//! host.tick();
//! assert!(!hub.is_disposed());
//! ```

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use super::{Host, UpdateFn, UpdateList};

/// Host with a manual clock and manual ticks.
#[derive(Default)]
pub struct ManualHost {
    now: Cell<Duration>,
    errors: RefCell<VecDeque<String>>,
    warnings: RefCell<VecDeque<String>>,
    updates: UpdateList,
}

impl ManualHost {
    /// Upper bound on retained messages per kind.
    pub const RETAINED_MESSAGES: usize = 1024;

    /// Creates a host at time zero with nothing scheduled.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get().saturating_add(by));
    }

    /// Sets the clock to an absolute value.
    pub fn set_time(&self, at: Duration) {
        self.now.set(at);
    }

    /// Runs every scheduled update once.
    pub fn tick(&self) {
        self.updates.run_all();
    }

    /// Advances the clock by `frame` and ticks, `frames` times.
    pub fn run_frames(&self, frames: usize, frame: Duration) {
        for _ in 0..frames {
            self.advance(frame);
            self.tick();
        }
    }

    /// Number of registered update callbacks.
    pub fn scheduled(&self) -> usize {
        self.updates.len()
    }

    /// Retained error messages (oldest first).
    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().iter().cloned().collect()
    }

    /// Retained warning messages (oldest first).
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().iter().cloned().collect()
    }

    /// Drains retained error messages.
    pub fn take_errors(&self) -> Vec<String> {
        self.errors.borrow_mut().drain(..).collect()
    }

    /// Drains retained warning messages.
    pub fn take_warnings(&self) -> Vec<String> {
        self.warnings.borrow_mut().drain(..).collect()
    }
}

impl Host for ManualHost {
    fn current_time(&self) -> Duration {
        self.now.get()
    }

    fn log_error(&self, message: &str) {
        tracing::error!(target: "tickbus", %message);
        retain(&self.errors, message);
    }

    fn log_warning(&self, message: &str) {
        tracing::warn!(target: "tickbus", %message);
        retain(&self.warnings, message);
    }

    fn schedule_update(&self, callback: UpdateFn) {
        self.updates.push(callback);
    }
}

fn retain(buf: &RefCell<VecDeque<String>>, message: &str) {
    let mut buf = buf.borrow_mut();
    if buf.len() >= ManualHost::RETAINED_MESSAGES {
        buf.pop_front();
    }
    buf.push_back(message.to_owned());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_moves_only_on_request() {
        let host = ManualHost::new();
        assert_eq!(host.current_time(), Duration::ZERO);
        host.advance(Duration::from_millis(250));
        host.advance(Duration::from_millis(250));
        assert_eq!(host.current_time(), Duration::from_millis(500));
        host.set_time(Duration::from_secs(3));
        assert_eq!(host.current_time(), Duration::from_secs(3));
    }

    #[test]
    fn test_logs_are_retained_until_taken() {
        let host = ManualHost::new();
        host.log_error("boom");
        host.log_warning("careful");
        assert_eq!(host.errors(), vec!["boom".to_string()]);
        assert_eq!(host.take_warnings(), vec!["careful".to_string()]);
        assert!(host.warnings().is_empty());
        assert_eq!(host.take_errors().len(), 1);
        assert!(host.errors().is_empty());
    }

    #[test]
    fn test_retained_logs_are_bounded() {
        let host = ManualHost::new();
        let extra = 10;
        for i in 0..ManualHost::RETAINED_MESSAGES + extra {
            host.log_error(&format!("dropped {i}"));
        }
        let errors = host.take_errors();
        assert_eq!(errors.len(), ManualHost::RETAINED_MESSAGES);
        assert_eq!(errors[0], format!("dropped {extra}"));
        assert_eq!(
            errors.last().map(String::as_str),
            Some(format!("dropped {}", ManualHost::RETAINED_MESSAGES + extra - 1).as_str())
        );
    }

    #[test]
    fn test_run_frames_ticks_and_advances() {
        let host = ManualHost::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        host.schedule_update(Box::new(move || {
            c.set(c.get() + 1);
            true
        }));
        assert_eq!(host.scheduled(), 1);

        host.run_frames(5, Duration::from_millis(20));
        assert_eq!(count.get(), 5);
        assert_eq!(host.current_time(), Duration::from_millis(100));
    }
}
