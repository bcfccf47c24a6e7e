//! # Host capability: time, logging sinks and the per-tick hook.
//!
//! The hub performs no polling and owns no clock. Everything it needs from the
//! outside world comes through the [`Host`] trait, supplied once at
//! construction:
//!
//! ```text
//! Host::schedule_update(cb) ──► cb() once per frame ──► Hub::update()
//!                                                         ├─► process_queued_events()
//!                                                         ├─► every N ticks: dead sweep
//!                                                         └─► every T secs:  pool shrink (Host::current_time)
//! Hub diagnostics ──► Host::log_error / Host::log_warning
//! ```
//!
//! ## Bundled hosts
//! - [`ManualHost`]: caller-driven clock and ticks (own frame loop, tests).
//! - [`IntervalHost`]: tokio interval driving the ticks (feature `ticker`).

use std::cell::RefCell;
use std::time::Duration;

mod manual;
#[cfg(feature = "ticker")]
mod ticker;

pub use manual::ManualHost;
#[cfg(feature = "ticker")]
pub use ticker::IntervalHost;

/// Per-tick callback registered through [`Host::schedule_update`].
///
/// Returns `false` once it has nothing left to do; the host then drops it.
pub type UpdateFn = Box<dyn FnMut() -> bool>;

/// External collaborator consumed by the hub.
pub trait Host {
    /// Monotonic time since an arbitrary host epoch.
    fn current_time(&self) -> Duration;

    /// Sink for overflow and handler-fault diagnostics.
    fn log_error(&self, message: &str);

    /// Sink for queue-pressure and subscription-count diagnostics.
    fn log_warning(&self, message: &str);

    /// Registers `callback` to be invoked once per external frame/tick,
    /// until it returns `false`.
    fn schedule_update(&self, callback: UpdateFn);
}

/// Ordered list of scheduled callbacks, safe to extend from inside a callback.
#[derive(Default)]
pub(crate) struct UpdateList {
    callbacks: RefCell<Vec<UpdateFn>>,
}

impl UpdateList {
    pub(crate) fn push(&self, callback: UpdateFn) {
        self.callbacks.borrow_mut().push(callback);
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    /// Runs every callback once, in registration order, dropping those that return `false`.
    ///
    /// Callbacks registered while running are kept and first run on the next call.
    pub(crate) fn run_all(&self) {
        let mut running = std::mem::take(&mut *self.callbacks.borrow_mut());
        running.retain_mut(|cb| cb());
        let mut slot = self.callbacks.borrow_mut();
        running.append(&mut slot);
        *slot = running;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_update_list_runs_in_order_and_keeps_late_registrations() {
        let list = Rc::new(UpdateList::default());
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        list.push(Box::new(move || {
            l.borrow_mut().push("a");
            true
        }));

        let l = log.clone();
        let inner = list.clone();
        let added = Rc::new(Cell::new(false));
        list.push(Box::new(move || {
            l.borrow_mut().push("b");
            if !added.replace(true) {
                let l2 = l.clone();
                inner.push(Box::new(move || {
                    l2.borrow_mut().push("c");
                    true
                }));
            }
            true
        }));

        list.run_all();
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(list.len(), 3);

        list.run_all();
        assert_eq!(*log.borrow(), vec!["a", "b", "a", "b", "c"]);
    }

    #[test]
    fn test_update_list_drops_finished_callbacks() {
        let list = UpdateList::default();
        let runs = Rc::new(Cell::new(0));

        let r = runs.clone();
        list.push(Box::new(move || {
            r.set(r.get() + 1);
            r.get() < 2
        }));
        list.push(Box::new(|| true));

        list.run_all();
        assert_eq!(list.len(), 2);
        list.run_all();
        assert_eq!(list.len(), 1);
        list.run_all();
        assert_eq!(runs.get(), 2);
    }
}
