//! # Type registry - event type → event cache.
//!
//! Maps each event type's [`TypeId`] to its [`EventCache`]. Caches are
//! created lazily on first use and live until the hub is disposed.
//!
//! ## Architecture
//! ```text
//! TypeRegistry
//!   └─ HashMap<TypeId, Entry>
//!        ├─ any:         Rc<dyn Any>               → checked downcast to EventCache<E>
//!        └─ maintenance: Rc<dyn CacheMaintenance>  → sweeps without knowing E
//! ```
//!
//! ## Rules
//! - One cache per type; both entry fields point at the same allocation
//! - Typed access goes through `Rc::downcast`, never through reflection
//! - Maintenance passes only see the erased surface

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

use crate::events::Event;
use crate::host::Host;
use crate::subscribers::{CacheMaintenance, EventCache};

/// Registered cache for one event type.
struct Entry {
    any: Rc<dyn Any>,
    maintenance: Rc<dyn CacheMaintenance>,
}

/// Lazily populated map from event type to its cache.
pub(crate) struct TypeRegistry {
    caches: HashMap<TypeId, Entry>,
    host: Rc<dyn Host>,
    pool_capacity: usize,
    pool_floor: usize,
}

impl TypeRegistry {
    pub(crate) fn new(host: Rc<dyn Host>, pool_capacity: usize, pool_floor: usize) -> Self {
        Self {
            caches: HashMap::new(),
            host,
            pool_capacity,
            pool_floor,
        }
    }

    /// Returns the cache for `E`, if one was created.
    pub(crate) fn get<E: Event>(&self) -> Option<Rc<EventCache<E>>> {
        let entry = self.caches.get(&TypeId::of::<E>())?;
        Rc::clone(&entry.any).downcast::<EventCache<E>>().ok()
    }

    /// Returns the cache for `E`, creating it on first use.
    pub(crate) fn get_or_create<E: Event>(&mut self) -> Rc<EventCache<E>> {
        if let Some(cache) = self.get::<E>() {
            return cache;
        }

        let cache = EventCache::<E>::new(Rc::clone(&self.host), self.pool_capacity, self.pool_floor);
        self.caches.insert(
            TypeId::of::<E>(),
            Entry {
                any: cache.clone(),
                maintenance: cache.clone(),
            },
        );
        tracing::trace!(target: "tickbus", event = E::type_name(), "event cache created");
        cache
    }

    /// Appends every cache's maintenance surface to `out`.
    pub(crate) fn collect_into(&self, out: &mut Vec<Rc<dyn CacheMaintenance>>) {
        out.extend(self.caches.values().map(|e| Rc::clone(&e.maintenance)));
    }

    /// Number of registered event types.
    pub(crate) fn len(&self) -> usize {
        self.caches.len()
    }

    /// Removes every cache and hands them back, so they are dropped outside any borrow.
    pub(crate) fn take_all(&mut self) -> Vec<Rc<dyn CacheMaintenance>> {
        self.caches.drain().map(|(_, e)| e.maintenance).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ManualHost;

    #[derive(Clone, Copy)]
    struct A;
    impl Event for A {}

    #[derive(Clone, Copy)]
    struct B;
    impl Event for B {}

    #[test]
    fn test_one_cache_per_type() {
        let host = ManualHost::new();
        let mut reg = TypeRegistry::new(host, 8, 2);
        assert!(reg.get::<A>().is_none());

        let a1 = reg.get_or_create::<A>();
        let a2 = reg.get_or_create::<A>();
        assert!(Rc::ptr_eq(&a1, &a2));

        let _b = reg.get_or_create::<B>();
        assert_eq!(reg.len(), 2);

        let mut all = Vec::new();
        reg.collect_into(&mut all);
        let names: Vec<_> = all.iter().map(|c| c.event_name()).collect();
        assert!(names.iter().any(|n| n.ends_with("::A")));
        assert!(names.iter().any(|n| n.ends_with("::B")));
    }

    #[test]
    fn test_take_all_empties_registry() {
        let host = ManualHost::new();
        let mut reg = TypeRegistry::new(host, 8, 2);
        reg.get_or_create::<A>();
        let taken = reg.take_all();
        assert_eq!(taken.len(), 1);
        assert_eq!(reg.len(), 0);
        assert!(reg.get::<A>().is_none());
    }
}
