//! Reusing controllers across view scopes.
//!
//! Views come and go, the state they show shouldn't have to. A
//! [`ControllerCache`] keeps controllers (or anything built around one, such
//! as an [`Observed`](crate::Observed)) keyed by id.
//!
//! ```rust
//! use bindery_view::prelude::*;
//!
//! let mut cache = ControllerCache::default();
//! let first = cache.get_or_insert_with("profile", || Controller::new("profile", root(0u8), ()));
//! first.apply(|n| n + 1);
//!
//! let again = cache.get_or_insert_with("profile", || Controller::new("profile", root(0u8), ()));
//! assert_eq!(*again.snapshot(), 1);
//! ```
use std::{collections::HashMap, hash::Hash};

use bindery::{controller::Controller, property::Property};

/// Controllers kept by id.
pub struct ControllerCache<I, C> {
    entries: HashMap<I, C>,
}

impl<I, C> Default for ControllerCache<I, C> {
    fn default() -> Self {
        ControllerCache {
            entries: HashMap::new(),
        }
    }
}

impl<I: std::fmt::Debug, C> std::fmt::Debug for ControllerCache<I, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerCache")
            .field("ids", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<I: Clone + Eq + Hash, C> ControllerCache<I, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for `id`, created with `create` if there is none.
    pub fn get_or_insert_with(&mut self, id: I, create: impl FnOnce() -> C) -> &mut C {
        self.entries.entry(id).or_insert_with(|| {
            log::debug!("caching a new controller");
            create()
        })
    }

    pub fn get(&self, id: &I) -> Option<&C> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &I) -> Option<&mut C> {
        self.entries.get_mut(id)
    }

    /// Insert `entry` under `id`, returning the entry it replaced.
    pub fn insert(&mut self, id: I, entry: C) -> Option<C> {
        self.entries.insert(id, entry)
    }

    /// Forget the entry for `id`, returning it.
    pub fn remove(&mut self, id: &I) -> Option<C> {
        self.entries.remove(id)
    }

    pub fn contains(&self, id: &I) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &I> {
        self.entries.keys()
    }
}

impl<I: Clone + Eq + Hash, P: Property, S> ControllerCache<I, Controller<I, P, S>> {
    /// Cache `controller` under its own id.
    pub fn insert_controller(&mut self, controller: Controller<I, P, S>) -> Option<Controller<I, P, S>> {
        let id = controller.id().clone();
        self.insert(id, controller)
    }
}
