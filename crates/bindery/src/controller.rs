//! Controllers own the state behind a piece of UI.
//!
//! A [`Controller`] bundles
//! * an `id`, used by UI code to find the same controller again,
//! * a [`Property`] holding the model,
//! * a persistence handle `S`. The controller never looks inside it, it is
//!   there so code outside this crate can attach fetching and saving.
//!
//! The controller keeps a snapshot of the model that follows the property.
//! The snapshot catches up whenever it is read.
//!
//! ```rust
//! use bindery::prelude::*;
//!
//! let todos = root(vec!["write docs".to_string()]);
//! let mut controller = Controller::new("todos", todos.clone(), ());
//!
//! controller.apply(|mut list| {
//!     list.push("write tests".to_string());
//!     list
//! });
//! assert_eq!(todos.value().len(), 2);
//! assert_eq!(controller.snapshot().len(), 2);
//! ```
use crate::{
    property::{Property, WritableProperty},
    stream::StreamExt,
};

/// Owner of one property and an opaque persistence handle.
///
/// ## Types
/// * `I` - identity key
/// * `P` - the model property
/// * `S` - persistence handle
pub struct Controller<I, P: Property, S = ()> {
    id: I,
    property: P,
    persistence: S,
    snapshot: P::Value,
}

impl<I: std::fmt::Debug, P: Property, S> std::fmt::Debug for Controller<I, P, S>
where
    P::Value: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("id", &self.id)
            .field("snapshot", &self.snapshot)
            .finish()
    }
}

impl<I, P: Property, S> Controller<I, P, S> {
    /// Create a controller mirroring `property`.
    pub fn new(id: I, property: P, persistence: S) -> Self {
        let snapshot = property.value();
        log::debug!(
            "created controller of {}",
            std::any::type_name::<P::Value>()
        );
        Controller {
            id,
            property,
            persistence,
            snapshot,
        }
    }

    pub fn id(&self) -> &I {
        &self.id
    }

    pub fn property(&self) -> &P {
        &self.property
    }

    pub fn persistence(&self) -> &S {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut S {
        &mut self.persistence
    }

    /// Catch the snapshot up with the property.
    ///
    /// Returns the new snapshot if the model changed since the last catch up.
    /// Changes in between are collapsed into the latest one, so an idle
    /// controller holds nothing but its snapshot.
    pub fn sync(&mut self) -> Option<P::Value> {
        let current = self.property.value();
        if current == self.snapshot {
            return None;
        }
        self.snapshot = current.clone();
        Some(current)
    }

    /// The model as of now.
    pub fn snapshot(&mut self) -> &P::Value {
        self.sync();
        &self.snapshot
    }

    /// Wait for the model to change, returning the new snapshot.
    ///
    /// Resolves at once if the model changed since the last catch up.
    /// Returns `None` once the property can no longer change.
    pub async fn changed(&mut self) -> Option<P::Value> {
        if let Some(latest) = self.sync() {
            return Some(latest);
        }
        let mut updates = self.property.updates();
        loop {
            updates.next().await?;
            if let Some(latest) = self.sync() {
                return Some(latest);
            }
        }
    }
}

impl<I, P: WritableProperty, S> Controller<I, P, S> {
    /// Edit the model.
    ///
    /// `edit` receives the current value and returns the new one, which is
    /// written through the property. Returns whether the model changed.
    ///
    /// The snapshot picks the change up on the next catch up, like any
    /// other change.
    pub fn apply(&mut self, edit: impl FnOnce(P::Value) -> P::Value) -> bool {
        let current = self.property.value();
        let next = edit(current.clone());
        let changed = next != current;
        if changed {
            log::debug!("applying edit to {}", std::any::type_name::<P::Value>());
        }
        self.property.set(next);
        changed
    }
}
