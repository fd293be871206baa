//! Binding properties to views with a load/unload lifecycle.
//!
//! ```rust
//! use bindery_view::prelude::*;
//!
//! let count = root(0u32);
//! let mut host = ViewHost::new(count.readonly(), Vec::<u32>::new());
//!
//! host.load().unwrap();
//! count.set(1);
//! count.set(2);
//! host.pump().unwrap();
//!
//! assert_eq!(host.view(), &vec![0, 1, 2]);
//! ```
use anyhow::Context;
use bindery::{
    property::Property,
    stream::{StreamExt, Updates, UpdatesExt},
};

/// Something that redraws itself from a value.
pub trait Refresh<V> {
    fn refresh(&mut self, value: &V);
}

impl<V, F: FnMut(&V)> Refresh<V> for F {
    fn refresh(&mut self, value: &V) {
        self(value)
    }
}

impl<V: Clone> Refresh<V> for Vec<V> {
    fn refresh(&mut self, value: &V) {
        self.push(value.clone());
    }
}

/// Keeps a view in step with a property between `load` and `unload`.
pub struct ViewHost<P: Property, R> {
    property: P,
    view: R,
    updates: Option<Updates<P::Value>>,
}

impl<P: Property, R> std::fmt::Debug for ViewHost<P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewHost")
            .field("value", &std::any::type_name::<P::Value>())
            .field("loaded", &self.updates.is_some())
            .finish()
    }
}

impl<P: Property, R: Refresh<P::Value>> ViewHost<P, R> {
    pub fn new(property: P, view: R) -> Self {
        ViewHost {
            property,
            view,
            updates: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.updates.is_some()
    }

    pub fn view(&self) -> &R {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut R {
        &mut self.view
    }

    pub fn property(&self) -> &P {
        &self.property
    }

    /// Refresh the view with the current value and start following changes.
    ///
    /// Errs if the view is already loaded.
    pub fn load(&mut self) -> anyhow::Result<()> {
        if self.is_loaded() {
            anyhow::bail!(
                "view of {} is already loaded",
                std::any::type_name::<P::Value>()
            );
        }
        log::debug!("loading view of {}", std::any::type_name::<P::Value>());
        self.view.refresh(&self.property.value());
        self.updates = Some(self.property.updates());
        Ok(())
    }

    /// Refresh the view with every change that is ready, without waiting.
    ///
    /// Returns the number of refreshes. If the property can no longer change
    /// the view is unloaded.
    pub fn pump(&mut self) -> anyhow::Result<usize> {
        let updates = self.updates.as_mut().context("cannot pump a view that is not loaded")?;
        let drained = updates.drain_ready();
        for value in drained.items.iter() {
            self.view.refresh(value);
        }
        if drained.closed {
            log::debug!("updates ended, unloading view");
            self.updates = None;
        }
        Ok(drained.items.len())
    }

    /// Refresh the view on every change until the property can no longer
    /// change or the host is dropped.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let updates = self.updates.as_mut().context("cannot run a view that is not loaded")?;
        while let Some(value) = updates.next().await {
            self.view.refresh(&value);
        }
        self.updates = None;
        Ok(())
    }

    /// Stop following changes.
    ///
    /// Returns whether the view was loaded.
    pub fn unload(&mut self) -> bool {
        let was_loaded = self.updates.take().is_some();
        if was_loaded {
            log::debug!("unloaded view of {}", std::any::type_name::<P::Value>());
        }
        was_loaded
    }

    /// Tear down the host, returning the view.
    pub fn into_view(self) -> R {
        self.view
    }
}
