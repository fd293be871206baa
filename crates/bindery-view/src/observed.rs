//! Controllers as observable objects.
//!
//! [`Observed`] wraps a [`Controller`] for toolkits that redraw whenever an
//! object they watch says it changed. Each delivered change bumps a revision
//! counter and calls every registered watcher. Changes are delivered when the
//! object is synced, so several writes in between show up as one change.
use bindery::{
    controller::Controller,
    property::{Property, WritableProperty},
};

type Watcher<V> = Box<dyn FnMut(&V)>;

/// An observable wrapper around a [`Controller`].
pub struct Observed<I, P: Property, S = ()> {
    controller: Controller<I, P, S>,
    revision: u64,
    watchers: Vec<Watcher<P::Value>>,
}

impl<I: std::fmt::Debug, P: Property, S> std::fmt::Debug for Observed<I, P, S>
where
    P::Value: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observed")
            .field("controller", &self.controller)
            .field("revision", &self.revision)
            .field("watchers", &self.watchers.len())
            .finish()
    }
}

impl<I, P: Property, S> From<Controller<I, P, S>> for Observed<I, P, S> {
    fn from(controller: Controller<I, P, S>) -> Self {
        Observed::new(controller)
    }
}

impl<I, P: Property, S> Observed<I, P, S> {
    pub fn new(controller: Controller<I, P, S>) -> Self {
        Observed {
            controller,
            revision: 0,
            watchers: vec![],
        }
    }

    pub fn id(&self) -> &I {
        self.controller.id()
    }

    pub fn controller(&self) -> &Controller<I, P, S> {
        &self.controller
    }

    /// Number of changes delivered so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Call `watcher` with every change delivered from now on.
    pub fn on_change(&mut self, watcher: impl FnMut(&P::Value) + 'static) {
        self.watchers.push(Box::new(watcher));
    }

    /// Deliver the latest change, if any, to the watchers.
    ///
    /// Changes made since the last delivery are collapsed into one. Returns
    /// whether a change was delivered.
    pub fn sync(&mut self) -> bool {
        match self.controller.sync() {
            Some(change) => {
                self.notify(&change);
                true
            }
            None => false,
        }
    }

    /// The current model, after delivering pending changes.
    pub fn value(&mut self) -> P::Value {
        self.sync();
        self.controller.snapshot().clone()
    }

    /// Wait for the next change, deliver it and return it.
    pub async fn changed(&mut self) -> Option<P::Value> {
        let change = self.controller.changed().await?;
        self.notify(&change);
        Some(change)
    }

    pub fn into_controller(self) -> Controller<I, P, S> {
        self.controller
    }

    fn notify(&mut self, change: &P::Value) {
        self.revision += 1;
        log::trace!("revision {} of {}", self.revision, std::any::type_name::<P::Value>());
        for watcher in self.watchers.iter_mut() {
            watcher(change);
        }
    }
}

impl<I, P: WritableProperty, S> Observed<I, P, S> {
    /// Edit the model through the controller and deliver the change.
    ///
    /// Returns whether the model changed.
    pub fn send(&mut self, edit: impl FnOnce(P::Value) -> P::Value) -> bool {
        let changed = self.controller.apply(edit);
        self.sync();
        changed
    }
}

#[cfg(test)]
mod test {
    use std::{cell::RefCell, rc::Rc};

    use bindery::prelude::*;

    use super::*;

    #[test]
    fn watchers_see_each_synced_change() {
        crate::init_logging();
        let model = root(1u32);
        let mut observed = Observed::new(Controller::new("n", model.clone(), ()));
        let seen = Rc::new(RefCell::new(vec![]));
        observed.on_change({
            let seen = seen.clone();
            move |n| seen.borrow_mut().push(*n)
        });

        model.set(2);
        assert!(observed.sync());
        model.set(2);
        assert!(!observed.sync());
        model.set(3);
        model.set(4);
        assert!(observed.sync());
        assert_eq!(observed.revision(), 2);
        assert_eq!(*seen.borrow(), vec![2, 4]);
        assert_eq!(observed.value(), 4);
        assert_eq!(observed.id(), &"n");
    }

    #[test]
    fn send_edits_and_notifies() {
        let model = root(vec![1]);
        let mut observed: Observed<_, _, ()> = Controller::new(0usize, model.clone(), ()).into();
        let revisions = Rc::new(RefCell::new(0));
        observed.on_change({
            let revisions = revisions.clone();
            move |_| *revisions.borrow_mut() += 1
        });

        assert!(observed.send(|mut v| {
            v.push(2);
            v
        }));
        assert!(!observed.send(|v| v));
        assert_eq!(model.value(), vec![1, 2]);
        assert_eq!(*revisions.borrow(), 1);
    }

    #[test]
    fn changed_delivers_to_watchers() {
        let model = root('a');
        let mut observed = Observed::new(Controller::new((), model.clone(), ()));
        model.set('b');
        let change = futures_lite::future::block_on(observed.changed());
        assert_eq!(change, Some('b'));
        assert_eq!(observed.revision(), 1);
        assert!(!observed.sync());
    }
}
