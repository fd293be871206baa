//! Values with streams of updates.
//!
//! A [`Property`] is a value that can be read synchronously along with a
//! stream of every change made to it. A [`WritableProperty`] can also be set.
//!
//! Update streams follow one contract, no matter which property produced them:
//! * nothing is sent on subscription,
//! * two equal values are never sent in a row,
//! * by the time an update is received, [`Property::value`] already returns it.
use std::{cell::RefCell, rc::Rc};

use async_broadcast::{InactiveReceiver, Sender, TrySendError, broadcast};

use crate::{
    derive,
    erased::{AnyProperty, AnyWritableProperty},
    keyed::{self, KeyedCollection},
    lens::Lens,
    stream::{Updates, UpdatesExt},
};

/// Initial capacity of a root property's update channel.
///
/// The channel grows past this when subscribers fall behind, it never drops
/// updates.
pub const DEFAULT_CAPACITY: usize = 4;

/// A value and a stream of its changes.
pub trait Property {
    type Value: Clone + PartialEq + 'static;

    /// A clone of the current value.
    fn value(&self) -> Self::Value;

    /// Subscribe to changes of the value.
    ///
    /// Dropping the stream cancels the subscription.
    fn updates(&self) -> Updates<Self::Value>;
}

/// A [`Property`] that can be set.
pub trait WritableProperty: Property {
    /// Set the value.
    ///
    /// Setting a value equal to the current value does nothing and notifies
    /// nobody.
    fn set(&self, value: Self::Value);
}

impl<T: Property + ?Sized> Property for Rc<T> {
    type Value = T::Value;

    fn value(&self) -> Self::Value {
        (**self).value()
    }

    fn updates(&self) -> Updates<Self::Value> {
        (**self).updates()
    }
}

impl<T: WritableProperty + ?Sized> WritableProperty for Rc<T> {
    fn set(&self, value: Self::Value) {
        (**self).set(value)
    }
}

/// A read-only property built from a getter and an update stream factory.
///
/// Clones share the same getter and stream.
pub struct ReadOnly<V> {
    get: Rc<dyn Fn() -> V>,
    updates: Rc<dyn Fn() -> Updates<V>>,
}

impl<V> Clone for ReadOnly<V> {
    fn clone(&self) -> Self {
        ReadOnly {
            get: self.get.clone(),
            updates: self.updates.clone(),
        }
    }
}

impl<V> std::fmt::Debug for ReadOnly<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(&format!("ReadOnly<{}>", std::any::type_name::<V>()))
            .finish()
    }
}

impl<V: Clone + PartialEq + 'static> ReadOnly<V> {
    /// Create a read-only property.
    ///
    /// `updates` must honor the update stream contract described in the
    /// [module docs](self), and `get` must agree with what it sends.
    pub fn new(
        get: impl Fn() -> V + 'static,
        updates: impl Fn() -> Updates<V> + 'static,
    ) -> Self {
        ReadOnly {
            get: Rc::new(get),
            updates: Rc::new(updates),
        }
    }
}

impl<V: Clone + PartialEq + 'static> Property for ReadOnly<V> {
    type Value = V;

    fn value(&self) -> V {
        (self.get)()
    }

    fn updates(&self) -> Updates<V> {
        (self.updates)()
    }
}

/// A writable property built from a getter, a setter and an update stream
/// factory.
///
/// Clones share the same getter, setter and stream.
pub struct ReadWrite<V> {
    get: Rc<dyn Fn() -> V>,
    set: Rc<dyn Fn(V)>,
    updates: Rc<dyn Fn() -> Updates<V>>,
}

impl<V> Clone for ReadWrite<V> {
    fn clone(&self) -> Self {
        ReadWrite {
            get: self.get.clone(),
            set: self.set.clone(),
            updates: self.updates.clone(),
        }
    }
}

impl<V> std::fmt::Debug for ReadWrite<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(&format!("ReadWrite<{}>", std::any::type_name::<V>()))
            .finish()
    }
}

impl<V: Clone + PartialEq + 'static> ReadWrite<V> {
    /// Create a writable property.
    ///
    /// `set` is only called with values that differ from `get()`.
    pub fn new(
        get: impl Fn() -> V + 'static,
        set: impl Fn(V) + 'static,
        updates: impl Fn() -> Updates<V> + 'static,
    ) -> Self {
        ReadWrite {
            get: Rc::new(get),
            set: Rc::new(set),
            updates: Rc::new(updates),
        }
    }
}

impl<V: Clone + PartialEq + 'static> Property for ReadWrite<V> {
    type Value = V;

    fn value(&self) -> V {
        (self.get)()
    }

    fn updates(&self) -> Updates<V> {
        (self.updates)()
    }
}

impl<V: Clone + PartialEq + 'static> WritableProperty for ReadWrite<V> {
    fn set(&self, value: V) {
        if (self.get)() == value {
            log::trace!("suppressed duplicate {}", std::any::type_name::<V>());
            return;
        }
        (self.set)(value)
    }
}

/// Storage behind a root property.
struct Cell<V> {
    value: RefCell<V>,
    tx: RefCell<Sender<V>>,
    // Keeps the channel open while no stream is subscribed.
    _rx: InactiveReceiver<V>,
}

impl<V: Clone> Cell<V> {
    fn new(value: V, capacity: usize) -> Self {
        let (tx, rx) = broadcast::<V>(capacity.max(1));
        Cell {
            value: RefCell::new(value),
            tx: RefCell::new(tx),
            _rx: rx.deactivate(),
        }
    }

    fn replace(&self, value: V) {
        *self.value.borrow_mut() = value.clone();
        let mut tx = self.tx.borrow_mut();
        if tx.is_full() {
            let capacity = tx.capacity() * 2;
            log::trace!("growing update channel to {capacity}");
            tx.set_capacity(capacity);
        }
        match tx.try_broadcast(value) {
            Ok(_) | Err(TrySendError::Inactive(_)) => {}
            Err(TrySendError::Full(_)) => log::warn!("update channel is full, update dropped"),
            Err(TrySendError::Closed(_)) => log::warn!("update channel is closed, update dropped"),
        }
    }
}

/// Create a root property holding `value`.
///
/// The root owns its value, every derivation chain starts at one.
///
/// ```rust
/// use bindery::prelude::*;
///
/// let name = root("hello".to_string());
/// let mut updates = name.updates();
/// name.set("hello".to_string());
/// name.set("goodbye".to_string());
///
/// let alias = name.clone();
/// assert_eq!(alias.value(), "goodbye");
/// assert_eq!(updates.drain_ready().items, vec!["goodbye".to_string()]);
/// ```
pub fn root<V: Clone + PartialEq + 'static>(value: V) -> ReadWrite<V> {
    root_with_capacity(value, DEFAULT_CAPACITY)
}

/// Create a root property whose update channel starts with room for
/// `capacity` pending updates.
pub fn root_with_capacity<V: Clone + PartialEq + 'static>(value: V, capacity: usize) -> ReadWrite<V> {
    let cell = Rc::new(Cell::new(value, capacity));
    ReadWrite::new(
        {
            let cell = cell.clone();
            move || cell.value.borrow().clone()
        },
        {
            let cell = cell.clone();
            move |value: V| {
                log::trace!("root {} updated", std::any::type_name::<V>());
                cell.replace(value)
            }
        },
        move || cell.tx.borrow().new_receiver().into_updates(),
    )
}

impl<T: ?Sized> PropertyExt for T where T: Property {}

/// Derivations available on every [`Property`].
pub trait PropertyExt: Property {
    /// Derive a read-only property projecting part of this one.
    fn map<D, F>(&self, projection: F) -> ReadOnly<D>
    where
        Self: Sized + Clone + 'static,
        D: Clone + PartialEq + 'static,
        F: Fn(&Self::Value) -> D + 'static,
    {
        derive::derive(self, projection)
    }

    /// Derive a read-only property viewing this one through `lens`.
    fn view<A>(&self, lens: Lens<Self::Value, A>) -> ReadOnly<A>
    where
        Self: Sized + Clone + 'static,
        A: Clone + PartialEq + 'static,
    {
        derive::derive(self, move |whole| lens.get(whole))
    }

    /// Derive a read-only property of the entry under `key`.
    ///
    /// See [`keyed::key`].
    fn key(
        &self,
        key: <Self::Value as KeyedCollection>::Key,
        fallback: <Self::Value as KeyedCollection>::Item,
    ) -> ReadOnly<<Self::Value as KeyedCollection>::Item>
    where
        Self: Sized + Clone + 'static,
        Self::Value: KeyedCollection,
    {
        keyed::key(self, key, fallback)
    }

    /// Erase the concrete type of this property.
    fn erase(&self) -> AnyProperty<Self::Value>
    where
        Self: Sized + Clone + 'static,
    {
        AnyProperty::new(self.clone())
    }
}

impl<T: ?Sized> WritablePropertyExt for T where T: WritableProperty {}

/// Derivations and helpers available on every [`WritableProperty`].
pub trait WritablePropertyExt: WritableProperty {
    /// Set the value to the result of `edit` applied to the current value.
    fn modify(&self, edit: impl FnOnce(Self::Value) -> Self::Value) {
        self.set(edit(self.value()))
    }

    /// Downgrade to a read-only property.
    ///
    /// The result reads and notifies exactly as `self` does.
    fn readonly(&self) -> ReadOnly<Self::Value>
    where
        Self: Sized + Clone + 'static,
    {
        let getter = self.clone();
        let subscriber = self.clone();
        ReadOnly::new(move || getter.value(), move || subscriber.updates())
    }

    /// Derive a writable property projecting part of this one, merging
    /// edits back with `merge`.
    fn map_writable<D, F, M>(&self, projection: F, merge: M) -> ReadWrite<D>
    where
        Self: Sized + Clone + 'static,
        D: Clone + PartialEq + 'static,
        F: Fn(&Self::Value) -> D + 'static,
        M: Fn(Self::Value, D) -> Self::Value + 'static,
    {
        derive::derive_writable(self, projection, merge)
    }

    /// Derive a writable property focused through `lens`.
    fn focus<A>(&self, lens: Lens<Self::Value, A>) -> ReadWrite<A>
    where
        Self: Sized + Clone + 'static,
        A: Clone + PartialEq + 'static,
    {
        let setter = lens.clone();
        derive::derive_writable(
            self,
            move |whole| lens.get(whole),
            move |whole, part| setter.set(whole, part),
        )
    }

    /// Derive a writable property of the entry under `key`.
    ///
    /// See [`keyed::key_writable`].
    fn key_writable(
        &self,
        key: <Self::Value as KeyedCollection>::Key,
        fallback: <Self::Value as KeyedCollection>::Item,
    ) -> ReadWrite<<Self::Value as KeyedCollection>::Item>
    where
        Self: Sized + Clone + 'static,
        Self::Value: KeyedCollection,
    {
        keyed::key_writable(self, key, fallback)
    }

    /// Erase the concrete type of this property, keeping the setter.
    fn erase_writable(&self) -> AnyWritableProperty<Self::Value>
    where
        Self: Sized + Clone + 'static,
    {
        AnyWritableProperty::new(self.clone())
    }
}
