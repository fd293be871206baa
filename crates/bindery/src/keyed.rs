//! Properties of single entries in keyed collections.
//!
//! Deriving a property for a key works like any other derivation, except the
//! key may be missing from the parent. While it is missing:
//! * parent updates are not forwarded,
//! * the derived value is the last value seen under the key.
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use bindery::prelude::*;
//!
//! let scores = root(BTreeMap::from([("ada", 3u32)]));
//! let ada = scores.key("ada", 0);
//! let mut updates = ada.updates();
//!
//! scores.set(BTreeMap::new());
//! assert_eq!(ada.value(), 3);
//!
//! scores.set(BTreeMap::from([("ada", 4)]));
//! assert_eq!(updates.drain_ready().items, vec![4]);
//! ```
use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashMap},
    hash::{BuildHasher, Hash},
    pin::Pin,
    rc::{Rc, Weak},
    task::{Context, Poll},
};

use crate::{
    property::{Property, ReadOnly, ReadWrite, WritableProperty},
    stream::{Stream, StreamExt, Updates, UpdatesExt},
};

/// A collection of items addressed by key.
pub trait KeyedCollection {
    type Key: Clone + 'static;
    type Item: Clone + PartialEq + 'static;

    /// A clone of the item under `key`, if present.
    fn item(&self, key: &Self::Key) -> Option<Self::Item>;

    /// This collection with `item` stored under `key`.
    fn with_item(self, key: Self::Key, item: Self::Item) -> Self;
}

impl<K, V, S> KeyedCollection for HashMap<K, V, S>
where
    K: Clone + Eq + Hash + 'static,
    V: Clone + PartialEq + 'static,
    S: BuildHasher,
{
    type Key = K;
    type Item = V;

    fn item(&self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }

    fn with_item(mut self, key: K, item: V) -> Self {
        self.insert(key, item);
        self
    }
}

impl<K, V> KeyedCollection for BTreeMap<K, V>
where
    K: Clone + Ord + 'static,
    V: Clone + PartialEq + 'static,
{
    type Key = K;
    type Item = V;

    fn item(&self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }

    fn with_item(mut self, key: K, item: V) -> Self {
        self.insert(key, item);
        self
    }
}

type Item<P> = <<P as Property>::Value as KeyedCollection>::Item;
type Key<P> = <<P as Property>::Value as KeyedCollection>::Key;

/// The last value seen under one key of a parent property.
///
/// While anything is subscribed the entry follows the parent through its own
/// tracker, so the cache moves forward in the parent's order no matter how
/// far behind each subscriber is.
struct Entry<P: Property>
where
    P::Value: KeyedCollection,
{
    parent: P,
    key: Key<P>,
    last: RefCell<Item<P>>,
    tracker: RefCell<Option<Updates<P::Value>>>,
    subscribers: Cell<usize>,
}

impl<P> Entry<P>
where
    P: Property + Clone + 'static,
    P::Value: KeyedCollection,
{
    fn new(parent: &P, key: Key<P>, fallback: Item<P>) -> Rc<Self> {
        let initial = parent.value().item(&key).unwrap_or(fallback);
        Rc::new(Entry {
            parent: parent.clone(),
            key,
            last: RefCell::new(initial),
            tracker: RefCell::new(None),
            subscribers: Cell::new(0),
        })
    }

    fn current(&self) -> Item<P> {
        self.catch_up();
        match self.parent.value().item(&self.key) {
            Some(item) => {
                *self.last.borrow_mut() = item.clone();
                item
            }
            None => self.last.borrow().clone(),
        }
    }

    fn subscribe(self: &Rc<Self>) -> Updates<Item<P>> {
        let upstream = self.parent.updates();
        if self.subscribers.get() == 0 {
            *self.tracker.borrow_mut() = Some(self.parent.updates());
        }
        self.subscribers.set(self.subscribers.get() + 1);
        let current = self.current();
        let key = self.key.clone();
        let items = upstream
            .filter_map(move |whole| whole.item(&key))
            .changes_from(current)
            .into_updates();
        Tracked {
            entry: Rc::downgrade(self),
            items,
        }
        .into_updates()
    }
}

impl<P: Property> Entry<P>
where
    P::Value: KeyedCollection,
{
    /// Fold every parent update the tracker has pending into the cache.
    fn catch_up(&self) {
        let mut guard = self.tracker.borrow_mut();
        let Some(tracker) = guard.as_mut() else {
            return;
        };
        for whole in tracker.drain_ready().items {
            if let Some(item) = whole.item(&self.key) {
                *self.last.borrow_mut() = item;
            }
        }
    }

    fn unsubscribe(&self) {
        let remaining = self.subscribers.get().saturating_sub(1);
        self.subscribers.set(remaining);
        if remaining == 0 {
            self.catch_up();
            *self.tracker.borrow_mut() = None;
        }
    }
}

/// A subscriber's stream of one entry.
///
/// Holds the entry weakly so the stream still ends once every handle to the
/// parent is gone.
struct Tracked<P: Property>
where
    P::Value: KeyedCollection,
{
    entry: Weak<Entry<P>>,
    items: Updates<Item<P>>,
}

impl<P> Stream for Tracked<P>
where
    P: Property + Clone + 'static,
    P::Value: KeyedCollection,
{
    type Item = Item<P>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(entry) = self.entry.upgrade() {
            entry.catch_up();
        }
        Stream::poll_next(self.items.as_mut(), cx)
    }
}

impl<P: Property> Drop for Tracked<P>
where
    P::Value: KeyedCollection,
{
    fn drop(&mut self) {
        if let Some(entry) = self.entry.upgrade() {
            entry.unsubscribe();
        }
    }
}

/// Derive a read-only property of the item under `key` in `parent`.
///
/// `fallback` is the value until the key is first seen.
pub fn key<P>(parent: &P, key: Key<P>, fallback: Item<P>) -> ReadOnly<Item<P>>
where
    P: Property + Clone + 'static,
    P::Value: KeyedCollection,
{
    let entry = Entry::new(parent, key, fallback);
    let getter = entry.clone();
    ReadOnly::new(move || getter.current(), move || entry.subscribe())
}

/// Derive a writable property of the item under `key` in `parent`.
///
/// Setting the property stores the item under `key`, inserting it if the key
/// is missing. Like every writable property, setting the current value (the
/// cached one, while the key is missing) does nothing.
pub fn key_writable<P>(parent: &P, key: Key<P>, fallback: Item<P>) -> ReadWrite<Item<P>>
where
    P: WritableProperty + Clone + 'static,
    P::Value: KeyedCollection,
{
    let entry = Entry::new(parent, key, fallback);
    let getter = entry.clone();
    let setter = entry.clone();
    ReadWrite::new(
        move || getter.current(),
        move |item: Item<P>| setter.store(item),
        move || entry.subscribe(),
    )
}

impl<P> Entry<P>
where
    P: WritableProperty + Clone + 'static,
    P::Value: KeyedCollection,
{
    fn store(&self, item: Item<P>) {
        let whole = self.parent.value();
        if whole.item(&self.key).as_ref() == Some(&item) {
            return;
        }
        *self.last.borrow_mut() = item.clone();
        self.parent.set(whole.with_item(self.key.clone(), item));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::property::{WritablePropertyExt, root};

    #[test]
    fn absent_keys_are_silent_and_cached() {
        crate::init_logging();
        let map = root(HashMap::from([("a".to_string(), 1u32)]));
        let a = key(&map, "a".to_string(), 0);
        let mut updates = a.updates();

        map.set(HashMap::from([("b".to_string(), 2)]));
        assert!(updates.drain_ready().items.is_empty());
        assert_eq!(a.value(), 1);

        map.set(HashMap::from([("a".to_string(), 5)]));
        map.set(HashMap::from([("a".to_string(), 5), ("b".to_string(), 6)]));
        assert_eq!(updates.drain_ready().items, vec![5]);
        assert_eq!(a.value(), 5);
    }

    #[test]
    fn fallback_is_used_until_key_appears() {
        let map = root(BTreeMap::<u8, &str>::new());
        let first = key(&map, 1, "none");
        assert_eq!(first.value(), "none");

        let mut updates = first.updates();
        map.set(BTreeMap::from([(1, "one")]));
        assert_eq!(first.value(), "one");
        assert_eq!(updates.drain_ready().items, vec!["one"]);
    }

    #[test]
    fn cache_follows_the_stream() {
        let map = root(BTreeMap::from([(1u8, 10u8)]));
        let one = key(&map, 1, 0);
        let mut updates = one.updates();
        map.set(BTreeMap::from([(1, 11)]));
        // drained before any read of `one`
        assert_eq!(updates.drain_ready().items, vec![11]);
        map.set(BTreeMap::new());
        assert_eq!(one.value(), 11);
    }

    #[test]
    fn slow_subscribers_never_rewind_the_cache() {
        let map = root(BTreeMap::from([("a", 1u32)]));
        let a = key(&map, "a", 0);
        let mut fast = a.updates();
        let mut slow = a.updates();

        map.set(BTreeMap::from([("a", 2)]));
        map.set(BTreeMap::from([("a", 3)]));
        map.set(BTreeMap::new());
        assert_eq!(a.value(), 3);

        assert_eq!(fast.drain_ready().items, vec![2, 3]);
        let first = futures_lite::future::block_on(slow.next());
        assert_eq!(first, Some(2));
        assert_eq!(a.value(), 3);
        assert_eq!(slow.drain_ready().items, vec![3]);
        assert_eq!(a.value(), 3);
    }

    #[test]
    fn removal_between_reads_keeps_the_latest_item() {
        let map = root(HashMap::from([(1u8, "one")]));
        let one = key(&map, 1, "none");
        let _pending = one.updates();

        map.set(HashMap::from([(1, "uno")]));
        map.set(HashMap::new());
        assert_eq!(one.value(), "uno");
    }

    #[test]
    fn writable_keys_insert_and_replace() {
        let map = root(BTreeMap::<&str, u32>::new());
        let count = map.key_writable("count", 0);
        let mut map_updates = map.updates();

        count.set(0);
        assert!(map.value().is_empty());

        count.set(2);
        assert_eq!(map.value().get("count"), Some(&2));

        count.set(2);
        count.modify(|n| n + 1);
        assert_eq!(map.value().get("count"), Some(&3));
        assert_eq!(map_updates.drain_ready().items.len(), 2);
    }
}
