//! Update streams and extensions for them.
//!
//! Re-exports the stream half of [`futures_lite`], along with the
//! combinators properties use to shape their notifications.
use std::{
    pin::Pin,
    task::{Context, Poll, Waker},
};

pub use futures_lite::stream::*;

/// A stream of property updates.
///
/// Updates are not `Send`, properties live on one thread.
pub type Updates<T> = Pin<Box<dyn Stream<Item = T> + 'static>>;

/// The result of [`UpdatesExt::drain_ready`].
#[derive(Clone, Debug, PartialEq)]
pub struct Drained<T> {
    /// Items that were ready, in delivery order.
    pub items: Vec<T>,
    /// Whether the stream has ended.
    pub closed: bool,
}

impl<T> Drained<T> {
    /// The most recent item, if any.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }
}

impl<T: ?Sized> UpdatesExt for T where T: Stream {}

/// Combinators for shaping property updates.
pub trait UpdatesExt: Stream {
    /// Drop items equal to the item immediately before them.
    fn dedup(self) -> impl Stream<Item = Self::Item>
    where
        Self: Sized,
        Self::Item: Clone + PartialEq,
    {
        let mut last: Option<Self::Item> = None;
        self.filter_map(move |item| {
            if last.as_ref() == Some(&item) {
                None
            } else {
                last = Some(item.clone());
                Some(item)
            }
        })
    }

    /// Prime this stream with `current`, deduplicate, then drop the primer.
    ///
    /// The result never yields `current` unless it changed away and back,
    /// and never yields two equal items in a row.
    fn changes_from(self, current: Self::Item) -> impl Stream<Item = Self::Item>
    where
        Self: Sized,
        Self::Item: Clone + PartialEq,
    {
        once(current).chain(self).dedup().skip(1)
    }

    /// Box this stream into [`Updates`].
    fn into_updates(self) -> Updates<Self::Item>
    where
        Self: Sized + 'static,
    {
        Box::pin(self)
    }

    /// Take every item that is ready without waiting.
    ///
    /// This never blocks; it is how a UI thread catches up with changes
    /// between frames.
    fn drain_ready(&mut self) -> Drained<Self::Item>
    where
        Self: Unpin,
    {
        let mut cx = Context::from_waker(Waker::noop());
        let mut items = vec![];
        loop {
            match <Self as Stream>::poll_next(Pin::new(&mut *self), &mut cx) {
                Poll::Ready(Some(item)) => items.push(item),
                Poll::Ready(None) => return Drained { items, closed: true },
                Poll::Pending => return Drained { items, closed: false },
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dedup_drops_repeats_only() {
        let items: Vec<u32> = futures_lite::future::block_on(
            iter(vec![1, 1, 2, 2, 2, 1, 3, 3]).dedup().collect(),
        );
        assert_eq!(items, vec![1, 2, 1, 3]);
    }

    #[test]
    fn changes_from_skips_the_current_value() {
        let items: Vec<&str> = futures_lite::future::block_on(
            iter(vec!["a", "a", "b", "b", "a"])
                .changes_from("a")
                .collect(),
        );
        assert_eq!(items, vec!["b", "a"]);
    }

    #[test]
    fn drain_ready_reports_closure() {
        let mut finished = iter(vec![1, 2]).into_updates();
        let drained = finished.drain_ready();
        assert_eq!(drained.items, vec![1, 2]);
        assert!(drained.closed);

        let mut waiting = pending::<u32>().into_updates();
        let drained = waiting.drain_ready();
        assert!(drained.items.is_empty());
        assert!(!drained.closed);
    }
}
