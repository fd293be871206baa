//! Properties computed from other properties.
//!
//! A derived property reads `projection(parent.value())`. Its updates are the
//! parent's updates mapped through the projection, primed with the projected
//! value at subscription time and deduplicated, so a parent change that leaves
//! the projection untouched notifies nobody downstream.
//!
//! Writable derivations merge edits back into the parent. The parent runs its
//! own duplicate check, so a write that merges to an equal parent value stops
//! there.
use std::rc::Rc;

use crate::{
    property::{Property, ReadOnly, ReadWrite, WritableProperty},
    stream::{StreamExt, Updates, UpdatesExt},
};

/// Updates of `parent` seen through `projection`.
pub(crate) fn projected_updates<P, D>(parent: &P, projection: &Rc<dyn Fn(&P::Value) -> D>) -> Updates<D>
where
    P: Property,
    D: Clone + PartialEq + 'static,
{
    let upstream = parent.updates();
    let current = projection(&parent.value());
    let projection = projection.clone();
    upstream
        .map(move |value| projection(&value))
        .changes_from(current)
        .into_updates()
}

/// Derive a read-only property from `parent`.
///
/// ```rust
/// use bindery::{derive::derive, prelude::*};
///
/// let word = root("potato".to_string());
/// let length = derive(&word, |w| w.len());
/// let mut updates = length.updates();
///
/// word.set("tomato".to_string());
/// word.set("pea".to_string());
/// assert_eq!(length.value(), 3);
/// assert_eq!(updates.drain_ready().items, vec![3]);
/// ```
pub fn derive<P, D, F>(parent: &P, projection: F) -> ReadOnly<D>
where
    P: Property + Clone + 'static,
    D: Clone + PartialEq + 'static,
    F: Fn(&P::Value) -> D + 'static,
{
    let projection: Rc<dyn Fn(&P::Value) -> D> = Rc::new(projection);
    ReadOnly::new(
        {
            let parent = parent.clone();
            let projection = projection.clone();
            move || projection(&parent.value())
        },
        {
            let parent = parent.clone();
            move || projected_updates(&parent, &projection)
        },
    )
}

/// Derive a writable property from `parent`.
///
/// Setting the derived property to a value different from its current one
/// sets the parent to `merge(parent.value(), new)`.
pub fn derive_writable<P, D, F, M>(parent: &P, projection: F, merge: M) -> ReadWrite<D>
where
    P: WritableProperty + Clone + 'static,
    D: Clone + PartialEq + 'static,
    F: Fn(&P::Value) -> D + 'static,
    M: Fn(P::Value, D) -> P::Value + 'static,
{
    let projection: Rc<dyn Fn(&P::Value) -> D> = Rc::new(projection);
    ReadWrite::new(
        {
            let parent = parent.clone();
            let projection = projection.clone();
            move || projection(&parent.value())
        },
        {
            let parent = parent.clone();
            let projection = projection.clone();
            move |part: D| {
                let whole = parent.value();
                if projection(&whole) == part {
                    return;
                }
                log::trace!(
                    "merging {} into {}",
                    std::any::type_name::<D>(),
                    std::any::type_name::<P::Value>()
                );
                parent.set(merge(whole, part));
            }
        },
        {
            let parent = parent.clone();
            move || projected_updates(&parent, &projection)
        },
    )
}
