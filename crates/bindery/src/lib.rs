//! # Bindery
//!
//! Bindery is a small library for binding state to user interfaces using
//! observable properties.
//!
//! A property is a value you can read right now plus a stream of every change
//! to that value. Properties compose:
//! * a [`root`](property::root) property owns its value,
//! * a derived property projects a part of its parent's value and, when
//!   writable, merges edits back into the parent,
//! * a read-only adaptation hides the setter of a writable property,
//! * erased properties ([`AnyProperty`], [`AnyWritableProperty`]) let
//!   different concrete properties live in the same container.
//!
//! A [`Controller`] owns one property together with an opaque persistence
//! handle and is the thing UI code holds on to.
//!
//! ```rust
//! use bindery::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Counter {
//!     label: String,
//!     count: u32,
//! }
//!
//! let counter = root(Counter {
//!     label: "clicks".to_string(),
//!     count: 0,
//! });
//! let count = counter.focus(lens!(Counter, count));
//! let mut updates = count.updates();
//!
//! count.set(1);
//! assert_eq!(counter.value().count, 1);
//! assert_eq!(updates.drain_ready().items, vec![1]);
//! ```
//!
//! ## Threading
//! Everything here is single threaded. Handles are reference counted with
//! [`std::rc::Rc`] and are not `Send`. Setting a property from inside the
//! handling of one of its own updates is not supported.
pub mod controller;
pub mod derive;
pub mod erased;
pub mod keyed;
pub mod lens;
pub mod property;
pub mod stream;

pub use controller::Controller;
pub use erased::{AnyProperty, AnyWritableProperty};
pub use property::{Property, PropertyExt, ReadOnly, ReadWrite, WritableProperty, WritablePropertyExt, root};

pub mod prelude {
    //! Re-exports for convenience
    pub use super::controller::Controller;
    pub use super::erased::{AnyProperty, AnyWritableProperty};
    pub use super::keyed::KeyedCollection;
    pub use super::lens;
    pub use super::lens::Lens;
    pub use super::property::*;
    pub use super::stream::{Drained, Stream, StreamExt, Updates, UpdatesExt};
}

#[cfg(test)]
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
