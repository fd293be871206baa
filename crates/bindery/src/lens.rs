//! Lenses focus on a part of a whole.
//!
//! A [`Lens<S, A>`] pairs a getter `&S -> A` with a setter `(S, A) -> S`.
//! Lenses are how derived writable properties know where their value lives
//! inside the parent's value. The [`lens!`](crate::lens!) macro builds one
//! from a field path:
//!
//! ```rust
//! use bindery::prelude::*;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Address {
//!     city: String,
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct User {
//!     name: String,
//!     address: Address,
//! }
//!
//! let city = lens!(User, address.city);
//! let user = User {
//!     name: "Ada".to_string(),
//!     address: Address { city: "London".to_string() },
//! };
//! assert_eq!(city.get(&user), "London");
//!
//! let moved = city.set(user, "Paris".to_string());
//! assert_eq!(moved.address.city, "Paris");
//! assert_eq!(moved.name, "Ada");
//! ```
use std::rc::Rc;

/// A getter and setter focusing on an `A` inside an `S`.
pub struct Lens<S, A> {
    get: Rc<dyn Fn(&S) -> A>,
    set: Rc<dyn Fn(S, A) -> S>,
}

impl<S, A> Clone for Lens<S, A> {
    fn clone(&self) -> Self {
        Lens {
            get: self.get.clone(),
            set: self.set.clone(),
        }
    }
}

impl<S, A> std::fmt::Debug for Lens<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format!(
            "Lens<{}, {}>",
            std::any::type_name::<S>(),
            std::any::type_name::<A>()
        ))
    }
}

impl<S: 'static, A: 'static> Lens<S, A> {
    /// Create a lens from a getter and a setter.
    ///
    /// The pair should obey the usual lens laws: setting what you got changes
    /// nothing, and getting what you set returns it.
    pub fn new(get: impl Fn(&S) -> A + 'static, set: impl Fn(S, A) -> S + 'static) -> Self {
        Lens {
            get: Rc::new(get),
            set: Rc::new(set),
        }
    }

    /// Read the focused part of `whole`.
    pub fn get(&self, whole: &S) -> A {
        (self.get)(whole)
    }

    /// Replace the focused part of `whole` with `part`.
    pub fn set(&self, whole: S, part: A) -> S {
        (self.set)(whole, part)
    }

    /// Replace the focused part of `whole` with `edit` applied to it.
    pub fn over(&self, whole: S, edit: impl FnOnce(A) -> A) -> S {
        let part = edit(self.get(&whole));
        self.set(whole, part)
    }

    /// Focus further, on a `B` inside the `A`.
    pub fn compose<B: 'static>(self, inner: Lens<A, B>) -> Lens<S, B> {
        let outer = self.clone();
        let inner_get = inner.clone();
        Lens::new(
            move |whole| inner_get.get(&outer.get(whole)),
            move |whole, part| {
                let middle = inner.set(self.get(&whole), part);
                self.set(whole, middle)
            },
        )
    }
}

/// Build a [`Lens`] from a type and a path of fields.
///
/// `lens!(User, address.city)` focuses on `user.address.city`. The focused
/// field must be `Clone`.
#[macro_export]
macro_rules! lens {
    ($whole:ty, $($field:ident).+) => {
        $crate::lens::Lens::new(
            |whole: &$whole| whole.$($field).+.clone(),
            |mut whole: $whole, part| {
                whole.$($field).+ = part;
                whole
            },
        )
    };
}
