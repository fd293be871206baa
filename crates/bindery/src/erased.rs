//! Type erased properties.
//!
//! Concrete properties differ in type even when they hold the same value
//! type. [`AnyProperty`] and [`AnyWritableProperty`] hide the concrete type so
//! that, say, a root and a lens derivation can sit in the same `Vec`.
use std::rc::Rc;

use crate::{
    property::{Property, WritableProperty},
    stream::Updates,
};

/// Any [`Property`] with values of type `V`.
pub struct AnyProperty<V> {
    inner: Rc<dyn Property<Value = V>>,
}

impl<V> Clone for AnyProperty<V> {
    fn clone(&self) -> Self {
        AnyProperty {
            inner: self.inner.clone(),
        }
    }
}

impl<V> std::fmt::Debug for AnyProperty<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(&format!("AnyProperty<{}>", std::any::type_name::<V>()))
            .finish()
    }
}

impl<V: Clone + PartialEq + 'static> AnyProperty<V> {
    /// Erase `property`, keeping its values and updates.
    pub fn new(property: impl Property<Value = V> + 'static) -> Self {
        AnyProperty {
            inner: Rc::new(property),
        }
    }
}

impl<V: Clone + PartialEq + 'static> Property for AnyProperty<V> {
    type Value = V;

    fn value(&self) -> V {
        self.inner.value()
    }

    fn updates(&self) -> Updates<V> {
        self.inner.updates()
    }
}

/// Any [`WritableProperty`] with values of type `V`.
pub struct AnyWritableProperty<V> {
    inner: Rc<dyn WritableProperty<Value = V>>,
}

impl<V> Clone for AnyWritableProperty<V> {
    fn clone(&self) -> Self {
        AnyWritableProperty {
            inner: self.inner.clone(),
        }
    }
}

impl<V> std::fmt::Debug for AnyWritableProperty<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(&format!(
            "AnyWritableProperty<{}>",
            std::any::type_name::<V>()
        ))
        .finish()
    }
}

impl<V: Clone + PartialEq + 'static> AnyWritableProperty<V> {
    /// Erase `property`, keeping its values, updates and setter.
    pub fn new(property: impl WritableProperty<Value = V> + 'static) -> Self {
        AnyWritableProperty {
            inner: Rc::new(property),
        }
    }

    /// Erase further, dropping the setter.
    pub fn into_readonly_erased(self) -> AnyProperty<V> {
        AnyProperty::new(self)
    }
}

impl<V: Clone + PartialEq + 'static> Property for AnyWritableProperty<V> {
    type Value = V;

    fn value(&self) -> V {
        self.inner.value()
    }

    fn updates(&self) -> Updates<V> {
        self.inner.updates()
    }
}

impl<V: Clone + PartialEq + 'static> WritableProperty for AnyWritableProperty<V> {
    fn set(&self, value: V) {
        self.inner.set(value)
    }
}

impl<V: Clone + PartialEq + 'static> From<AnyWritableProperty<V>> for AnyProperty<V> {
    fn from(property: AnyWritableProperty<V>) -> Self {
        property.into_readonly_erased()
    }
}

impl<V: Clone + PartialEq + 'static> From<crate::property::ReadOnly<V>> for AnyProperty<V> {
    fn from(property: crate::property::ReadOnly<V>) -> Self {
        AnyProperty::new(property)
    }
}

impl<V: Clone + PartialEq + 'static> From<crate::property::ReadWrite<V>> for AnyWritableProperty<V> {
    fn from(property: crate::property::ReadWrite<V>) -> Self {
        AnyWritableProperty::new(property)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        lens,
        property::{PropertyExt, WritablePropertyExt, root},
        stream::UpdatesExt,
    };

    #[derive(Clone, Debug, PartialEq)]
    struct Labelled {
        label: String,
        n: i64,
    }

    #[test]
    fn heterogeneous_properties_share_a_container() {
        let whole = root(Labelled {
            label: "x".to_string(),
            n: 1,
        });
        let plain = root(2i64);
        let properties: Vec<AnyProperty<i64>> = vec![
            whole.map(|l| l.n).erase(),
            plain.readonly().erase(),
            whole.focus(lens!(Labelled, n)).erase(),
        ];
        let values: Vec<i64> = properties.iter().map(|p| p.value()).collect();
        assert_eq!(values, vec![1, 2, 1]);
    }

    #[test]
    fn erased_writable_forwards_everything() {
        let whole = root(Labelled {
            label: "x".to_string(),
            n: 1,
        });
        let n: AnyWritableProperty<i64> = whole.focus(lens!(Labelled, n)).into();
        let mut direct = whole.focus(lens!(Labelled, n)).updates();
        let mut erased = n.updates();

        n.set(2);
        n.set(2);
        assert_eq!(whole.value().n, 2);
        assert_eq!(erased.drain_ready().items, vec![2]);
        assert_eq!(direct.drain_ready().items, vec![2]);

        let readonly: AnyProperty<i64> = n.clone().into();
        let mut readonly_updates = readonly.updates();
        n.set(3);
        assert_eq!(readonly.value(), 3);
        assert_eq!(readonly_updates.drain_ready().items, vec![3]);
    }
}
