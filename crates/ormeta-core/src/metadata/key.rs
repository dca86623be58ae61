//! Typed metadata category keys.

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;

/// A metadata category whose values have type `V`.
///
/// Two keys address the same category only if both the name and the value
/// type match.
pub struct MetadataKey<V> {
    name: &'static str,
    _value: PhantomData<fn() -> V>,
}

impl<V: 'static> MetadataKey<V> {
    /// Create a key for the named category.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    /// Category name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn id(&self) -> CategoryId {
        CategoryId {
            name: self.name,
            value_type: TypeId::of::<V>(),
        }
    }
}

impl<V> Clone for MetadataKey<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for MetadataKey<V> {}

impl<V> fmt::Debug for MetadataKey<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MetadataKey").field(&self.name).finish()
    }
}

/// Type-erased category identity used inside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CategoryId {
    name: &'static str,
    value_type: TypeId,
}
