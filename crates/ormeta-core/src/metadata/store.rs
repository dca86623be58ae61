//! Metadata store.
//!
//! Values are attached to an entity type (the target) or to one of its
//! members, under a typed category key:
//!
//! ```text
//! (category, target) -> { None           -> target-level value
//!                         Some("member") -> member-level value }
//! ```
//!
//! Entries are sharded per (category, target). Read-modify-write goes through
//! [`MetadataStore::merge`], which holds the shard lock for the whole update,
//! so writes to one target apply in call order.

use std::any::Any;
use std::collections::BTreeMap;

use dashmap::DashMap;

use super::key::{CategoryId, MetadataKey};
use crate::catalog::ModelRef;

type Slot = Box<dyn Any + Send + Sync>;

/// Associative storage for declaration metadata.
#[derive(Default)]
pub struct MetadataStore {
    entries: DashMap<(CategoryId, ModelRef), BTreeMap<Option<String>, Slot>>,
}

impl MetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous value for the same slot.
    pub fn record<V>(&self, key: MetadataKey<V>, target: ModelRef, member: Option<&str>, value: V)
    where
        V: Send + Sync + 'static,
    {
        self.entries
            .entry((key.id(), target))
            .or_default()
            .insert(member.map(str::to_string), Box::new(value));
    }

    /// Replace a slot's value with `f(previous)`.
    ///
    /// The update runs under the entry lock for `(key, target)`.
    pub fn merge<V, F>(&self, key: MetadataKey<V>, target: ModelRef, member: Option<&str>, f: F)
    where
        V: Send + Sync + 'static,
        F: FnOnce(Option<V>) -> V,
    {
        let mut slots = self.entries.entry((key.id(), target)).or_default();
        let slot = member.map(str::to_string);
        let previous = slots.remove(&slot).and_then(downcast::<V>);
        slots.insert(slot, Box::new(f(previous)));
    }

    /// Mutate an existing value in place. Returns `false` if there is none.
    pub fn update<V, F>(&self, key: MetadataKey<V>, target: ModelRef, member: Option<&str>, f: F) -> bool
    where
        V: Send + Sync + 'static,
        F: FnOnce(&mut V),
    {
        let Some(mut slots) = self.entries.get_mut(&(key.id(), target)) else {
            return false;
        };
        let slot = member.map(str::to_string);
        match slots.get_mut(&slot).and_then(|v| v.downcast_mut::<V>()) {
            Some(value) => {
                f(value);
                true
            }
            None => false,
        }
    }

    /// Get one value.
    pub fn retrieve<V>(&self, key: MetadataKey<V>, target: ModelRef, member: Option<&str>) -> Option<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        let slots = self.entries.get(&(key.id(), target))?;
        let slot = member.map(str::to_string);
        slots.get(&slot)?.downcast_ref::<V>().cloned()
    }

    /// Get all member-level values recorded for `target`, keyed by member.
    ///
    /// Returns an empty map if nothing was recorded.
    pub fn retrieve_all<V>(&self, key: MetadataKey<V>, target: ModelRef) -> BTreeMap<String, V>
    where
        V: Clone + Send + Sync + 'static,
    {
        let Some(slots) = self.entries.get(&(key.id(), target)) else {
            return BTreeMap::new();
        };
        slots
            .iter()
            .filter_map(|(slot, value)| {
                let member = slot.as_ref()?;
                let value = value.downcast_ref::<V>()?;
                Some((member.clone(), value.clone()))
            })
            .collect()
    }

    /// Remove and return all member-level values recorded for `target`.
    ///
    /// The target-level value, if any, is dropped as well.
    pub fn remove_all<V>(&self, key: MetadataKey<V>, target: ModelRef) -> BTreeMap<String, V>
    where
        V: Send + Sync + 'static,
    {
        let Some((_, slots)) = self.entries.remove(&(key.id(), target)) else {
            return BTreeMap::new();
        };
        slots
            .into_iter()
            .filter_map(|(slot, value)| Some((slot?, downcast::<V>(value)?)))
            .collect()
    }

    /// Targets that have at least one value in the category.
    pub fn targets<V: 'static>(&self, key: MetadataKey<V>) -> Vec<ModelRef> {
        let id = key.id();
        self.entries
            .iter()
            .filter(|entry| entry.key().0 == id && !entry.value().is_empty())
            .map(|entry| entry.key().1)
            .collect()
    }
}

fn downcast<V: 'static>(slot: Slot) -> Option<V> {
    slot.downcast::<V>().ok().map(|value| *value)
}
