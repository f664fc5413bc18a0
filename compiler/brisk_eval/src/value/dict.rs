//! Shared dictionaries.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use super::flat::FlatValue;
use super::Value;
use crate::lvalue::LValue;

/// Dictionary value: a copy-on-write ordered map from key to element cell.
///
/// Keys are plain values ordered by [`Value`]'s total order, so iteration is
/// deterministic. Dictionaries are never sliced.
#[derive(Clone, Default)]
pub struct FlatDict {
    map: FlatValue<BTreeMap<Value, LValue>>,
}

impl FlatDict {
    pub fn new() -> Self {
        FlatDict::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (Value, LValue)>) -> Self {
        FlatDict {
            map: FlatValue::new(entries.into_iter().collect()),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn use_count(&self) -> usize {
        self.map.use_count()
    }

    #[inline]
    pub fn shares_buffer(&self, other: &FlatDict) -> bool {
        FlatValue::ptr_eq(&self.map, &other.map)
    }

    #[inline]
    pub fn buffer_addr(&self) -> usize {
        self.map.addr()
    }

    #[inline]
    pub fn get(&self, key: &Value) -> Option<&LValue> {
        self.map.get(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.map.contains_key(key)
    }

    /// Entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, Value, LValue> {
        self.map.iter()
    }

    /// Mutable map, private to this dictionary.
    pub fn make_mut(&mut self) -> &mut BTreeMap<Value, LValue> {
        self.map.make_mut()
    }

    /// Insert unless the key is already bound. Returns whether it was inserted.
    pub fn insert_new(&mut self, key: Value, cell: LValue) -> bool {
        if self.map.contains_key(&key) {
            return false;
        }
        self.make_mut().insert(key, cell);
        true
    }

    /// Remove a key. Returns whether it was present.
    pub fn remove(&mut self, key: &Value) -> bool {
        if !self.map.contains_key(key) {
            return false;
        }
        self.make_mut().remove(key).is_some()
    }

    /// Mutable access to an existing entry. Missing keys do not trigger a copy.
    pub fn get_mut(&mut self, key: &Value) -> Option<&mut LValue> {
        if !self.map.contains_key(key) {
            return None;
        }
        self.make_mut().get_mut(key)
    }

    /// Mutable access to an entry, inserting a non-const `none` when missing.
    pub fn entry_mut(&mut self, key: Value) -> &mut LValue {
        self.make_mut()
            .entry(key)
            .or_insert_with(|| LValue::new(Value::None, false))
    }

    /// Copy of the entries in a fresh map.
    #[must_use]
    pub fn detached(&self) -> FlatDict {
        FlatDict::from_entries(self.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

impl fmt::Debug for FlatDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (k, v.get())))
            .finish()
    }
}
