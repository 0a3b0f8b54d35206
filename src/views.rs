//! Live views over a map's keys, values and entries.
//!
//! A view is a thin wrapper around a reference to the map, not a copy. Built
//! from `&DoubleHashMap` it can count, test membership and iterate; built
//! from `&mut DoubleHashMap` it can also remove and clear, which write
//! straight through to the map. All three share the map's slot-order
//! iterators.

use crate::double_hash_map::DoubleHashMap;
use crate::iter::{Iter, Keys, Values};
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::ops::{Deref, DerefMut};

/// View of the keys of a map.
pub struct KeysView<T> {
    map: T,
}

/// View of the values of a map. Values may repeat.
pub struct ValuesView<T> {
    map: T,
}

/// View of the `(key, value)` entries of a map.
pub struct EntriesView<T> {
    map: T,
}

impl<K, V, S> DoubleHashMap<K, V, S> {
    pub fn keys_view(&self) -> KeysView<&Self> {
        KeysView { map: self }
    }

    pub fn keys_view_mut(&mut self) -> KeysView<&mut Self> {
        KeysView { map: self }
    }

    pub fn values_view(&self) -> ValuesView<&Self> {
        ValuesView { map: self }
    }

    pub fn values_view_mut(&mut self) -> ValuesView<&mut Self> {
        ValuesView { map: self }
    }

    pub fn entries_view(&self) -> EntriesView<&Self> {
        EntriesView { map: self }
    }

    pub fn entries_view_mut(&mut self) -> EntriesView<&mut Self> {
        EntriesView { map: self }
    }

    /// Remove the first live entry, in slot order, whose value equals `value`.
    fn remove_first_value(&mut self, value: &V) -> bool
    where
        V: PartialEq,
    {
        let idx = self
            .slots()
            .iter()
            .position(|s| s.entry().map_or(false, |(_, v)| v == value));
        match idx {
            Some(idx) => self.remove_at(idx).is_some(),
            None => false,
        }
    }
}

impl<K, V, S, T> KeysView<T>
where
    T: Deref<Target = DoubleHashMap<K, V, S>>,
{
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter<'a>(&'a self) -> Keys<'a, K, V>
    where
        S: 'a,
    {
        self.map.keys()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Eq + Hash + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher,
    {
        self.map.contains_key(key)
    }
}

impl<K, V, S, T> KeysView<T>
where
    T: DerefMut<Target = DoubleHashMap<K, V, S>>,
{
    /// Remove `key` and its value from the map.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Eq + Hash + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        S: BuildHasher,
    {
        self.map.remove_entry(key).is_some()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, V, S, T> ValuesView<T>
where
    T: Deref<Target = DoubleHashMap<K, V, S>>,
{
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter<'a>(&'a self) -> Values<'a, K, V>
    where
        S: 'a,
    {
        self.map.values()
    }

    pub fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.map.contains_value(value)
    }
}

impl<K, V, S, T> ValuesView<T>
where
    T: DerefMut<Target = DoubleHashMap<K, V, S>>,
{
    /// Remove one entry holding `value`, the first one in slot order.
    pub fn remove(&mut self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.map.remove_first_value(value)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, V, S, T> EntriesView<T>
where
    T: Deref<Target = DoubleHashMap<K, V, S>>,
{
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter<'a>(&'a self) -> Iter<'a, K, V>
    where
        S: 'a,
    {
        self.map.iter()
    }

    /// True when `key` is present and mapped to a value equal to `value`.
    pub fn contains<Q>(&self, key: &Q, value: &V) -> bool
    where
        K: Eq + Hash + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
        S: BuildHasher,
    {
        self.map.get(key).map_or(false, |v| v == value)
    }
}

impl<K, V, S, T> EntriesView<T>
where
    T: DerefMut<Target = DoubleHashMap<K, V, S>>,
{
    /// Remove the entry only if `key` currently maps to `value`.
    pub fn remove<Q>(&mut self, key: &Q, value: &V) -> bool
    where
        K: Eq + Hash + Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
        S: BuildHasher,
    {
        self.map.remove_if_equals(key, value)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<'a, K, V, S> IntoIterator for KeysView<&'a DoubleHashMap<K, V, S>> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.keys()
    }
}

impl<'a, K, V, S> IntoIterator for ValuesView<&'a DoubleHashMap<K, V, S>> {
    type Item = &'a V;
    type IntoIter = Values<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.values()
    }
}

impl<'a, K, V, S> IntoIterator for EntriesView<&'a DoubleHashMap<K, V, S>> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}
