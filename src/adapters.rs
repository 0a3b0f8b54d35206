//! Map conveniences composed from the core lookup, insert and remove paths.
//!
//! Each helper hashes the key once, then works on the slot index it found.
//! Caller closures run outside the probe guard and after the lookup has
//! finished, and their results are checked before the table is touched.

use crate::double_hash_map::DoubleHashMap;
use crate::error::TableError;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;

impl<K, V, S> DoubleHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Insert every pair in order; later pairs overwrite earlier ones.
    pub fn put_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in entries {
            self.insert(k, v);
        }
    }

    pub fn get_or_default<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).unwrap_or(default)
    }

    /// Visit every live entry in slot order.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        for (k, v) in self.iter() {
            visit(k, v);
        }
    }

    /// Replace every value with `transform(key, value)`.
    ///
    /// All replacements are computed first. If any call returns `None` the
    /// map is left untouched and a contract violation is reported.
    pub fn replace_all_values<F>(&mut self, mut transform: F) -> Result<(), TableError>
    where
        F: FnMut(&K, &V) -> Option<V>,
    {
        let mut replacements = Vec::with_capacity(self.len());
        for (idx, slot) in self.slots().iter().enumerate() {
            if let Some((k, v)) = slot.entry() {
                let next = transform(k, v).ok_or(TableError::ComputationContractViolation {
                    operation: "replace_all_values",
                })?;
                replacements.push((idx, next));
            }
        }
        for (idx, next) in replacements {
            *self.live_value_mut(idx) = next;
        }
        Ok(())
    }

    /// Insert only when `key` is absent. Returns the existing value on a hit
    /// and `None` when the pair was inserted.
    pub fn put_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        match self.locate_hashed("put_if_absent", &key) {
            (_, Some(idx)) => Some(self.live_entry(idx).1),
            (hash, None) => {
                self.insert_unique(hash, key, value);
                None
            }
        }
    }

    /// Remove `key` only if it currently maps to `value`.
    pub fn remove_if_equals<Q>(&mut self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        match self.locate("remove_if_equals", key) {
            Some(idx) if self.live_entry(idx).1 == value => self.remove_at(idx).is_some(),
            _ => false,
        }
    }

    /// Overwrite the value of an existing key, returning the old one. Absent
    /// keys are not inserted.
    pub fn replace<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.locate("replace", key)?;
        Some(mem::replace(self.live_value_mut(idx), value))
    }

    /// Overwrite the value of `key` only if it currently equals `old`.
    pub fn replace_if_equals<Q>(&mut self, key: &Q, old: &V, new: V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        match self.locate("replace_if_equals", key) {
            Some(idx) if self.live_entry(idx).1 == old => {
                *self.live_value_mut(idx) = new;
                true
            }
            _ => false,
        }
    }

    /// Return the value for `key`, inserting `supply(&key)` first if absent.
    ///
    /// Fails without inserting anything if the supplier returns `None`.
    pub fn compute_if_absent<F>(&mut self, key: K, supply: F) -> Result<&V, TableError>
    where
        F: FnOnce(&K) -> Option<V>,
    {
        let idx = match self.locate_hashed("compute_if_absent", &key) {
            (_, Some(idx)) => idx,
            (hash, None) => {
                let value = supply(&key).ok_or(TableError::ComputationContractViolation {
                    operation: "compute_if_absent",
                })?;
                self.insert_unique(hash, key, value)
            }
        };
        Ok(self.live_entry(idx).1)
    }

    /// Recompute the value of a present key. `None` from `remap` removes the
    /// entry. Absent keys are left alone.
    pub fn compute_if_present<Q, F>(&mut self, key: &Q, remap: F) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&K, &V) -> Option<V>,
    {
        let idx = self.locate("compute_if_present", key)?;
        let (k, v) = self.live_entry(idx);
        let next = remap(k, v);
        self.apply_remap(idx, next)
    }

    /// Recompute the value of `key` from its current value, if any. `None`
    /// removes the entry (or leaves an absent key absent).
    pub fn compute<F>(&mut self, key: K, remap: F) -> Option<&V>
    where
        F: FnOnce(&K, Option<&V>) -> Option<V>,
    {
        match self.locate_hashed("compute", &key) {
            (_, Some(idx)) => {
                let (k, v) = self.live_entry(idx);
                let next = remap(k, Some(v));
                self.apply_remap(idx, next)
            }
            (hash, None) => {
                let value = remap(&key, None)?;
                let idx = self.insert_unique(hash, key, value);
                Some(self.live_entry(idx).1)
            }
        }
    }

    /// Insert `value` if `key` is absent, otherwise combine it with the
    /// current value via `remap(old, value)`. `None` removes the entry.
    pub fn merge<F>(&mut self, key: K, value: V, remap: F) -> Option<&V>
    where
        F: FnOnce(&V, V) -> Option<V>,
    {
        match self.locate_hashed("merge", &key) {
            (_, Some(idx)) => {
                let next = remap(self.live_entry(idx).1, value);
                self.apply_remap(idx, next)
            }
            (hash, None) => {
                let idx = self.insert_unique(hash, key, value);
                Some(self.live_entry(idx).1)
            }
        }
    }

    fn apply_remap(&mut self, idx: usize, next: Option<V>) -> Option<&V> {
        match next {
            Some(v) => {
                let slot = self.live_value_mut(idx);
                *slot = v;
                Some(&*slot)
            }
            None => {
                self.remove_at(idx);
                None
            }
        }
    }
}
