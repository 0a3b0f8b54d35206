//! Cursor: detached, forward-only traversal with comodification checks.
//!
//! Borrowing iterators cannot observe a modified map, because the borrow
//! forbids modification. A `Cursor` holds no borrow: it stores its position
//! plus a snapshot of the map's live count and rebuild generation, and every
//! step re-checks both. Callers may therefore touch the map between steps;
//! a structural change surfaces as [`TableError::ConcurrentModification`] on
//! the next step. Removing through the cursor itself keeps it in sync.
//!
//! A cursor belongs to the map that created it.

use crate::double_hash_map::DoubleHashMap;
use crate::error::TableError;

#[derive(Clone, Debug)]
pub struct Cursor {
    next_slot: usize,
    current: Option<usize>,
    expected_len: usize,
    generation: u64,
}

impl Cursor {
    pub(crate) fn new<K, V, S>(map: &DoubleHashMap<K, V, S>) -> Self {
        Self {
            next_slot: 0,
            current: None,
            expected_len: map.len(),
            generation: map.generation(),
        }
    }

    fn check<K, V, S>(&self, map: &DoubleHashMap<K, V, S>) -> Result<(), TableError> {
        if map.len() != self.expected_len || map.generation() != self.generation {
            return Err(self.modified(map));
        }
        Ok(())
    }

    fn modified<K, V, S>(&self, map: &DoubleHashMap<K, V, S>) -> TableError {
        TableError::ConcurrentModification {
            expected: self.expected_len,
            found: map.len(),
        }
    }

    /// Advance to the next live entry. `Ok(None)` once the slots are
    /// exhausted; a cursor cannot be rewound.
    pub fn next_entry<'a, K, V, S>(
        &mut self,
        map: &'a DoubleHashMap<K, V, S>,
    ) -> Result<Option<(&'a K, &'a V)>, TableError> {
        self.check(map)?;
        let slots = map.slots();
        while self.next_slot < slots.len() {
            let idx = self.next_slot;
            self.next_slot += 1;
            if let Some(kv) = slots[idx].entry() {
                self.current = Some(idx);
                return Ok(Some(kv));
            }
        }
        self.current = None;
        Ok(None)
    }

    /// Remove the entry most recently returned by [`next_entry`](Self::next_entry).
    /// Returns `Ok(None)` if there is no such entry or it was already removed
    /// through this cursor.
    pub fn remove_current<K, V, S>(
        &mut self,
        map: &mut DoubleHashMap<K, V, S>,
    ) -> Result<Option<(K, V)>, TableError> {
        self.check(map)?;
        let Some(idx) = self.current else {
            return Ok(None);
        };
        // A slot past the end means the cursor was made by another map.
        if idx >= map.capacity() {
            return Err(self.modified(map));
        }
        self.current = None;
        let removed = map.remove_at(idx);
        self.expected_len = map.len();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use crate::{DoubleHashMap, TableConfig, TableError};
    use std::collections::BTreeSet;
    use std::hash::{BuildHasher, Hasher};

    fn sample() -> DoubleHashMap<String, i32> {
        ["A", "B", "C", "D", "E"]
            .iter()
            .enumerate()
            .map(|(i, k)| ((*k).to_string(), (i as i32 + 1) * 10))
            .collect()
    }

    #[test]
    fn walks_every_entry_then_stays_exhausted() {
        let m = sample();
        let mut c = m.cursor();
        let mut seen = BTreeSet::new();
        while let Some((k, _)) = c.next_entry(&m).unwrap() {
            assert!(seen.insert(k.clone()));
        }
        assert_eq!(seen.len(), 5);
        assert_eq!(c.next_entry(&m).unwrap(), None);
    }

    #[test]
    fn insert_between_steps_is_detected() {
        let mut m = sample();
        let mut c = m.cursor();
        assert!(c.next_entry(&m).unwrap().is_some());
        m.insert("Z".to_string(), 99);
        assert_eq!(
            c.next_entry(&m),
            Err(TableError::ConcurrentModification {
                expected: 5,
                found: 6
            })
        );
    }

    #[test]
    fn value_update_between_steps_is_not_structural() {
        let mut m = sample();
        let mut c = m.cursor();
        let first = c.next_entry(&m).unwrap().map(|(k, _)| k.clone()).unwrap();
        m.insert(first, -1);
        assert!(c.next_entry(&m).is_ok());
    }

    #[test]
    fn clear_between_steps_is_detected() {
        let mut m = sample();
        let mut c = m.cursor();
        c.next_entry(&m).unwrap();
        m.clear();
        assert!(matches!(
            c.next_entry(&m),
            Err(TableError::ConcurrentModification { .. })
        ));
    }

    #[test]
    fn insert_then_remove_between_steps_is_detected_after_rebuild() {
        let mut m = TableConfig::new()
            .initial_capacity(4)
            .build::<u32, u32>()
            .unwrap();
        m.insert(1, 1);
        m.insert(2, 2);
        let mut c = m.cursor();
        c.next_entry(&m).unwrap();
        // Grows (3/4 >= 0.75), then restores the live count.
        m.insert(3, 3);
        m.remove(&3);
        assert_eq!(m.len(), 2);
        assert!(c.next_entry(&m).is_err());
    }

    #[test]
    fn remove_current_keeps_cursor_valid() {
        let mut m = sample();
        let mut c = m.cursor();
        let mut kept = 0;
        loop {
            let Some((_, v)) = c.next_entry(&m).unwrap() else {
                break;
            };
            if *v % 20 == 0 {
                assert!(c.remove_current(&mut m).unwrap().is_some());
            } else {
                kept += 1;
            }
        }
        assert_eq!(kept, 3);
        assert_eq!(m.len(), 3);
        assert!(!m.contains_key("B") && !m.contains_key("D"));
    }

    #[test]
    fn remove_current_against_a_smaller_map_is_reported() {
        #[derive(Clone, Default)]
        struct IdentityBuildHasher;
        struct IdentityHasher(u64);
        impl BuildHasher for IdentityBuildHasher {
            type Hasher = IdentityHasher;
            fn build_hasher(&self) -> IdentityHasher {
                IdentityHasher(0)
            }
        }
        impl Hasher for IdentityHasher {
            fn write(&mut self, _bytes: &[u8]) {}
            fn write_u64(&mut self, n: u64) {
                self.0 = n;
            }
            fn finish(&self) -> u64 {
                self.0
            }
        }

        let config = |capacity| TableConfig::new().initial_capacity(capacity);
        let mut big = config(64)
            .build_with_hasher::<u64, u64, _>(IdentityBuildHasher)
            .unwrap();
        let mut small = config(4)
            .build_with_hasher::<u64, u64, _>(IdentityBuildHasher)
            .unwrap();
        big.insert(40, 0);
        small.insert(1, 0);

        let mut c = big.cursor();
        assert_eq!(c.next_entry(&big).unwrap(), Some((&40, &0)));
        assert_eq!(
            c.remove_current(&mut small),
            Err(TableError::ConcurrentModification {
                expected: 1,
                found: 1
            })
        );
        assert_eq!(small.len(), 1);
        // The cursor still holds its entry for the map that made it.
        assert_eq!(c.remove_current(&mut big).unwrap(), Some((40, 0)));
    }

    #[test]
    fn remove_current_twice_is_a_noop() {
        let mut m = sample();
        let mut c = m.cursor();
        c.next_entry(&m).unwrap();
        assert!(c.remove_current(&mut m).unwrap().is_some());
        assert_eq!(c.remove_current(&mut m).unwrap(), None);
        assert_eq!(m.len(), 4);
    }
}
