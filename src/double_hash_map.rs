//! DoubleHashMap: open-addressing storage with double hashing and tombstones.

use crate::config::{GrowthPolicy, TableConfig, DEFAULT_CAPACITY};
use crate::cursor::Cursor;
use crate::error::TableError;
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::probe::ProbeSeq;
use crate::probe_guard::ProbeGuard;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::ops::Index;

/// Hasher used when none is supplied.
pub type DefaultHashBuilder = hashbrown::hash_map::DefaultHashBuilder;

#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
}

/// One cell of the slot array.
///
/// `Tombstone` keeps probe chains intact after a removal: a lookup walks past
/// it, an insertion may reuse it, and only a rebuild turns it back into
/// `Empty`.
#[derive(Clone, Debug)]
pub(crate) enum Slot<K, V> {
    Empty,
    Tombstone,
    Live(Entry<K, V>),
}

impl<K, V> Slot<K, V> {
    #[inline]
    pub(crate) fn entry(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Live(e) => Some((&e.key, &e.value)),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self) -> Option<(&K, &mut V)> {
        match self {
            Slot::Live(e) => Some((&e.key, &mut e.value)),
            _ => None,
        }
    }

    #[inline]
    fn is_live(&self) -> bool {
        matches!(self, Slot::Live(_))
    }
}

fn empty_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || Slot::Empty);
    slots
}

/// An associative container using open addressing with double hashing.
///
/// Keys hash once per operation; the low half of the hash picks the home slot
/// and the high half the probe step. Removal leaves a tombstone behind so
/// that keys placed further along the same probe chain stay reachable. The
/// table grows to `2 * capacity + 1` slots when the live ratio reaches the
/// load factor, and rebuilds in place when tombstones would otherwise take
/// the last empty slot.
///
/// ```
/// use double_hash_map::DoubleHashMap;
///
/// let mut m = DoubleHashMap::new();
/// assert_eq!(m.insert("a", 1), None);
/// assert_eq!(m.insert("a", 2), Some(1));
/// assert_eq!(m.get("a"), Some(&2));
/// assert_eq!(m.remove("a"), Some(2));
/// assert!(m.is_empty());
/// ```
#[derive(Clone)]
pub struct DoubleHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    slots: Vec<Slot<K, V>>,
    len: usize,
    tombstones: usize,
    policy: GrowthPolicy,
    // Bumped whenever slot positions are invalidated (grow, purge, clear).
    generation: u64,
    guard: ProbeGuard,
}

impl<K, V> DoubleHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Empty map with the default capacity and load factor.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Fails with an invalid-argument error if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        TableConfig::new().initial_capacity(capacity).build()
    }

    /// Fails with an invalid-argument error if `capacity` is zero or
    /// `load_factor` is not a finite number in `(0, 1]`.
    pub fn with_capacity_and_load_factor(
        capacity: usize,
        load_factor: f64,
    ) -> Result<Self, TableError> {
        TableConfig::new()
            .initial_capacity(capacity)
            .load_factor(load_factor)
            .build()
    }
}

impl<K, V> Default for DoubleHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> DoubleHashMap<K, V, S> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current growth threshold. Only changes over time when the adaptive
    /// policy is enabled.
    pub fn load_factor(&self) -> f64 {
        self.policy.load_factor
    }

    /// Slots holding a removed entry that have not been reclaimed yet.
    pub fn tombstone_count(&self) -> usize {
        self.tombstones
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Linear scan of live entries; values are not indexed.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|(_, v)| v == value)
    }

    /// Drop every entry. Capacity is kept.
    pub fn clear(&mut self) {
        if self.len == 0 && self.tombstones == 0 {
            return;
        }
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.len = 0;
        self.tombstones = 0;
        self.generation = self.generation.wrapping_add(1);
        #[cfg(feature = "logging")]
        log::trace!("cleared table of {} slots", self.slots.len());
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.slots, self.len)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.slots, self.len)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.iter_mut())
    }

    /// Detached traversal that tolerates interleaved access to the map and
    /// reports structural changes as errors. See [`Cursor`].
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self)
    }

    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn live_entry(&self, idx: usize) -> (&K, &V) {
        match self.slots[idx].entry() {
            Some(kv) => kv,
            None => unreachable!("slot {idx} is not live"),
        }
    }

    pub(crate) fn live_value_mut(&mut self, idx: usize) -> &mut V {
        match self.slots[idx].entry_mut() {
            Some((_, v)) => v,
            None => unreachable!("slot {idx} is not live"),
        }
    }

    /// Turn a live slot into a tombstone, handing back its entry. The entry
    /// is moved out before the slot is marked.
    pub(crate) fn remove_at(&mut self, idx: usize) -> Option<(K, V)> {
        if !self.slots[idx].is_live() {
            return None;
        }
        match mem::replace(&mut self.slots[idx], Slot::Tombstone) {
            Slot::Live(e) => {
                self.len -= 1;
                self.tombstones += 1;
                Some((e.key, e.value))
            }
            _ => unreachable!("slot {idx} checked live"),
        }
    }

    /// Place entries by stored hash into a fresh slot array. Never calls
    /// `K: Hash` or `K: Eq`.
    fn rebuild(&mut self, capacity: usize) {
        let old = mem::replace(&mut self.slots, empty_slots(capacity));
        self.tombstones = 0;
        self.generation = self.generation.wrapping_add(1);
        for slot in old {
            if let Slot::Live(e) = slot {
                let idx = ProbeSeq::new(e.hash, capacity)
                    .find(|&i| matches!(self.slots[i], Slot::Empty))
                    .expect("rebuilt table must have room for every live entry");
                self.slots[idx] = Slot::Live(e);
            }
        }
    }

    /// First empty or tombstoned slot on `hash`'s probe sequence.
    fn free_slot(&self, hash: u64) -> usize {
        ProbeSeq::new(hash, self.slots.len())
            .find(|&i| !self.slots[i].is_live())
            .expect("growth policy must leave a free slot")
    }

    fn grow(&mut self) {
        #[cfg(feature = "logging")]
        let (old_capacity, discarded) = (self.slots.len(), self.tombstones);

        let capacity = GrowthPolicy::next_capacity(self.slots.len());
        self.rebuild(capacity);
        self.policy.after_growth();

        #[cfg(feature = "logging")]
        log::debug!(
            "grew table from {old_capacity} to {capacity} slots \
             ({} live, {discarded} tombstones discarded, load factor {:.3})",
            self.len,
            self.policy.load_factor
        );
    }

    fn purge_tombstones(&mut self) {
        #[cfg(feature = "logging")]
        log::trace!(
            "purging {} tombstones from table of {} slots",
            self.tombstones,
            self.slots.len()
        );
        self.rebuild(self.slots.len());
    }
}

impl<K, V, S> DoubleHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Empty map with the default capacity and load factor, hashing with
    /// `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(DEFAULT_CAPACITY, GrowthPolicy::default(), hasher)
    }

    pub(crate) fn from_parts(capacity: usize, policy: GrowthPolicy, hasher: S) -> Self {
        debug_assert!(capacity > 0);
        Self {
            hasher,
            slots: empty_slots(capacity),
            len: 0,
            tombstones: 0,
            policy,
            generation: 0,
            guard: ProbeGuard::new(),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Walk `q`'s probe sequence. Stops at the first live slot holding `q`
    /// or at the first empty slot; tombstones are stepped over.
    fn find_index<Q>(&self, hash: u64, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        for idx in ProbeSeq::new(hash, self.slots.len()) {
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Live(e) => {
                    if e.hash == hash && e.key.borrow() == q {
                        return Some(idx);
                    }
                }
            }
        }
        // Every slot was inspected.
        None
    }

    /// Hash and probe for `q` under the reentrancy guard.
    pub(crate) fn locate_hashed<Q>(&self, operation: &'static str, q: &Q) -> (u64, Option<usize>)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _p = self.guard.enter(operation);
        let hash = self.make_hash(q);
        (hash, self.find_index(hash, q))
    }

    pub(crate) fn locate<Q>(&self, operation: &'static str, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.locate_hashed(operation, q).1
    }

    /// Place a key known to be absent. Grows first when needed, and purges
    /// tombstones only if the entry would otherwise take the last empty
    /// slot. Returns the slot the entry landed in.
    pub(crate) fn insert_unique(&mut self, hash: u64, key: K, value: V) -> usize {
        if self.policy.should_grow(self.len + 1, self.slots.len()) {
            self.grow();
        }

        let mut idx = self.free_slot(hash);
        if matches!(self.slots[idx], Slot::Tombstone) {
            self.tombstones -= 1;
        } else if self.len + self.tombstones + 1 >= self.slots.len() {
            self.purge_tombstones();
            idx = self.free_slot(hash);
        }
        self.slots[idx] = Slot::Live(Entry { key, value, hash });
        self.len += 1;
        idx
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.locate("contains_key", q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.locate("get", q)?;
        Some(self.live_entry(idx).1)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.locate("get_key_value", q)?;
        Some(self.live_entry(idx))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.locate("get_mut", q)?;
        Some(self.live_value_mut(idx))
    }

    /// Insert or update. Returns the previous value when `key` was present;
    /// an update never triggers growth.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.locate_hashed("insert", &key) {
            (_, Some(idx)) => Some(mem::replace(self.live_value_mut(idx), value)),
            (hash, None) => {
                self.insert_unique(hash, key, value);
                None
            }
        }
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.locate("remove", q)?;
        self.remove_at(idx)
    }

    /// Check the structural invariants; panics with a description on the
    /// first violation.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let live = self.slots.iter().filter(|s| s.is_live()).count();
        let tombs = self
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Tombstone))
            .count();
        assert_eq!(live, self.len, "len must count live slots");
        assert_eq!(tombs, self.tombstones, "tombstone counter drifted");
        assert!(self.len <= self.slots.len());
        assert!(
            self.slots.iter().any(|s| matches!(s, Slot::Empty)),
            "at least one empty slot must remain"
        );
        for (idx, slot) in self.slots.iter().enumerate() {
            if let Slot::Live(e) = slot {
                assert_eq!(self.make_hash(&e.key), e.hash, "stale stored hash");
                // Reachable before the first empty slot, and unique.
                let mut hit = None;
                for i in ProbeSeq::new(e.hash, self.slots.len()) {
                    match &self.slots[i] {
                        Slot::Empty => break,
                        Slot::Live(o) if o.key == e.key => {
                            assert!(hit.is_none(), "duplicate live key");
                            hit = Some(i);
                        }
                        _ => {}
                    }
                }
                assert_eq!(hit, Some(idx), "live key unreachable from its home slot");
            }
        }
    }
}

impl<K, V, S> fmt::Debug for DoubleHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two maps are equal when they hold the same keys mapped to equal values,
/// whatever their capacity or slot layout.
impl<K, V, S> PartialEq for DoubleHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |ov| v == ov))
    }
}

impl<K, V, S> Eq for DoubleHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> FromIterator<(K, V)> for DoubleHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::with_hasher(S::default());
        m.put_all(iter);
        m
    }
}

impl<K, V, S> Extend<(K, V)> for DoubleHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.put_all(iter);
    }
}

impl<K, Q, V, S> Index<&Q> for DoubleHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    /// Panics if the key is not present.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not present in DoubleHashMap")
    }
}

impl<'a, K, V, S> IntoIterator for &'a DoubleHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut DoubleHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for DoubleHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.slots, self.len)
    }
}
