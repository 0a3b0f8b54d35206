#![cfg(test)]

// Property tests for DoubleHashMap kept inside the crate so they can check
// slot-level invariants after every operation.

use crate::{DoubleHashMap, TableConfig};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink toward earlier keys, the pool
// shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    ContainsValue(i32),
    PutIfAbsent(usize, i32),
    ComputeIfPresent(usize, Option<i32>),
    Merge(usize, i32),
    Clear,
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), -50i32..50).prop_map(|(i, v)| Op::Insert(i, v)),
            3 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(Op::Contains),
            1 => (-50i32..50).prop_map(Op::ContainsValue),
            1 => (idx.clone(), -50i32..50).prop_map(|(i, v)| Op::PutIfAbsent(i, v)),
            1 => (idx.clone(), proptest::option::of(-50i32..50))
                .prop_map(|(i, v)| Op::ComputeIfPresent(i, v)),
            1 => (idx.clone(), -50i32..50).prop_map(|(i, v)| Op::Merge(i, v)),
            1 => Just(Op::Clear),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_ops<S>(
    mut sut: DoubleHashMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashMap<Key, i32> = HashMap::new();

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.insert(k.clone(), v), model.insert(k, v));
            }
            Op::Remove(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
            }
            Op::Get(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.get(&k), model.get(&k));
            }
            Op::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            Op::ContainsValue(v) => {
                let has_model = model.values().any(|mv| *mv == v);
                prop_assert_eq!(sut.contains_value(&v), has_model);
            }
            Op::PutIfAbsent(i, v) => {
                let k = key_from(pool, i);
                let expected = model.get(&k).copied();
                if expected.is_none() {
                    model.insert(k.clone(), v);
                }
                prop_assert_eq!(sut.put_if_absent(k, v).copied(), expected);
            }
            Op::ComputeIfPresent(i, next) => {
                let k = key_from(pool, i);
                let expected = match model.get(&k) {
                    Some(_) => match next {
                        Some(n) => {
                            model.insert(k.clone(), n);
                            Some(n)
                        }
                        None => {
                            model.remove(&k);
                            None
                        }
                    },
                    None => None,
                };
                prop_assert_eq!(sut.compute_if_present(&k, |_, _| next).copied(), expected);
            }
            Op::Merge(i, v) => {
                let k = key_from(pool, i);
                let merged = model.get(&k).map_or(v, |old| old.wrapping_add(v));
                model.insert(k.clone(), merged);
                let got = sut.merge(k, v, |old, new| Some(old.wrapping_add(new)));
                prop_assert_eq!(got.copied(), Some(merged));
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
            Op::Iterate => {
                let s: BTreeMap<_, _> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let m: BTreeMap<_, _> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s, m);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        sut.assert_invariants();
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - insert/remove/get return what the model returns.
// - len equals the number of live slots; tombstone count matches the slots.
// - every live key is reachable from its home slot before any empty slot,
//   and no key is live twice.
// - at least one empty slot remains after every operation.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_ops(DoubleHashMap::new(), &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_small_tables(
        (pool, ops) in arb_scenario(),
        capacity in 1usize..8,
        load_factor in 0.1f64..=1.0,
        adaptive in any::<bool>(),
    ) {
        let sut = TableConfig::new()
            .initial_capacity(capacity)
            .load_factor(load_factor)
            .adaptive_load_factor(adaptive)
            .build()
            .unwrap();
        run_ops(sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key shares one probe
// sequence, so lookups rely on equality and tombstones pile up on a single
// chain.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = TableConfig::new()
            .initial_capacity(4)
            .build_with_hasher(ConstBuildHasher)
            .unwrap();
        run_ops(sut, &pool, ops)?;
    }
}
