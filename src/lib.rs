//! double-hash-map: a single-threaded associative container built on open
//! addressing with double hashing and tombstone deletion.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a map whose every entry lives directly in one slot array, found
//!   by a deterministic probe sequence, with deletions that never break the
//!   reachability of other keys.
//! - Layers:
//!   - `probe`: turns a 64-bit hash into a home slot and a step coprime with
//!     the capacity, so the sequence visits every slot exactly once.
//!   - `DoubleHashMap<K, V, S>`: slot storage (`Empty` / `Tombstone` /
//!     `Live`), lookup, insert-with-growth, tombstone removal and rebuilds.
//!   - Iterators, views and `Cursor`: traversal in ascending slot order.
//!   - Adapters: `put_if_absent`, `compute*`, `merge` and friends, composed
//!     from the core paths without re-hashing.
//!
//! Slot states
//! - `Empty` ends a lookup. `Tombstone` does not: a removed key leaves one
//!   behind so that keys placed past it on the same chain stay reachable.
//! - Insertion reuses the first `Empty` or `Tombstone` slot on the key's
//!   chain, after the lookup has proved the key absent.
//!
//! Growth and rebuilds
//! - Before a new key is placed, if `(len + 1) / capacity` reaches the load
//!   factor the table grows to `2 * capacity + 1` slots.
//! - Otherwise the key takes the first `Empty` or `Tombstone` slot on its
//!   chain. Only if that slot is the last `Empty` one is the table first
//!   rebuilt at the same capacity and its tombstones dropped.
//! - Together with a load factor of at most one this keeps an `Empty` slot
//!   in the table at all times, so misses terminate early. If a probe ever
//!   does visit every slot, "absent" is exact because the step is coprime
//!   with the capacity.
//! - Each live entry stores its hash; rebuilds place entries by stored hash
//!   and never call `K: Hash` or `K: Eq`.
//!
//! Reentrancy
//! - User code (`K: Hash`, `K: Eq`) runs only while probing, and each probe
//!   is wrapped in a debug-only guard that panics if the same map is entered
//!   again from inside that code. Release builds compile the guard away.
//! - Closures passed to `compute*`, `merge` and `replace_all_values` run
//!   after the probe and before any slot is written.
//!
//! Traversal
//! - Borrowing iterators hold `&map` or `&mut map`, so the map cannot change
//!   under them.
//! - `Cursor` holds no borrow; it snapshots the live count and rebuild
//!   generation and reports `ConcurrentModification` on the step after a
//!   structural change.
//!
//! Notes and non-goals
//! - Single-threaded: no locking or atomics. A map is `Send` but never
//!   `Sync`, in debug and release builds alike.
//! - No persistence or serialization.
//! - Keys and values are plain owned types; there is no null key or value to
//!   reject, and a missing entry is `None`.

mod adapters;
mod config;
mod cursor;
pub mod double_hash_map;
mod double_hash_map_proptest;
mod error;
pub mod iter;
mod probe;
mod probe_guard;
pub mod views;

// Public surface
pub use config::{TableConfig, ADAPTIVE_LOAD_FACTOR_CEILING, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
pub use cursor::Cursor;
pub use double_hash_map::{DefaultHashBuilder, DoubleHashMap};
pub use error::TableError;
pub use views::{EntriesView, KeysView, ValuesView};
