//! Construction parameters for `DoubleHashMap`.

use crate::double_hash_map::{DefaultHashBuilder, DoubleHashMap};
use crate::error::TableError;
use core::hash::{BuildHasher, Hash};

/// Slots allocated when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 16;
/// Live-entry ratio at which the table grows.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;
/// Ceiling the adaptive policy drifts the load factor toward.
pub const ADAPTIVE_LOAD_FACTOR_CEILING: f64 = 0.9;

/// Builds a [`DoubleHashMap`] with a given capacity and growth policy.
///
/// ```
/// use double_hash_map::TableConfig;
///
/// let map = TableConfig::new()
///     .initial_capacity(64)
///     .load_factor(0.5)
///     .build::<String, u32>()
///     .unwrap();
/// assert_eq!(map.capacity(), 64);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TableConfig {
    capacity: usize,
    load_factor: f64,
    adaptive_load_factor: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            adaptive_load_factor: false,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots allocated up front. Must be at least one.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Ratio of live entries to slots at which the table grows. Must be a
    /// finite number in `(0, 1]`.
    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// When enabled, every growth moves the load factor a quarter of the way
    /// toward [`ADAPTIVE_LOAD_FACTOR_CEILING`]. It never decreases.
    pub fn adaptive_load_factor(mut self, enabled: bool) -> Self {
        self.adaptive_load_factor = enabled;
        self
    }

    /// Check parameters without building a table.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.capacity == 0 {
            return Err(TableError::InvalidCapacity {
                capacity: self.capacity,
            });
        }
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 || self.load_factor > 1.0 {
            return Err(TableError::InvalidLoadFactor {
                load_factor: self.load_factor,
            });
        }
        Ok(())
    }

    pub fn build<K, V>(self) -> Result<DoubleHashMap<K, V>, TableError>
    where
        K: Eq + Hash,
    {
        self.build_with_hasher(DefaultHashBuilder::default())
    }

    pub fn build_with_hasher<K, V, S>(self, hasher: S) -> Result<DoubleHashMap<K, V, S>, TableError>
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        self.validate()?;
        Ok(DoubleHashMap::from_parts(
            self.capacity,
            GrowthPolicy {
                load_factor: self.load_factor,
                adaptive: self.adaptive_load_factor,
            },
            hasher,
        ))
    }
}

/// Validated growth parameters carried by a live table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GrowthPolicy {
    pub(crate) load_factor: f64,
    pub(crate) adaptive: bool,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            load_factor: DEFAULT_LOAD_FACTOR,
            adaptive: false,
        }
    }
}

impl GrowthPolicy {
    /// Whether holding `len` live entries in `capacity` slots calls for growth.
    #[inline]
    pub(crate) fn should_grow(&self, len: usize, capacity: usize) -> bool {
        len as f64 / capacity as f64 >= self.load_factor
    }

    /// Capacity after one growth step.
    #[inline]
    pub(crate) fn next_capacity(capacity: usize) -> usize {
        capacity
            .checked_mul(2)
            .and_then(|c| c.checked_add(1))
            .expect("capacity overflow")
    }

    /// Apply the adaptive drift after a growth step.
    pub(crate) fn after_growth(&mut self) {
        if self.adaptive && self.load_factor < ADAPTIVE_LOAD_FACTOR_CEILING {
            self.load_factor += (ADAPTIVE_LOAD_FACTOR_CEILING - self.load_factor) / 4.0;
        }
    }
}
