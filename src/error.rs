//! Error type shared by construction, traversal and the compute helpers.

/// Failures surfaced by [`DoubleHashMap`](crate::DoubleHashMap).
///
/// A missing key is never an error; lookups and removals report it as `None`.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TableError {
    /// The requested initial capacity was zero.
    #[error("invalid capacity {capacity}: a table needs at least one slot")]
    InvalidCapacity { capacity: usize },

    /// The load factor was NaN, infinite, non-positive or above one.
    #[error("invalid load factor {load_factor}: expected a finite number in (0, 1]")]
    InvalidLoadFactor { load_factor: f64 },

    /// The table changed structurally between two steps of a [`Cursor`](crate::Cursor).
    #[error(
        "table was modified during traversal: expected {expected} live entries, found {found}"
    )]
    ConcurrentModification { expected: usize, found: usize },

    /// A caller-supplied closure returned `None` where a value is required.
    #[error("`{operation}` callback returned no value")]
    ComputationContractViolation { operation: &'static str },
}

impl TableError {
    /// True for errors caused by bad construction parameters.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            TableError::InvalidCapacity { .. } | TableError::InvalidLoadFactor { .. }
        )
    }
}
