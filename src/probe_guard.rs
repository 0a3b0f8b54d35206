//! Debug-only guard against re-entering a map while it probes.
//!
//! Probing is the only place where a `DoubleHashMap` runs user code
//! (`K: Hash` and `K: Eq`). A key whose `Eq` reaches back into the same map
//! would observe it mid-operation, so every probing section is wrapped in a
//! [`ProbeScope`]. In debug builds a nested scope panics and names both
//! operations; in release builds the guard is a zero-sized no-op.
//!
//! The guard is `!Sync` on every profile, so a map's auto traits do not
//! depend on whether debug assertions are on.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-map probe tracker. Embedded in `DoubleHashMap` and entered with
/// `let _p = self.guard.enter("get");`.
#[derive(Debug, Default)]
pub(crate) struct ProbeGuard {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // Single-threaded: Send, never Sync.
    _unsync: PhantomData<Cell<()>>,
}

impl ProbeGuard {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _unsync: PhantomData,
        }
    }

    /// Mark `operation` as probing until the returned scope is dropped.
    #[inline]
    pub(crate) fn enter(&self, operation: &'static str) -> ProbeScope<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrant `{operation}` while `{outer}` is probing the same map");
            }
            self.active.set(Some(operation));
            return ProbeScope { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = operation;
            return ProbeScope { _z: PhantomData };
        }
    }
}

// Clones start outside any probe.
impl Clone for ProbeGuard {
    fn clone(&self) -> Self {
        Self::new()
    }
}

/// RAII scope returned by [`ProbeGuard::enter`].
pub(crate) struct ProbeScope<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ProbeGuard,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ProbeScope<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}
