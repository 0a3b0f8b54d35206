//! Double-hashing probe sequences.
//!
//! A 64-bit key hash is split into two halves: the low half picks the home
//! slot and the high half picks the step. Both are reduced modulo the table
//! capacity and nothing else; mixing moduli between lookup, insertion and
//! rehash would let a key be placed where a later lookup never looks.

/// Home slot for `hash` in a table of `capacity` slots.
#[inline]
pub(crate) fn home_slot(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    ((hash & 0xffff_ffff) % capacity as u64) as usize
}

/// Step between successive probes, coprime with `capacity`.
///
/// The step starts odd, which is enough for even capacities, and is bumped
/// by two until it shares no factor with the (odd) capacities produced by
/// growth. The result is reduced modulo `capacity`.
#[inline]
pub(crate) fn probe_step(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    let mut step = (((hash >> 32) % capacity as u64) as usize) | 1;
    while gcd(step, capacity) != 1 {
        step += 2;
    }
    step % capacity
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// The probe sequence for one hash: `(home + i * step) mod capacity` for
/// `i` in `0..capacity`. Yields every slot exactly once.
#[derive(Clone, Debug)]
pub(crate) struct ProbeSeq {
    pos: usize,
    step: usize,
    capacity: usize,
    remaining: usize,
}

impl ProbeSeq {
    #[inline]
    pub(crate) fn new(hash: u64, capacity: usize) -> Self {
        Self {
            pos: home_slot(hash, capacity),
            step: probe_step(hash, capacity),
            capacity,
            remaining: capacity,
        }
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let at = self.pos;
        // pos and step are both < capacity, so the sum cannot overflow.
        self.pos += self.step;
        if self.pos >= self.capacity {
            self.pos -= self.capacity;
        }
        Some(at)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSeq {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn visits_every_slot(hash: u64, capacity: usize) -> bool {
        let seen: BTreeSet<usize> = ProbeSeq::new(hash, capacity).collect();
        seen.len() == capacity && seen.iter().all(|&i| i < capacity)
    }

    #[test]
    fn step_is_odd_for_even_capacity() {
        for hash in [0u64, 1, 7 << 32, 8 << 32, u64::MAX] {
            for cap in [2usize, 4, 16, 64, 1024] {
                assert_eq!(probe_step(hash, cap) % 2, 1, "hash {hash:#x} cap {cap}");
            }
        }
    }

    #[test]
    fn step_is_coprime_with_grown_capacities() {
        // 16 -> 33 -> 67 -> 135 -> 271
        let mut cap = 16usize;
        for _ in 0..6 {
            cap = 2 * cap + 1;
            for h2 in 0..cap as u64 {
                let step = probe_step(h2 << 32, cap);
                assert_eq!(gcd(step, cap), 1, "step {step} cap {cap}");
            }
        }
    }

    #[test]
    fn sequence_is_a_permutation() {
        for cap in [1usize, 2, 3, 9, 15, 16, 33, 45, 67, 135] {
            for hash in [0u64, 3, 0x1234_5678_9abc_def0, u64::MAX, 3 << 32, 9 << 32] {
                assert!(visits_every_slot(hash, cap), "hash {hash:#x} cap {cap}");
            }
        }
    }

    #[test]
    fn zero_hash_degenerates_to_linear_probing() {
        let seq: Vec<usize> = ProbeSeq::new(0, 5).collect();
        assert_eq!(seq, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn single_slot_table() {
        let seq: Vec<usize> = ProbeSeq::new(u64::MAX, 1).collect();
        assert_eq!(seq, vec![0]);
    }
}
