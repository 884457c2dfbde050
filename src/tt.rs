//! Shared lock-striped transposition table (spec §4.2).
//!
//! The table is a fixed-capacity, open-addressed array of `TtEntry` slots,
//! always-replace. Each slot is protected by one of a fixed power-of-two
//! number of spinlocks, `locks[slot_index % TT_LOCK_STRIPES]`, the same
//! `AtomicBool` + `std::hint::spin_loop()` busy-wait the teacher uses to
//! guard its `send_stop` handshake in `search/multithreading.rs`. Multiple
//! slots share a stripe, so two unrelated keys can momentarily contend, but
//! no slot is ever read or written outside its stripe's lock: lookups and
//! stores are linearizable per slot, and the key triple is re-checked after
//! the lock is taken so a hash collision can only produce a miss, never a
//! wrong hit.

use std::cell::UnsafeCell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{PN_INF, TT_LOCK_STRIPES};
use crate::position::{Position, Side};

/// One transposition-table slot. `proof`/`disproof` of `(PN_INF, PN_INF)`
/// with `valid == false` marks an empty slot.
#[derive(Debug, Copy, Clone)]
struct TtEntry {
    black: u64,
    white: u64,
    side: Side,
    proof: u32,
    disproof: u32,
    valid: bool,
}

impl TtEntry {
    const EMPTY: TtEntry = TtEntry {
        black: 0,
        white: 0,
        side: Side::Black,
        proof: PN_INF,
        disproof: PN_INF,
        valid: false,
    };
}

/// Bounds the table currently holds for a position: `(proof, disproof)`.
pub type Bounds = (u32, u32);

struct Stripe {
    locked: AtomicBool,
}

impl Stripe {
    fn lock(&self) {
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            std::hint::spin_loop();
        }
    }

    fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }
}

/// A fixed-capacity table shared across all Lazy-SMP workers via `Arc`.
pub struct TranspositionTable {
    slots: Box<[UnsafeCell<TtEntry>]>,
    stripes: Box<[Stripe]>,
    capacity: usize,
}

// SAFETY: every access to a slot happens while holding the slot's stripe
// lock (`slots[i]`'s stripe is `locks[i % TT_LOCK_STRIPES]`); the stripe
// locks themselves serialize concurrent access to the underlying `UnsafeCell`s.
unsafe impl Sync for TranspositionTable {}

impl TranspositionTable {
    /// Builds a table sized to hold roughly `size_mb` megabytes of entries.
    pub fn with_size_mb(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<TtEntry>().max(1);
        let capacity = ((size_mb * 1024 * 1024) / entry_size).max(1);
        Self::with_capacity(capacity)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let slots = (0..capacity)
            .map(|_| UnsafeCell::new(TtEntry::EMPTY))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        let num_stripes = TT_LOCK_STRIPES.min(capacity).max(1);
        let stripes = (0..num_stripes)
            .map(|_| Stripe { locked: AtomicBool::new(false) })
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { slots, stripes, capacity }
    }

    fn hash_key(black: u64, white: u64, side: Side) -> u64 {
        let mut hasher = DefaultHasher::new();
        black.hash(&mut hasher);
        white.hash(&mut hasher);
        side.hash(&mut hasher);
        hasher.finish()
    }

    /// Lemire's multiplication-trick reduction of a 64-bit hash into `0..capacity`.
    fn slot_index(&self, hash: u64) -> usize {
        ((hash as u128 * self.capacity as u128) >> 64) as usize
    }

    fn stripe_for(&self, slot_index: usize) -> &Stripe {
        &self.stripes[slot_index % self.stripes.len()]
    }

    /// Looks up `position`, returning the stored `(proof, disproof)` bounds
    /// if present. A miss (either the slot is empty or holds a different
    /// key) returns `None` and never fabricates bounds.
    pub fn lookup(&self, position: &Position) -> Option<Bounds> {
        let hash = Self::hash_key(position.black, position.white, position.side);
        let idx = self.slot_index(hash);
        let stripe = self.stripe_for(idx);
        stripe.lock();
        // SAFETY: we hold the stripe lock covering `idx`.
        let entry = unsafe { *self.slots[idx].get() };
        stripe.unlock();
        if entry.valid
            && entry.black == position.black
            && entry.white == position.white
            && entry.side == position.side
        {
            Some((entry.proof, entry.disproof))
        } else {
            None
        }
    }

    /// Stores `(proof, disproof)` for `position`, always replacing whatever
    /// was in the slot before (spec §4.2: no depth/age-preferred policy).
    pub fn store(&self, position: &Position, proof: u32, disproof: u32) {
        let hash = Self::hash_key(position.black, position.white, position.side);
        let idx = self.slot_index(hash);
        let stripe = self.stripe_for(idx);
        stripe.lock();
        // SAFETY: we hold the stripe lock covering `idx`.
        unsafe {
            *self.slots[idx].get() = TtEntry {
                black: position.black,
                white: position.white,
                side: position.side,
                proof,
                disproof,
                valid: true,
            };
        }
        stripe.unlock();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn pos(black: u64, white: u64, side: Side) -> Position {
        Position::new(black, white, side).unwrap()
    }

    #[test]
    fn miss_on_empty_table() {
        let tt = TranspositionTable::with_capacity(1024);
        assert_eq!(tt.lookup(&pos(1, 2, Side::Black)), None);
    }

    #[test]
    fn store_then_lookup_round_trips() {
        let tt = TranspositionTable::with_capacity(1024);
        let p = pos(1, 2, Side::Black);
        tt.store(&p, 3, 4);
        assert_eq!(tt.lookup(&p), Some((3, 4)));
    }

    #[test]
    fn distinct_keys_do_not_collide_in_value() {
        let tt = TranspositionTable::with_capacity(4096);
        let a = pos(1, 2, Side::Black);
        let b = pos(1, 2, Side::White);
        tt.store(&a, 10, 20);
        tt.store(&b, 30, 40);
        // Even if a and b hash to the same slot, the key re-check on lookup
        // means at most one of them is visible afterward, never a blend.
        let got_a = tt.lookup(&a);
        let got_b = tt.lookup(&b);
        assert!(got_a == Some((10, 20)) || got_a.is_none());
        assert!(got_b == Some((30, 40)) || got_b.is_none());
    }

    #[test]
    fn always_replace_overwrites_prior_entry() {
        let tt = TranspositionTable::with_capacity(1024);
        let p = pos(5, 6, Side::White);
        tt.store(&p, 1, 1);
        tt.store(&p, 7, 8);
        assert_eq!(tt.lookup(&p), Some((7, 8)));
    }

    #[test]
    fn concurrent_store_and_lookup_never_panics() {
        let tt = Arc::new(TranspositionTable::with_capacity(1 << 14));
        let mut handles = Vec::new();
        for t in 0..8u64 {
            let tt = Arc::clone(&tt);
            handles.push(thread::spawn(move || {
                for i in 0..2000u64 {
                    let p = pos(i % 60, 0, if i % 2 == 0 { Side::Black } else { Side::White });
                    tt.store(&p, (t + i) as u32 % PN_INF, (t * i) as u32 % PN_INF);
                    let _ = tt.lookup(&p);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
    }
}
