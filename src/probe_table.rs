//! ProbeTable: tombstone-free open addressing with linear probing.
//!
//! This is the structural layer under both mapping variants. It stores a
//! nonzero `EntryHash` plus an opaque payload per occupied slot and never
//! looks at keys itself; callers pass a `matches` predicate when probing.
//!
//! Invariants
//! - A probe for hash `h` starts at `h % slot_count` and walks forward with
//!   wraparound until it hits an empty slot or a matching entry.
//! - Every occupied slot is reachable from its home slot without crossing
//!   an empty slot. `remove` restores this by re-placing the contiguous run
//!   of occupied slots that follows the removed one, so there are no
//!   deletion markers and lookups only distinguish "matches" from "empty".
//! - `(len + 1) / slot_count > 7/10` grows the table (doubling) before an
//!   insert. Growth and repair re-place entries by their stored hash only,
//!   so no user code runs while slots are in motion.

use crate::hash::EntryHash;
use crate::reentrancy::DebugReentrancy;

/// Slot count allocated by the first insertion.
pub const INITIAL_SLOTS: usize = 8;
/// Load factor 0.7 as a ratio.
pub const LOAD_FACTOR_NUM: usize = 7;
pub const LOAD_FACTOR_DEN: usize = 10;

#[derive(Clone, Debug)]
struct Slot<P> {
    hash: EntryHash,
    payload: P,
}

/// Outcome of probing for a key.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Probe {
    Found(usize),
    Vacant(usize),
}

#[derive(Debug)]
pub(crate) struct ProbeTable<P> {
    slots: Vec<Option<Slot<P>>>,
    len: usize,
    reentrancy: DebugReentrancy,
}

fn empty_slots<P>(n: usize) -> Vec<Option<Slot<P>>> {
    (0..n).map(|_| None).collect()
}

/// Put `slot` at the first empty position from its home slot.
fn place<P>(slots: &mut [Option<Slot<P>>], slot: Slot<P>) -> usize {
    let n = slots.len();
    let mut i = slot.hash.bucket(n);
    while slots[i].is_some() {
        i = (i + 1) % n;
    }
    slots[i] = Some(slot);
    i
}

impl<P> ProbeTable<P> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
            reentrancy: DebugReentrancy::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Grow if one more entry would push the load past 0.7.
    pub(crate) fn reserve_one(&mut self) {
        if (self.len + 1) * LOAD_FACTOR_DEN > LOAD_FACTOR_NUM * self.slots.len() {
            self.grow();
        }
    }

    fn grow(&mut self) {
        let _g = self.reentrancy.enter("grow");
        let old_count = self.slots.len();
        let new_count = if old_count == 0 {
            INITIAL_SLOTS
        } else {
            old_count * 2
        };
        let old = std::mem::replace(&mut self.slots, empty_slots(new_count));
        for slot in old.into_iter().flatten() {
            place(&mut self.slots, slot);
        }
        tracing::trace!(
            old_slots = old_count,
            new_slots = new_count,
            entries = self.len,
            "probe table grown"
        );
    }

    /// Walk the probe sequence for `hash`. The table must have slots.
    pub(crate) fn probe<F>(&self, hash: EntryHash, mut matches: F) -> Probe
    where
        F: FnMut(&P) -> bool,
    {
        let _g = self.reentrancy.enter("probe");
        let n = self.slots.len();
        debug_assert!(n > 0, "probe on a table without slots");
        let mut i = hash.bucket(n);
        loop {
            match &self.slots[i] {
                None => return Probe::Vacant(i),
                Some(s) if s.hash == hash && matches(&s.payload) => return Probe::Found(i),
                Some(_) => i = (i + 1) % n,
            }
        }
    }

    /// Slot index of the matching entry, if any.
    pub(crate) fn find<F>(&self, hash: EntryHash, matches: F) -> Option<usize>
    where
        F: FnMut(&P) -> bool,
    {
        if self.len == 0 {
            return None;
        }
        match self.probe(hash, matches) {
            Probe::Found(i) => Some(i),
            Probe::Vacant(_) => None,
        }
    }

    /// Occupy a slot previously reported as `Probe::Vacant`.
    pub(crate) fn fill(&mut self, index: usize, hash: EntryHash, payload: P) {
        debug_assert!(self.slots[index].is_none());
        self.slots[index] = Some(Slot { hash, payload });
        self.len += 1;
    }

    pub(crate) fn payload(&self, index: usize) -> &P {
        &self.slots[index]
            .as_ref()
            .expect("slot index must refer to an occupied slot")
            .payload
    }

    pub(crate) fn payload_mut(&mut self, index: usize) -> &mut P {
        &mut self.slots[index]
            .as_mut()
            .expect("slot index must refer to an occupied slot")
            .payload
    }

    /// Empty the slot at `index` and repair the probe chain behind it.
    pub(crate) fn remove(&mut self, index: usize) -> P {
        let _g = self.reentrancy.enter("remove");
        let removed = self.slots[index]
            .take()
            .expect("slot index must refer to an occupied slot");
        self.len -= 1;

        let n = self.slots.len();
        let mut j = (index + 1) % n;
        let mut moved = 0usize;
        while let Some(slot) = self.slots[j].take() {
            place(&mut self.slots, slot);
            moved += 1;
            j = (j + 1) % n;
        }
        tracing::trace!(slot = index, moved, "probe chain repaired");
        removed.payload
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (EntryHash, &P)> {
        self.slots
            .iter()
            .flatten()
            .map(|s| (s.hash, &s.payload))
    }

    pub(crate) fn payloads_mut(&mut self) -> impl Iterator<Item = &mut P> {
        self.slots.iter_mut().flatten().map(|s| &mut s.payload)
    }

    /// Longest distance (in slots, inclusive) from an entry's home slot.
    #[cfg_attr(not(feature = "bench_internal"), allow(dead_code))]
    pub(crate) fn max_probe_len(&self) -> usize {
        let n = self.slots.len();
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (i + n - s.hash.bucket(n)) % n + 1))
            .max()
            .unwrap_or(0)
    }
}
