//! Mapping: hash mapping over an append-ordered backing list.
//!
//! Entries live in a `List<MappingItem<K, V>>` in insertion order. A
//! `ProbeTable<usize>` maps each key's hash to the entry's position in that
//! list. Hashing, probing, growth and deletion repair are the probe table's
//! job; this layer keeps the positions in step with the backing list.
//!
//! Deleting an entry removes it from the backing list, which shifts every
//! later entry left by one, so every index slot pointing past the removed
//! position is decremented. The removed key and value are dropped only
//! after the index and the list agree again; their destructors may reenter
//! the mapping safely.
//!
//! Ownership follows the list: `set` takes the key and value, replacing an
//! existing value drops the old one (the key is kept, not re-acquired),
//! `get` hands out a clone.

use crate::error::{Result, RuntimeError};
use crate::hash::{EntryHash, KeyHash};
use crate::list::List;
use crate::probe_table::{Probe, ProbeTable};
use core::fmt;

/// One mapping entry: cached hash, key and value.
#[derive(Clone, Debug)]
pub struct MappingItem<K, V> {
    hash: EntryHash,
    key: K,
    value: V,
}

impl<K: KeyHash, V> MappingItem<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self {
            hash: EntryHash::of(&key),
            key,
            value,
        }
    }
}

impl<K, V> MappingItem<K, V> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn hash(&self) -> u32 {
        self.hash.get()
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for MappingItem<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.key == other.key && self.value == other.value
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for MappingItem<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MappingItem({}: {})", self.key, self.value)
    }
}

pub struct Mapping<K, V> {
    index: ProbeTable<usize>,
    entries: List<MappingItem<K, V>>,
}

impl<K, V> Mapping<K, V> {
    pub fn new() -> Self {
        Self {
            index: ProbeTable::new(),
            entries: List::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn length(&self) -> i64 {
        self.index.len() as i64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.len() == 0
    }

    /// Number of index slots; 0 until the first insertion.
    pub fn slot_count(&self) -> usize {
        self.index.slot_count()
    }

    /// Entries in backing-list order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|e| (&e.key, &e.value))
    }

    /// Longest probe sequence currently needed to reach an entry.
    #[cfg(feature = "bench_internal")]
    pub fn max_probe_len(&self) -> usize {
        self.index.max_probe_len()
    }
}

impl<K: KeyHash + PartialEq, V> Mapping<K, V> {
    fn locate(&self, key: &K) -> Option<usize> {
        let entries = &self.entries;
        self.index
            .find(EntryHash::of(key), |&pos| entries.get_ref(pos).key == *key)
    }

    pub fn set(&mut self, key: K, value: V) {
        self.index.reserve_one();
        let hash = EntryHash::of(&key);
        let entries = &self.entries;
        let probe = self
            .index
            .probe(hash, |&pos| entries.get_ref(pos).key == key);
        match probe {
            Probe::Found(slot) => {
                let pos = *self.index.payload(slot);
                let old = core::mem::replace(&mut self.entries.get_ref_mut(pos).value, value);
                drop(old);
            }
            Probe::Vacant(slot) => {
                self.entries.push(MappingItem { hash, key, value });
                self.index.fill(slot, hash, self.entries.len() - 1);
            }
        }
    }

    pub fn has_key(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    pub fn delete(&mut self, key: &K) -> Result<()> {
        let slot = self.locate(key).ok_or(RuntimeError::KeyNotFound)?;
        let pos = self.index.remove(slot);
        let removed = self.entries.take(pos);
        for p in self.index.payloads_mut() {
            if *p > pos {
                *p -= 1;
            }
        }
        drop(removed);
        Ok(())
    }
}

impl<K: KeyHash + PartialEq, V: Clone> Mapping<K, V> {
    pub fn get(&self, key: &K) -> Result<V> {
        let slot = self.locate(key).ok_or(RuntimeError::KeyNotFound)?;
        Ok(self.entries.get_ref(*self.index.payload(slot)).value.clone())
    }
}

impl<K: Clone, V: Clone> Mapping<K, V> {
    pub fn keys(&self) -> List<K> {
        self.entries.iter().map(|e| e.key.clone()).collect()
    }

    pub fn values(&self) -> List<V> {
        self.entries.iter().map(|e| e.value.clone()).collect()
    }

    pub fn items(&self) -> List<MappingItem<K, V>> {
        self.entries.copy()
    }
}

impl<K: KeyHash + PartialEq + Clone, V: Clone> Mapping<K, V> {
    /// Fresh mapping with every live entry re-inserted.
    pub fn copy(&self) -> Self {
        let mut out = Mapping::new();
        for e in self.entries.iter() {
            out.set(e.key.clone(), e.value.clone());
        }
        out
    }
}

impl<K, V> Default for Mapping<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: KeyHash + PartialEq + Clone, V: Clone> Clone for Mapping<K, V> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

/// Order-independent: same size, and every key resolves to an equal value.
impl<K: KeyHash + PartialEq, V: PartialEq> PartialEq for Mapping<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.entries.iter().all(|e| match other.locate(&e.key) {
                Some(slot) => other.entries.get_ref(*other.index.payload(slot)).value == e.value,
                None => false,
            })
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Mapping<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mapping{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        f.write_str("}")
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Mapping<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
