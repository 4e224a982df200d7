//! FlatMapping: the same hash mapping with entries stored in the slots.
//!
//! No backing list and no position bookkeeping: each occupied probe slot
//! carries the key and value directly. Deletion repair moves the entries
//! themselves. Iteration follows slot order, which changes on growth.

use crate::error::{Result, RuntimeError};
use crate::hash::{EntryHash, KeyHash};
use crate::list::List;
use crate::mapping::MappingItem;
use crate::probe_table::{Probe, ProbeTable};
use core::fmt;

pub struct FlatMapping<K, V> {
    table: ProbeTable<(K, V)>,
}

impl<K, V> FlatMapping<K, V> {
    pub fn new() -> Self {
        Self {
            table: ProbeTable::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn length(&self) -> i64 {
        self.table.len() as i64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn slot_count(&self) -> usize {
        self.table.slot_count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.table.iter().map(|(_, (k, v))| (k, v))
    }

    #[cfg(feature = "bench_internal")]
    pub fn max_probe_len(&self) -> usize {
        self.table.max_probe_len()
    }
}

impl<K: KeyHash + PartialEq, V> FlatMapping<K, V> {
    fn locate(&self, key: &K) -> Option<usize> {
        self.table.find(EntryHash::of(key), |(k, _)| k == key)
    }

    pub fn set(&mut self, key: K, value: V) {
        self.table.reserve_one();
        let hash = EntryHash::of(&key);
        let probe = self.table.probe(hash, |(k, _)| *k == key);
        match probe {
            Probe::Found(slot) => {
                let old = core::mem::replace(&mut self.table.payload_mut(slot).1, value);
                drop(old);
            }
            Probe::Vacant(slot) => self.table.fill(slot, hash, (key, value)),
        }
    }

    pub fn has_key(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    pub fn delete(&mut self, key: &K) -> Result<()> {
        let slot = self.locate(key).ok_or(RuntimeError::KeyNotFound)?;
        let removed = self.table.remove(slot);
        drop(removed);
        Ok(())
    }
}

impl<K: KeyHash + PartialEq, V: Clone> FlatMapping<K, V> {
    pub fn get(&self, key: &K) -> Result<V> {
        let slot = self.locate(key).ok_or(RuntimeError::KeyNotFound)?;
        Ok(self.table.payload(slot).1.clone())
    }
}

impl<K: Clone, V: Clone> FlatMapping<K, V> {
    pub fn keys(&self) -> List<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> List<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}

impl<K: KeyHash + Clone, V: Clone> FlatMapping<K, V> {
    pub fn items(&self) -> List<MappingItem<K, V>> {
        self.iter()
            .map(|(k, v)| MappingItem::new(k.clone(), v.clone()))
            .collect()
    }
}

impl<K: KeyHash + PartialEq + Clone, V: Clone> FlatMapping<K, V> {
    pub fn copy(&self) -> Self {
        let mut out = FlatMapping::new();
        for (k, v) in self.iter() {
            out.set(k.clone(), v.clone());
        }
        out
    }
}

impl<K, V> Default for FlatMapping<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: KeyHash + PartialEq + Clone, V: Clone> Clone for FlatMapping<K, V> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<K: KeyHash + PartialEq, V: PartialEq> PartialEq for FlatMapping<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(k, v)| match other.locate(k) {
                Some(slot) => other.table.payload(slot).1 == *v,
                None => false,
            })
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for FlatMapping<K, V> {
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

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for FlatMapping<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
