//! Key hashing for the mappings.
//!
//! Mappings reserve the hash value 0 for "empty slot", so a key whose hash
//! naturally comes out as 0 is remapped to `ZERO_HASH_SENTINEL` by
//! `EntryHash`. Strings use a streaming mix over 16-bit words with
//! avalanche finishing rounds.

use core::num::NonZeroU32;

/// Stand-in for keys whose hash is 0.
pub const ZERO_HASH_SENTINEL: u32 = 0x9e37_79b9;

/// Hash a key the way the mappings see it.
pub trait KeyHash {
    fn key_hash(&self) -> u32;
}

/// A key hash that is guaranteed nonzero.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EntryHash(NonZeroU32);

impl EntryHash {
    pub fn of<K: KeyHash + ?Sized>(key: &K) -> Self {
        Self::from_raw(key.key_hash())
    }

    pub fn from_raw(raw: u32) -> Self {
        match NonZeroU32::new(raw) {
            Some(h) => EntryHash(h),
            None => EntryHash(NonZeroU32::new(ZERO_HASH_SENTINEL).unwrap_or(NonZeroU32::MIN)),
        }
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Home slot in a table of `slots` slots.
    #[inline]
    pub(crate) fn bucket(self, slots: usize) -> usize {
        self.0.get() as usize % slots
    }
}

#[inline]
fn word16(b: &[u8]) -> u32 {
    u16::from_le_bytes([b[0], b[1]]) as u32
}

/// Streaming 32-bit hash over raw bytes, consumed four bytes per round as
/// two little-endian 16-bit words. Empty input hashes to 0.
pub fn bytes_hash(data: &[u8]) -> u32 {
    if data.is_empty() {
        return 0;
    }
    let mut hash = data.len() as u32;
    let mut chunks = data.chunks_exact(4);
    for c in &mut chunks {
        hash = hash.wrapping_add(word16(&c[0..2]));
        let tmp = (word16(&c[2..4]) << 11) ^ hash;
        hash = (hash << 16) ^ tmp;
        hash = hash.wrapping_add(hash >> 11);
    }

    let rest = chunks.remainder();
    match rest.len() {
        3 => {
            hash = hash.wrapping_add(word16(&rest[0..2]));
            hash ^= hash << 16;
            hash ^= ((rest[2] as i8 as i32) << 18) as u32;
            hash = hash.wrapping_add(hash >> 11);
        }
        2 => {
            hash = hash.wrapping_add(word16(rest));
            hash ^= hash << 11;
            hash = hash.wrapping_add(hash >> 17);
        }
        1 => {
            hash = hash.wrapping_add(rest[0] as i8 as i32 as u32);
            hash ^= hash << 10;
            hash = hash.wrapping_add(hash >> 1);
        }
        _ => {}
    }

    // avalanche
    hash ^= hash << 3;
    hash = hash.wrapping_add(hash >> 5);
    hash ^= hash << 4;
    hash = hash.wrapping_add(hash >> 17);
    hash ^= hash << 25;
    hash = hash.wrapping_add(hash >> 6);
    hash
}

impl KeyHash for i64 {
    fn key_hash(&self) -> u32 {
        let v = *self as u64;
        (v ^ (v >> 32)) as u32
    }
}

impl KeyHash for bool {
    fn key_hash(&self) -> u32 {
        *self as u32
    }
}

/// The unit value stands for the language's `null`.
impl KeyHash for () {
    fn key_hash(&self) -> u32 {
        69
    }
}

impl KeyHash for str {
    fn key_hash(&self) -> u32 {
        bytes_hash(self.as_bytes())
    }
}

impl KeyHash for String {
    fn key_hash(&self) -> u32 {
        bytes_hash(self.as_bytes())
    }
}

impl<T: KeyHash + ?Sized> KeyHash for &T {
    fn key_hash(&self) -> u32 {
        (**self).key_hash()
    }
}

impl<T: KeyHash> KeyHash for crate::shared::Shared<T> {
    fn key_hash(&self) -> u32 {
        (**self).key_hash()
    }
}
