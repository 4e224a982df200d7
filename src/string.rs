//! UTF-8 strings over shared, growable buffers.
//!
//! A `Str` is a view `(buffer, offset, len)`. Buffers are reference counted
//! and may be aliased by many views: substrings and prefix-removed strings
//! share the source buffer instead of copying. A buffer's logical length is
//! the length of its `Vec`; its physical capacity is kept at a power of two.
//!
//! Appending to a view that ends exactly at its buffer's logical end writes
//! into that buffer in place. No other view can observe the new bytes,
//! because every view stays within its own `offset + len`, and all of them
//! end at or before the old logical end. Repeated appends to the newest
//! result are therefore amortized O(1).
//!
//! Borrowed byte views (`bytes`, `as_str`) hold a `RefCell` borrow on the
//! buffer; while one is alive, appends to that buffer take the copying path.

use crate::error::{Result, RuntimeError};
use crate::hash::{bytes_hash, KeyHash};
use crate::shared::Shared;
use crate::utf8;
use core::cell::{Ref, RefCell};
use core::fmt;

/// Shared backing storage for `Str` views.
#[derive(Debug, Default)]
pub struct StrBuf {
    bytes: RefCell<Vec<u8>>,
}

impl StrBuf {
    fn new(mut bytes: Vec<u8>) -> Self {
        let want = bytes.len().next_power_of_two();
        if bytes.capacity() < want {
            bytes.reserve_exact(want - bytes.len());
        }
        Self {
            bytes: RefCell::new(bytes),
        }
    }

    /// Logical length: bytes written so far.
    pub fn len(&self) -> usize {
        self.bytes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical allocation size.
    pub fn capacity(&self) -> usize {
        self.bytes.borrow().capacity()
    }
}

#[derive(Clone)]
pub struct Str {
    buf: Shared<StrBuf>,
    offset: usize,
    len: usize,
}

impl Str {
    /// The empty string.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Admit raw bytes, rejecting invalid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        utf8::validate(bytes)?;
        Ok(Self::from_vec(bytes.to_vec()))
    }

    pub fn from_string(s: String) -> Self {
        Self::from_vec(s.into_bytes())
    }

    // Callers guarantee `bytes` is valid UTF-8.
    fn from_vec(bytes: Vec<u8>) -> Self {
        let len = bytes.len();
        Self {
            buf: Shared::new(StrBuf::new(bytes)),
            offset: 0,
            len,
        }
    }

    fn view(&self, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= self.len);
        Self {
            buf: self.buf.clone(),
            offset: self.offset + start,
            len: end - start,
        }
    }

    /// Borrow the raw bytes of this view.
    pub fn bytes(&self) -> Ref<'_, [u8]> {
        let (start, end) = (self.offset, self.offset + self.len);
        Ref::map(self.buf.bytes.borrow(), |b| &b[start..end])
    }

    pub fn as_str(&self) -> Ref<'_, str> {
        // SAFETY: bytes were validated on ingestion, views only start and end
        // on codepoint boundaries, and concatenating valid UTF-8 stays valid.
        Ref::map(self.bytes(), |b| unsafe { core::str::from_utf8_unchecked(b) })
    }

    /// O(1): the length is stored.
    #[inline]
    pub fn byte_length(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Linear decode of each lead byte.
    pub fn codepoint_length(&self) -> usize {
        utf8::codepoint_count(&self.bytes())
    }

    /// True when this view ends at its buffer's logical end, so appends can
    /// grow the buffer in place.
    pub fn is_buffer_tail(&self) -> bool {
        self.offset + self.len == self.buf.len()
    }

    pub fn shares_buffer(&self, other: &Str) -> bool {
        Shared::ptr_eq(&self.buf, &other.buf)
    }

    /// Physical capacity of the backing buffer.
    pub fn buffer_capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn concat(&self, other: &Str) -> Str {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        if let Some(joined) = self.append_in_place(other) {
            tracing::trace!(len = joined.len, "concat grew buffer in place");
            return joined;
        }

        let total = self.len + other.len;
        let mut bytes = Vec::with_capacity(total.next_power_of_two());
        bytes.extend_from_slice(&self.bytes());
        bytes.extend_from_slice(&other.bytes());
        tracing::trace!(len = total, "concat allocated fresh buffer");
        Self::from_vec(bytes)
    }

    fn append_in_place(&self, other: &Str) -> Option<Str> {
        let same_buf = self.shares_buffer(other);
        let src = if same_buf {
            None
        } else {
            Some(other.buf.bytes.try_borrow().ok()?)
        };
        let mut bytes = self.buf.bytes.try_borrow_mut().ok()?;
        if self.offset + self.len != bytes.len() {
            return None;
        }

        let needed = bytes.len() + other.len;
        if needed > bytes.capacity() {
            let target = needed.next_power_of_two();
            let additional = target - bytes.len();
            bytes.reserve_exact(additional);
        }
        let (start, end) = (other.offset, other.offset + other.len);
        match src {
            Some(src) => bytes.extend_from_slice(&src[start..end]),
            None => bytes.extend_from_within(start..end),
        }

        Some(Str {
            buf: self.buf.clone(),
            offset: self.offset,
            len: self.len + other.len,
        })
    }

    /// Append to this string, replacing `self` with the concatenation.
    pub fn push_str(&mut self, other: &Str) {
        *self = self.concat(other);
    }

    /// Byte-offset slice. Offsets are clamped into range; a boundary that
    /// lands on a continuation byte is rejected, even when the range is
    /// reversed. A reversed range yields an empty view.
    pub fn slice(&self, start: i64, end: i64) -> Result<Str> {
        let clamp = |i: i64| i.clamp(0, self.len as i64) as usize;
        let start = clamp(start);
        let end = clamp(end);
        {
            let bytes = self.bytes();
            for index in [start, end] {
                if !utf8::is_boundary(&bytes, index) {
                    return Err(RuntimeError::MidCodepointSlice { index });
                }
            }
        }
        Ok(self.view(start, end.max(start)))
    }

    pub fn starts_with(&self, prefix: &Str) -> bool {
        self.bytes().starts_with(&prefix.bytes())
    }

    pub fn ends_with(&self, suffix: &Str) -> bool {
        self.bytes().ends_with(&suffix.bytes())
    }

    /// View without `prefix`, or the whole string if it does not start with it.
    pub fn remove_prefix(&self, prefix: &Str) -> Str {
        if self.starts_with(prefix) {
            self.view(prefix.len, self.len)
        } else {
            self.clone()
        }
    }

    pub fn remove_suffix(&self, suffix: &Str) -> Str {
        if self.ends_with(suffix) {
            self.view(0, self.len - suffix.len)
        } else {
            self.clone()
        }
    }

    /// View of the first codepoint.
    pub fn first_codepoint(&self) -> Result<Str> {
        let first = *self
            .bytes()
            .first()
            .ok_or_else(|| RuntimeError::empty("take first codepoint"))?;
        let n = utf8::sequence_len(first).unwrap_or(1);
        Ok(self.view(0, n))
    }

    /// Byte offset of the first occurrence of `needle`.
    pub fn find_first(&self, needle: &Str) -> Option<usize> {
        let hay = self.bytes();
        let needle = needle.bytes();
        if needle.is_empty() {
            return Some(0);
        }
        hay.windows(needle.len()).position(|w| w == &*needle)
    }

    /// View up to the first occurrence of `sep`, or the whole string.
    pub fn slice_until_substring(&self, sep: &Str) -> Str {
        match self.find_first(sep) {
            Some(i) => self.view(0, i),
            None => self.clone(),
        }
    }

    pub fn get_utf8_byte(&self, index: i64) -> Result<u8> {
        if index < 0 || index as usize >= self.len {
            return Err(RuntimeError::index(index, self.len));
        }
        Ok(self.bytes()[index as usize])
    }

    pub fn repeat(&self, times: i64) -> Str {
        let mut out = Str::new();
        for _ in 0..times.max(0) {
            out.push_str(self);
        }
        out
    }
}

impl Default for Str {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Str {
    fn from(s: &str) -> Self {
        Self::from_vec(s.as_bytes().to_vec())
    }
}

impl From<String> for Str {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

impl PartialEq for Str {
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        if self.shares_buffer(other) && self.offset == other.offset {
            return true;
        }
        *self.bytes() == *other.bytes()
    }
}

impl Eq for Str {}

impl PartialEq<str> for Str {
    fn eq(&self, other: &str) -> bool {
        *self.bytes() == *other.as_bytes()
    }
}

impl PartialEq<&str> for Str {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl core::hash::Hash for Str {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.bytes().hash(state);
    }
}

impl KeyHash for Str {
    fn key_hash(&self) -> u32 {
        bytes_hash(&self.bytes())
    }
}

impl fmt::Display for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl fmt::Debug for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.as_str(), f)
    }
}
