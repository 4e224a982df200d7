//! UTF-8 helpers: ingestion check, lead-byte classification, boundaries.

use crate::error::{Result, RuntimeError};

/// Check `bytes` once, at ingestion. Everything downstream relies on it.
pub fn validate(bytes: &[u8]) -> Result<()> {
    core::str::from_utf8(bytes)
        .map(|_| ())
        .map_err(|e| RuntimeError::InvalidEncoding {
            position: e.valid_up_to(),
        })
}

/// Length of the sequence introduced by `lead`, or `None` for a
/// continuation byte or a byte that never starts a sequence.
#[inline]
pub fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7f => Some(1),
        0xc0..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf7 => Some(4),
        _ => None,
    }
}

/// `10xxxxxx`
#[inline]
pub fn is_continuation(b: u8) -> bool {
    b & 0xc0 == 0x80
}

/// True when byte offset `index` starts a codepoint or is the end.
pub fn is_boundary(bytes: &[u8], index: usize) -> bool {
    match bytes.get(index) {
        Some(&b) => !is_continuation(b),
        None => index == bytes.len(),
    }
}

/// Count codepoints by walking lead bytes. Input must already be valid.
pub fn codepoint_count(bytes: &[u8]) -> usize {
    let mut i = 0;
    let mut n = 0;
    while i < bytes.len() {
        i += sequence_len(bytes[i]).unwrap_or(1);
        n += 1;
    }
    n
}
