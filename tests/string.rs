// Str integration tests.
//
// Invariants exercised:
// - Concatenation onto a view that ends at its buffer's tail appends in
//   place; every other case copies, and existing views never change.
// - Slices and views share the buffer and never split a codepoint.
// - Invalid UTF-8 is rejected at ingestion.
mod common;

use rc_runtime::{Result, RuntimeError, Str};

// Test: repeated appends reuse one buffer.
// Verifies: every result shares the first buffer and the head view is stable.
#[test]
fn append_loop_grows_one_buffer() {
    common::init_tracing();
    let head = Str::from("ab");
    let mut acc = head.clone();
    for _ in 0..100 {
        acc = acc.concat(&Str::from("xy"));
        assert!(acc.shares_buffer(&head));
        assert!(acc.buffer_capacity() >= acc.byte_length());
    }
    assert_eq!(acc.byte_length(), 202);
    assert_eq!(head, "ab");
    assert!(acc.starts_with(&Str::from("abxy")));
}

// Test: two appends from the same base.
// Verifies: the second append copies because the base is no longer the
// buffer's tail, and the first result is untouched.
#[test]
fn diverging_appends_do_not_clobber() {
    common::init_tracing();
    let base = Str::from("base");
    let a = base.concat(&Str::from("-a"));
    let b = base.concat(&Str::from("-b"));
    assert_eq!(a, "base-a");
    assert_eq!(b, "base-b");
    assert!(a.shares_buffer(&base));
    assert!(!b.shares_buffer(&base));
    assert!(!base.is_buffer_tail());
}

// Test: empty operands.
// Verifies: concatenating with the empty string on either side yields an
// equal string, for both a buffer tail and a non-tail view.
#[test]
fn concat_with_empty_is_identity() {
    let a = Str::from("añb");
    assert_eq!(a.concat(&Str::new()), a);
    assert_eq!(Str::new().concat(&a), a);
    let _grown = a.concat(&Str::from("x"));
    assert!(!a.is_buffer_tail());
    assert_eq!(a.concat(&Str::new()), "añb");
    assert_eq!(Str::new().concat(&a), "añb");
    assert_eq!(Str::new().concat(&Str::new()), "");
}

#[test]
fn codepoint_aware_slicing() -> Result<()> {
    let s = Str::from("añb€");
    assert_eq!(s.byte_length(), 7);
    assert_eq!(s.codepoint_length(), 4);
    assert_eq!(s.slice(1, 3)?, "ñ");
    assert_eq!(
        s.slice(2, 4),
        Err(RuntimeError::MidCodepointSlice { index: 2 })
    );
    assert_eq!(s.slice(4, 100)?, "€");
    assert_eq!(s.first_codepoint()?, "a");
    assert_eq!(s.slice(1, 7)?.first_codepoint()?, "ñ");
    assert!(Str::new().first_codepoint().is_err());
    Ok(())
}

#[test]
fn invalid_bytes_rejected() {
    assert_eq!(
        Str::from_bytes(b"ok\xffno"),
        Err(RuntimeError::InvalidEncoding { position: 2 })
    );
    assert_eq!(Str::from_bytes("€".as_bytes()).unwrap(), "€");
}

#[test]
fn search_helpers() {
    let s = Str::from("key=value=more");
    let eq = Str::from("=");
    assert_eq!(s.find_first(&eq), Some(3));
    assert_eq!(s.slice_until_substring(&eq), "key");
    assert_eq!(s.remove_prefix(&Str::from("key=")), "value=more");
    assert_eq!(s.remove_suffix(&Str::from("=more")), "key=value");
    assert_eq!(s.remove_prefix(&Str::from("nope")), s);
    assert!(s.ends_with(&Str::from("more")));
    assert_eq!(s.get_utf8_byte(0), Ok(b'k'));
    assert!(s.get_utf8_byte(14).is_err());
}

#[test]
fn equality_ignores_buffer_identity() {
    let a = Str::from("hello");
    let b = Str::from("he").concat(&Str::from("llo"));
    assert_eq!(a, b);
    assert!(!a.shares_buffer(&b));
    assert_eq!(Str::from("ab").repeat(3), "ababab");
    assert_eq!(Str::from("ab").repeat(-1), "");
}
