// List integration tests.
//
// Invariants exercised:
// - Inline storage holds the first 8 items; the 9th moves the list to the
//   heap and it never moves back.
// - Single-item access rejects out-of-range indices; ranges clamp.
// - Search and delete-by-value report missing and duplicate matches
//   without mutating.
mod common;

use rc_runtime::list::INLINE_CAPACITY;
use rc_runtime::{List, RuntimeError, Str};

fn ints(xs: &[i64]) -> List<i64> {
    xs.iter().copied().collect()
}

// Test: spill boundary.
// Verifies: 8 pushes stay inline, the 9th spills with doubled capacity.
#[test]
fn ninth_push_spills_to_heap() {
    common::init_tracing();
    let mut l = List::new();
    for i in 0..INLINE_CAPACITY as i64 {
        l.push(i);
    }
    assert!(l.is_inline());
    assert_eq!(l.capacity(), INLINE_CAPACITY);
    l.push(8);
    assert!(!l.is_inline());
    assert_eq!(l.capacity(), 16);
    while l.pop().is_ok() {}
    assert!(l.is_empty());
    assert!(!l.is_inline());
}

// Test: index handling.
// Verifies: get/set/delete_at_index reject bad indices; insert clamps.
#[test]
fn indices_are_checked_or_clamped() {
    common::init_tracing();
    let mut l = ints(&[1, 2, 3]);
    assert_eq!(l.get(2), Ok(3));
    assert_eq!(
        l.get(3),
        Err(RuntimeError::IndexOutOfRange {
            index: 3,
            length: 3
        })
    );
    assert!(l.get(-1).is_err());
    assert_eq!(l.set(0, 10), Ok(1));
    assert!(l.set(5, 0).is_err());
    l.insert(-5, 0);
    l.insert(100, 4);
    assert_eq!(l, ints(&[0, 10, 2, 3, 4]));
    assert_eq!(l.delete_at_index(1), Ok(10));
    assert!(l.delete_at_index(4).is_err());
    assert_eq!(l, ints(&[0, 2, 3, 4]));
}

#[test]
fn empty_list_errors() {
    let mut l: List<i64> = List::new();
    assert_eq!(
        l.pop(),
        Err(RuntimeError::EmptyContainer { operation: "pop" })
    );
    assert!(l.first().is_err());
    assert!(l.last().is_err());
}

// Test: slices clamp into range and share nothing with the source.
#[test]
fn slices_and_copies() {
    let mut l = ints(&[0, 1, 2, 3, 4, 5]);
    assert_eq!(l.slice(1, 3), ints(&[1, 2]));
    assert_eq!(l.slice(-10, 2), ints(&[0, 1]));
    assert_eq!(l.slice(4, 100), ints(&[4, 5]));
    assert!(l.slice(4, 2).is_empty());
    assert_eq!(l.reversed(), ints(&[5, 4, 3, 2, 1, 0]));

    let removed = l.delete_slice(1, 4);
    assert_eq!(removed, ints(&[1, 2, 3]));
    assert_eq!(l, ints(&[0, 4, 5]));

    let mut c = l.copy();
    c.push(6);
    assert_eq!(l.len(), 3);
    l.push_all(&c);
    assert_eq!(l, ints(&[0, 4, 5, 0, 4, 5, 6]));
}

#[test]
fn search_and_delete_by_value() {
    let mut l = ints(&[1, 2, 1, 3]);
    assert!(l.contains(&3));
    assert_eq!(l.find_first(&1), Ok(0));
    assert_eq!(l.find_last(&1), Ok(2));
    assert_eq!(l.find_only(&2), Ok(1));
    assert_eq!(
        l.find_only(&1),
        Err(RuntimeError::DuplicateMatch { count: 2 })
    );
    assert_eq!(l.find_first(&9), Err(RuntimeError::ItemNotFound));

    assert!(l.delete_only(&1).is_err());
    assert_eq!(l.len(), 4);
    l.delete_last(&1).unwrap();
    assert_eq!(l, ints(&[1, 2, 3]));
    l.delete_first(&1).unwrap();
    assert_eq!(l, ints(&[2, 3]));
    assert_eq!(l.delete_first(&1), Err(RuntimeError::ItemNotFound));

    assert!(l.starts_with(&ints(&[2])));
    assert!(l.ends_with(&ints(&[3])));
    assert!(!l.ends_with(&ints(&[1, 2, 3])));
}

#[test]
fn display_and_join() {
    assert_eq!(ints(&[1, 2, 3]).to_string(), "[1, 2, 3]");
    assert_eq!(List::<i64>::new().to_string(), "[]");
    let words: List<Str> = ["a", "b", "c"].into_iter().map(Str::from).collect();
    assert_eq!(words.join(&Str::from(", ")), "a, b, c");
    assert_eq!(List::<Str>::new().join(&Str::from("-")), "");
}
