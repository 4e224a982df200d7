//! Growable list with inline small-capacity storage.
//!
//! The first `INLINE_CAPACITY` items live inside the list value itself.
//! Past that the items move to a heap array that only ever grows; the list
//! never moves back inline. Capacity doubles whenever more room is needed.
//!
//! Ownership: the list owns every item it holds. Reading operations (`get`,
//! `first`, `last`, `slice`, `copy`, ...) hand out clones, which for
//! `Shared` items is an acquire. Removing operations (`pop`,
//! `delete_at_index`, `delete_slice`, `set`'s old value) move the item out
//! to the caller without an extra acquire or release.
//!
//! Indices are `i64` as the generated code passes them. Single-item access
//! rejects out-of-range indices; `insert`, `slice` and `delete_slice` clamp.

use crate::error::{Result, RuntimeError};
use crate::string::Str;
use core::fmt;
use smallvec::SmallVec;

/// Items stored inline before the first heap allocation.
pub const INLINE_CAPACITY: usize = 8;

pub struct List<T> {
    items: SmallVec<[T; INLINE_CAPACITY]>,
}

impl<T> List<T> {
    pub fn new() -> Self {
        Self {
            items: SmallVec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Length as the language's integer type.
    #[inline]
    pub fn length(&self) -> i64 {
        self.items.len() as i64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Still using the embedded storage.
    pub fn is_inline(&self) -> bool {
        !self.items.spilled()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    fn ensure_capacity(&mut self, needed: usize) {
        let cap = self.items.capacity();
        if cap >= needed {
            return;
        }
        let mut new_cap = cap.max(1);
        while new_cap < needed {
            new_cap *= 2;
        }
        let spilling = !self.items.spilled();
        self.items.reserve_exact(new_cap - self.items.len());
        if spilling {
            tracing::trace!(capacity = new_cap, "list moved to heap storage");
        }
    }

    fn clamp(&self, index: i64) -> usize {
        index.clamp(0, self.items.len() as i64) as usize
    }

    fn check_index(&self, index: i64) -> Result<usize> {
        if index < 0 || index as usize >= self.items.len() {
            return Err(RuntimeError::index(index, self.items.len()));
        }
        Ok(index as usize)
    }

    pub fn push(&mut self, item: T) {
        self.ensure_capacity(self.items.len() + 1);
        self.items.push(item);
    }

    /// Insert before `index`, clamped into `[0, len]`.
    pub fn insert(&mut self, index: i64, item: T) {
        let index = self.clamp(index);
        self.ensure_capacity(self.items.len() + 1);
        self.items.insert(index, item);
    }

    /// Remove the last item and hand it to the caller.
    pub fn pop(&mut self) -> Result<T> {
        self.items.pop().ok_or_else(|| RuntimeError::empty("pop"))
    }

    /// Remove the item at `index` and hand it to the caller.
    pub fn delete_at_index(&mut self, index: i64) -> Result<T> {
        let index = self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    pub(crate) fn take(&mut self, index: usize) -> T {
        self.items.remove(index)
    }

    pub(crate) fn get_ref(&self, index: usize) -> &T {
        &self.items[index]
    }

    pub(crate) fn get_ref_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }

    /// Remove the clamped range `[start, end)` and return it as a new list.
    pub fn delete_slice(&mut self, start: i64, end: i64) -> List<T> {
        let start = self.clamp(start);
        let end = self.clamp(end);
        let mut out = List::new();
        if start < end {
            out.ensure_capacity(end - start);
            out.items.extend(self.items.drain(start..end));
        }
        out
    }

    /// Replace the item at `index`, returning the old one.
    pub fn set(&mut self, index: i64, item: T) -> Result<T> {
        let index = self.check_index(index)?;
        Ok(core::mem::replace(&mut self.items[index], item))
    }
}

impl<T: Clone> List<T> {
    pub fn get(&self, index: i64) -> Result<T> {
        let index = self.check_index(index)?;
        Ok(self.items[index].clone())
    }

    pub fn first(&self) -> Result<T> {
        self.items
            .first()
            .cloned()
            .ok_or_else(|| RuntimeError::empty("get first item"))
    }

    pub fn last(&self) -> Result<T> {
        self.items
            .last()
            .cloned()
            .ok_or_else(|| RuntimeError::empty("get last item"))
    }

    /// Append clones of all of `other`'s items, in order.
    pub fn push_all(&mut self, other: &List<T>) {
        self.ensure_capacity(self.items.len() + other.len());
        self.items.extend(other.items.iter().cloned());
    }

    /// Copy of the clamped range `[start, end)`.
    pub fn slice(&self, start: i64, end: i64) -> List<T> {
        let start = self.clamp(start);
        let end = self.clamp(end);
        let mut out = List::new();
        if start < end {
            out.ensure_capacity(end - start);
            out.items.extend(self.items[start..end].iter().cloned());
        }
        out
    }

    pub fn reversed(&self) -> List<T> {
        let mut out = List::new();
        out.ensure_capacity(self.len());
        out.items.extend(self.items.iter().rev().cloned());
        out
    }

    pub fn copy(&self) -> List<T> {
        self.slice(0, self.length())
    }
}

impl<T: PartialEq> List<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|x| x == item)
    }

    pub fn starts_with(&self, prefix: &List<T>) -> bool {
        self.items.starts_with(&prefix.items)
    }

    pub fn ends_with(&self, suffix: &List<T>) -> bool {
        self.items.ends_with(&suffix.items)
    }

    pub fn find_first(&self, item: &T) -> Result<i64> {
        self.items
            .iter()
            .position(|x| x == item)
            .map(|i| i as i64)
            .ok_or(RuntimeError::ItemNotFound)
    }

    pub fn find_last(&self, item: &T) -> Result<i64> {
        self.items
            .iter()
            .rposition(|x| x == item)
            .map(|i| i as i64)
            .ok_or(RuntimeError::ItemNotFound)
    }

    /// Index of the single occurrence of `item`.
    pub fn find_only(&self, item: &T) -> Result<i64> {
        let mut found = None;
        let mut count = 0;
        for (i, x) in self.items.iter().enumerate() {
            if x == item {
                found.get_or_insert(i);
                count += 1;
            }
        }
        match (found, count) {
            (Some(i), 1) => Ok(i as i64),
            (None, _) => Err(RuntimeError::ItemNotFound),
            (Some(_), count) => Err(RuntimeError::DuplicateMatch { count }),
        }
    }

    pub fn delete_first(&mut self, item: &T) -> Result<()> {
        let i = self.find_first(item)?;
        drop(self.take(i as usize));
        Ok(())
    }

    pub fn delete_last(&mut self, item: &T) -> Result<()> {
        let i = self.find_last(item)?;
        drop(self.take(i as usize));
        Ok(())
    }

    pub fn delete_only(&mut self, item: &T) -> Result<()> {
        let i = self.find_only(item)?;
        drop(self.take(i as usize));
        Ok(())
    }
}

impl List<Str> {
    pub fn join(&self, sep: &Str) -> Str {
        let mut out = Str::new();
        for (i, s) in self.items.iter().enumerate() {
            if i != 0 {
                out.push_str(sep);
            }
            out.push_str(s);
        }
        out
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for List<T> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items[..] == other.items[..]
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T: fmt::Display> fmt::Display for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]")
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = List::new();
        for item in iter {
            out.push(item);
        }
        out
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = smallvec::IntoIter<[T; INLINE_CAPACITY]>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Shared;
    use std::cell::Cell;
    use std::rc::Rc;

    fn list(xs: &[i64]) -> List<i64> {
        xs.iter().copied().collect()
    }

    /// Invariant: storage stays inline up to `INLINE_CAPACITY`, then moves to
    /// the heap for good with doubled capacity.
    #[test]
    fn inline_then_heap_one_way() {
        let mut l = List::new();
        for i in 0..INLINE_CAPACITY as i64 {
            l.push(i);
        }
        assert!(l.is_inline());
        assert_eq!(l.capacity(), INLINE_CAPACITY);
        l.push(8);
        assert!(!l.is_inline());
        assert_eq!(l.capacity(), 2 * INLINE_CAPACITY);
        while l.pop().is_ok() {}
        assert!(!l.is_inline(), "never moves back inline");
    }

    #[test]
    fn insert_clamps_index() {
        let mut l = list(&[1, 2, 3]);
        l.insert(-10, 0);
        l.insert(100, 4);
        l.insert(2, 9);
        assert_eq!(l, list(&[0, 1, 9, 2, 3, 4]));
    }

    #[test]
    fn get_and_set_reject_bad_indices() {
        let mut l = list(&[1, 2]);
        assert_eq!(
            l.get(-1),
            Err(RuntimeError::IndexOutOfRange { index: -1, length: 2 })
        );
        assert_eq!(
            l.get(2),
            Err(RuntimeError::IndexOutOfRange { index: 2, length: 2 })
        );
        assert_eq!(l.set(1, 5), Ok(2));
        assert!(l.set(2, 5).is_err());
        assert_eq!(l, list(&[1, 5]));
    }

    #[test]
    fn empty_list_accessors_fail() {
        let mut l: List<i64> = List::new();
        assert!(matches!(l.pop(), Err(RuntimeError::EmptyContainer { .. })));
        assert!(matches!(l.first(), Err(RuntimeError::EmptyContainer { .. })));
        assert!(matches!(l.last(), Err(RuntimeError::EmptyContainer { .. })));
    }

    /// Invariant: slice copies, delete_slice removes exactly the clamped range.
    #[test]
    fn slice_and_delete_slice_clamp() {
        let mut l = list(&[0, 1, 2, 3, 4, 5]);
        assert_eq!(l.slice(-3, 2), list(&[0, 1]));
        assert_eq!(l.slice(4, 99), list(&[4, 5]));
        assert_eq!(l.slice(4, 2), list(&[]));
        assert_eq!(l.len(), 6);

        let removed = l.delete_slice(1, 3);
        assert_eq!(removed, list(&[1, 2]));
        assert_eq!(l, list(&[0, 3, 4, 5]));
        assert_eq!(l.delete_slice(3, -1), list(&[]));
    }

    #[test]
    fn find_variants() {
        let l = list(&[7, 8, 7, 9]);
        assert_eq!(l.find_first(&7), Ok(0));
        assert_eq!(l.find_last(&7), Ok(2));
        assert_eq!(l.find_only(&8), Ok(1));
        assert_eq!(l.find_only(&7), Err(RuntimeError::DuplicateMatch { count: 2 }));
        assert_eq!(l.find_first(&1), Err(RuntimeError::ItemNotFound));
        assert_eq!(l.find_only(&1), Err(RuntimeError::ItemNotFound));
    }

    #[test]
    fn delete_variants() {
        let mut l = list(&[7, 8, 7, 9]);
        l.delete_last(&7).unwrap();
        assert_eq!(l, list(&[7, 8, 9]));
        l.delete_only(&7).unwrap();
        assert_eq!(l, list(&[8, 9]));
        assert!(l.delete_first(&7).is_err());
        assert_eq!(l, list(&[8, 9]));
    }

    #[test]
    fn prefix_suffix_contains() {
        let l = list(&[1, 2, 3]);
        assert!(l.contains(&2));
        assert!(!l.contains(&4));
        assert!(l.starts_with(&list(&[1, 2])));
        assert!(!l.starts_with(&list(&[2])));
        assert!(l.ends_with(&list(&[2, 3])));
        assert!(l.ends_with(&list(&[])));
        assert!(!l.ends_with(&list(&[0, 1, 2, 3])));
    }

    #[test]
    fn reversed_copy_and_display() {
        let l = list(&[1, 2, 3]);
        assert_eq!(l.reversed(), list(&[3, 2, 1]));
        assert_eq!(l.copy(), l);
        assert_eq!(l.to_string(), "[1, 2, 3]");
        assert_eq!(List::<i64>::new().to_string(), "[]");
    }

    #[test]
    fn join_strings() {
        let l: List<Str> = ["a", "b", "c"].into_iter().map(Str::from).collect();
        assert_eq!(l.join(&Str::from(", ")), "a, b, c");
        assert_eq!(l.to_string(), "[a, b, c]");
    }

    struct Tracked(Rc<Cell<usize>>);
    impl PartialEq for Tracked {
        fn eq(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }
    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    /// Invariant: each held item is released exactly once, whether it is
    /// overwritten, deleted, or dropped with the list.
    #[test]
    fn items_released_exactly_once() {
        let drops = Rc::new(Cell::new(0));
        let item = Shared::new(Tracked(drops.clone()));
        let mut l = List::new();
        for _ in 0..20 {
            l.push(item.clone());
        }
        let got = l.get(3).unwrap();
        assert_eq!(Shared::ref_count(&item), 22);
        let old = l.set(0, item.clone()).unwrap();
        drop(old);
        let popped = l.pop().unwrap();
        drop(popped);
        let part = l.slice(0, 5);
        drop(part);
        l.delete_first(&item).unwrap();
        assert_eq!(Shared::ref_count(&item), 20);
        drop(l);
        drop(got);
        assert_eq!(Shared::ref_count(&item), 1);
        assert_eq!(drops.get(), 0);
        drop(item);
        assert_eq!(drops.get(), 1);
    }
}
