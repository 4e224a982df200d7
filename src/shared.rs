//! Ownership core: an intrusive, single-threaded counted pointer.
//!
//! `Shared<T>` keeps its `RefCount` next to the value in one heap block.
//! Every live handle holds exactly one `Claim` acquired from that count;
//! cloning acquires another and dropping releases it. The value is
//! destroyed by the release that returns the last claim, and by no other.
//!
//! A `Claim` is linear: dropping one instead of releasing it panics, so an
//! unpaired acquire cannot go unnoticed. The count is a plain `Cell`, so
//! `Shared` is `!Send` and `!Sync`.

use core::cell::Cell;
use core::fmt;
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ops::Deref;
use core::ptr::NonNull;

/// Zero-sized proof of one acquire. Must go back through `RefCount::release`.
struct Claim {
    _nosend: PhantomData<*mut ()>,
}

impl Drop for Claim {
    fn drop(&mut self) {
        panic!("claim dropped without release");
    }
}

/// Live-handle count of one shared block.
struct RefCount {
    live: Cell<usize>,
}

impl RefCount {
    fn zero() -> Self {
        Self { live: Cell::new(0) }
    }

    #[inline]
    fn live(&self) -> usize {
        self.live.get()
    }

    #[inline]
    fn acquire(&self) -> Claim {
        let n = self.live.get().wrapping_add(1);
        if n == 0 {
            // overflow aborts, as with `Rc`
            std::process::abort();
        }
        self.live.set(n);
        Claim {
            _nosend: PhantomData,
        }
    }

    /// Returns true when this gave back the last claim.
    #[inline]
    fn release(&self, claim: Claim) -> bool {
        let c = self.live.get();
        assert!(c > 0, "release on an object with no live handles");
        self.live.set(c - 1);
        core::mem::forget(claim);
        c == 1
    }
}

struct SharedBox<T> {
    count: RefCount,
    value: T,
}

pub struct Shared<T> {
    ptr: NonNull<SharedBox<T>>,
    claim: ManuallyDrop<Claim>,
    _owns: PhantomData<SharedBox<T>>,
}

impl<T> Shared<T> {
    /// Allocate `value` with a count of one.
    pub fn new(value: T) -> Self {
        let boxed = Box::new(SharedBox {
            count: RefCount::zero(),
            value,
        });
        let claim = boxed.count.acquire();
        Self::from_parts(NonNull::from(Box::leak(boxed)), claim)
    }

    fn from_parts(ptr: NonNull<SharedBox<T>>, claim: Claim) -> Self {
        Self {
            ptr,
            claim: ManuallyDrop::new(claim),
            _owns: PhantomData,
        }
    }

    #[inline]
    fn inner(&self) -> &SharedBox<T> {
        // SAFETY: the block stays allocated while this handle's claim is out.
        unsafe { self.ptr.as_ref() }
    }

    /// Number of live handles to this object.
    pub fn ref_count(this: &Self) -> usize {
        this.inner().count.live()
    }

    /// Identity comparison.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        a.ptr == b.ptr
    }

    /// Mutable access when this is the only handle.
    pub fn get_mut(this: &mut Self) -> Option<&mut T> {
        if Self::ref_count(this) == 1 {
            // SAFETY: count of one means no other handle can observe the value.
            Some(unsafe { &mut (*this.ptr.as_ptr()).value })
        } else {
            None
        }
    }

    /// Take the value out if this is the only handle; otherwise hand the
    /// handle back unchanged.
    pub fn try_unwrap(this: Self) -> Result<T, Self> {
        if Self::ref_count(&this) != 1 {
            return Err(this);
        }
        let mut this = ManuallyDrop::new(this);
        // SAFETY: `this` is never used again, so the claim is taken once.
        let claim = unsafe { ManuallyDrop::take(&mut this.claim) };
        // SAFETY: the block came from `Box::leak` and this is the last handle.
        let boxed = unsafe { Box::from_raw(this.ptr.as_ptr()) };
        let last = boxed.count.release(claim);
        debug_assert!(last);
        let SharedBox { value, .. } = *boxed;
        Ok(value)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        let count = &self.inner().count;
        debug_assert!(count.live() > 0, "acquire on a released object");
        Self::from_parts(self.ptr, count.acquire())
    }
}

impl<T> Drop for Shared<T> {
    fn drop(&mut self) {
        // SAFETY: drop runs once per handle, so the claim is taken once.
        let claim = unsafe { ManuallyDrop::take(&mut self.claim) };
        // SAFETY: the block is alive until the release below reports the last claim.
        let last = unsafe { self.ptr.as_ref() }.count.release(claim);
        if last {
            // SAFETY: last claim returned; nothing else can reach the block.
            drop(unsafe { Box::from_raw(self.ptr.as_ptr()) });
        }
    }
}

impl<T> Deref for Shared<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.inner().value
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: PartialEq> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || **self == **other
    }
}

impl<T: Eq> Eq for Shared<T> {}

impl<T: fmt::Display> fmt::Display for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}

/// Acquire another handle; a missing reference stays missing.
pub fn acquire<T>(r: Option<&Shared<T>>) -> Option<Shared<T>> {
    r.cloned()
}

/// Release a handle; a missing reference is a no-op.
pub fn release<T>(r: Option<Shared<T>>) {
    drop(r);
}
