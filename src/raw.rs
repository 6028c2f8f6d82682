//! The owned, uninitialized backing store of a [`DynArray`](crate::DynArray).
//!
//! `RawBuf` knows how many slots it has, never how many of them are live. It allocates, moves a
//! prefix of slots into a new allocation, and frees. Constructing and dropping the elements in
//! those slots is the array's job.

use crate::error::ReserveError;
use alloc::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use contracts::*;
use std::cmp;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};
use static_assertions::const_assert;

/// Capacity after a growing reallocation is at least `cap * GROWTH_NUMER / GROWTH_DENOM + 1`.
const GROWTH_NUMER: usize = 3;
const GROWTH_DENOM: usize = 2;

const_assert!(GROWTH_NUMER > GROWTH_DENOM);

pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    _owns: PhantomData<T>,
}

impl<T> RawBuf<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    pub const fn new() -> Self {
        RawBuf {
            ptr: NonNull::dangling(),
            cap: if Self::IS_ZST { usize::MAX } else { 0 },
            _owns: PhantomData,
        }
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// The capacity a growing reallocation picks when `required` slots are needed.
    #[debug_ensures(ret >= required)]
    pub fn grown_capacity(&self, required: usize) -> usize {
        let geometric = self.cap.saturating_mul(GROWTH_NUMER) / GROWTH_DENOM + 1;
        cmp::max(required, geometric)
    }

    /// Makes room for `len + additional` slots, growing geometrically.
    pub fn try_reserve(&mut self, len: usize, additional: usize) -> Result<(), ReserveError> {
        let required = len
            .checked_add(additional)
            .ok_or(ReserveError::CapacityOverflow)?;

        if required <= self.cap {
            return Ok(());
        }

        let new_cap = self.grown_capacity(required);
        self.try_realloc_exact(len, new_cap)
    }

    /// Moves the first `len` slots into a fresh allocation of exactly `new_cap` slots, then frees
    /// the old one.
    ///
    /// On error nothing has been touched: the old allocation and its contents are as they were.
    #[debug_requires(len <= new_cap)]
    #[debug_requires(len <= self.cap)]
    pub fn try_realloc_exact(&mut self, len: usize, new_cap: usize) -> Result<(), ReserveError> {
        if Self::IS_ZST {
            return Ok(());
        }

        let new_ptr = if new_cap == 0 {
            NonNull::dangling()
        } else {
            let layout = Layout::array::<T>(new_cap).map_err(|_| ReserveError::CapacityOverflow)?;

            // SAFETY: `layout` has a non-zero size since `T` is not zero-sized and `new_cap > 0`.
            let raw = unsafe { alloc(layout) }.cast::<T>();
            NonNull::new(raw).ok_or(ReserveError::AllocFailed { layout })?
        };

        // SAFETY: The allocations are distinct and both hold at least `len` slots. The old slots
        // are logically uninitialized after this; `free` does not drop them.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), len);
        }

        self.free();
        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }

    fn free(&mut self) {
        if Self::IS_ZST || self.cap == 0 {
            return;
        }

        // SAFETY: `ptr` came from `alloc` with exactly this layout, which was valid then.
        unsafe {
            let layout = Layout::from_size_align_unchecked(
                mem::size_of::<T>() * self.cap,
                mem::align_of::<T>(),
            );
            dealloc(self.ptr.as_ptr().cast(), layout);
        }
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        self.free();
    }
}

/// Turns a reservation failure into the infallible behavior of `alloc::vec::Vec`.
pub(crate) fn handle_reserve(res: Result<(), ReserveError>) {
    match res {
        Ok(()) => {}
        Err(ReserveError::CapacityOverflow) => capacity_overflow(),
        Err(ReserveError::AllocFailed { layout }) => handle_alloc_error(layout),
    }
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_policy() {
        let mut buf = RawBuf::<u32>::new();
        let mut caps = vec![buf.capacity()];

        for len in 0..20 {
            if len == buf.capacity() {
                buf.try_reserve(len, 1).unwrap();
                caps.push(buf.capacity());
            }
        }

        assert_eq!(caps, [0, 1, 2, 4, 7, 11, 17, 26]);
    }

    #[test]
    fn reserve_large_request_is_exact() {
        let mut buf = RawBuf::<u8>::new();
        buf.try_reserve(0, 100).unwrap();
        assert_eq!(buf.capacity(), 100);

        // Geometric growth wins once it exceeds the request.
        buf.try_reserve(100, 1).unwrap();
        assert_eq!(buf.capacity(), 151);
    }

    #[test]
    fn realloc_moves_prefix() {
        let mut buf = RawBuf::<u64>::new();
        buf.try_realloc_exact(0, 4).unwrap();
        unsafe {
            for i in 0..3 {
                buf.ptr().add(i).write(i as u64 * 10);
            }
        }

        buf.try_realloc_exact(3, 3).unwrap();
        assert_eq!(buf.capacity(), 3);

        let got: Vec<u64> = (0..3).map(|i| unsafe { buf.ptr().add(i).read() }).collect();
        assert_eq!(got, [0, 10, 20]);
    }

    #[test]
    fn overflow_leaves_buffer_untouched() {
        let mut buf = RawBuf::<u64>::new();
        buf.try_realloc_exact(0, 2).unwrap();
        let before = buf.ptr();

        assert_eq!(
            buf.try_reserve(2, usize::MAX),
            Err(ReserveError::CapacityOverflow)
        );
        assert_eq!(
            buf.try_reserve(0, usize::MAX / 4),
            Err(ReserveError::CapacityOverflow)
        );

        assert_eq!(buf.capacity(), 2);
        assert_eq!(buf.ptr(), before);
    }

    #[test]
    fn zero_sized() {
        let mut buf = RawBuf::<()>::new();
        assert_eq!(buf.capacity(), usize::MAX);
        buf.try_reserve(1000, 1000).unwrap();
        buf.try_realloc_exact(0, 0).unwrap();
        assert_eq!(buf.capacity(), usize::MAX);
    }
}
