//! Random-access cursors over contiguous storage.
//!
//! A cursor is a position, not a borrow of an element. Moving it around is plain (wrapping)
//! pointer arithmetic and always safe; only dereferencing it is `unsafe`. A [`Span`] pairs two
//! cursors into a `[first, last)` range that its holder is known to have exclusive access to,
//! which is what the safe sorting entry points take.
//!
//! [`RevCursor`] walks the same storage backwards. Its offset, distance and ordering operators
//! are the exact negation of [`Cursor`]'s, so any algorithm written against
//! [`RandomAccessCursor`] runs unmodified on a reversed range.
//!
//! Cursors handed out by a [`DynArray`](crate::DynArray) borrow it, so the borrow checker rejects
//! any mutation that could reallocate or shift elements while they are alive. To name a position
//! across such a mutation, convert it to an offset with
//! [`DynArray::offset_of`](crate::DynArray::offset_of) first.

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::ptr::{self, NonNull};

/// The operations the sort and merge algorithms need from a position in a sequence.
pub trait RandomAccessCursor:
    Copy
    + Ord
    + Add<isize, Output = Self>
    + Sub<isize, Output = Self>
    + AddAssign<isize>
    + SubAssign<isize>
    + Sub<Self, Output = isize>
{
    type Item;

    /// The address of the element under the cursor. Computing it is always safe.
    fn as_ptr(self) -> *mut Self::Item;

    /// Advances by one position. A post-increment is `let old = c; c.inc();`.
    #[inline]
    fn inc(&mut self) {
        *self += 1;
    }

    /// Steps back by one position.
    #[inline]
    fn dec(&mut self) {
        *self -= 1;
    }

    /// # Safety
    ///
    /// The cursor must designate a live element that nobody mutates during `'r`.
    #[inline]
    unsafe fn get<'r>(self) -> &'r Self::Item {
        &*self.as_ptr()
    }

    /// # Safety
    ///
    /// The cursor must designate a live element that nobody else accesses during `'r`.
    #[inline]
    unsafe fn get_mut<'r>(self) -> &'r mut Self::Item {
        &mut *self.as_ptr()
    }

    /// Exchanges the elements under two cursors, which may be equal.
    ///
    /// # Safety
    ///
    /// Both cursors must designate live elements.
    #[inline]
    unsafe fn swap_with(self, other: Self) {
        ptr::swap(self.as_ptr(), other.as_ptr())
    }
}

// Positions of zero-sized elements are counted in bytes so that cursors over them still move.

fn offset<T>(p: *mut T, n: isize) -> *mut T {
    if mem::size_of::<T>() == 0 {
        p.cast::<u8>().wrapping_offset(n).cast()
    } else {
        p.wrapping_offset(n)
    }
}

fn distance<T>(to: *mut T, from: *mut T) -> isize {
    let stride = mem::size_of::<T>().max(1) as isize;
    (to as usize).wrapping_sub(from as usize) as isize / stride
}

fn element<T>(p: *mut T) -> *mut T {
    if mem::size_of::<T>() == 0 {
        NonNull::dangling().as_ptr()
    } else {
        p
    }
}

/// A forward position in contiguous storage borrowed for `'a`.
pub struct Cursor<'a, T> {
    ptr: *mut T,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn from_ptr(ptr: *mut T) -> Self {
        Cursor {
            ptr,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> PartialOrd for Cursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Cursor<'_, T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ptr.cmp(&other.ptr)
    }
}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.ptr).finish()
    }
}

impl<T> Add<isize> for Cursor<'_, T> {
    type Output = Self;

    fn add(self, n: isize) -> Self {
        Cursor::from_ptr(offset(self.ptr, n))
    }
}

impl<T> Sub<isize> for Cursor<'_, T> {
    type Output = Self;

    fn sub(self, n: isize) -> Self {
        Cursor::from_ptr(offset(self.ptr, n.wrapping_neg()))
    }
}

impl<T> AddAssign<isize> for Cursor<'_, T> {
    fn add_assign(&mut self, n: isize) {
        *self = *self + n;
    }
}

impl<T> SubAssign<isize> for Cursor<'_, T> {
    fn sub_assign(&mut self, n: isize) {
        *self = *self - n;
    }
}

impl<T> Sub for Cursor<'_, T> {
    type Output = isize;

    fn sub(self, origin: Self) -> isize {
        distance(self.ptr, origin.ptr)
    }
}

impl<T> RandomAccessCursor for Cursor<'_, T> {
    type Item = T;

    fn as_ptr(self) -> *mut T {
        element(self.ptr)
    }
}

/// A backward position in contiguous storage borrowed for `'a`.
///
/// Like the standard library's reverse iterators, a `RevCursor` keeps a *base* position and
/// designates the element just before it. The reverse begin of a range is therefore built from
/// its forward end, and the reverse end from its forward begin; no pointer ever has to point
/// before the start of the allocation.
pub struct RevCursor<'a, T> {
    base: *mut T,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> RevCursor<'a, T> {
    /// The reverse cursor designating the element just before `base`.
    pub fn new(base: Cursor<'a, T>) -> Self {
        RevCursor {
            base: base.ptr,
            _marker: PhantomData,
        }
    }

    /// The forward cursor one past the element this cursor designates.
    pub fn base(self) -> Cursor<'a, T> {
        Cursor::from_ptr(self.base)
    }

    fn from_base(base: *mut T) -> Self {
        RevCursor {
            base,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for RevCursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RevCursor<'_, T> {}

impl<T> PartialEq for RevCursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl<T> Eq for RevCursor<'_, T> {}

impl<T> PartialOrd for RevCursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for RevCursor<'_, T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.base.cmp(&self.base)
    }
}

impl<T> fmt::Debug for RevCursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RevCursor").field(&self.base).finish()
    }
}

impl<T> Add<isize> for RevCursor<'_, T> {
    type Output = Self;

    fn add(self, n: isize) -> Self {
        RevCursor::from_base(offset(self.base, n.wrapping_neg()))
    }
}

impl<T> Sub<isize> for RevCursor<'_, T> {
    type Output = Self;

    fn sub(self, n: isize) -> Self {
        RevCursor::from_base(offset(self.base, n))
    }
}

impl<T> AddAssign<isize> for RevCursor<'_, T> {
    fn add_assign(&mut self, n: isize) {
        *self = *self + n;
    }
}

impl<T> SubAssign<isize> for RevCursor<'_, T> {
    fn sub_assign(&mut self, n: isize) {
        *self = *self - n;
    }
}

impl<T> Sub for RevCursor<'_, T> {
    type Output = isize;

    fn sub(self, origin: Self) -> isize {
        distance(origin.base, self.base)
    }
}

impl<T> RandomAccessCursor for RevCursor<'_, T> {
    type Item = T;

    fn as_ptr(self) -> *mut T {
        element(offset(self.base, -1))
    }
}

/// A `[first, last)` range of live elements that the holder has exclusive access to.
#[derive(Debug)]
pub struct Span<C> {
    first: C,
    last: C,
}

impl<C: RandomAccessCursor> Span<C> {
    /// # Safety
    ///
    /// `first <= last`, every position in `[first, last)` designates a live element of a single
    /// allocation, and nothing else reads or writes those elements while the cursors are in use.
    pub unsafe fn from_raw_parts(first: C, last: C) -> Self {
        debug_assert!(first <= last);
        Span { first, last }
    }

    pub fn first(&self) -> C {
        self.first
    }

    pub fn last(&self) -> C {
        self.last
    }

    pub fn len(&self) -> usize {
        (self.last - self.first) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.first == self.last
    }
}

impl<'a, T> Span<Cursor<'a, T>> {
    pub fn from_slice(s: &'a mut [T]) -> Self {
        let first = Cursor::from_ptr(s.as_mut_ptr());
        Span {
            first,
            last: first + s.len() as isize,
        }
    }

    /// The same elements, traversed back to front.
    pub fn rev(self) -> Span<RevCursor<'a, T>> {
        Span {
            first: RevCursor::new(self.last),
            last: RevCursor::new(self.first),
        }
    }
}

impl<'a, T> Span<RevCursor<'a, T>> {
    pub fn from_slice_rev(s: &'a mut [T]) -> Self {
        Span::from_slice(s).rev()
    }

    /// The same elements, traversed front to back.
    pub fn rev(self) -> Span<Cursor<'a, T>> {
        Span {
            first: self.last.base(),
            last: self.first.base(),
        }
    }
}
