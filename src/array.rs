//! `DynArray`, a growable array over a hand-managed buffer.
//!
//! Slots `[0, len)` of the buffer hold live elements and `[len, capacity)` are uninitialized.
//! Only the methods in this module cross that boundary, and each one moves `len` so that a panic
//! in user code (a `Clone`, a `Default`, a comparator) never exposes an uninitialized slot or
//! drops a live one twice. At worst such a panic leaks nothing and loses nothing that was already
//! in the array.

use crate::cursor::{Cursor, RandomAccessCursor, RevCursor, Span};
use crate::error::{OutOfRange, ReserveError};
use crate::raw::{handle_reserve, RawBuf};
use alloc::vec::Vec;
use contracts::*;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut};
use std::ptr;
use std::slice;

/// A contiguous growable array.
///
/// Growth is geometric: a full array reallocates to `capacity * 3 / 2 + 1` slots (or to exactly
/// what was asked for, if that is more). The explicit capacity operations (`reserve`, `resize`,
/// `shrink_to_fit`) allocate exactly what they are asked for.
///
/// Indexing and all other read-only slice methods come from `Deref<Target = [T]>`.
pub struct DynArray<T> {
    buf: RawBuf<T>,
    len: usize,
}

// SAFETY: `DynArray<T>` owns its elements just like `Vec<T>`.
unsafe impl<T: Send> Send for DynArray<T> {}
unsafe impl<T: Sync> Sync for DynArray<T> {}

impl<T> DynArray<T> {
    /// An empty array. Does not allocate.
    pub const fn new() -> Self {
        DynArray {
            buf: RawBuf::new(),
            len: 0,
        }
    }

    /// An empty array with room for exactly `cap` elements.
    pub fn with_capacity(cap: usize) -> Self {
        let mut a = DynArray::new();
        a.reserve(cap);
        a
    }

    /// `n` default values.
    pub fn with_len(n: usize) -> Self
    where
        T: Default,
    {
        let mut a = DynArray::new();
        a.resize(n);
        a
    }

    /// `n` clones of `elem`.
    pub fn from_elem(elem: T, n: usize) -> Self
    where
        T: Clone,
    {
        let mut a = DynArray::new();
        a.resize_with(n, || elem.clone());
        a
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of slots allocated, live or not. `usize::MAX` for zero-sized types.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: The first `len` slots are live and the buffer pointer is non-null and aligned.
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: As above, and `&mut self` makes the access exclusive.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// Bounds-checked access.
    ///
    /// ```
    /// use introvec::{dynarr, OutOfRange};
    ///
    /// let a = dynarr![1, 2, 3];
    /// assert_eq!(a.at(1), Ok(&2));
    /// assert_eq!(a.at(3), Err(OutOfRange { index: 3, len: 3 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, OutOfRange> {
        let len = self.len;
        self.as_slice().get(index).ok_or(OutOfRange { index, len })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, OutOfRange> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(OutOfRange { index, len })
    }

    /// # Panics
    ///
    /// If the array is empty.
    #[requires(!self.is_empty(), "front of an empty array")]
    pub fn front(&self) -> &T {
        &self.as_slice()[0]
    }

    #[requires(!self.is_empty(), "front of an empty array")]
    pub fn front_mut(&mut self) -> &mut T {
        &mut self.as_mut_slice()[0]
    }

    /// # Panics
    ///
    /// If the array is empty.
    #[requires(!self.is_empty(), "back of an empty array")]
    pub fn back(&self) -> &T {
        &self.as_slice()[self.len - 1]
    }

    #[requires(!self.is_empty(), "back of an empty array")]
    pub fn back_mut(&mut self) -> &mut T {
        let last = self.len - 1;
        &mut self.as_mut_slice()[last]
    }

    /// Appends an element, growing the buffer if it is full.
    #[debug_ensures(self.len() == old(self.len()) + 1)]
    pub fn push_back(&mut self, value: T) {
        self.grow_for(1);

        // SAFETY: `grow_for` left at least one spare slot.
        unsafe {
            ptr::write(self.buf.ptr().add(self.len), value);
        }
        self.len += 1;
    }

    /// Like `push_back`, but reports allocation failure instead of aborting. On failure the array
    /// is unchanged and `value` is dropped.
    pub fn try_push_back(&mut self, value: T) -> Result<(), ReserveError> {
        self.buf.try_reserve(self.len, 1)?;

        // SAFETY: There is at least one spare slot.
        unsafe {
            ptr::write(self.buf.ptr().add(self.len), value);
        }
        self.len += 1;
        Ok(())
    }

    /// Constructs an element at the back from `f` and returns a reference to it.
    ///
    /// The buffer grows before `f` runs, so a panic in `f` leaves the elements untouched.
    pub fn emplace_back(&mut self, f: impl FnOnce() -> T) -> &mut T {
        let len = self.len;
        self.emplace(len, f)
    }

    /// Prepends an element. `O(n)`.
    pub fn push_front(&mut self, value: T) {
        self.insert(0, value)
    }

    /// Removes and returns the last element.
    ///
    /// # Panics
    ///
    /// If the array is empty.
    #[requires(!self.is_empty(), "pop_back on an empty array")]
    pub fn pop_back(&mut self) -> T {
        self.len -= 1;

        // SAFETY: The slot was live, and is outside `[0, len)` now so it won't be dropped again.
        unsafe { ptr::read(self.buf.ptr().add(self.len)) }
    }

    /// Removes and returns the first element. `O(n)`.
    ///
    /// # Panics
    ///
    /// If the array is empty.
    #[requires(!self.is_empty(), "pop_front on an empty array")]
    pub fn pop_front(&mut self) -> T {
        self.remove(0)
    }

    /// Inserts `value` at `index`, shifting everything after it back by one.
    ///
    /// Positions are offsets rather than cursors, since the insertion may reallocate. Use
    /// [`offset_of`](Self::offset_of) to turn a cursor into one.
    ///
    /// # Panics
    ///
    /// If `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        self.emplace(index, move || value);
    }

    /// Constructs an element from `f` at `index`, shifting everything after it back by one, and
    /// returns a reference to it.
    ///
    /// # Panics
    ///
    /// If `index > len`, or if `f` does. In the latter case the elements are untouched.
    #[requires(index <= self.len(), "insertion index is out of range")]
    pub fn emplace(&mut self, index: usize, f: impl FnOnce() -> T) -> &mut T {
        self.grow_for(1);
        let value = f();

        // SAFETY: There is a spare slot after the tail to shift into, and `index <= len`.
        unsafe {
            let p = self.buf.ptr().add(index);
            ptr::copy(p, p.add(1), self.len - index);
            ptr::write(p, value);
            self.len += 1;
            &mut *p
        }
    }

    /// Removes and returns the element at `index`, shifting everything after it forward by one.
    ///
    /// # Panics
    ///
    /// If `index >= len`.
    #[requires(index < self.len(), "removal index is out of range")]
    pub fn remove(&mut self, index: usize) -> T {
        // SAFETY: `index` is live. Its slot is overwritten by the shifted tail before anyone can
        // observe the duplicate.
        unsafe {
            let p = self.buf.ptr().add(index);
            let value = ptr::read(p);
            ptr::copy(p.add(1), p, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Drops every element past the first `n`. Does nothing if there are at most `n`.
    pub fn truncate(&mut self, n: usize) {
        if n >= self.len {
            return;
        }

        // SAFETY: `[n, len)` are live. They leave `[0, len)` before being dropped, so a panicking
        // destructor cannot lead to a second drop.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.buf.ptr().add(n), self.len - n);
            self.len = n;
            ptr::drop_in_place(tail);
        }
    }

    /// Drops every element. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0)
    }

    /// Exchanges the contents of two arrays without moving any element.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other)
    }

    /// Moves the contents out, leaving an empty array behind.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Reverses the order of the elements in place.
    ///
    /// ```
    /// use introvec::dynarr;
    ///
    /// let mut a = dynarr![1, 2, 3, 4];
    /// a.reverse();
    /// assert_eq!(a, [4, 3, 2, 1]);
    /// ```
    pub fn reverse(&mut self) {
        let span = self.span_mut();
        let (mut lo, mut hi) = (span.first(), span.last());

        while hi - lo > 1 {
            hi.dec();
            // SAFETY: `lo < hi`, both inside the span we hold exclusively.
            unsafe { lo.swap_with(hi) };
            lo.inc();
        }
    }

    /// The offset of the first element equal to `value`, if any.
    pub fn find(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|x| x == value)
    }

    /// Grows the capacity to exactly `cap` if it is currently smaller. Never shrinks.
    pub fn reserve(&mut self, cap: usize) {
        handle_reserve(self.try_reserve(cap))
    }

    /// Like `reserve`, but reports failure instead of aborting. On failure the array is unchanged.
    ///
    /// ```
    /// use introvec::{DynArray, ReserveError};
    ///
    /// let mut a = DynArray::<u64>::new();
    /// assert_eq!(a.try_reserve(usize::MAX), Err(ReserveError::CapacityOverflow));
    /// assert_eq!(a.capacity(), 0);
    /// ```
    pub fn try_reserve(&mut self, cap: usize) -> Result<(), ReserveError> {
        if cap <= self.capacity() {
            return Ok(());
        }

        self.buf.try_realloc_exact(self.len, cap)
    }

    /// Truncates to `n` elements, or appends default values until there are `n`.
    pub fn resize(&mut self, n: usize)
    where
        T: Default,
    {
        self.resize_with(n, T::default)
    }

    /// Truncates to `n` elements, or appends values returned by `f` until there are `n`.
    ///
    /// Growing past the capacity reallocates to exactly `n` slots.
    pub fn resize_with(&mut self, n: usize, mut f: impl FnMut() -> T) {
        if n <= self.len {
            self.truncate(n);
            return;
        }

        self.reserve(n);
        while self.len < n {
            let value = f();

            // SAFETY: `len < n <= capacity`.
            unsafe {
                ptr::write(self.buf.ptr().add(self.len), value);
            }
            self.len += 1;
        }
    }

    /// Reallocates to exactly `len` slots if there are more.
    #[debug_ensures(mem::size_of::<T>() == 0 || self.capacity() == self.len())]
    pub fn shrink_to_fit(&mut self) {
        if self.capacity() > self.len {
            handle_reserve(self.buf.try_realloc_exact(self.len, self.len));
        }
    }

    /// A cursor at the first element.
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::from_ptr(self.buf.ptr())
    }

    /// A cursor one past the last element.
    pub fn end(&self) -> Cursor<'_, T> {
        self.begin() + self.len as isize
    }

    /// A reverse cursor at the last element.
    pub fn rbegin(&self) -> RevCursor<'_, T> {
        RevCursor::new(self.end())
    }

    /// A reverse cursor one before the first element.
    pub fn rend(&self) -> RevCursor<'_, T> {
        RevCursor::new(self.begin())
    }

    /// Every element, as a span the sorting and merging functions accept.
    pub fn span_mut(&mut self) -> Span<Cursor<'_, T>> {
        Span::from_slice(self.as_mut_slice())
    }

    /// Every element, back to front.
    pub fn rspan_mut(&mut self) -> Span<RevCursor<'_, T>> {
        Span::from_slice_rev(self.as_mut_slice())
    }

    /// The offset of the element under `pos` from the front of the array.
    ///
    /// ```
    /// use introvec::dynarr;
    ///
    /// let mut a = dynarr![1, 2, 4];
    /// let pos = a.begin() + 2;
    /// let i = a.offset_of(pos);
    /// a.insert(i, 3);
    /// assert_eq!(a, [1, 2, 3, 4]);
    /// ```
    ///
    /// # Panics
    ///
    /// If `pos` is not in `[begin, end]`.
    #[requires(self.begin() <= pos && pos <= self.end(), "cursor is outside the array")]
    pub fn offset_of(&self, pos: Cursor<'_, T>) -> usize {
        (pos - self.begin()) as usize
    }

    fn grow_for(&mut self, additional: usize) {
        handle_reserve(self.buf.try_reserve(self.len, additional))
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        // SAFETY: The live elements are dropped exactly once here; `buf` frees the memory after.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        DynArray::new()
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for DynArray<T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T> AsMut<[T]> for DynArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

/// An independent copy with capacity equal to the source's length.
impl<T: Clone> Clone for DynArray<T> {
    fn clone(&self) -> Self {
        let mut out = DynArray::with_capacity(self.len);
        for x in self.iter() {
            out.push_back(x.clone());
        }
        out
    }
}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Hash> Hash for DynArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(self.as_slice(), state)
    }
}

impl<T, U> PartialEq<DynArray<U>> for DynArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &DynArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T, U> PartialEq<[U]> for DynArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U> PartialEq<&[U]> for DynArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for DynArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == &other[..]
    }
}

impl<T, U> PartialEq<Vec<U>> for DynArray<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T> Extend<T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.grow_for(lower);

        for x in iter {
            self.push_back(x);
        }
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut a = DynArray::new();
        a.extend(iter);
        a
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
    fn from(arr: [T; N]) -> Self {
        let mut a = DynArray::with_capacity(N);
        a.extend(arr);
        a
    }
}

impl<T: Clone> From<&[T]> for DynArray<T> {
    fn from(s: &[T]) -> Self {
        let mut a = DynArray::with_capacity(s.len());
        a.extend(s.iter().cloned());
        a
    }
}

impl<T> From<Vec<T>> for DynArray<T> {
    fn from(v: Vec<T>) -> Self {
        let mut a = DynArray::with_capacity(v.len());
        a.extend(v);
        a
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let me = ManuallyDrop::new(self);

        // SAFETY: `me` is never dropped, so the buffer moves out of it exactly once.
        let buf = unsafe { ptr::read(&me.buf) };
        IntoIter {
            buf,
            start: 0,
            end: me.len,
        }
    }
}

/// An owning iterator over the elements of a [`DynArray`].
pub struct IntoIter<T> {
    buf: RawBuf<T>,
    start: usize,
    end: usize,
}

// SAFETY: See `DynArray`.
unsafe impl<T: Send> Send for IntoIter<T> {}
unsafe impl<T: Sync> Sync for IntoIter<T> {}

impl<T> IntoIter<T> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[start, end)` are live.
        unsafe { slice::from_raw_parts(self.buf.ptr().add(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }

        // SAFETY: `start` is live and leaves `[start, end)` right after the read.
        let x = unsafe { ptr::read(self.buf.ptr().add(self.start)) };
        self.start += 1;
        Some(x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.start;
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }

        self.end -= 1;

        // SAFETY: `end` was live and just left `[start, end)`.
        Some(unsafe { ptr::read(self.buf.ptr().add(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: Exactly `[start, end)` are still live.
        unsafe {
            let rest = ptr::slice_from_raw_parts_mut(
                self.buf.ptr().add(self.start),
                self.end - self.start,
            );
            ptr::drop_in_place(rest);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
