//! Merging two sorted sequences, and a stable merge sort built on it.
//!
//! Every merge here is stable: when both inputs offer equal elements, the one from the left input
//! comes first.

use crate::cursor::{Cursor, RandomAccessCursor, Span};
use crate::quadratic_sort::insertion_sort;
use crate::{DynArray, Either, Split};
use contracts::*;
use std::cmp::Ordering;
use std::iter::FusedIterator;

/// Runs at most this long are insertion sorted by `merge_sort` instead of being split further.
const INSERTION_SORT_RUN: usize = 16;

/// Whether the merge takes from the left input given `ord`, the ordering of its front element
/// relative to the right input's.
fn take_left(ord: Ordering, prefer: Either) -> bool {
    match prefer {
        Either::Left(()) => ord.is_le(),
        Either::Right(()) => ord.is_lt(),
    }
}

/// An iterator over the elements of two sorted slices in merged order.
///
/// Created by [`merged`].
#[derive(Clone, Debug)]
pub struct Merged<'a, T, F> {
    left: &'a [T],
    right: &'a [T],
    cmp: F,
    prefer: Either,
}

/// Lazily merges two slices that are each sorted by `cmp`.
///
/// ```
/// use introvec::merged;
///
/// let m: Vec<_> = merged(&[1, 4], &[2, 3, 5], Ord::cmp).copied().collect();
/// assert_eq!(m, [1, 2, 3, 4, 5]);
/// ```
pub fn merged<'a, T, F>(left: &'a [T], right: &'a [T], cmp: F) -> Merged<'a, T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    Merged {
        left,
        right,
        cmp,
        prefer: Either::Left(()),
    }
}

impl<'a, T, F> Iterator for Merged<'a, T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let (l, r) = match (self.left.split_first(), self.right.split_first()) {
            (Some(l), Some(r)) => (l, r),
            (Some((x, rest)), None) => {
                self.left = rest;
                return Some(x);
            }
            (None, Some((x, rest))) => {
                self.right = rest;
                return Some(x);
            }
            (None, None) => return None,
        };

        if take_left((self.cmp)(l.0, r.0), self.prefer) {
            self.left = l.1;
            Some(l.0)
        } else {
            self.right = r.1;
            Some(r.0)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len();
        (n, Some(n))
    }
}

impl<T, F> ExactSizeIterator for Merged<'_, T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }
}

impl<T, F> FusedIterator for Merged<'_, T, F> where F: FnMut(&T, &T) -> Ordering {}

/// Merges two sorted slices into a new array.
pub fn merge<T: Ord + Clone>(left: &[T], right: &[T]) -> DynArray<T> {
    let mut out = DynArray::with_capacity(left.len() + right.len());
    merge_by(left, right, &mut out, Ord::cmp);
    out
}

/// Appends the merge of `left` and `right`, each sorted by `cmp`, to `dest`.
#[debug_ensures(dest.len() == old(dest.len()) + left.len() + right.len())]
pub fn merge_by<T: Clone>(
    left: &[T],
    right: &[T],
    dest: &mut DynArray<T>,
    cmp: impl FnMut(&T, &T) -> Ordering,
) {
    dest.extend(merged(left, right, cmp).cloned());
}

/// Assigns the merge of two sorted slices to the first `left.len() + right.len()` positions of
/// `dest` and returns the position after the last one written.
///
/// `dest` may run in either direction:
///
/// ```
/// use introvec::{dynarr, merge_into};
///
/// let mut out = dynarr![0; 5];
/// merge_into(&[2, 8], &[1, 3, 9], out.rspan_mut());
/// assert_eq!(out, [9, 8, 3, 2, 1]);
/// ```
#[requires(
    dest.len() >= left.len() + right.len(),
    "destination is shorter than the merged inputs"
)]
pub fn merge_into<T, D>(left: &[T], right: &[T], dest: Span<D>) -> D
where
    T: Ord + Clone,
    D: RandomAccessCursor<Item = T>,
{
    let (l, l_end) = read_only(left);
    let (r, r_end) = read_only(right);

    // SAFETY: The sources are live for the call and only read. `dest` is exclusive, so it cannot
    // overlap them, and the contract leaves room for every element.
    unsafe {
        merge_cursors(
            l,
            l_end,
            r,
            r_end,
            dest.first(),
            &mut T::cmp,
            Either::Left(()),
        )
    }
}

/// Cursors over a slice that are only ever read through.
fn read_only<T>(s: &[T]) -> (Cursor<'_, T>, Cursor<'_, T>) {
    let first = Cursor::from_ptr(s.as_ptr() as *mut T);
    (first, first + s.len() as isize)
}

/// Merges `[l, l_end)` and `[r, r_end)` into the positions from `dest` on, assigning clones.
///
/// `dest` may trail one of the sources in place, as long as it never overtakes an element of
/// that source that has not been merged yet. Once the other source runs out, the rest of an
/// in-place source is already where it belongs and is left alone.
///
/// # Safety
///
/// All ranges must be live, and the destination must hold room for every element of both.
unsafe fn merge_cursors<S, D, F>(
    mut l: S,
    l_end: S,
    mut r: S,
    r_end: S,
    mut dest: D,
    cmp: &mut F,
    prefer: Either,
) -> D
where
    S: RandomAccessCursor,
    S::Item: Clone,
    D: RandomAccessCursor<Item = S::Item>,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    while l < l_end && r < r_end {
        let src = if take_left(cmp(l.get(), r.get()), prefer) {
            let old = l;
            l.inc();
            old
        } else {
            let old = r;
            r.inc();
            old
        };

        assign(dest, src);
        dest.inc();
    }

    if l < l_end {
        copy_run(l, l_end, dest)
    } else {
        copy_run(r, r_end, dest)
    }
}

unsafe fn copy_run<S, D>(mut src: S, end: S, mut dest: D) -> D
where
    S: RandomAccessCursor,
    S::Item: Clone,
    D: RandomAccessCursor<Item = S::Item>,
{
    let n = end - src;
    if src.as_ptr() == dest.as_ptr() {
        return dest + n;
    }

    while src < end {
        assign(dest, src);
        src.inc();
        dest.inc();
    }

    dest
}

unsafe fn assign<S, D>(dest: D, src: S)
where
    S: RandomAccessCursor,
    S::Item: Clone,
    D: RandomAccessCursor<Item = S::Item>,
{
    if src.as_ptr() != dest.as_ptr() {
        let value = src.get().clone();
        *dest.get_mut() = value;
    }
}

/// Stable sort by repeated merging. `O(n log n)` comparisons; needs `n / 2` clones of scratch.
///
/// ```
/// use introvec::merge_sort;
///
/// let mut v = [4, 1, 3, 1, 2];
/// merge_sort(&mut v);
/// assert_eq!(v, [1, 1, 2, 3, 4]);
/// ```
pub fn merge_sort<T: Ord + Clone>(s: &mut [T]) {
    merge_sort_by(s, Ord::cmp)
}

pub fn merge_sort_by<T: Clone>(s: &mut [T], mut cmp: impl FnMut(&T, &T) -> Ordering) {
    let mut scratch = DynArray::with_capacity(s.len() / 2 + 1);
    merge_sort_rec(s, &mut scratch, &mut cmp);
}

fn merge_sort_rec<T, F>(s: &mut [T], scratch: &mut DynArray<T>, cmp: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    if s.len() <= INSERTION_SORT_RUN {
        insertion_sort(s, &mut |a, b| cmp(a, b).is_lt());
        return;
    }

    let at = s.len() / 2;
    let (l, r) = s.split_at_mut(at);
    merge_sort_rec(l, scratch, cmp);
    merge_sort_rec(r, scratch, cmp);

    merge_adjacent(Split::new(s, at), scratch, cmp);
}

/// Merges the two sorted halves of `pair` in place, copying the shorter half into `scratch`.
///
/// If the left half is shorter, it is merged forward with the right half into the whole range.
/// Otherwise the right half is merged backward with the left, which keeps the output cursor from
/// ever overtaking an unmerged element of the half that stays in place.
#[test_requires(pair.is_each_side_sorted_by(cmp))]
fn merge_adjacent<T, F>(pair: Split<&mut [T]>, scratch: &mut DynArray<T>, cmp: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let Split { seq, at } = pair;
    let len = seq.len();

    if at == 0 || at == len || cmp(&seq[at - 1], &seq[at]).is_le() {
        return;
    }

    scratch.clear();
    let out = Span::from_slice(seq);

    if at <= len - at {
        // SAFETY: `out` covers the whole pair and we hold it exclusively; `scratch` is separate.
        unsafe {
            scratch.extend((0..at as isize).map(|i| (out.first() + i).get().clone()));
            let buf = scratch.span_mut();
            merge_cursors(
                buf.first(),
                buf.last(),
                out.first() + at as isize,
                out.last(),
                out.first(),
                cmp,
                Either::Left(()),
            );
        }
    } else {
        let out = out.rev();

        // SAFETY: As above. Reversed, the right half is the first `len - at` positions of `out`.
        unsafe {
            scratch.extend((0..(len - at) as isize).rev().map(|i| (out.first() + i).get().clone()));
            let buf = scratch.rspan_mut();
            merge_cursors(
                out.first() + (len - at) as isize,
                out.last(),
                buf.first(),
                buf.last(),
                out.first(),
                &mut |a: &T, b: &T| cmp(b, a),
                Either::Right(()),
            );
        }
    }
}
