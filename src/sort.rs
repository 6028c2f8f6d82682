//! An introspective sort.
//!
//! Quicksort with a median-of-three pivot and Hoare partitioning does the bulk of the work. Each
//! partitioning step spends one unit of a depth budget of `2 * floor(log2(n))`; a range that
//! exhausts it is heapsorted instead, which caps the worst case at `O(n log n)`. Ranges of at
//! most `INTROSORT_THRESHOLD` elements are left alone by the partitioning phase and finished by a
//! single insertion-sort pass over the whole input.
//!
//! The sort only moves elements through [`RandomAccessCursor`] operations, so it runs the same on
//! a [`DynArray`](crate::DynArray), a slice, or either of them traversed backwards.

use crate::cursor::{RandomAccessCursor, Span};
use crate::heap::heapsort;
use crate::quadratic_sort::final_insertion_sort;
use contracts::*;
use static_assertions::const_assert;
use std::cmp::Ordering;

/// Ranges at most this long are left for the final insertion pass.
pub(crate) const INTROSORT_THRESHOLD: usize = 16;

// The median-of-three needs `first + 1`, the middle and `last - 1` to be distinct.
const_assert!(INTROSORT_THRESHOLD >= 3);

/// Sorts a slice (or a [`DynArray`](crate::DynArray), through `DerefMut`). Not stable.
pub fn sort<T: Ord>(s: &mut [T]) {
    sort_by(s, Ord::cmp)
}

pub fn sort_by<T>(s: &mut [T], cmp: impl FnMut(&T, &T) -> Ordering) {
    sort_span_by(Span::from_slice(s), cmp)
}

/// Sorts the elements of `span` so that they are non-decreasing in the span's traversal order.
///
/// ```
/// use introvec::{dynarr, sort_span};
///
/// let mut a = dynarr![2, 5, 1, 4];
/// sort_span(a.rspan_mut());
/// assert_eq!(a, [5, 4, 2, 1]);
/// ```
pub fn sort_span<C>(span: Span<C>)
where
    C: RandomAccessCursor,
    C::Item: Ord,
{
    sort_span_by(span, Ord::cmp)
}

pub fn sort_span_by<C>(span: Span<C>, mut cmp: impl FnMut(&C::Item, &C::Item) -> Ordering)
where
    C: RandomAccessCursor,
{
    let len = span.len();
    if len < 2 {
        return;
    }

    let is_less = &mut |a: &C::Item, b: &C::Item| cmp(a, b).is_lt();

    // SAFETY: A `Span` is a live range we hold exclusively.
    unsafe {
        introsort_loop(span.first(), span.last(), depth_budget(len), is_less);
        final_insertion_sort(span.first(), span.last(), is_less);
    }
}

/// `2 * floor(log2(len))`.
#[debug_requires(len > 0)]
fn depth_budget(len: usize) -> u32 {
    (usize::BITS - 1 - len.leading_zeros()) * 2
}

/// Partitions `[first, last)` until every remaining unsorted range is at most
/// `INTROSORT_THRESHOLD` long, heapsorting any range that runs out of `depth`.
///
/// Recurses on the right part of each partition and loops on the left, so the range holding the
/// overall minimum is always the last one handled at each level.
///
/// # Safety
///
/// `[first, last)` must be a live range that nothing else accesses during the call.
unsafe fn introsort_loop<C, F>(first: C, mut last: C, mut depth: u32, is_less: &mut F)
where
    C: RandomAccessCursor,
    F: FnMut(&C::Item, &C::Item) -> bool,
{
    while last - first > INTROSORT_THRESHOLD as isize {
        if depth == 0 {
            heapsort(first, last, is_less);
            return;
        }
        depth -= 1;

        let cut = partition_around_median(first, last, is_less);
        introsort_loop(cut, last, depth, is_less);
        last = cut;
    }
}

/// Moves the median of `first + 1`, the middle and `last - 1` to `first` and partitions the rest
/// of the range around it. Returns the start of the right part.
unsafe fn partition_around_median<C, F>(first: C, last: C, is_less: &mut F) -> C
where
    C: RandomAccessCursor,
    F: FnMut(&C::Item, &C::Item) -> bool,
{
    let mid = first + (last - first) / 2;
    move_median_to_first(first, first + 1, mid, last - 1, is_less);
    hoare_partition(first + 1, last, first, is_less)
}

unsafe fn move_median_to_first<C, F>(result: C, a: C, b: C, c: C, is_less: &mut F)
where
    C: RandomAccessCursor,
    F: FnMut(&C::Item, &C::Item) -> bool,
{
    let median = if is_less(a.get(), b.get()) {
        if is_less(b.get(), c.get()) {
            b // a < b < c
        } else if is_less(a.get(), c.get()) {
            c // a < c <= b
        } else {
            a // c <= a < b
        }
    } else if is_less(a.get(), c.get()) {
        a // b <= a < c
    } else if is_less(b.get(), c.get()) {
        c // b < c <= a
    } else {
        b // c <= b <= a
    };

    result.swap_with(median);
}

/// Hoare partition of `[lo, hi)` around `*pivot`, which sits just before `lo`.
///
/// Returns a cut such that everything before it is no greater than the pivot and everything from
/// it on is no less. The median-of-three leaves an element no less than the pivot in the range
/// and one no greater behind it, so both scans stop on a comparison; the cursor bounds only
/// matter for comparators that are not a strict weak order.
unsafe fn hoare_partition<C, F>(mut lo: C, mut hi: C, pivot: C, is_less: &mut F) -> C
where
    C: RandomAccessCursor,
    F: FnMut(&C::Item, &C::Item) -> bool,
{
    let end = hi;

    loop {
        while lo < end && is_less(lo.get(), pivot.get()) {
            lo.inc();
        }

        hi.dec();
        while hi > pivot && is_less(pivot.get(), hi.get()) {
            hi.dec();
        }

        if lo >= hi {
            return lo;
        }

        lo.swap_with(hi);
        lo.inc();
    }
}
