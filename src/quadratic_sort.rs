//! In-place sorting algorithms that take quadratic time.

use crate::cursor::{RandomAccessCursor, Span};
use crate::sort::INTROSORT_THRESHOLD;
use std::mem::ManuallyDrop;
use std::ptr;

/// Stable insertion sort of a slice.
pub fn insertion_sort<T>(v: &mut [T], is_less: &mut impl FnMut(&T, &T) -> bool) {
    let span = Span::from_slice(v);

    // SAFETY: `span` covers exactly the elements of `v`, which we hold exclusively.
    unsafe { insertion_sort_range(span.first(), span.last(), is_less) }
}

/// Stable insertion sort of `[first, last)`.
///
/// Elements smaller than `*first` are rotated straight to the front; everything else is shifted
/// back until it meets an element no greater than itself, which `*first` guarantees exists.
///
/// # Safety
///
/// `[first, last)` must be a live range that nothing else accesses during the call.
pub(crate) unsafe fn insertion_sort_range<C, F>(first: C, last: C, is_less: &mut F)
where
    C: RandomAccessCursor,
    F: FnMut(&C::Item, &C::Item) -> bool,
{
    if first == last {
        return;
    }

    let mut i = first + 1;
    while i < last {
        if is_less(i.get(), first.get()) {
            rotate_to_front(first, i);
        } else {
            linear_insert(i, first, is_less);
        }
        i.inc();
    }
}

/// Linear insertion of every element of `[first, last)`, for when the caller knows an element
/// no greater than any of them already sits at or after `floor`.
///
/// # Safety
///
/// `[floor, last)` must be a live range that nothing else accesses during the call, and
/// `floor <= first`.
pub(crate) unsafe fn unguarded_insertion_sort<C, F>(first: C, last: C, floor: C, is_less: &mut F)
where
    C: RandomAccessCursor,
    F: FnMut(&C::Item, &C::Item) -> bool,
{
    let mut i = first;
    while i < last {
        linear_insert(i, floor, is_less);
        i.inc();
    }
}

/// The closing pass of introsort.
///
/// After partitioning, every element belongs within `INTROSORT_THRESHOLD` slots of its final
/// position and the minimum is among the first `INTROSORT_THRESHOLD` elements. Sorting that
/// prefix first makes it a sentinel for the rest.
///
/// # Safety
///
/// `[first, last)` must be a live range that nothing else accesses during the call.
pub(crate) unsafe fn final_insertion_sort<C, F>(first: C, last: C, is_less: &mut F)
where
    C: RandomAccessCursor,
    F: FnMut(&C::Item, &C::Item) -> bool,
{
    let threshold = INTROSORT_THRESHOLD as isize;

    if last - first > threshold {
        insertion_sort_range(first, first + threshold, is_less);
        unguarded_insertion_sort(first + threshold, last, first, is_less);
    } else {
        insertion_sort_range(first, last, is_less);
    }
}

/// Moves `*i` to `first`, shifting `[first, i)` up by one slot.
///
/// No user code runs in here, so nothing can unwind while the element is out of the range.
unsafe fn rotate_to_front<C: RandomAccessCursor>(first: C, i: C) {
    let tmp = ptr::read(i.as_ptr());

    let mut j = i;
    while j > first {
        let prev = j - 1;
        ptr::copy_nonoverlapping(prev.as_ptr(), j.as_ptr(), 1);
        j = prev;
    }

    ptr::write(first.as_ptr(), tmp);
}

/// When dropped, copies from `src` into `dest`.
struct CopyOnDrop<T> {
    src: *const T,
    dest: *mut T,
}

impl<T> Drop for CopyOnDrop<T> {
    fn drop(&mut self) {
        // SAFETY: `src` is a live temporary and `dest` is the gap it belongs in. They never
        // overlap. See `linear_insert`.
        unsafe {
            ptr::copy_nonoverlapping(self.src, self.dest, 1);
        }
    }
}

/// Shifts `*last` towards `floor` until the element before it is not greater than it.
///
/// The scan never moves below `floor`. When an element no greater than `*last` sits in
/// `[floor, last)` the comparison stops it first; the bound only matters for comparators that
/// are not a strict weak order.
unsafe fn linear_insert<C, F>(last: C, floor: C, is_less: &mut F)
where
    C: RandomAccessCursor,
    F: FnMut(&C::Item, &C::Item) -> bool,
{
    if last <= floor {
        return;
    }

    let mut next = last - 1;
    if !is_less(last.get(), next.get()) {
        return;
    }

    // Read the element into a temporary. If a following comparison panics, `hole` gets dropped
    // and writes it back into the gap, so every slot stays initialized exactly once.
    let tmp = ManuallyDrop::new(ptr::read(last.as_ptr()));
    let mut hole = CopyOnDrop {
        src: &*tmp,
        dest: next.as_ptr(),
    };
    ptr::copy_nonoverlapping(next.as_ptr(), last.as_ptr(), 1);

    while next > floor {
        let prev = next - 1;
        if !is_less(&*tmp, prev.get()) {
            break;
        }

        // Move `prev` one place up, shifting the gap down.
        ptr::copy_nonoverlapping(prev.as_ptr(), next.as_ptr(), 1);
        hole.dest = prev.as_ptr();
        next = prev;
    }

    // `hole` gets dropped and thus copies `tmp` into the remaining gap.
}
