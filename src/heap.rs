//! Heapsort, the introsort fallback once the recursion budget runs out.

use crate::cursor::RandomAccessCursor;

/// Sorts `[first, last)` in `O(n log n)` regardless of input.
///
/// Builds a max-heap by sifting down from the last parent to the root, then repeatedly swaps the
/// root to the end of the shrinking heap and sifts the new root down.
///
/// # Safety
///
/// `[first, last)` must be a live range that nothing else accesses during the call.
pub(crate) unsafe fn heapsort<C, F>(first: C, last: C, is_less: &mut F)
where
    C: RandomAccessCursor,
    F: FnMut(&C::Item, &C::Item) -> bool,
{
    let len = (last - first) as usize;
    if len < 2 {
        return;
    }

    for node in (0..len / 2).rev() {
        sift_down(first, node, len, is_less);
    }

    for end in (1..len).rev() {
        first.swap_with(nth(first, end));
        sift_down(first, 0, end, is_less);
    }
}

/// Restores the heap property below `node` in the heap `[first, first + len)`.
///
/// Only swaps, so a panicking comparator leaves a permutation of the input behind.
unsafe fn sift_down<C, F>(first: C, mut node: usize, len: usize, is_less: &mut F)
where
    C: RandomAccessCursor,
    F: FnMut(&C::Item, &C::Item) -> bool,
{
    loop {
        let mut child = 2 * node + 1;
        if child >= len {
            break;
        }

        // Pick the greater child.
        if child + 1 < len && is_less(nth(first, child).get(), nth(first, child + 1).get()) {
            child += 1;
        }

        if !is_less(nth(first, node).get(), nth(first, child).get()) {
            break;
        }

        nth(first, node).swap_with(nth(first, child));
        node = child;
    }
}

fn nth<C: RandomAccessCursor>(first: C, i: usize) -> C {
    first + i as isize
}

#[cfg(test)]
mod tests {
    use crate::cursor::Span;
    use crate::test_utils::is_sorted;
    use proptest::prelude::*;

    fn heapsort(v: &mut [i32]) {
        let span = Span::from_slice(v);
        unsafe { super::heapsort(span.first(), span.last(), &mut i32::lt) }
    }

    #[test]
    fn heapsort_oneshot() {
        let mut v = [5, 4, 3, 2, 1];
        heapsort(&mut v);
        assert_eq!(v, [1, 2, 3, 4, 5]);

        let mut v = [2, 7, 7, 1, 8, 2, 8, 1, 0];
        heapsort(&mut v);
        assert_eq!(v, [0, 1, 1, 2, 2, 7, 7, 8, 8]);
    }

    #[test]
    fn heapsort_reversed_span() {
        let mut v = [3, 9, 1, 4, 1, 5];
        let span = Span::from_slice_rev(&mut v);
        unsafe { super::heapsort(span.first(), span.last(), &mut i32::lt) }
        assert_eq!(v, [9, 5, 4, 3, 1, 1]);
    }

    proptest! {
        #[test]
        fn heapsort_sorts(mut v in proptest::collection::vec(any::<i32>(), 0..200)) {
            let mut expected = v.clone();
            expected.sort_unstable();

            heapsort(&mut v);
            prop_assert!(is_sorted(&v));
            prop_assert_eq!(v, expected);
        }
    }
}
