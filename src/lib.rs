//! A hand-managed growable array, random-access cursors over it, an introspective sort and a
//! stable merge.
//!
//! ```
//! use introvec::{dynarr, sort, merge};
//!
//! let mut a = dynarr![5, 4, 3, 2, 1];
//! sort(&mut a);
//! assert_eq!(a, [1, 2, 3, 4, 5]);
//!
//! assert_eq!(merge(&[1, 3, 5], &[2, 4, 6]), [1, 2, 3, 4, 5, 6]);
//! ```

#![cfg_attr(not(test), no_std)]

#[cfg(not(test))]
extern crate core as std;

extern crate alloc;

#[cfg(test)]
#[macro_use]
mod test_utils;

mod array;
mod cursor;
mod error;
mod heap;
mod merge;
mod quadratic_sort;
mod raw;
mod sort;
mod split;

pub use array::{DynArray, IntoIter};
pub use cursor::{Cursor, RandomAccessCursor, RevCursor, Span};
pub use error::{OutOfRange, ReserveError};
pub use merge::{merge, merge_by, merge_into, merge_sort, merge_sort_by, merged, Merged};
pub use sort::{sort, sort_by, sort_span, sort_span_by};
use split::Split;

type Either<T = ()> = either::Either<T, T>;

/// Creates a [`DynArray`] from a list of elements, or from `elem; n` copies of one element.
///
/// ```
/// use introvec::dynarr;
///
/// let a = dynarr![3, 1, 2];
/// assert_eq!(a, [3, 1, 2]);
///
/// let b = dynarr![0u8; 4];
/// assert_eq!(b.len(), 4);
/// ```
#[macro_export]
macro_rules! dynarr {
    () => {
        $crate::DynArray::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::DynArray::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::DynArray::from([$($x),+])
    };
}
