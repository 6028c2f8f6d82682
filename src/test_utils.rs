use crate::{Either, Split};
use proptest::prelude::*;
use std::cell::Cell;
use std::cmp::Ordering;
use std::convert::TryInto;
use std::fmt;

/// Calls `f` with both variants of `Either`.
pub fn for_each_side<T, E>(mut f: impl FnMut(Either) -> Result<T, E>) -> Result<T, E> {
    f(Either::Left(()))?;
    f(Either::Right(()))
}

#[cfg(test)]
macro_rules! prop_unwrap {
    ($e:expr) => {
        match $e {
            Err(::proptest::prelude::TestCaseError::Reject(s)) => {
                panic!("Helper function rejected input: {}", s)
            }
            Err(::proptest::prelude::TestCaseError::Fail(s)) => panic!("{}", s),
            Ok(x) => x,
        }
    };
}

pub fn is_sorted_by<T>(s: &[T], cmp: &mut impl FnMut(&T, &T) -> Ordering) -> bool {
    s.windows(2).all(|pair| cmp(&pair[0], &pair[1]).is_le())
}

pub fn is_sorted<T: Ord>(s: &[T]) -> bool {
    is_sorted_by(s, &mut Ord::cmp)
}

pub fn split_vec<S>(
    len: impl Into<proptest::collection::SizeRange>,
    values: S,
) -> impl Strategy<Value = Split<Vec<S::Value>>>
where
    S: Strategy,
    S::Value: Clone,
{
    proptest::collection::vec(values, len)
        .prop_flat_map(|v| {
            let len = v.len();
            (Just(v), 0..=len)
        })
        .prop_map(|(seq, at)| Split { seq, at })
}

pub fn split_vec_sorted<S>(
    len: impl Into<proptest::collection::SizeRange>,
    values: S,
) -> impl Strategy<Value = Split<Vec<S::Value>>>
where
    S: Strategy,
    S::Value: Clone + Ord,
{
    split_vec(len, values).prop_map(|mut out| {
        let (a, b) = out.split_mut();
        a.sort_unstable();
        b.sort_unstable();
        out
    })
}

/// An element coupled with its index in some container.
///
/// Used to test the stability of sorting algorithms.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct KeyAndIndex<T> {
    pub key: T,
    pub idx: u32, // `u32` cuts the amount of memory required in half on 64-bit systems.
}

impl<T: fmt::Debug> fmt::Debug for KeyAndIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn to_string_subscript(mut i: usize) -> String {
            if i == 0 {
                return "₀".to_owned();
            }

            let mut ret = Vec::new();
            while i != 0 {
                let digit = i % 10;
                ret.push(char::from_u32('₀' as u32 + digit as u32).unwrap());
                i /= 10;
            }

            ret.into_iter().rev().collect()
        }

        let sub = to_string_subscript(self.idx as usize);
        write!(f, "{:?}{}", self.key, sub)
    }
}

impl<T> KeyAndIndex<T> {
    pub fn new(key: T, idx: usize) -> Self {
        let idx = idx.try_into().expect("Index overflowed a u32");
        KeyAndIndex { key, idx }
    }

    pub fn without_index(key: T) -> Self {
        KeyAndIndex { key, idx: u32::MAX }
    }

    pub fn map_vec(v: Vec<T>) -> Vec<KeyAndIndex<T>> {
        v.into_iter()
            .enumerate()
            .map(|(idx, key)| KeyAndIndex::new(key, idx))
            .collect()
    }
}

pub fn cmp_ignore_idx<T: Ord>(a: &KeyAndIndex<T>, b: &KeyAndIndex<T>) -> Ordering {
    cmp_by_ignore_idx(a, b, &mut Ord::cmp)
}

pub fn cmp_by_ignore_idx<T>(
    a: &KeyAndIndex<T>,
    b: &KeyAndIndex<T>,
    cmp: impl FnOnce(&T, &T) -> Ordering,
) -> Ordering {
    cmp(&a.key, &b.key)
}

pub fn merge_by_naive<T: Clone>(
    l: &[T],
    r: &[T],
    cmp: &mut impl FnMut(&T, &T) -> Ordering,
    prefer: Either,
) -> Vec<T> {
    let mut ret = Vec::with_capacity(l.len() + r.len());

    let mut i = 0;
    let mut j = 0;

    while i < l.len() && j < r.len() {
        let cmp = cmp(&l[i], &r[j]);
        if cmp.is_lt() || cmp.is_eq() && prefer.is_left() {
            ret.push(l[i].clone());
            i += 1;
        } else {
            ret.push(r[j].clone());
            j += 1;
        }
    }

    if i == l.len() {
        ret.extend_from_slice(&r[j..]);
    } else {
        assert_eq!(j, r.len());
        ret.extend_from_slice(&l[i..]);
    }

    ret
}

/// Keeps count of the live `Tracked` values created from it.
///
/// Dropping a value twice or leaking one shows up as a wrong `live()` count. Cloning panics once
/// the clone budget is spent.
#[derive(Debug)]
pub struct Tracker {
    live: Cell<isize>,
    clones_left: Cell<usize>,
}

impl Tracker {
    pub fn new() -> Self {
        Tracker::with_clone_budget(usize::MAX)
    }

    pub fn with_clone_budget(n: usize) -> Self {
        Tracker {
            live: Cell::new(0),
            clones_left: Cell::new(n),
        }
    }

    pub fn make(&self, val: i32) -> Tracked<'_> {
        self.live.set(self.live.get() + 1);
        Tracked { val, tracker: self }
    }

    pub fn live(&self) -> isize {
        self.live.get()
    }
}

#[derive(Debug)]
pub struct Tracked<'a> {
    pub val: i32,
    tracker: &'a Tracker,
}

impl Clone for Tracked<'_> {
    fn clone(&self) -> Self {
        let left = self.tracker.clones_left.get();
        if left == 0 {
            panic!("clone budget exhausted");
        }

        self.tracker.clones_left.set(left - 1);
        self.tracker.make(self.val)
    }
}

impl Drop for Tracked<'_> {
    fn drop(&mut self) {
        self.tracker.live.set(self.tracker.live.get() - 1);
    }
}

impl PartialEq for Tracked<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.val == other.val
    }
}
