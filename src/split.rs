//! The two sorted halves handed to a merge.

/// A sequence divided in two at index `at`.
#[derive(Clone, Copy, Debug)]
pub struct Split<S> {
    pub seq: S,
    pub at: usize,
}

impl<S> Split<S> {
    pub fn new(seq: S, at: usize) -> Self {
        Split { seq, at }
    }
}

#[cfg(test)]
impl<S> Split<S> {
    pub fn split<T>(&self) -> (&[T], &[T])
    where
        S: AsRef<[T]>,
    {
        self.seq.as_ref().split_at(self.at)
    }

    pub fn split_mut<T>(&mut self) -> (&mut [T], &mut [T])
    where
        S: AsMut<[T]>,
    {
        self.seq.as_mut().split_at_mut(self.at)
    }

    /// Checked on entry to every in-place merge.
    pub fn is_each_side_sorted_by<T>(
        &self,
        cmp: &mut impl FnMut(&T, &T) -> std::cmp::Ordering,
    ) -> bool
    where
        S: AsRef<[T]>,
    {
        use crate::test_utils::is_sorted_by;

        let (l, r) = self.split();
        is_sorted_by(l, cmp) && is_sorted_by(r, cmp)
    }

    /// Borrows the sequence in the form `merge_adjacent` takes.
    pub fn as_mut<T>(&mut self) -> Split<&mut [T]>
    where
        S: AsMut<[T]>,
    {
        Split::new(self.seq.as_mut(), self.at)
    }

    pub fn map_seq<R>(self, f: impl FnOnce(S) -> R) -> Split<R> {
        Split::new(f(self.seq), self.at)
    }
}
