//! Recoverable errors reported by [`DynArray`](crate::DynArray).

use std::alloc::Layout;
use std::fmt;

/// Returned by [`DynArray::at`](crate::DynArray::at) when the index is not a live slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfRange {
    pub index: usize,
    pub len: usize,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index {} is out of range for an array of length {}",
            self.index, self.len
        )
    }
}

impl std::error::Error for OutOfRange {}

/// Failure to grow the backing buffer. The array is left exactly as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReserveError {
    /// The requested capacity does not fit in `isize::MAX` bytes.
    CapacityOverflow,

    /// The allocator returned null for `layout`.
    AllocFailed { layout: Layout },
}

impl fmt::Display for ReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReserveError::CapacityOverflow => f.write_str("capacity overflow"),
            ReserveError::AllocFailed { layout } => write!(
                f,
                "allocation of {} bytes (align {}) failed",
                layout.size(),
                layout.align()
            ),
        }
    }
}

impl std::error::Error for ReserveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let e = OutOfRange { index: 7, len: 3 };
        assert_eq!(
            e.to_string(),
            "index 7 is out of range for an array of length 3"
        );

        assert_eq!(ReserveError::CapacityOverflow.to_string(), "capacity overflow");

        let layout = Layout::array::<u64>(4).unwrap();
        assert_eq!(
            ReserveError::AllocFailed { layout }.to_string(),
            "allocation of 32 bytes (align 8) failed"
        );
    }
}
