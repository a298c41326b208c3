use core::{fmt, matches, write};

/// Error variants returned by the checked operations of a [DualFenwick](crate::DualFenwick)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The position is outside of `0..len`
    OutOfBounds {
        /// The rejected position
        pos: usize,
        /// Number of elements in the tree
        len: usize,
    },
    /// The left endpoint of an inclusive range is greater than its right endpoint
    InvalidRange {
        /// Left endpoint
        left: usize,
        /// Right endpoint
        right: usize,
    },
    /// The tree holds no elements
    Empty,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfBounds { pos, len } => {
                write!(f, "position {pos} is out of bounds for a tree of length {len}")
            }
            Error::InvalidRange { left, right } => {
                write!(f, "invalid range, left {left} is greater than right {right}")
            }
            Error::Empty => write!(f, "the tree is empty"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl Error {
    /// Returns `true` if the error represents [Error::OutOfBounds]
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Error::OutOfBounds { .. })
    }
    /// Returns `true` if the error represents [Error::InvalidRange]
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, Error::InvalidRange { .. })
    }
    /// Returns `true` if the error represents [Error::Empty]
    pub fn is_empty(&self) -> bool {
        matches!(self, Error::Empty)
    }
}
