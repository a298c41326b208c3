use core::fmt;

use super::{MergeOp, ValueBounds};

/// A [MergeOp] built from a closure and an identity value.
///
/// ```
/// use dualbit::{ops::FnOp, DualFenwick};
///
/// let op = FnOp::new(u64::MAX, |a: u64, b: u64| a.min(b));
/// let tree = DualFenwick::from_slice(&[5, 3, 8, 1, 9], op);
/// assert_eq!(tree.query_range(1, 2), 3);
/// ```
#[derive(Clone, Copy)]
pub struct FnOp<V, F> {
    identity: V,
    combine: F,
}

impl<V, F> FnOp<V, F>
where
    V: ValueBounds,
    F: Fn(V, V) -> V + Clone,
{
    /// Creates an operator from an identity value and an associative combine function
    pub fn new(identity: V, combine: F) -> Self {
        Self { identity, combine }
    }
}

impl<V: fmt::Debug, F> fmt::Debug for FnOp<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOp")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl<V, F> MergeOp<V> for FnOp<V, F>
where
    V: ValueBounds,
    F: Fn(V, V) -> V + Clone,
{
    #[inline]
    fn identity(&self) -> V {
        self.identity
    }
    #[inline]
    fn combine(&self, a: V, b: V) -> V {
        (self.combine)(a, b)
    }
}
