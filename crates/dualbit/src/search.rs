//! Binary searches over range merges.
//!
//! Every search fixes one endpoint of a range and moves the other one. They require the range
//! merge to be monotonically non-decreasing as the range grows away from the fixed endpoint,
//! for example a sum of non-negative values or a max. Each probe is a full
//! [query_range](DualFenwick::query_range), so a search costs `O(log² len)`. Use the walks in
//! [walk](crate::walk) for a single `O(log len)` descent with an arbitrary predicate.
//!
//! ```
//! use dualbit::{ops::Sum, search, DualFenwick};
//!
//! let tree = DualFenwick::from_slice(&[2u64, 0, 3, 1, 4], Sum);
//! assert_eq!(search::lower_bound(&tree, 0, 4, 5), 2);
//! assert_eq!(search::upper_bound(&tree, 0, 4, 5), 3);
//! assert_eq!(search::lower_bound(&tree, 0, 4, 100), 5);
//! assert_eq!(search::lower_bound_backward(&tree, 0, 4, 5), Some(3));
//! assert_eq!(search::upper_bound_backward(&tree, 0, 4, 5), Some(2));
//! assert_eq!(search::upper_bound_backward(&tree, 0, 4, 10), None);
//! ```

use crate::{
    ops::{MergeOp, ValueBounds},
    DualFenwick,
};

/// Returns the first position in `lo..hi` for which `pred` is false, or `hi` if there is
/// none. `pred` must be true for a prefix of the positions and false for the rest.
#[inline]
fn partition_point(mut lo: usize, mut hi: usize, mut pred: impl FnMut(usize) -> bool) -> usize {
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Returns the smallest `p` in `left..=right` with `query_range(left, p) >= value`, or
/// `right + 1` if there is none.
pub fn lower_bound<V, O>(tree: &DualFenwick<V, O>, left: usize, right: usize, value: V) -> usize
where
    V: ValueBounds + PartialOrd,
    O: MergeOp<V>,
{
    partition_point(left, right + 1, |mid| tree.query_range(left, mid) < value)
}

/// Returns the smallest `p` in `left..=right` with `query_range(left, p) > value`, or
/// `right + 1` if there is none.
pub fn upper_bound<V, O>(tree: &DualFenwick<V, O>, left: usize, right: usize, value: V) -> usize
where
    V: ValueBounds + PartialOrd,
    O: MergeOp<V>,
{
    partition_point(left, right + 1, |mid| tree.query_range(left, mid) <= value)
}

/// Returns the largest `p` in `left..=right` with `query_range(p, right) >= value`, or
/// `None` if there is none.
pub fn lower_bound_backward<V, O>(
    tree: &DualFenwick<V, O>,
    left: usize,
    right: usize,
    value: V,
) -> Option<usize>
where
    V: ValueBounds + PartialOrd,
    O: MergeOp<V>,
{
    let end = partition_point(left, right + 1, |mid| tree.query_range(mid, right) >= value);
    (end > left).then(|| end - 1)
}

/// Returns the largest `p` in `left..=right` with `query_range(p, right) > value`, or
/// `None` if there is none.
pub fn upper_bound_backward<V, O>(
    tree: &DualFenwick<V, O>,
    left: usize,
    right: usize,
    value: V,
) -> Option<usize>
where
    V: ValueBounds + PartialOrd,
    O: MergeOp<V>,
{
    let end = partition_point(left, right + 1, |mid| tree.query_range(mid, right) > value);
    (end > left).then(|| end - 1)
}
