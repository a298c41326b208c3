#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};
use core::{
    fmt,
    ops::{Bound, RangeBounds},
};

use log::{debug, trace};

use crate::{
    error::Error,
    ops::{MergeOp, ValueBounds},
    search,
    walk,
};

#[cfg(feature = "profiler")]
mod stats;
#[cfg(feature = "profiler")]
pub use stats::Stats;

#[cfg(feature = "profiler")]
use dualbit_stats::profile_scope;

/// Returns the least significant set bit of `i` (0 for 0)
#[inline(always)]
pub(crate) fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

/// A generalized Fenwick tree supporting point updates and range merges for any
/// associative [MergeOp], including operators without an inverse such as min, max or gcd.
///
/// The tree keeps two implicit Fenwick trees over the same `len` positions:
///
/// - `forward[i]` (`1 <= i <= len`) holds the merge of positions `[i - lsb(i), i)`.
/// - `backward[i]` (`1 <= i < len`) holds the merge of positions `[i, min(i + lsb(i), len))`.
///
/// A point value is a single slot (`backward[pos]` for odd positions, `forward[pos + 1]` for
/// even ones) and a range merge walks forward nodes down from its right end and backward nodes
/// up from its left end, so neither needs an inverse. Both take `O(log len)` or better.
///
/// Operations that take positions follow a caller contract instead of returning errors:
/// positions must lie in `0..len` and `left <= right`. Violations are caught by debug
/// assertions. Use [get](Self::get), [combine_range](Self::combine_range),
/// [try_update](Self::try_update) or [try_query_range](Self::try_query_range) for checked
/// access.
///
/// # Example
///
/// ```
/// use dualbit::{ops::Min, DualFenwick};
///
/// let mut tree = DualFenwick::from_slice(&[5, 3, 8, 1, 9], Min);
/// assert_eq!(tree.query_range(0, 4), 1);
/// assert_eq!(tree.query_range(1, 2), 3);
///
/// tree.update(3, 0);
/// assert_eq!(tree.query_range(0, 4), 0);
/// assert_eq!(tree.query(3), 0);
/// ```
#[derive(Clone)]
pub struct DualFenwick<V, O> {
    len: usize,
    forward: Vec<V>,
    backward: Vec<V>,
    op: O,
    #[cfg(feature = "profiler")]
    stats: Stats,
}

impl<V: ValueBounds, O: MergeOp<V>> DualFenwick<V, O> {
    /// Creates an empty tree using the given operator
    pub fn new(op: O) -> Self {
        Self::with_len(0, op)
    }

    /// Creates a tree of `len` positions that all hold the identity value
    pub fn with_len(len: usize, op: O) -> Self {
        let mut tree = Self {
            len: 0,
            forward: Vec::new(),
            backward: Vec::new(),
            op,
            #[cfg(feature = "profiler")]
            stats: Stats::default(),
        };
        tree.init(len);
        tree
    }

    /// Creates a tree of `len` positions that all hold `value`
    pub fn from_value(value: V, len: usize, op: O) -> Self {
        let mut tree = Self::new(op);
        tree.build_value(value, len);
        tree
    }

    /// Creates a tree holding a copy of `values`
    pub fn from_slice(values: &[V], op: O) -> Self {
        let mut tree = Self::new(op);
        tree.build_slice(values);
        tree
    }

    /// Creates a tree holding the values of an ordered sequence
    pub fn from_values<I: IntoIterator<Item = V>>(values: I, op: O) -> Self {
        let mut tree = Self::new(op);
        tree.build_iter(values);
        tree
    }

    /// Resets the tree to `len` positions holding the identity value
    pub fn init(&mut self, len: usize) {
        let identity = self.op.identity();
        self.len = len;
        self.forward = vec![identity; len + 1];
        self.backward = vec![identity; len];
        debug!("initialized dual fenwick tree with {} positions", len);
    }

    /// Rebuilds the tree with `len` positions that all hold `value`
    pub fn build_value(&mut self, value: V, len: usize) {
        #[cfg(feature = "profiler")]
        profile_scope!(&self.stats.build);

        self.init(len);
        for pos in 0..len {
            self.insert(pos, value);
        }
        debug!("built dual fenwick tree from a fill value over {} positions", len);
    }

    /// Rebuilds the tree from a slice of values
    pub fn build_slice(&mut self, values: &[V]) {
        #[cfg(feature = "profiler")]
        profile_scope!(&self.stats.build);

        self.init(values.len());
        for (pos, value) in values.iter().enumerate() {
            self.insert(pos, *value);
        }
        debug!("built dual fenwick tree from {} values", values.len());
    }

    /// Rebuilds the tree from an ordered sequence of values
    pub fn build_iter<I: IntoIterator<Item = V>>(&mut self, values: I) {
        let values: Vec<V> = values.into_iter().collect();
        self.build_slice(&values);
    }

    /// Resets every position to the identity value while keeping the length
    pub fn clear(&mut self) {
        let identity = self.op.identity();
        self.forward.fill(identity);
        self.backward.fill(identity);
        debug!("cleared dual fenwick tree with {} positions", self.len);
    }

    // Folds `value` into every node whose range covers `pos`. Positions must be inserted in
    // increasing order into identity nodes.
    #[inline]
    fn insert(&mut self, pos: usize, value: V) {
        let mut i = pos + 1;
        while i <= self.len {
            self.forward[i] = self.op.combine(self.forward[i], value);
            i += lsb(i);
        }
        let mut i = pos;
        while i > 0 {
            self.backward[i] = self.op.combine(self.backward[i], value);
            i &= i - 1;
        }
    }

    /// Returns the number of positions in the tree
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree has no positions
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a reference to the merge operator
    #[inline]
    pub fn op(&self) -> &O {
        &self.op
    }

    /// Returns the identity value of the merge operator
    #[inline]
    pub fn identity(&self) -> V {
        self.op.identity()
    }

    /// Merges `delta` into the value at `pos`.
    ///
    /// The new point value is `combine(query(pos), delta)`. For non-invertible operators pass
    /// the value that should be folded in, not a difference.
    #[inline]
    pub fn add(&mut self, pos: usize, delta: V) {
        let value = self.op.combine(self.query(pos), delta);
        self.update(pos, value);
    }

    /// Overwrites the value at `pos` in `O(log len)` time.
    ///
    /// Every node covering `pos` is recomputed bottom-up from its two halves: the half that
    /// contains `pos` carries the freshly merged value and the sibling half is read from the
    /// opposite tree. The block at each level is stored in `backward` when it is the right child
    /// of its parent and in `forward` otherwise.
    pub fn update(&mut self, pos: usize, value: V) {
        debug_assert!(
            pos < self.len,
            "position {} out of bounds for length {}",
            pos,
            self.len
        );
        #[cfg(feature = "profiler")]
        profile_scope!(&self.stats.update);

        let mut merged = value;
        let mut mask = 1;
        while mask <= self.len {
            let start = pos & !(mask - 1);
            if mask > 1 {
                let mid = start + (mask >> 1);
                merged = if pos < mid {
                    self.op.combine(merged, self.backward_node(mid))
                } else {
                    self.op.combine(self.forward[mid], merged)
                };
            }
            if pos & mask != 0 {
                self.backward[start] = merged;
            } else if start + mask <= self.len {
                self.forward[start + mask] = merged;
            }
            mask <<= 1;
        }
    }

    /// Returns the value at `pos` in `O(1)` time
    #[inline]
    pub fn query(&self, pos: usize) -> V {
        debug_assert!(
            pos < self.len,
            "position {} out of bounds for length {}",
            pos,
            self.len
        );
        if pos & 1 == 1 {
            self.backward[pos]
        } else {
            self.forward[pos + 1]
        }
    }

    /// Merges the values of the inclusive range `left..=right` in `O(log len)` time.
    ///
    /// Values are combined in position order, so the operator only needs to be associative.
    pub fn query_range(&self, left: usize, right: usize) -> V {
        debug_assert!(
            left <= right,
            "left {} is greater than right {}",
            left,
            right
        );
        debug_assert!(
            right < self.len,
            "position {} out of bounds for length {}",
            right,
            self.len
        );
        #[cfg(feature = "profiler")]
        profile_scope!(&self.stats.query);

        let identity = self.op.identity();

        // forward nodes that end at the right boundary, walking leftwards
        let mut upper = right + 1;
        let mut right_acc = identity;
        while upper > 0 {
            let next = upper & (upper - 1);
            if next < left {
                break;
            }
            right_acc = self.op.combine(self.forward[upper], right_acc);
            upper = next;
        }

        // backward nodes from the left boundary up to where the forward walk stopped
        let mut lower = left;
        let mut left_acc = identity;
        while lower < upper {
            left_acc = self.op.combine(left_acc, self.backward[lower]);
            lower += lsb(lower);
        }

        self.op.combine(left_acc, right_acc)
    }

    /// Returns the value at `pos` or `None` if it is out of bounds
    #[inline]
    pub fn get(&self, pos: usize) -> Option<V> {
        (pos < self.len).then(|| self.query(pos))
    }

    /// Merges the values of `range`.
    ///
    /// Returns `None` if the range is empty or reaches past the end of the tree.
    ///
    /// ```
    /// use dualbit::{ops::Sum, DualFenwick};
    ///
    /// let tree = DualFenwick::from_values(0u64..10, Sum);
    /// assert_eq!(tree.combine_range(..), Some(45));
    /// assert_eq!(tree.combine_range(2..5), Some(9));
    /// assert_eq!(tree.combine_range(3..=3), Some(3));
    /// assert_eq!(tree.combine_range(5..5), None);
    /// assert_eq!(tree.combine_range(8..12), None);
    /// ```
    pub fn combine_range<R: RangeBounds<usize>>(&self, range: R) -> Option<V> {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.checked_add(1)?,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.checked_add(1)?,
            Bound::Excluded(&end) => end,
            Bound::Unbounded => self.len,
        };
        if start >= end || end > self.len {
            trace!("rejected range {}..{} for length {}", start, end, self.len);
            return None;
        }
        Some(self.query_range(start, end - 1))
    }

    /// Checked variant of [update](Self::update)
    pub fn try_update(&mut self, pos: usize, value: V) -> Result<(), Error> {
        self.check_pos(pos)?;
        self.update(pos, value);
        Ok(())
    }

    /// Checked variant of [query_range](Self::query_range)
    pub fn try_query_range(&self, left: usize, right: usize) -> Result<V, Error> {
        if left > right {
            trace!("rejected range with left {} > right {}", left, right);
            return Err(Error::InvalidRange { left, right });
        }
        self.check_pos(right)?;
        Ok(self.query_range(left, right))
    }

    fn check_pos(&self, pos: usize) -> Result<(), Error> {
        if self.len == 0 {
            trace!("rejected position {} for an empty tree", pos);
            Err(Error::Empty)
        } else if pos >= self.len {
            trace!("rejected position {} for length {}", pos, self.len);
            Err(Error::OutOfBounds {
                pos,
                len: self.len,
            })
        } else {
            Ok(())
        }
    }

    /// Returns an iterator over the point values in position order
    pub fn iter(&self) -> impl Iterator<Item = V> + '_ {
        (0..self.len).map(move |pos| self.query(pos))
    }

    /// Collects the point values into a vector
    pub fn to_vec(&self) -> Vec<V> {
        self.iter().collect()
    }

    /// Returns the merge of positions `[i - lsb(i), i)`
    #[inline]
    pub(crate) fn forward_node(&self, i: usize) -> V {
        self.forward[i]
    }

    /// Returns the merge of positions `[i, min(i + lsb(i), len))`, or the identity for
    /// `i >= len` where the range is empty
    #[inline]
    pub(crate) fn backward_node(&self, i: usize) -> V {
        self.backward
            .get(i)
            .copied()
            .unwrap_or_else(|| self.op.identity())
    }

    /// Returns the latency sketches of this tree
    #[cfg(feature = "profiler")]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}

impl<V: ValueBounds + PartialOrd, O: MergeOp<V>> DualFenwick<V, O> {
    /// See [search::lower_bound]
    #[inline]
    pub fn lower_bound(&self, left: usize, right: usize, value: V) -> usize {
        search::lower_bound(self, left, right, value)
    }

    /// See [search::upper_bound]
    #[inline]
    pub fn upper_bound(&self, left: usize, right: usize, value: V) -> usize {
        search::upper_bound(self, left, right, value)
    }

    /// See [search::lower_bound_backward]
    #[inline]
    pub fn lower_bound_backward(&self, left: usize, right: usize, value: V) -> Option<usize> {
        search::lower_bound_backward(self, left, right, value)
    }

    /// See [search::upper_bound_backward]
    #[inline]
    pub fn upper_bound_backward(&self, left: usize, right: usize, value: V) -> Option<usize> {
        search::upper_bound_backward(self, left, right, value)
    }
}

impl<V: ValueBounds, O: MergeOp<V>> DualFenwick<V, O> {
    /// See [walk::find_next]
    #[inline]
    pub fn find_next<F: FnMut(V) -> bool>(&self, start: usize, f: F) -> Option<usize> {
        walk::find_next(self, start, f)
    }

    /// See [walk::find_prev]
    #[inline]
    pub fn find_prev<F: FnMut(V) -> bool>(&self, start: usize, f: F) -> Option<usize> {
        walk::find_prev(self, start, f)
    }
}

impl<V: ValueBounds, O: MergeOp<V>> fmt::Debug for DualFenwick<V, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("DualFenwick");
        s.field("len", &self.len)
            .field("op", &self.op)
            .field("values", &self.to_vec());
        #[cfg(feature = "profiler")]
        s.field("stats", &self.stats);
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{BitAnd, BitOr, FnOp, Gcd, Max, Min, Sum};

    fn random_vec(len: usize) -> Vec<u64> {
        (0..len).map(|_| fastrand::u64(0..1000)).collect()
    }

    fn naive<O: MergeOp<u64>>(op: &O, values: &[u64], left: usize, right: usize) -> u64 {
        op.combine_slice(&values[left..=right])
    }

    fn assert_ranges<O: MergeOp<u64>>(tree: &DualFenwick<u64, O>, values: &[u64]) {
        for left in 0..values.len() {
            for right in left..values.len() {
                assert_eq!(
                    tree.query_range(left, right),
                    naive(tree.op(), values, left, right),
                    "range {left}..={right} of {values:?}"
                );
            }
        }
    }

    #[test]
    fn sum_scenario() {
        let values: Vec<u64> = (0..10).collect();
        let mut tree = DualFenwick::from_slice(&values, Sum);
        assert_eq!(tree.query_range(0, 9), 45);
        tree.update(3, 100);
        assert_eq!(tree.query_range(0, 9), 142);
        assert_eq!(tree.query(3), 100);
        assert_eq!(tree.query_range(2, 4), 2 + 100 + 4);
        assert_eq!(tree.query_range(4, 9), 39);
    }

    #[test]
    fn min_scenario() {
        let mut tree = DualFenwick::from_slice(&[5i32, 3, 8, 1, 9], Min);
        assert_eq!(tree.query_range(0, 4), 1);
        assert_eq!(tree.query_range(1, 2), 3);
        tree.update(3, 0);
        assert_eq!(tree.query_range(0, 4), 0);
        assert_eq!(tree.query_range(0, 2), 3);
        assert_eq!(tree.query_range(4, 4), 9);
    }

    #[test]
    fn float_min_scenario() {
        let mut tree = DualFenwick::from_slice(&[5.0f64, 3.0, 8.0, 1.0, 9.0], Min);
        assert_eq!(tree.identity(), f64::INFINITY);
        assert_eq!(tree.query_range(0, 4), 1.0);
        tree.update(3, 0.0);
        assert_eq!(tree.query_range(0, 4), 0.0);
    }

    #[test]
    fn build_equivalence() {
        for len in 0..70 {
            let values = random_vec(len);
            let tree = DualFenwick::from_slice(&values, Sum);
            assert_eq!(tree.len(), len);
            assert_eq!(tree.to_vec(), values);
            let tree = DualFenwick::from_values(values.iter().copied(), Max);
            assert_eq!(tree.to_vec(), values);
        }
    }

    #[test]
    fn build_from_value() {
        let tree = DualFenwick::from_value(2u64, 9, Sum);
        assert_eq!(tree.to_vec(), vec![2; 9]);
        assert_eq!(tree.query_range(0, 8), 18);
        assert_eq!(tree.query_range(3, 5), 6);

        let tree = DualFenwick::<u64, _>::with_len(6, Min);
        assert_eq!(tree.to_vec(), vec![u64::MAX; 6]);
    }

    #[test]
    fn rebuild_resets_content() {
        let mut tree = DualFenwick::from_slice(&[1u64, 2, 3], Sum);
        tree.build_slice(&[10, 20]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.query_range(0, 1), 30);
        tree.build_iter(vec![1, 1, 1, 1]);
        assert_eq!(tree.query_range(0, 3), 4);
        tree.init(3);
        assert_eq!(tree.to_vec(), vec![0, 0, 0]);
    }

    #[test]
    fn clear_keeps_length() {
        let mut tree = DualFenwick::from_slice(&[4u64, 5, 6, 7, 8], Max);
        tree.clear();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.query_range(0, 4), 0);
        tree.update(2, 9);
        assert_eq!(tree.query_range(0, 4), 9);
        assert_eq!(tree.query_range(3, 4), 0);
    }

    #[test]
    fn point_range_consistency() {
        for len in 1..70 {
            let values = random_vec(len);
            let tree = DualFenwick::from_slice(&values, Gcd);
            for pos in 0..len {
                assert_eq!(tree.query(pos), tree.query_range(pos, pos));
            }
        }
    }

    #[test]
    fn range_split() {
        for len in 1..40 {
            let values = random_vec(len);
            assert_ranges(&DualFenwick::from_slice(&values, Sum), &values);
            assert_ranges(&DualFenwick::from_slice(&values, Min), &values);
            assert_ranges(&DualFenwick::from_slice(&values, Max), &values);
            assert_ranges(&DualFenwick::from_slice(&values, Gcd), &values);
            assert_ranges(&DualFenwick::from_slice(&values, BitOr), &values);
            assert_ranges(&DualFenwick::from_slice(&values, BitAnd), &values);
        }
    }

    #[test]
    fn random_updates() {
        for len in 1..45 {
            let mut values = random_vec(len);
            let mut min_tree = DualFenwick::from_slice(&values, Min);
            let mut sum_tree = DualFenwick::from_slice(&values, Sum);
            for _ in 0..2 * len {
                let pos = fastrand::usize(0..len);
                let value = fastrand::u64(0..1000);
                values[pos] = value;
                min_tree.update(pos, value);
                sum_tree.update(pos, value);
                assert_eq!(min_tree.query(pos), value);
                assert_eq!(sum_tree.query(pos), value);
            }
            assert_eq!(min_tree.to_vec(), values);
            assert_ranges(&min_tree, &values);
            assert_ranges(&sum_tree, &values);
        }
    }

    #[test]
    fn update_then_rebuild_match() {
        // every node, including the ones clipped at the end, must match a fresh build
        for len in 1..40 {
            let mut values = random_vec(len);
            let mut tree = DualFenwick::from_slice(&values, Min);
            for pos in (0..len).rev() {
                values[pos] = fastrand::u64(0..1000);
                tree.update(pos, values[pos]);
            }
            let fresh = DualFenwick::from_slice(&values, Min);
            assert_eq!(tree.forward, fresh.forward);
            assert_eq!(tree.backward, fresh.backward);
        }
    }

    #[test]
    fn add_delta() {
        let mut tree = DualFenwick::from_slice(&[1u64, 2, 3, 4], Sum);
        tree.add(2, 10);
        assert_eq!(tree.query(2), 13);
        assert_eq!(tree.query_range(0, 3), 20);

        let mut tree = DualFenwick::from_slice(&[7u64, 2, 9], Max);
        tree.add(1, 8);
        assert_eq!(tree.query(1), 8);
        tree.add(1, 3);
        assert_eq!(tree.query(1), 8);
    }

    #[test]
    fn non_commutative_operator() {
        // affine maps x -> a * x + b, composed left to right
        let op = FnOp::new((1u64, 0u64), |(a1, b1): (u64, u64), (a2, b2): (u64, u64)| {
            (
                a1.wrapping_mul(a2),
                b1.wrapping_mul(a2).wrapping_add(b2),
            )
        });
        for len in 1..40 {
            let mut values: Vec<(u64, u64)> = (0..len)
                .map(|_| (fastrand::u64(1..5), fastrand::u64(0..5)))
                .collect();
            let mut tree = DualFenwick::from_slice(&values, op);
            for _ in 0..len {
                let pos = fastrand::usize(0..len);
                values[pos] = (fastrand::u64(1..5), fastrand::u64(0..5));
                tree.update(pos, values[pos]);
            }
            for left in 0..len {
                for right in left..len {
                    assert_eq!(
                        tree.query_range(left, right),
                        op.combine_slice(&values[left..=right])
                    );
                }
            }
        }
    }

    #[test]
    fn checked_access() {
        let mut tree = DualFenwick::from_slice(&[1u64, 2, 3], Sum);
        assert_eq!(tree.get(2), Some(3));
        assert_eq!(tree.get(3), None);
        assert_eq!(tree.try_query_range(0, 2), Ok(6));
        assert_eq!(
            tree.try_query_range(2, 1),
            Err(Error::InvalidRange { left: 2, right: 1 })
        );
        assert_eq!(
            tree.try_query_range(0, 3),
            Err(Error::OutOfBounds { pos: 3, len: 3 })
        );
        assert_eq!(tree.try_update(1, 5), Ok(()));
        assert_eq!(tree.query_range(0, 2), 9);
        assert!(tree.try_update(7, 5).unwrap_err().is_out_of_bounds());

        let mut empty = DualFenwick::<u64, _>::new(Sum);
        assert!(empty.is_empty());
        assert_eq!(empty.try_update(0, 1), Err(Error::Empty));
        assert_eq!(empty.try_query_range(0, 0), Err(Error::Empty));
        assert_eq!(empty.combine_range(..), None);
        assert_eq!(empty.iter().count(), 0);
    }

    #[test]
    fn combine_range_bounds() {
        let tree = DualFenwick::from_values(1u64..=6, Sum);
        assert_eq!(tree.combine_range(..), Some(21));
        assert_eq!(tree.combine_range(..3), Some(6));
        assert_eq!(tree.combine_range(3..), Some(15));
        assert_eq!(tree.combine_range(1..=1), Some(2));
        assert_eq!(tree.combine_range((Bound::Excluded(0), Bound::Included(1))), Some(2));
        assert_eq!(tree.combine_range(4..2), None);
        assert_eq!(tree.combine_range(0..=6), None);
        assert_eq!(tree.combine_range(0..=usize::MAX), None);
    }

    #[test]
    fn debug_output() {
        let tree = DualFenwick::from_slice(&[1u64, 2], Sum);
        let debug = format!("{tree:?}");
        assert!(debug.starts_with("DualFenwick { len: 2, op: Sum, values: [1, 2]"));
    }

    #[cfg(feature = "profiler")]
    #[test]
    fn profiler_records_latencies() {
        let mut tree = DualFenwick::from_slice(&[1u64, 2, 3], Sum);
        tree.update(0, 4);
        let _ = tree.query_range(0, 2);
        assert_eq!(tree.stats().build.count(), 1);
        assert_eq!(tree.stats().update.count(), 1);
        assert_eq!(tree.stats().query.count(), 1);
    }
}
