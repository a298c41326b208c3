//! Predicate walks over the tree nodes.
//!
//! A walk finds the first range, growing away from a fixed start position, whose merge satisfies
//! a predicate. The predicate must be monotone over the accumulated value: once it holds for a
//! range it holds for every larger range with the same fixed endpoint. Examples are
//! `|sum| sum >= k` over non-negative values, `|min| min <= k` or `|gcd| gcd == 1`.
//!
//! Instead of probing with full range queries, a walk climbs the tree from the start position,
//! folding whole nodes into an accumulator while the predicate stays false. Once a node flips
//! the predicate it descends into that node by halving it, which costs `O(log len)` in total.
//!
//! ```
//! use dualbit::{ops::Min, walk, DualFenwick};
//!
//! let tree = DualFenwick::from_slice(&[7u32, 6, 9, 4, 8, 2, 5], Min);
//! // first position at or after 1 where the running minimum drops to 4 or below
//! assert_eq!(walk::find_next(&tree, 1, |min| min <= 4), Some(3));
//! // last position at or before 6 where the running minimum (from the right) drops below 5
//! assert_eq!(walk::find_prev(&tree, 6, |min| min < 5), Some(5));
//! assert_eq!(walk::find_prev(&tree, 2, |min| min < 5), None);
//! ```

use crate::{
    ops::{MergeOp, ValueBounds},
    tree::lsb,
    DualFenwick,
};

/// Returns the smallest `p` in `start..len` for which `f(query_range(start, p))` holds, or
/// `None` if there is none or `start` is out of bounds.
pub fn find_next<V, O, F>(tree: &DualFenwick<V, O>, start: usize, mut f: F) -> Option<usize>
where
    V: ValueBounds,
    O: MergeOp<V>,
    F: FnMut(V) -> bool,
{
    let len = tree.len();
    if start >= len {
        return None;
    }

    let op = tree.op();
    let mut acc = op.identity();
    let mut pos = start;

    // The node to descend into spans [pos, pos + 2 * half). Position 0 has no backward node,
    // so the whole tree is treated as one block there.
    let mut half = if pos == 0 {
        len.next_power_of_two() >> 1
    } else {
        loop {
            let merged = op.combine(acc, tree.backward_node(pos));
            if f(merged) {
                break;
            }
            acc = merged;
            pos += lsb(pos);
            if pos >= len {
                return None;
            }
        }
        lsb(pos) >> 1
    };

    while half > 0 {
        let mid = pos + half;
        if mid <= len {
            let merged = op.combine(acc, tree.forward_node(mid));
            if !f(merged) {
                acc = merged;
                pos = mid;
            }
        }
        half >>= 1;
    }

    (pos < len && f(op.combine(acc, tree.query(pos)))).then_some(pos)
}

/// Returns the largest `p` in `0..=start` for which `f(query_range(p, start))` holds, or
/// `None` if there is none or `start` is out of bounds.
pub fn find_prev<V, O, F>(tree: &DualFenwick<V, O>, start: usize, mut f: F) -> Option<usize>
where
    V: ValueBounds,
    O: MergeOp<V>,
    F: FnMut(V) -> bool,
{
    let len = tree.len();
    if start >= len {
        return None;
    }

    let op = tree.op();
    // acc holds the merge of [end, start]
    let mut acc = op.identity();
    let mut end = start + 1;

    loop {
        let merged = op.combine(tree.forward_node(end), acc);
        if f(merged) {
            break;
        }
        acc = merged;
        end &= end - 1;
        if end == 0 {
            return None;
        }
    }

    // f holds for [end - 2 * half, end) merged with acc
    let mut half = lsb(end) >> 1;
    while half > 0 {
        let mid = end - half;
        let merged = op.combine(tree.backward_node(mid), acc);
        if !f(merged) {
            acc = merged;
            end = mid;
        }
        half >>= 1;
    }

    Some(end - 1)
}
