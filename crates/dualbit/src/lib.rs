//! dualbit is a generalized Fenwick tree for range queries over operators without an inverse
//!
//! A classic Fenwick tree answers prefix queries and derives range queries by subtracting two
//! prefixes, which requires the operator to be invertible. [DualFenwick] keeps a second,
//! mirrored tree so that point reads take `O(1)` and range merges take `O(log n)` for any
//! associative operator with an identity: sum, min, max, gcd, bitwise and/or, or a closure.
//!
//! On top of the tree the crate provides two search families:
//!
//! - [search]: binary searches for the boundary where a monotone range merge crosses a value.
//! - [walk]: single descents that find the first or last position where a monotone predicate
//!   over the accumulated merge starts to hold.
//!
//! # Example
//!
//! ```
//! use dualbit::{ops::Sum, DualFenwick};
//!
//! let mut tree = DualFenwick::from_values(0u64..10, Sum);
//! assert_eq!(tree.query_range(0, 9), 45);
//!
//! tree.update(3, 100);
//! assert_eq!(tree.query_range(0, 9), 142);
//! assert_eq!(tree.query(3), 100);
//!
//! // smallest prefix end whose sum reaches 50
//! assert_eq!(tree.lower_bound(0, 9, 50), 3);
//! assert_eq!(tree.find_next(0, |sum| sum >= 50), Some(3));
//! ```
//!
//! # Features
//!
//! - `std` (default): implements `std::error::Error` for [Error]. Without it the crate is `no_std`
//!   and only needs `alloc`.
//! - `profiler`: records latency sketches for builds, updates and range queries, see
//!   [DualFenwick::stats].
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(nonstandard_style, missing_docs)]
#![forbid(unsafe_code)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod error;
/// Merge operators including SUM, MIN, MAX, GCD and closure based operators
pub mod ops;
pub mod search;
mod tree;
pub mod walk;

pub use error::Error;
pub use ops::MergeOp;
#[cfg(feature = "profiler")]
pub use tree::Stats;
pub use tree::DualFenwick;
