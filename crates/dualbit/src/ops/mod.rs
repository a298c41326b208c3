//! Merge operators that can be stored in a [DualFenwick](crate::DualFenwick).
//!
//! A tree needs an associative operator together with an identity element. This module
//! contains the main [MergeOp] trait and zero-sized implementations for common operators
//! over the primitive types. Arbitrary operators can be injected through [FnOp].

use core::fmt::Debug;

mod func;
mod gcd;

pub use func::FnOp;
pub use gcd::Gcd;

/// Trait bounds for a value stored in a tree
pub trait ValueBounds: Debug + Clone + Copy {}
impl<T> ValueBounds for T where T: Debug + Clone + Copy {}

/// An associative binary operator with an identity element.
///
/// Commutativity is not required: range merges always combine point values in position
/// order. The boundary searches in [search](crate::search) and the walks in
/// [walk](crate::walk) additionally require the accumulated value to be monotonic as a
/// range grows.
///
/// # Example
///
/// A SUM operator over `u32`:
/// ```
/// use dualbit::ops::MergeOp;
///
/// #[derive(Default, Debug, Clone, Copy)]
/// struct MySum;
///
/// impl MergeOp<u32> for MySum {
///     fn identity(&self) -> u32 {
///         0
///     }
///     fn combine(&self, a: u32, b: u32) -> u32 {
///         a + b
///     }
/// }
/// ```
pub trait MergeOp<V: ValueBounds>: Debug + Clone {
    /// Returns a value `e` such that `combine(e, a) == a == combine(a, e)`.
    fn identity(&self) -> V;

    /// Combines two values.
    ///
    /// Must be [associative](https://en.wikipedia.org/wiki/Associative_property):
    /// `combine(combine(a, b), c) == combine(a, combine(b, c))`.
    fn combine(&self, a: V, b: V) -> V;

    /// Folds a slice of values from left to right
    #[inline]
    fn combine_slice(&self, slice: &[V]) -> V {
        slice
            .iter()
            .copied()
            .fold(self.identity(), |acc, v| self.combine(acc, v))
    }
}

/// Each node contains the sum of the range it represents.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Hash)]
pub struct Sum;
/// Each node contains the product of the range it represents.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Hash)]
pub struct Product;
/// Each node contains the minimum of the range it represents.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Hash)]
pub struct Min;
/// Each node contains the maximum of the range it represents.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Hash)]
pub struct Max;
/// Each node contains the bitwise and of the range it represents.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Hash)]
pub struct BitAnd;
/// Each node contains the bitwise or of the range it represents.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Hash)]
pub struct BitOr;
/// Each node contains the bitwise xor of the range it represents.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Hash)]
pub struct BitXor;

macro_rules! impl_op_infix {
    ($op:ty, $ty:ty, $combineop:tt, $iden:expr) => {
        impl MergeOp<$ty> for $op {
            #[inline]
            fn identity(&self) -> $ty {
                $iden
            }
            #[inline]
            fn combine(&self, a: $ty, b: $ty) -> $ty {
                a $combineop b
            }
        }
    };
}

macro_rules! impl_op_prefix {
    ($op:ty, $ty:ty, $combinef:expr, $iden:expr) => {
        impl MergeOp<$ty> for $op {
            #[inline]
            fn identity(&self) -> $ty {
                $iden
            }
            #[inline]
            fn combine(&self, a: $ty, b: $ty) -> $ty {
                $combinef(a, b)
            }
        }
    };
}

macro_rules! impl_integer {
    ($($ty:tt),*) => {
        $(
            impl_op_infix!(Sum, $ty, +, 0);
            impl_op_infix!(Product, $ty, *, 1);
            impl_op_infix!(BitAnd, $ty, &, !0);
            impl_op_infix!(BitOr, $ty, |, 0);
            impl_op_infix!(BitXor, $ty, ^, 0);
            impl_op_prefix!(Min, $ty, core::cmp::min, <$ty>::MAX);
            impl_op_prefix!(Max, $ty, core::cmp::max, <$ty>::MIN);
        )*
    };
}

impl_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

macro_rules! impl_float {
    ($($ty:tt),*) => {
        $(
            impl_op_infix!(Sum, $ty, +, 0.0);
            impl_op_infix!(Product, $ty, *, 1.0);
            impl_op_prefix!(Min, $ty, <$ty>::min, <$ty>::INFINITY);
            impl_op_prefix!(Max, $ty, <$ty>::max, <$ty>::NEG_INFINITY);
        )*
    };
}

impl_float!(f32, f64);

impl_op_infix!(BitAnd, bool, &, true);
impl_op_infix!(BitOr, bool, |, false);
impl_op_infix!(BitXor, bool, ^, false);
