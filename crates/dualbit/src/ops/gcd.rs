use super::MergeOp;

/// Each node contains the greatest common divisor of the range it represents.
///
/// Zero is the identity, so `gcd(0, a) == a`.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Hash)]
pub struct Gcd;

macro_rules! impl_gcd {
    ($($ty:tt),*) => {
        $(
            impl MergeOp<$ty> for Gcd {
                #[inline]
                fn identity(&self) -> $ty {
                    0
                }
                #[inline]
                fn combine(&self, mut a: $ty, mut b: $ty) -> $ty {
                    while b != 0 {
                        let rem = a % b;
                        a = b;
                        b = rem;
                    }
                    a
                }
            }
        )*
    };
}

impl_gcd!(u8, u16, u32, u64, u128, usize);
