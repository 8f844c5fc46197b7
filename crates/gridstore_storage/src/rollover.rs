//! Integers of arbitrary bit width (1 to 63 bits) with modular "rollover" semantics.
//!
//! Assigning a value outside of `[MIN, MAX]` wraps it modulo `2^M` back into range, exactly as an `M`-bit two's complement
//! register would. The same wrapping functions are used when a value is assigned (`set_v`) and when a stored bit pattern is
//! decoded, so the in-value and in-storage paths agree bit for bit.
//!
//! ```
//! use gridstore_storage::IntN;
//!
//! let mut x = IntN::<2>::default();
//! x.set_v(2);
//! assert_eq!(x.v(), -2);
//! x.set_v(-3);
//! assert_eq!(x.v(), 1);
//! ```

use crate::{BitCoder, Coder, StorageUnit};

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reduces `value` modulo `2^bits` into `[0, 2^bits)`.
#[inline]
pub fn wrap_unsigned(value: i128, bits: u32) -> u64 {
    debug_assert!((1..=64).contains(&bits));

    value.rem_euclid(1i128 << bits) as u64
}

/// Reduces `value` modulo `2^bits` into `[-2^(bits-1), 2^(bits-1))`. Doubles as sign extension of a `bits`-wide pattern.
#[inline]
pub fn wrap_signed(value: i128, bits: u32) -> i64 {
    let u = wrap_unsigned(value, bits) as i128;

    if u >= 1i128 << (bits - 1) {
        (u - (1i128 << bits)) as i64
    } else {
        u as i64
    }
}

/// A signed `M`-bit integer.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IntN<const M: u32>(i64);

/// An unsigned `M`-bit integer.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct UintN<const M: u32>(u64);

impl<const M: u32> IntN<M> {
    const VALID_WIDTH: () = assert!(M >= 1 && M <= 63, "IntN width must be in 1..=63");

    pub const MIN: i64 = -(1i64 << (M - 1));
    pub const MAX: i64 = (1i64 << (M - 1)) - 1;

    #[inline]
    pub fn new(value: i64) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_WIDTH;

        Self(wrap_signed(value as i128, M))
    }

    #[inline]
    pub fn v(&self) -> i64 {
        self.0
    }

    /// Assigns `value`, wrapping modulo `2^M`.
    #[inline]
    pub fn set_v(&mut self, value: i64) {
        *self = Self::new(value);
    }
}

impl<const M: u32> UintN<M> {
    const VALID_WIDTH: () = assert!(M >= 1 && M <= 63, "UintN width must be in 1..=63");

    pub const MIN: u64 = 0;
    pub const MAX: u64 = (1u64 << M) - 1;

    #[inline]
    pub fn new(value: i64) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_WIDTH;

        Self(wrap_unsigned(value as i128, M))
    }

    #[inline]
    pub fn v(&self) -> u64 {
        self.0
    }

    /// Assigns `value`, wrapping modulo `2^M`.
    #[inline]
    pub fn set_v(&mut self, value: i64) {
        *self = Self::new(value);
    }
}

impl<const M: u32> Coder for IntN<M> {
    const UNIT: StorageUnit = StorageUnit::Bit;
    const SIZE_IN_UNITS: usize = M as usize;
}

impl<const M: u32> BitCoder for IntN<M> {
    #[inline]
    fn encode_bits(&self) -> u64 {
        wrap_unsigned(self.0 as i128, M)
    }

    #[inline]
    fn decode_bits(&mut self, bits: u64) {
        self.0 = wrap_signed(bits as i128, M);
    }
}

impl<const M: u32> Coder for UintN<M> {
    const UNIT: StorageUnit = StorageUnit::Bit;
    const SIZE_IN_UNITS: usize = M as usize;
}

impl<const M: u32> BitCoder for UintN<M> {
    #[inline]
    fn encode_bits(&self) -> u64 {
        self.0
    }

    #[inline]
    fn decode_bits(&mut self, bits: u64) {
        self.0 = wrap_unsigned(bits as i128, M);
    }
}

macro_rules! impl_wrapping_ops {
    ($ty:ident, $wrap:ident) => {
        impl<const M: u32> Add for $ty<M> {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self($wrap(self.0 as i128 + rhs.0 as i128, M))
            }
        }

        impl<const M: u32> Sub for $ty<M> {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self($wrap(self.0 as i128 - rhs.0 as i128, M))
            }
        }

        impl<const M: u32> Mul for $ty<M> {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self($wrap(self.0 as i128 * rhs.0 as i128, M))
            }
        }

        impl<const M: u32> Neg for $ty<M> {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self($wrap(-(self.0 as i128), M))
            }
        }

        impl<const M: u32> fmt::Debug for $ty<M> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}<{}>({})", stringify!($ty), M, self.0)
            }
        }

        impl<const M: u32> fmt::Display for $ty<M> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_wrapping_ops!(IntN, wrap_signed);
impl_wrapping_ops!(UintN, wrap_unsigned);

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! check_rollover {
        ($($m:literal),*) => {
            $(
                {
                    let modulus = 1i64 << $m;
                    for k in -3..=3i64 {
                        for x in IntN::<$m>::MIN..=IntN::<$m>::MAX {
                            let mut v = IntN::<$m>::default();
                            v.set_v(x + k * modulus);
                            assert_eq!(v.v(), x, "signed width {} offset {}", $m, k);
                        }
                        for x in 0..=UintN::<$m>::MAX as i64 {
                            let mut v = UintN::<$m>::default();
                            v.set_v(x + k * modulus);
                            assert_eq!(v.v() as i64, x, "unsigned width {} offset {}", $m, k);
                        }
                    }
                }
            )*
        };
    }

    #[test]
    fn set_v_rolls_over_for_every_width() {
        check_rollover!(1, 2, 3, 4, 6, 7, 10, 11, 13);
    }

    #[test]
    fn two_bit_signed_examples() {
        assert_eq!(IntN::<2>::new(2).v(), -2);
        assert_eq!(IntN::<2>::new(-3).v(), 1);
        assert_eq!(IntN::<2>::MIN, -2);
        assert_eq!(IntN::<2>::MAX, 1);
    }

    #[test]
    fn bounds_of_wide_types() {
        assert_eq!(IntN::<63>::MIN, -(1 << 62));
        assert_eq!(UintN::<63>::MAX, (1 << 63) - 1);
        assert_eq!(IntN::<63>::new(i64::MAX).v(), -1);
        assert_eq!(UintN::<1>::new(-1).v(), 1);
    }

    #[test]
    fn bit_pattern_round_trip_sign_extends() {
        let x = IntN::<5>::new(-6);
        assert_eq!(x.encode_bits(), 0b11010);

        let mut y = IntN::<5>::default();
        y.decode_bits(0b11010);
        assert_eq!(y, x);

        // High garbage bits are discarded.
        y.decode_bits(0xFFFF_FFE0 | 0b00011);
        assert_eq!(y.v(), 3);
    }

    #[test]
    fn arithmetic_wraps() {
        let a = IntN::<4>::new(7);
        let b = IntN::<4>::new(1);
        assert_eq!((a + b).v(), -8);
        assert_eq!((-IntN::<4>::new(-8)).v(), -8);
        assert_eq!((UintN::<3>::new(0) - UintN::<3>::new(1)).v(), 7);
        assert_eq!((UintN::<3>::new(3) * UintN::<3>::new(3)).v(), 1);
    }
}
