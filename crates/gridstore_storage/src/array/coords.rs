use core::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use num::Zero;

/// The most efficient coordinates for linear storages. A single number that translates directly to a record index.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Stride(pub u64);

impl Zero for Stride {
    #[inline]
    fn zero() -> Self {
        Stride(0)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add for Stride {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        // Wraps for negative point offsets.
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Stride {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        // Wraps for negative point offsets.
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl Mul<u64> for Stride {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: u64) -> Self::Output {
        Self(self.0.wrapping_mul(rhs))
    }
}

impl AddAssign for Stride {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Stride {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// The stride of each axis in a grid of `shape`, axis 0 fastest: `[1, shape[0], shape[0] * shape[1], ...]`.
///
/// The caller must have already checked that the grid's point count fits in a `u64`.
#[inline]
pub fn axis_strides(shape: &[i64]) -> Vec<u64> {
    let mut strides = Vec::with_capacity(shape.len());
    let mut s = 1u64;
    for &len in shape {
        strides.push(s);
        s = s.wrapping_mul(len.max(0) as u64);
    }

    strides
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
