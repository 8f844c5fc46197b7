//! Out-of-bounds policies: rules for synthesizing values at points outside of a data source's extent.
//!
//! A policy either remaps the point into the extent (`Cyclic`, `Mirror`, `Clamp`) or answers with a fixed value
//! (`Constant`). Remapping happens independently on each axis, in extent-local coordinates.
//!
//! ```
//! use gridstore_core::prelude::*;
//! use gridstore_storage::prelude::*;
//!
//! let extent = ExtentN::from_shape(IndexN::from([3]));
//! let mut remapped = IndexN::zeros(1);
//!
//! let r = OutOfBounds::<u8>::resolve(&Cyclic, &extent, &IndexN::from([-1]), &mut remapped);
//! assert!(matches!(r, OobResolution::Remapped));
//! assert_eq!(remapped, IndexN::from([2]));
//!
//! let r = OutOfBounds::<u8>::resolve(&Mirror, &extent, &IndexN::from([-1]), &mut remapped);
//! assert!(matches!(r, OobResolution::Remapped));
//! assert_eq!(remapped, IndexN::from([0]));
//!
//! let zero = Constant(0u8);
//! assert!(matches!(zero.resolve(&extent, &IndexN::from([7]), &mut remapped), OobResolution::Value(&0)));
//! ```

use gridstore_core::{clamp_to_edge, reflect_mirror, wrap_cyclic, ExtentN, IndexN};

use num::Float;

/// What a policy decided for an out-of-bounds point.
#[derive(Debug)]
pub enum OobResolution<'a, T> {
    /// The in-bounds point to read instead was written to the `remapped` argument.
    Remapped,
    /// Use this value.
    Value(&'a T),
}

/// The part of a policy that doesn't depend on the record type.
pub trait OobPolicy {
    /// Returns `true` iff this policy answers by remapping points, which requires a non-empty extent.
    fn remaps(&self) -> bool;
}

pub trait OutOfBounds<T>: OobPolicy {
    /// Decides what to read in place of `p`, which is not contained in `extent`. When remapping, the in-bounds point is
    /// written to `remapped`.
    fn resolve<'a>(&'a self, extent: &ExtentN, p: &IndexN, remapped: &mut IndexN) -> OobResolution<'a, T>;
}

#[inline]
fn remap_each_axis(extent: &ExtentN, p: &IndexN, remapped: &mut IndexN, fold: impl Fn(i64, i64) -> i64) {
    debug_assert_eq!(p.dims(), extent.dims());

    remapped.copy_from(p);
    let min = extent.minimum.as_slice();
    let shape = extent.shape.as_slice();
    for (axis, c) in remapped.as_mut_slice().iter_mut().enumerate() {
        // Local coordinates are computed in i128 so points near the ends of the i64 range don't overflow.
        let local = (*c as i128 - min[axis] as i128).clamp(i64::MIN as i128, i64::MAX as i128) as i64;
        *c = min[axis] + fold(local, shape[axis]);
    }
}

/// Wraps coordinates around the extent as if it were a torus.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cyclic;

/// Reflects coordinates at the boundaries, repeating the edge record. With period `2 * size`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mirror;

/// Replicates the nearest edge record.
#[derive(Clone, Copy, Debug, Default)]
pub struct Clamp;

/// Answers every out-of-bounds point with the same value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Constant<T>(pub T);

impl<T> Constant<T>
where
    T: Default,
{
    /// The default ("zero") record.
    pub fn zero() -> Self {
        Self(T::default())
    }
}

impl<T> Constant<T>
where
    T: Float,
{
    pub fn nan() -> Self {
        Self(T::nan())
    }
}

macro_rules! impl_remapping_policy {
    ($policy:ty, $fold:expr) => {
        impl OobPolicy for $policy {
            #[inline]
            fn remaps(&self) -> bool {
                true
            }
        }

        impl<T> OutOfBounds<T> for $policy {
            #[inline]
            fn resolve<'a>(&'a self, extent: &ExtentN, p: &IndexN, remapped: &mut IndexN) -> OobResolution<'a, T> {
                remap_each_axis(extent, p, remapped, $fold);

                OobResolution::Remapped
            }
        }
    };
}

impl_remapping_policy!(Cyclic, wrap_cyclic);
impl_remapping_policy!(Mirror, reflect_mirror);
impl_remapping_policy!(Clamp, clamp_to_edge);

impl<T> OobPolicy for Constant<T> {
    #[inline]
    fn remaps(&self) -> bool {
        false
    }
}

impl<T> OutOfBounds<T> for Constant<T> {
    #[inline]
    fn resolve<'a>(&'a self, _extent: &ExtentN, _p: &IndexN, _remapped: &mut IndexN) -> OobResolution<'a, T> {
        OobResolution::Value(&self.0)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    fn remap_1d<P: OutOfBounds<u8>>(policy: &P, min: i64, size: i64, c: i64) -> i64 {
        let extent = ExtentN::from_min_and_shape(IndexN::from([min]), IndexN::from([size]));
        let mut remapped = IndexN::zeros(1);
        match policy.resolve(&extent, &IndexN::from([c]), &mut remapped) {
            OobResolution::Remapped => remapped[0],
            OobResolution::Value(_) => panic!("expected a remap"),
        }
    }

    #[test]
    fn cyclic_wraps_around() {
        let got: Vec<i64> = (-4..7).map(|c| remap_1d(&Cyclic, 0, 3, c)).collect();
        assert_eq!(got, vec![2, 0, 1, 2, 0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn mirror_repeats_edges() {
        let got: Vec<i64> = (-4..7).map(|c| remap_1d(&Mirror, 0, 3, c)).collect();
        assert_eq!(got, vec![2, 2, 1, 0, 0, 1, 2, 2, 1, 0, 0]);
    }

    #[test]
    fn clamp_replicates_edge() {
        let got: Vec<i64> = (-2..5).map(|c| remap_1d(&Clamp, 0, 3, c)).collect();
        assert_eq!(got, vec![0, 0, 0, 1, 2, 2, 2]);
    }

    #[test]
    fn remapping_respects_nonzero_minimum() {
        assert_eq!(remap_1d(&Cyclic, 10, 4, 9), 13);
        assert_eq!(remap_1d(&Mirror, -5, 2, -6), -5);
        assert_eq!(remap_1d(&Clamp, 100, 5, i64::MIN), 100);
        assert_eq!(remap_1d(&Clamp, -100, 5, i64::MAX), -96);
    }

    #[test]
    fn remaps_every_axis_independently() {
        let extent = ExtentN::from_shape(IndexN::from([3, 4]));
        let mut remapped = IndexN::zeros(2);
        let _: OobResolution<u8> = Cyclic.resolve(&extent, &IndexN::from([-1, 9]), &mut remapped);
        assert_eq!(remapped, IndexN::from([2, 1]));
    }

    #[test]
    fn constant_ignores_distance() {
        let extent = ExtentN::from_shape(IndexN::from([3]));
        let mut scratch = IndexN::zeros(1);
        let fill = Constant::<f32>::nan();
        for c in [-1000, -1, 3, 1 << 40].iter() {
            match fill.resolve(&extent, &IndexN::from([*c]), &mut scratch) {
                OobResolution::Value(v) => assert!(v.is_nan()),
                OobResolution::Remapped => panic!("constant never remaps"),
            }
        }
        assert!(!fill.remaps());
        assert!(Mirror.remaps());
        assert_eq!(Constant::<i32>::zero(), Constant(0));
    }
}
