//! A data source that overlays an out-of-bounds policy on top of a delegate array, answering reads at every point of the
//! lattice.
//!
//! As an example use case, a convolution reads a whole filter window around each output point, and the windows of edge points
//! hang off the edge of the input. Instead of special-casing the edges, read through a `Padded` source:
//!
//! ```
//! use gridstore_core::prelude::*;
//! use gridstore_storage::prelude::*;
//!
//! let samples = ArrayN::linear(vec![1, 2, 3]).unwrap();
//! let padded = Padded::new(&samples, &Mirror);
//!
//! let read: Vec<i32> = (-4..7).map(|c| padded.get(&IndexN::from([c]))).collect();
//! assert_eq!(read, vec![3, 3, 2, 1, 1, 2, 3, 3, 2, 1, 1]);
//! ```
//!
//! `Padded` is read-only; writes go to the delegate directly, and only in bounds.

use crate::{Array, GetInto, OobPolicy, OobResolution, OutOfBounds};

use gridstore_core::prelude::*;

/// A data source that delegates in-bounds reads to `base` and out-of-bounds reads to `policy`. Owns neither.
pub struct Padded<'a, M, P> {
    base: &'a M,
    policy: &'a P,
}

impl<'a, M, P> Clone for Padded<'a, M, P> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, M, P> Copy for Padded<'a, M, P> {}

impl<'a, M, P> Padded<'a, M, P>
where
    M: Array,
{
    /// Panics if `policy` needs to remap points into `base` but `base` is empty. See `try_new`.
    #[inline]
    pub fn new(base: &'a M, policy: &'a P) -> Self
    where
        P: OobPolicy,
    {
        match Self::try_new(base, policy) {
            Ok(padded) => padded,
            Err(e) => panic!("{}", e),
        }
    }

    /// Fails with `InvalidConfig` if `policy` needs to remap points into `base` but `base` is empty.
    pub fn try_new(base: &'a M, policy: &'a P) -> Result<Self>
    where
        P: OobPolicy,
    {
        if policy.remaps() && base.extent().is_empty() {
            return Err(Error::invalid_config(
                "a remapping out-of-bounds policy needs a non-empty extent",
            ));
        }

        Ok(Self { base, policy })
    }

    #[inline]
    pub fn base(&self) -> &'a M {
        self.base
    }

    #[inline]
    pub fn policy(&self) -> &'a P {
        self.policy
    }

    /// Like `get_into`, but remaps points into `scratch` instead of allocating. `scratch` must have the same dimensionality as
    /// `p`; its contents are overwritten.
    #[inline]
    pub fn get_into_with_scratch<T>(&self, p: &IndexN, scratch: &mut IndexN, out: &mut T)
    where
        M: for<'r> GetInto<&'r IndexN, Data = T>,
        P: OutOfBounds<T>,
        T: Clone,
    {
        let extent = self.base.extent();
        if extent.contains(p) {
            self.base.get_into(p, out);
            return;
        }

        match self.policy.resolve(extent, p, scratch) {
            OobResolution::Remapped => self.base.get_into(&*scratch, out),
            OobResolution::Value(v) => out.clone_from(v),
        }
    }
}

impl<'a, 'b, M, P, T> GetInto<&'b IndexN> for Padded<'a, M, P>
where
    M: Array + for<'r> GetInto<&'r IndexN, Data = T>,
    P: OutOfBounds<T>,
    T: Clone,
{
    type Data = T;

    #[inline]
    fn get_into(&self, p: &'b IndexN, out: &mut T) {
        if self.base.extent().contains(p) {
            self.base.get_into(p, out);
        } else {
            let mut scratch = IndexN::zeros(p.dims());
            self.get_into_with_scratch(p, &mut scratch, out);
        }
    }
}

impl_get_via_get_into!(Padded<'a, M, P>, 'a, M, P);

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ArrayN, BitArrayStorage, Clamp, Constant, Cyclic, Get, IntN, Mirror};

    use pretty_assertions::assert_eq;

    fn read_1d<P: OutOfBounds<i32>>(policy: &P, cs: impl Iterator<Item = i64>) -> Vec<i32> {
        let samples = ArrayN::linear(vec![1, 2, 3]).unwrap();
        let padded = Padded::new(&samples, policy);

        cs.map(|c| padded.get(&IndexN::from([c]))).collect()
    }

    #[test]
    fn mirror_reference_values() {
        let padded = read_1d(&Mirror, [-1, -2, -3, -4, 3, 4, 5, 6].iter().copied());
        assert_eq!(padded, vec![1, 2, 3, 3, 3, 2, 1, 1]);
    }

    #[test]
    fn cyclic_values() {
        let padded = read_1d(&Cyclic, -3..6);
        assert_eq!(padded, vec![1, 2, 3, 1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn clamp_values() {
        let padded = read_1d(&Clamp, -2..5);
        assert_eq!(padded, vec![1, 1, 1, 2, 3, 3, 3]);
    }

    #[test]
    fn constant_fill_values() {
        let padded = read_1d(&Constant(-9), -2..5);
        assert_eq!(padded, vec![-9, -9, 1, 2, 3, -9, -9]);
    }

    #[test]
    fn nan_fill_for_floats() {
        let samples = ArrayN::linear(vec![0.5f64]).unwrap();
        let nan = Constant::<f64>::nan();
        let padded = Padded::new(&samples, &nan);

        assert_eq!(padded.get(&IndexN::from([0])), 0.5);
        assert!(padded.get(&IndexN::from([1])).is_nan());
    }

    #[test]
    fn padded_2d_with_offset_extent() {
        let extent = ExtentN::from_min_and_shape(IndexN::from([10, 20]), IndexN::from([2, 2]));
        let array = ArrayN::fill_from(extent, |p| p[0] * 100 + p[1]).unwrap();
        let padded = Padded::new(&array, &Clamp);

        assert_eq!(padded.get(&IndexN::from([9, 19])), 1020);
        assert_eq!(padded.get(&IndexN::from([12, 25])), 1121);

        let mut scratch = IndexN::zeros(2);
        let mut out = 0;
        padded.get_into_with_scratch(&IndexN::from([-50, 21]), &mut scratch, &mut out);
        assert_eq!(out, 1021);
    }

    #[test]
    fn bit_packed_base() {
        let values: Vec<IntN<2>> = [1, -1, 0].iter().map(|&v| IntN::new(v)).collect();
        let storage = BitArrayStorage::from_values(values.iter()).unwrap();
        let array = ArrayN::linear(storage).unwrap();
        let padded = Padded::new(&array, &Cyclic);

        assert_eq!(padded.get(&IndexN::from([-2])).v(), -1);
    }

    #[test]
    fn remapping_an_empty_extent_is_rejected() {
        let empty = ArrayN::linear(Vec::<u8>::new()).unwrap();
        let err = Padded::try_new(&empty, &Mirror).err().unwrap();
        assert!(err.is_invalid_config());

        let zero = Constant::<u8>::zero();
        let padded = Padded::try_new(&empty, &zero).unwrap();
        assert_eq!(padded.get(&IndexN::from([0])), 0u8);
    }
}
