//! N-dimensional discrete convolution and correlation.
//!
//! The filter is centered on each output point: a filter with shape `[2r0 + 1, 2r1 + 1, ...]` reads the source over
//! `[p0 - r0, p0 + r0] x [p1 - r1, p1 + r1] x ...`. Reads that fall outside of the source go through a [`Padded`] view
//! with the given out-of-bounds policy, so the edges need no special handling.
//!
//! ```
//! use gridstore_algo::{correlate, ParallelConfig};
//! use gridstore_core::prelude::*;
//! use gridstore_storage::prelude::*;
//!
//! let src = ArrayN::linear(vec![1, 2, 3, 4, 5]).unwrap();
//! let filter = ArrayN::linear(vec![1, 0, -1]).unwrap();
//! let mut dst = ArrayN::fill(src.extent().clone(), 0).unwrap();
//!
//! correlate(&src, &filter, &Constant::zero(), &mut dst, &ParallelConfig::default()).unwrap();
//! assert_eq!(dst.to_vec(), vec![-2, -2, -2, -2, 4]);
//! ```

use crate::{check_same_dims, ensure_disjoint, parallel_map, ParallelConfig, PointKernel};

use gridstore_core::prelude::*;
use gridstore_storage::prelude::*;

use num::Num;

/// `dst(p) = sum over k of filter(k) * src(p - (k - center))`
pub fn convolve<T, SA, SF, SB, P>(
    src: &ArrayN<T, SA>,
    filter: &ArrayN<T, SF>,
    policy: &P,
    dst: &mut ArrayN<T, SB>,
    config: &ParallelConfig,
) -> Result<()>
where
    T: Num + Copy + Default + Send + Sync,
    SA: LinearStorage<T> + Sync,
    SF: LinearStorage<T> + Sync,
    SB: LinearStorage<T>,
    P: OutOfBounds<T> + Sync,
{
    apply_filter(src, filter, policy, dst, config, true)
}

/// `dst(p) = sum over k of filter(k) * src(p + (k - center))`
pub fn correlate<T, SA, SF, SB, P>(
    src: &ArrayN<T, SA>,
    filter: &ArrayN<T, SF>,
    policy: &P,
    dst: &mut ArrayN<T, SB>,
    config: &ParallelConfig,
) -> Result<()>
where
    T: Num + Copy + Default + Send + Sync,
    SA: LinearStorage<T> + Sync,
    SF: LinearStorage<T> + Sync,
    SB: LinearStorage<T>,
    P: OutOfBounds<T> + Sync,
{
    apply_filter(src, filter, policy, dst, config, false)
}

fn apply_filter<T, SA, SF, SB, P>(
    src: &ArrayN<T, SA>,
    filter: &ArrayN<T, SF>,
    policy: &P,
    dst: &mut ArrayN<T, SB>,
    config: &ParallelConfig,
    flip: bool,
) -> Result<()>
where
    T: Num + Copy + Default + Send + Sync,
    SA: LinearStorage<T> + Sync,
    SF: LinearStorage<T> + Sync,
    SB: LinearStorage<T>,
    P: OutOfBounds<T> + Sync,
{
    ensure_disjoint(vec![&src.identity(), &filter.identity()], &dst.identity())?;
    check_same_dims(vec![
        ("source", src.extent()),
        ("filter", filter.extent()),
        ("destination", dst.extent()),
    ])?;

    let filter_extent = filter.extent();
    if let Some(axis) = filter_extent.shape.as_slice().iter().position(|len| len % 2 == 0) {
        return Err(Error::invalid_config(format!(
            "filter must have odd length on every axis, but axis {} has length {}",
            axis,
            filter_extent.shape.get(axis)
        )));
    }
    // Validates the policy against the source extent.
    Padded::try_new(src, policy)?;

    let center = filter_extent
        .minimum
        .zip_map(&filter_extent.shape, |min, len| min + (len - 1) / 2);
    let kernel = FilterKernel {
        filter,
        policy,
        center,
        flip,
    };

    parallel_map(src, dst, config, &kernel)
}

struct FilterKernel<'a, T, SF, P> {
    filter: &'a ArrayN<T, SF>,
    policy: &'a P,
    /// The filter point aligned with the output point.
    center: IndexN,
    flip: bool,
}

struct FilterScratch<T> {
    window: GridIter,
    filter_point: IndexN,
    src_point: IndexN,
    remapped: IndexN,
    src_value: T,
    filter_value: T,
}

impl<'a, T, SA, SF, P> PointKernel<T, SA> for FilterKernel<'a, T, SF, P>
where
    T: Num + Copy + Default + Sync,
    SA: LinearStorage<T>,
    SF: LinearStorage<T> + Sync,
    P: OutOfBounds<T> + Sync,
{
    type Output = T;
    type Scratch = FilterScratch<T>;

    fn new_scratch(&self, dims: usize) -> FilterScratch<T> {
        FilterScratch {
            window: self.filter.extent().iter_points(),
            filter_point: IndexN::zeros(dims),
            src_point: IndexN::zeros(dims),
            remapped: IndexN::zeros(dims),
            src_value: T::default(),
            filter_value: T::default(),
        }
    }

    fn compute(&self, src: &ArrayN<T, SA>, p: &IndexN, scratch: &mut FilterScratch<T>, out: &mut T) {
        let padded = Padded::new(src, self.policy);

        let mut sum = T::zero();
        scratch.window.reset();
        while scratch.window.next_into(&mut scratch.filter_point) {
            let k = scratch.filter_point.as_slice();
            let c = self.center.as_slice();
            for (axis, s) in scratch.src_point.as_mut_slice().iter_mut().enumerate() {
                let offset = k[axis] - c[axis];
                *s = if self.flip { p[axis] - offset } else { p[axis] + offset };
            }

            padded.get_into_with_scratch(&scratch.src_point, &mut scratch.remapped, &mut scratch.src_value);
            self.filter.get_into(&scratch.filter_point, &mut scratch.filter_value);
            sum = sum + scratch.src_value * scratch.filter_value;
        }

        *out = sum;
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

    use pretty_assertions::assert_eq;
    use utilities::data_sets::sphere_array;

    fn linear(values: Vec<i64>) -> ArrayN<i64> {
        ArrayN::linear(values).unwrap()
    }

    #[test]
    fn convolution_flips_the_filter() {
        let src = linear(vec![1, 2, 3, 4, 5]);
        let filter = linear(vec![1, 0, -1]);
        let mut dst = ArrayN::fill(src.extent().clone(), 0).unwrap();

        convolve(&src, &filter, &Constant::zero(), &mut dst, &ParallelConfig::default()).unwrap();
        assert_eq!(dst.to_vec(), vec![2, 2, 2, 2, -4]);

        correlate(&src, &filter, &Constant::zero(), &mut dst, &ParallelConfig::default()).unwrap();
        assert_eq!(dst.to_vec(), vec![-2, -2, -2, -2, 4]);
    }

    #[test]
    fn filter_extent_minimum_does_not_matter() {
        let src = linear(vec![3, 1, 4, 1, 5, 9, 2, 6]);
        let filter = linear(vec![1, 2, 5]);
        let mut shifted = filter.duplicate().unwrap();
        shifted.set_minimum(IndexN::from([-1]));

        let mut a = ArrayN::fill(src.extent().clone(), 0).unwrap();
        let mut b = ArrayN::fill(src.extent().clone(), 0).unwrap();
        convolve(&src, &filter, &Mirror, &mut a, &ParallelConfig::default()).unwrap();
        convolve(&src, &shifted, &Mirror, &mut b, &ParallelConfig::default()).unwrap();
        assert_eq!(a.to_vec(), b.to_vec());
    }

    #[test]
    fn delta_filter_is_identity() {
        let extent = ExtentN::from_min_and_shape(IndexN::from([-2, 5, 1]), IndexN::from([6, 4, 5]));
        let src = ArrayN::fill_from(extent.clone(), |p| p[0] * 100 + p[1] * 10 + p[2]).unwrap();
        let delta = ArrayN::fill_from(ExtentN::from_shape(IndexN::from([3, 3, 3])), |p| {
            if *p == IndexN::from([1, 1, 1]) {
                1
            } else {
                0
            }
        })
        .unwrap();
        let mut dst = ArrayN::fill(extent, 0).unwrap();

        convolve(&src, &delta, &Cyclic, &mut dst, &ParallelConfig::default().with_max_pieces(3)).unwrap();
        assert_eq!(dst.to_vec(), src.to_vec());
    }

    #[test]
    fn box_filter_counts_sphere_neighbors() {
        let (sphere, _radius) = sphere_array(12, 1i32, 0);
        let filter = ArrayN::fill(ExtentN::from_shape(IndexN::filled(3, 3)), 1).unwrap();
        let mut dst = ArrayN::fill(sphere.extent().clone(), -1).unwrap();

        correlate(&sphere, &filter, &Constant::zero(), &mut dst, &ParallelConfig::default()).unwrap();
        assert_eq!(dst.get(&IndexN::zeros(3)), 27);
        assert_eq!(dst.get(&IndexN::filled(3, -6)), 0);
    }

    #[test]
    fn cyclic_box_filter_conserves_total() {
        let extent = ExtentN::from_shape(IndexN::from([7, 5]));
        let src = ArrayN::fill_from(extent.clone(), |p| (p[0] * 13 + p[1] * 7) % 11).unwrap();
        let filter = ArrayN::fill(ExtentN::from_shape(IndexN::from([3, 3])), 1).unwrap();
        let mut dst = ArrayN::fill(extent, 0).unwrap();

        correlate(&src, &filter, &Cyclic, &mut dst, &ParallelConfig::default()).unwrap();
        let src_total: i64 = src.to_vec().iter().sum();
        let dst_total: i64 = dst.to_vec().iter().sum();
        assert_eq!(dst_total, 9 * src_total);
    }

    #[test]
    fn chunked_output_is_byte_identical_to_serial() {
        let extent = ExtentN::from_min_and_shape(IndexN::from([0, -4, 2]), IndexN::from([9, 23, 6]));
        let src = ArrayN::fill_from(extent.clone(), |p| ((p[0] * 7 + p[1] * 3 + p[2]) as f64).sin()).unwrap();
        let filter = ArrayN::fill_from(ExtentN::from_shape(IndexN::from([3, 5, 3])), |p| {
            1.0 / (1.0 + (p[0] + p[1] * 2 + p[2] * 3) as f64)
        })
        .unwrap();

        let run = |config: ParallelConfig| {
            let len = extent.num_points().unwrap();
            let mut dst = ArrayN::new(extent.clone(), ArrayStorage::<f64>::new(len).unwrap()).unwrap();
            convolve(&src, &filter, &Mirror, &mut dst, &config).unwrap();

            dst.storage().as_bytes().to_vec()
        };

        let serial = run(ParallelConfig::serial());
        for pieces in [2, 5, 8, 23, 64].iter() {
            assert!(run(ParallelConfig::default().with_max_pieces(*pieces)) == serial);
        }
    }

    #[test]
    fn even_filter_is_rejected() {
        let src = linear(vec![1, 2, 3, 4]);
        let filter = linear(vec![1, 1]);
        let mut dst = ArrayN::fill(src.extent().clone(), 7).unwrap();

        let err = convolve(&src, &filter, &Clamp, &mut dst, &ParallelConfig::default()).unwrap_err();
        assert!(err.is_invalid_config());
        assert_eq!(dst.to_vec(), vec![7; 4]);
    }

    #[test]
    fn mismatched_dims_are_rejected() {
        let src = linear(vec![1, 2, 3, 4]);
        let filter = ArrayN::fill(ExtentN::from_shape(IndexN::from([3, 3])), 1).unwrap();
        let mut dst = ArrayN::fill(src.extent().clone(), 0).unwrap();

        let err = correlate(&src, &filter, &Clamp, &mut dst, &ParallelConfig::default()).unwrap_err();
        assert!(err.is_invalid_config());
    }

    #[test]
    fn aliased_source_or_filter_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.bin");
        let extent = ExtentN::from_shape(IndexN::from([5, 5]));

        let src = ArrayN::new(extent.clone(), FileStorage::<f32>::create(&path, 25).unwrap()).unwrap();
        let mut dst = ArrayN::new(extent.clone(), FileStorage::<f32>::open(&path, 25).unwrap()).unwrap();
        let filter = ArrayN::fill(ExtentN::from_shape(IndexN::from([3, 3])), 1.0f32).unwrap();

        let err = convolve(&src, &filter, &Clamp, &mut dst, &ParallelConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Aliasing));

        let filter_path = dir.path().join("filter.bin");
        let filter = ArrayN::new(
            ExtentN::from_shape(IndexN::from([1, 1])),
            FileStorage::<f32>::create(&filter_path, 1).unwrap(),
        )
        .unwrap();
        let src = ArrayN::fill(extent.clone(), 1.0f32).unwrap();
        let mut dst = ArrayN::new(
            ExtentN::from_shape(IndexN::from([1, 1])),
            FileStorage::<f32>::open(&filter_path, 1).unwrap(),
        )
        .unwrap();
        let err = correlate(&src, &filter, &Clamp, &mut dst, &ParallelConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Aliasing));
    }

    #[test]
    fn remapping_an_empty_source_is_rejected() {
        let src = linear(Vec::new());
        let filter = linear(vec![1]);
        let mut dst = ArrayN::fill(ExtentN::from_shape(IndexN::from([3])), 0).unwrap();

        let err = convolve(&src, &filter, &Mirror, &mut dst, &ParallelConfig::default()).unwrap_err();
        assert!(err.is_invalid_config());

        convolve(&src, &filter, &Constant(2), &mut dst, &ParallelConfig::default()).unwrap();
        assert_eq!(dst.to_vec(), vec![2, 2, 2]);
    }
}
