//! Resampling a source array onto a destination extent of a different size.
//!
//! Output point `o` maps to the source position `o * (src_len / dst_len)` on each axis, where both `o` and the position are
//! relative to the minimum of their extent. Nearest-neighbor sampling truncates the position; multilinear sampling blends
//! the `2^N` surrounding records, reading past the far edge through an out-of-bounds policy.

use crate::{check_same_dims, parallel_map, ParallelConfig, PointKernel};

use gridstore_core::prelude::*;
use gridstore_storage::prelude::*;

use num::{Float, NumCast};

/// Fills `dst` with the source record nearest (toward the source minimum) to each output point.
///
/// ```
/// use gridstore_algo::{resample_nearest, ParallelConfig};
/// use gridstore_core::prelude::*;
/// use gridstore_storage::prelude::*;
///
/// let src = ArrayN::linear(vec![10, 20]).unwrap();
/// let mut dst = ArrayN::fill(ExtentN::from_shape(IndexN::from([4])), 0).unwrap();
/// resample_nearest(&src, &mut dst, &ParallelConfig::default()).unwrap();
/// assert_eq!(dst.to_vec(), vec![10, 10, 20, 20]);
/// ```
pub fn resample_nearest<T, SA, SB>(src: &ArrayN<T, SA>, dst: &mut ArrayN<T, SB>, config: &ParallelConfig) -> Result<()>
where
    T: Clone + Default + Send + Sync,
    SA: LinearStorage<T> + Sync,
    SB: LinearStorage<T>,
{
    check_same_dims(vec![("source", src.extent()), ("destination", dst.extent())])?;
    check_not_empty(src.extent(), dst.extent())?;

    let kernel = NearestKernel {
        mapping: Mapping::new(src.extent(), dst.extent()),
    };

    parallel_map(src, dst, config, &kernel)
}

/// Fills `dst` by multilinear interpolation of the source. Corners past the source extent are read through `policy`.
pub fn resample_linear<T, SA, SB, P>(
    src: &ArrayN<T, SA>,
    policy: &P,
    dst: &mut ArrayN<T, SB>,
    config: &ParallelConfig,
) -> Result<()>
where
    T: Float + Default + Send + Sync,
    SA: LinearStorage<T> + Sync,
    SB: LinearStorage<T>,
    P: OutOfBounds<T> + Sync,
{
    check_same_dims(vec![("source", src.extent()), ("destination", dst.extent())])?;
    check_not_empty(src.extent(), dst.extent())?;
    Padded::try_new(src, policy)?;

    let kernel = LinearKernel {
        mapping: Mapping::new(src.extent(), dst.extent()),
        corners: IndexN::corner_offsets(src.extent().dims()),
        policy,
    };

    parallel_map(src, dst, config, &kernel)
}

fn check_not_empty(src: &ExtentN, dst: &ExtentN) -> Result<()> {
    if src.is_empty() && !dst.is_empty() {
        return Err(Error::invalid_config("can't resample an empty source onto a non-empty destination"));
    }

    Ok(())
}

/// The per-axis affine map from destination points to source positions.
struct Mapping {
    src_min: IndexN,
    src_shape: IndexN,
    dst_min: IndexN,
    dst_shape: IndexN,
}

impl Mapping {
    fn new(src: &ExtentN, dst: &ExtentN) -> Self {
        Self {
            src_min: src.minimum.clone(),
            src_shape: src.shape.clone(),
            dst_min: dst.minimum.clone(),
            dst_shape: dst.shape.clone(),
        }
    }

    /// The source-local position of `p` on `axis`, as a whole part and a fraction in `[0, 1)`.
    #[inline]
    fn locate(&self, p: &IndexN, axis: usize) -> (i64, f64) {
        let local = (p.get(axis) - self.dst_min.get(axis)) as i128;
        let num = local * self.src_shape.get(axis) as i128;
        let den = self.dst_shape.get(axis) as i128;
        let whole = num.div_euclid(den);
        let frac = num.rem_euclid(den) as f64 / den as f64;

        (whole as i64, frac)
    }
}

struct NearestKernel {
    mapping: Mapping,
}

impl<T, SA> PointKernel<T, SA> for NearestKernel
where
    T: Clone,
    SA: LinearStorage<T>,
{
    type Output = T;
    type Scratch = IndexN;

    fn new_scratch(&self, dims: usize) -> IndexN {
        IndexN::zeros(dims)
    }

    fn compute(&self, src: &ArrayN<T, SA>, p: &IndexN, q: &mut IndexN, out: &mut T) {
        for axis in 0..p.dims() {
            let (whole, _) = self.mapping.locate(p, axis);
            q.set(axis, self.mapping.src_min.get(axis) + whole);
        }
        src.get_into(&*q, out);
    }
}

struct LinearKernel<'a, P> {
    mapping: Mapping,
    corners: Vec<IndexN>,
    policy: &'a P,
}

struct LinearScratch<T> {
    base: IndexN,
    frac: Vec<f64>,
    corner: IndexN,
    remapped: IndexN,
    value: T,
}

impl<'a, T, SA, P> PointKernel<T, SA> for LinearKernel<'a, P>
where
    T: Float + Default,
    SA: LinearStorage<T>,
    P: OutOfBounds<T> + Sync,
{
    type Output = T;
    type Scratch = LinearScratch<T>;

    fn new_scratch(&self, dims: usize) -> LinearScratch<T> {
        LinearScratch {
            base: IndexN::zeros(dims),
            frac: vec![0.0; dims],
            corner: IndexN::zeros(dims),
            remapped: IndexN::zeros(dims),
            value: T::default(),
        }
    }

    fn compute(&self, src: &ArrayN<T, SA>, p: &IndexN, scratch: &mut LinearScratch<T>, out: &mut T) {
        let padded = Padded::new(src, self.policy);

        for axis in 0..p.dims() {
            let (whole, frac) = self.mapping.locate(p, axis);
            scratch.base.set(axis, self.mapping.src_min.get(axis) + whole);
            scratch.frac[axis] = frac;
        }

        let mut sum = T::zero();
        for offset in self.corners.iter() {
            let weight = offset
                .as_slice()
                .iter()
                .zip(scratch.frac.iter())
                .fold(1.0, |w, (&o, &f)| if o == 1 { w * f } else { w * (1.0 - f) });
            // Skipping weightless corners keeps exact hits exact, even next to NaN padding.
            if weight == 0.0 {
                continue;
            }

            for (axis, c) in scratch.corner.as_mut_slice().iter_mut().enumerate() {
                *c = scratch.base.get(axis) + offset.get(axis);
            }
            padded.get_into_with_scratch(&scratch.corner, &mut scratch.remapped, &mut scratch.value);
            let weight: T = NumCast::from(weight).unwrap_or_else(T::nan);
            sum = sum + weight * scratch.value;
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

    #[test]
    fn nearest_downsamples_by_striding() {
        let src = ArrayN::linear((0..8).collect::<Vec<i32>>()).unwrap();
        let mut dst = ArrayN::fill(ExtentN::from_shape(IndexN::from([4])), -1).unwrap();
        resample_nearest(&src, &mut dst, &ParallelConfig::default()).unwrap();
        assert_eq!(dst.to_vec(), vec![0, 2, 4, 6]);
    }

    #[test]
    fn nearest_respects_both_minimums() {
        let src_extent = ExtentN::from_min_and_shape(IndexN::from([-3, 10]), IndexN::from([3, 2]));
        let src = ArrayN::fill_from(src_extent, |p| p[0] * 100 + p[1]).unwrap();
        let dst_extent = ExtentN::from_min_and_shape(IndexN::from([50, -7]), IndexN::from([6, 4]));
        let mut dst = ArrayN::fill(dst_extent, 0).unwrap();

        resample_nearest(&src, &mut dst, &ParallelConfig::default().with_max_pieces(3)).unwrap();
        assert_eq!(dst.get(&IndexN::from([50, -7])), -300 + 10);
        assert_eq!(dst.get(&IndexN::from([53, -5])), -200 + 11);
        assert_eq!(dst.get(&IndexN::from([55, -4])), -100 + 11);
    }

    #[test]
    fn same_shape_is_a_copy() {
        let extent = ExtentN::from_min_and_shape(IndexN::from([4, 4, -4]), IndexN::from([5, 3, 4]));
        let src = ArrayN::fill_from(extent.clone(), |p| (p[0] * 9 + p[1] * 5 + p[2]) as f64).unwrap();

        let mut nearest = ArrayN::fill(extent.clone(), 0.0).unwrap();
        resample_nearest(&src, &mut nearest, &ParallelConfig::default()).unwrap();
        assert_eq!(nearest.to_vec(), src.to_vec());

        let nan = Constant::<f64>::nan();
        let mut linear = ArrayN::fill(extent, 0.0).unwrap();
        resample_linear(&src, &nan, &mut linear, &ParallelConfig::default()).unwrap();
        assert_eq!(linear.to_vec(), src.to_vec());
    }

    #[test]
    fn linear_upsample_1d() {
        let src = ArrayN::linear(vec![0.0f64, 10.0]).unwrap();
        let mut dst = ArrayN::fill(ExtentN::from_shape(IndexN::from([4])), 0.0).unwrap();
        resample_linear(&src, &Clamp, &mut dst, &ParallelConfig::default()).unwrap();
        assert_eq!(dst.to_vec(), vec![0.0, 5.0, 10.0, 10.0]);
    }

    #[test]
    fn bilinear_reproduces_a_plane_in_the_interior() {
        let src = ArrayN::fill_from(ExtentN::from_shape(IndexN::from([4, 4])), |p| (p[0] + 2 * p[1]) as f64).unwrap();
        let mut dst = ArrayN::fill(ExtentN::from_shape(IndexN::from([8, 8])), 0.0).unwrap();
        resample_linear(&src, &Clamp, &mut dst, &ParallelConfig::default()).unwrap();

        let interior = ExtentN::from_shape(IndexN::from([7, 7]));
        for p in interior.iter_points() {
            let expected = p[0] as f64 * 0.5 + 2.0 * (p[1] as f64 * 0.5);
            assert_eq!(dst.get(&p), expected, "at {}", p);
        }
    }

    #[test]
    fn chunked_matches_serial() {
        let src = ArrayN::fill_from(ExtentN::from_shape(IndexN::from([6, 11])), |p| {
            ((p[0] * 17 + p[1] * 5) as f32).cos()
        })
        .unwrap();
        let run = |config: ParallelConfig| {
            let mut dst = ArrayN::fill(ExtentN::from_shape(IndexN::from([13, 29])), 0.0f32).unwrap();
            resample_linear(&src, &Mirror, &mut dst, &config).unwrap();

            dst.to_vec().iter().map(|v| v.to_bits()).collect::<Vec<_>>()
        };

        assert_eq!(run(ParallelConfig::default().with_max_pieces(7)), run(ParallelConfig::serial()));
    }

    #[test]
    fn resampling_onto_the_source_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.bin");
        let original: Vec<f32> = (0..6).map(|i| i as f32 + 0.5).collect();

        let mut storage = FileStorage::<f32>::create(&path, 6).unwrap();
        for (i, v) in original.iter().enumerate() {
            storage.set(i as u64, v);
        }
        // Same records, transposed shape, so any write-back would reorder them.
        let src = ArrayN::new(ExtentN::from_shape(IndexN::from([2, 3])), storage).unwrap();
        let mut dst = ArrayN::new(
            ExtentN::from_shape(IndexN::from([3, 2])),
            FileStorage::<f32>::open(&path, 6).unwrap(),
        )
        .unwrap();

        let err = resample_nearest(&src, &mut dst, &ParallelConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Aliasing));
        assert_eq!(dst.to_vec(), original);

        let err = resample_linear(&src, &Clamp, &mut dst, &ParallelConfig::default().with_max_pieces(3)).unwrap_err();
        assert!(matches!(err, Error::Aliasing));
        assert_eq!(dst.to_vec(), original);
        assert_eq!(src.to_vec(), original);
    }

    #[test]
    fn empty_source_is_rejected() {
        let src = ArrayN::linear(Vec::<f64>::new()).unwrap();
        let mut dst = ArrayN::fill(ExtentN::from_shape(IndexN::from([3])), 0.0).unwrap();

        assert!(resample_nearest(&src, &mut dst, &ParallelConfig::default())
            .unwrap_err()
            .is_invalid_config());
        assert!(resample_linear(&src, &Constant::zero(), &mut dst, &ParallelConfig::default())
            .unwrap_err()
            .is_invalid_config());
    }
}
