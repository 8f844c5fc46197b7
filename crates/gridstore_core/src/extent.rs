use crate::{int_math::num_elements, GridIter, IndexN, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An N-dimensional extent. This is mathematically the Cartesian product of a half-closed interval `[a, b)` in each
/// dimension. You can also just think of it as an axis-aligned box with some shape and a minimum point. Every query against a
/// dimensioned data source or a parallel kernel is bounded by one of these.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ExtentN {
    /// The least point contained in the extent.
    pub minimum: IndexN,
    /// The length of each dimension.
    pub shape: IndexN,
}

impl ExtentN {
    /// The default representation of an extent as the minimum point and shape.
    #[inline]
    pub fn from_min_and_shape(minimum: IndexN, shape: IndexN) -> Self {
        assert_eq!(minimum.dims(), shape.dims());

        Self { minimum, shape }
    }

    /// An extent anchored at the origin.
    #[inline]
    pub fn from_shape(shape: IndexN) -> Self {
        Self::from_min_and_shape(IndexN::zeros(shape.dims()), shape)
    }

    /// An alternative representation of an extent as the minimum point and least upper bound.
    #[inline]
    pub fn from_min_and_lub(minimum: IndexN, least_upper_bound: IndexN) -> Self {
        let shape = least_upper_bound.zip_map(&minimum, |lub, min| clamped_len(lub as i128 - min as i128));

        Self::from_min_and_shape(minimum, shape)
    }

    /// An alternative representation of an extent as the minimum point and the (inclusive) maximum point.
    #[inline]
    pub fn from_min_and_max(minimum: IndexN, max: IndexN) -> Self {
        let shape = max.zip_map(&minimum, |max, min| clamped_len(max as i128 - min as i128 + 1));

        Self::from_min_and_shape(minimum, shape)
    }

    #[inline]
    pub fn dims(&self) -> usize {
        self.minimum.dims()
    }

    /// The least point `p` for which all points `q` in the extent satisfy `q < p`. Components that would pass `i64::MAX`
    /// saturate there.
    #[inline]
    pub fn least_upper_bound(&self) -> IndexN {
        self.minimum.zip_map(&self.shape, |min, shape| min.saturating_add(shape))
    }

    /// The unique greatest point in the extent. For an empty extent some component is below the minimum, unless the minimum
    /// is already `i64::MIN`.
    #[inline]
    pub fn max(&self) -> IndexN {
        self.minimum
            .zip_map(&self.shape, |min, shape| min.saturating_add(shape.saturating_sub(1)))
    }

    /// The number of points contained in the extent. Fails if the count does not fit in a `u64`.
    #[inline]
    pub fn num_points(&self) -> Result<u64> {
        num_elements(self.shape.as_slice())
    }

    /// Returns `true` iff the extent contains no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shape.as_slice().iter().any(|&s| s <= 0)
    }

    /// Returns `true` iff the point `p` is contained in this extent. Points of a different dimensionality are never contained.
    #[inline]
    pub fn contains(&self, p: &IndexN) -> bool {
        if p.dims() != self.dims() {
            return false;
        }

        self.minimum
            .as_slice()
            .iter()
            .zip(self.shape.as_slice())
            .zip(p.as_slice())
            .all(|((&min, &shape), &c)| c >= min && (c as i128 - min as i128) < shape as i128)
    }

    /// Returns the extent containing only the points in both `self` and `other`.
    #[inline]
    pub fn intersection(&self, other: &Self) -> Self {
        let minimum = self.minimum.join(&other.minimum);
        let max = self.max().meet(&other.max());

        Self::from_min_and_max(minimum, max)
    }

    /// Returns `true` iff the intersection of `self` and `other` is equal to `self`.
    #[inline]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.intersection(other).eq(self)
    }

    /// Translate the extent such that it has `new_min` as its new minimum.
    #[inline]
    pub fn with_minimum(&self, new_min: IndexN) -> Self {
        Self::from_min_and_shape(new_min, self.shape.clone())
    }

    /// Returns a new extent that's been padded on all borders by `pad_amount`.
    #[inline]
    pub fn padded(&self, pad_amount: i64) -> Self {
        Self::from_min_and_shape(
            self.minimum.map_components(|c| c - pad_amount),
            self.shape.map_components(|c| c + 2 * pad_amount),
        )
    }

    /// The axis with the greatest length. Ties go to the lowest axis.
    #[inline]
    pub fn largest_axis(&self) -> Option<usize> {
        let shape = self.shape.as_slice();

        (0..shape.len()).fold(None, |best, axis| match best {
            Some(b) if shape[b] >= shape[axis] => Some(b),
            _ => Some(axis),
        })
    }

    /// Cuts the extent into consecutive slabs along `axis`, each `piece_len` long except possibly the last, which holds
    /// whatever remains. Every other axis is covered fully by every slab.
    pub fn split_along(&self, axis: usize, piece_len: i64) -> Vec<ExtentN> {
        assert!(piece_len > 0);

        let mut slabs = Vec::new();
        let mut start = self.minimum.get(axis);
        let mut remaining = self.shape.get(axis);
        while remaining > 0 {
            let len = piece_len.min(remaining);
            let mut minimum = self.minimum.clone();
            let mut shape = self.shape.clone();
            minimum.set(axis, start);
            shape.set(axis, len);
            slabs.push(ExtentN::from_min_and_shape(minimum, shape));
            remaining -= len;
            if remaining > 0 {
                start += len;
            }
        }

        slabs
    }

    /// Iterate over all points in the extent.
    /// ```
    /// # use gridstore_core::{ExtentN, IndexN};
    /// #
    /// let extent = ExtentN::from_shape(IndexN::from([2, 2, 1]));
    /// let points = extent.iter_points().collect::<Vec<_>>();
    /// assert_eq!(points, vec![
    ///     IndexN::from([0, 0, 0]), IndexN::from([1, 0, 0]), IndexN::from([0, 1, 0]), IndexN::from([1, 1, 0])
    /// ]);
    /// ```
    #[inline]
    pub fn iter_points(&self) -> GridIter {
        GridIter::over(self)
    }
}

#[inline]
fn clamped_len(len: i128) -> i64 {
    len.clamp(0, i64::MAX as i128) as i64
}

/// Returns the smallest extent containing all of the given points.
#[inline]
pub fn bounding_extent<'a>(mut points: impl Iterator<Item = &'a IndexN>) -> Option<ExtentN> {
    let first_point = points.next()?;

    let mut min_point = first_point.clone();
    let mut max_point = first_point.clone();
    for p in points {
        min_point = min_point.meet(p);
        max_point = max_point.join(p);
    }

    Some(ExtentN::from_min_and_max(min_point, max_point))
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
    fn axis_zero_major_extent_iter2() {
        let extent = ExtentN::from_shape(IndexN::from([2, 2]));

        let points: Vec<_> = extent.iter_points().collect();

        assert_eq!(
            points,
            vec![
                IndexN::from([0, 0]),
                IndexN::from([1, 0]),
                IndexN::from([0, 1]),
                IndexN::from([1, 1]),
            ]
        );
    }

    #[test]
    fn empty_intersection_is_empty() {
        let e1 = ExtentN::from_min_and_max(IndexN::filled(2, 0), IndexN::filled(2, 1));
        let e2 = ExtentN::from_min_and_max(IndexN::filled(2, 3), IndexN::filled(2, 4));

        // A naive implementation might say the shape is [-1, -1].
        assert_eq!(e1.intersection(&e2).shape, IndexN::filled(2, 0));
        assert!(e1.intersection(&e2).is_empty());
        assert_eq!(e1.intersection(&e2).num_points().unwrap(), 0);
    }

    #[test]
    fn contains_respects_minimum_and_dims() {
        let e = ExtentN::from_min_and_shape(IndexN::from([-2, 3]), IndexN::from([4, 2]));

        assert!(e.contains(&IndexN::from([-2, 3])));
        assert!(e.contains(&IndexN::from([1, 4])));
        assert!(!e.contains(&IndexN::from([2, 4])));
        assert!(!e.contains(&IndexN::from([0, 2])));
        assert!(!e.contains(&IndexN::from([0, 3, 0])));
    }

    #[test]
    fn largest_axis_prefers_lowest_on_ties() {
        assert_eq!(
            ExtentN::from_shape(IndexN::from([3, 7, 7])).largest_axis(),
            Some(1)
        );
        assert_eq!(ExtentN::from_shape(IndexN::zeros(0)).largest_axis(), None);
    }

    #[test]
    fn split_along_covers_axis_with_short_last_slab() {
        let e = ExtentN::from_min_and_shape(IndexN::from([0, 5]), IndexN::from([2, 10]));
        let slabs = e.split_along(1, 3);

        let lens: Vec<_> = slabs.iter().map(|s| s.shape.get(1)).collect();
        let mins: Vec<_> = slabs.iter().map(|s| s.minimum.get(1)).collect();
        assert_eq!(lens, vec![3, 3, 3, 1]);
        assert_eq!(mins, vec![5, 8, 11, 14]);
        assert!(slabs.iter().all(|s| s.shape.get(0) == 2));
    }

    #[test]
    fn padded_grows_both_sides() {
        let e = ExtentN::from_shape(IndexN::from([3, 3])).padded(2);

        assert_eq!(e.minimum, IndexN::from([-2, -2]));
        assert_eq!(e.max(), IndexN::from([4, 4]));
    }

    #[test]
    fn extent_reaching_i64_max() {
        let e = ExtentN::from_min_and_shape(IndexN::from([i64::MAX - 2, 0]), IndexN::from([3, 2]));

        assert_eq!(e.max(), IndexN::from([i64::MAX, 1]));
        assert_eq!(e.least_upper_bound(), IndexN::from([i64::MAX, 2]));
        assert_eq!(e.iter_points().count(), 6);
        assert!(e.contains(&IndexN::from([i64::MAX, 1])));
        assert_eq!(ExtentN::from_min_and_max(e.minimum.clone(), e.max()), e);
        assert_eq!(e.intersection(&e), e);

        let mins: Vec<_> = e.split_along(0, 2).iter().map(|s| s.minimum.get(0)).collect();
        assert_eq!(mins, vec![i64::MAX - 2, i64::MAX]);
    }

    #[test]
    fn extent_at_i64_min_with_no_points() {
        let e = ExtentN::from_min_and_shape(IndexN::from([i64::MIN, 0]), IndexN::from([0, 4]));

        assert!(e.is_empty());
        assert_eq!(e.iter_points().count(), 0);
        assert!(e.split_along(0, 1).is_empty());
    }

    #[test]
    fn subsets() {
        let outer = ExtentN::from_min_and_shape(IndexN::from([-1, -1]), IndexN::from([5, 5]));
        let inner = ExtentN::from_min_and_shape(IndexN::from([0, 1]), IndexN::from([3, 2]));

        assert!(inner.is_subset_of(&outer));
        assert!(outer.is_subset_of(&outer));
        assert!(!outer.is_subset_of(&inner));
        assert!(!inner.with_minimum(IndexN::from([2, 2])).is_subset_of(&outer));
    }

    #[test]
    fn with_minimum_keeps_shape() {
        let e = ExtentN::from_min_and_shape(IndexN::from([4, -7]), IndexN::from([2, 3]));
        let moved = e.with_minimum(IndexN::from([-1, 0]));

        assert_eq!(moved.shape, e.shape);
        assert_eq!(moved.max(), IndexN::from([0, 2]));
    }

    #[test]
    fn bounding_extent_of_points() {
        let points = vec![IndexN::from([1, -1]), IndexN::from([-3, 4])];
        let e = bounding_extent(points.iter()).unwrap();

        assert_eq!(e.minimum, IndexN::from([-3, -1]));
        assert_eq!(e.max(), IndexN::from([1, 4]));
    }
}
