use core::fmt;
use core::ops::{Add, Index, IndexMut, Sub};
use itertools::Itertools;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An N-dimensional coordinate, one signed 64-bit component per axis. Axis 0 is the fastest-varying axis in every linear
/// layout of this workspace.
///
/// ```
/// use gridstore_core::IndexN;
///
/// let mut p = IndexN::from([1, 2, 3]);
/// p.set(2, 7);
/// assert_eq!(p.get(2), 7);
/// assert_eq!(&p + &IndexN::from([1, 1, 1]), IndexN::from([2, 3, 8]));
/// ```
///
/// Indices are mutable in place so that hot loops can reuse a single allocation, but they behave as values: two indices are
/// equal iff they have the same dimensionality and the same components.
///
/// There is no total order. Instead, `all_le` and `all_lt` implement the component-wise partial order, which is useful for
/// checking if a point is inside of the box between two other points:
///
/// ```
/// use gridstore_core::IndexN;
///
/// let min = IndexN::zeros(3);
/// let least_upper_bound = IndexN::filled(3, 3);
///
/// let p = IndexN::from([0, 1, 2]);
/// assert!(min.all_le(&p) && p.all_lt(&least_upper_bound));
/// ```
#[derive(Clone, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IndexN(Vec<i64>);

impl IndexN {
    /// The origin of an `n`-dimensional lattice.
    #[inline]
    pub fn zeros(n: usize) -> Self {
        Self(vec![0; n])
    }

    /// An `n`-dimensional index with every component equal to `value`.
    #[inline]
    pub fn filled(n: usize, value: i64) -> Self {
        Self(vec![value; n])
    }

    #[inline]
    pub fn from_slice(components: &[i64]) -> Self {
        Self(components.to_vec())
    }

    /// The number of axes.
    #[inline]
    pub fn dims(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn get(&self, axis: usize) -> i64 {
        self.0[axis]
    }

    #[inline]
    pub fn set(&mut self, axis: usize, value: i64) {
        self.0[axis] = value;
    }

    #[inline]
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [i64] {
        &mut self.0
    }

    /// Overwrites `self` with `other` without reallocating.
    #[inline]
    pub fn copy_from(&mut self, other: &IndexN) {
        self.0.copy_from_slice(&other.0);
    }

    /// Returns `true` iff `self` and `other` have the same dimensionality and every component of `self` is `<=` the
    /// corresponding component of `other`.
    #[inline]
    pub fn all_le(&self, other: &IndexN) -> bool {
        self.dims() == other.dims() && self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }

    /// Like `all_le`, but strict.
    #[inline]
    pub fn all_lt(&self, other: &IndexN) -> bool {
        self.dims() == other.dims() && self.0.iter().zip(other.0.iter()).all(|(a, b)| a < b)
    }

    /// Component-wise maximum.
    #[inline]
    pub fn join(&self, other: &IndexN) -> IndexN {
        self.zip_map(other, i64::max)
    }

    /// Component-wise minimum.
    #[inline]
    pub fn meet(&self, other: &IndexN) -> IndexN {
        self.zip_map(other, i64::min)
    }

    /// Returns the index after applying `f` component-wise.
    #[inline]
    pub fn map_components(&self, f: impl Fn(i64) -> i64) -> IndexN {
        IndexN(self.0.iter().map(|&c| f(c)).collect())
    }

    #[inline]
    pub fn zip_map(&self, other: &IndexN, f: impl Fn(i64, i64) -> i64) -> IndexN {
        assert_eq!(self.dims(), other.dims());

        IndexN(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        )
    }

    /// All corners of an `n`-dimensional unit cube, axis 0 varying fastest.
    pub fn corner_offsets(n: usize) -> Vec<IndexN> {
        if n == 0 {
            return vec![IndexN::zeros(0)];
        }

        itertools::repeat_n(0..2i64, n)
            .multi_cartesian_product()
            .map(|mut c| {
                // multi_cartesian_product varies the last axis fastest.
                c.reverse();
                IndexN(c)
            })
            .collect()
    }
}

impl From<Vec<i64>> for IndexN {
    #[inline]
    fn from(components: Vec<i64>) -> Self {
        Self(components)
    }
}

impl<const N: usize> From<[i64; N]> for IndexN {
    #[inline]
    fn from(components: [i64; N]) -> Self {
        Self(components.to_vec())
    }
}

impl Index<usize> for IndexN {
    type Output = i64;

    #[inline]
    fn index(&self, axis: usize) -> &i64 {
        &self.0[axis]
    }
}

impl IndexMut<usize> for IndexN {
    #[inline]
    fn index_mut(&mut self, axis: usize) -> &mut i64 {
        &mut self.0[axis]
    }
}

impl<'a> Add<&'a IndexN> for &'a IndexN {
    type Output = IndexN;

    #[inline]
    fn add(self, rhs: &'a IndexN) -> IndexN {
        self.zip_map(rhs, |a, b| a + b)
    }
}

impl<'a> Sub<&'a IndexN> for &'a IndexN {
    type Output = IndexN;

    #[inline]
    fn sub(self, rhs: &'a IndexN) -> IndexN {
        self.zip_map(rhs, |a, b| a - b)
    }
}

impl fmt::Debug for IndexN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "IndexN({:?})", self.0)
    }
}

impl fmt::Display for IndexN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
