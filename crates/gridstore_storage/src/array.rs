//! N-dimensional arrays over any linear storage.
//!
//! An `ArrayN` is a dimensioned data source: one `LinearStorage` plus the `ExtentN` it covers. The domain is located within
//! an ambient space, a signed integer lattice, so the array contains data at exactly the set of points in its extent, and
//! no more.
//!
//! # Indexing
//!
//! You can index an array with 2 kinds of coordinates, with [`Get`](crate::access_traits) traits:
//!   - `Get*<Stride>`: linear record index
//!   - `Get*<&IndexN>`: N-dimensional point in global (ambient) coordinates
//!
//! Point `p` maps to record `(p0 - min0) + (p1 - min1) * shape0 + (p2 - min2) * shape0 * shape1 + ...`, so axis 0 varies
//! fastest. Indexing assumes that the coordinates are in-bounds of the array, panicking otherwise; wrap the array in a
//! [`Padded`](crate::Padded) source to read past the edges.
//!
//! # Storage
//!
//! The records can live in any `LinearStorage`: a `Vec<T>`, a packed `ArrayStorage`, or a memory-mapped `FileStorage`.
//!
//! ```
//! use gridstore_core::prelude::*;
//! use gridstore_storage::prelude::*;
//!
//! let extent = ExtentN::from_min_and_shape(IndexN::from([-1, -1]), IndexN::from([3, 3]));
//! let storage = BitArrayStorage::<IntN<3>>::new(9).unwrap();
//! let mut array = ArrayN::new(extent, storage).unwrap();
//!
//! array.set(&IndexN::from([1, 1]), &IntN::new(5));
//! assert_eq!(array.get(Stride(8)).v(), -3);
//! ```

mod coords;

pub use coords::*;

use crate::{addressable_len, try_vec_with_capacity, ForEach, GetInto, LinearStorage, Set, StorageIdentity};

use gridstore_core::prelude::*;

use core::marker::PhantomData;
use std::convert::TryFrom;

/// When a data source implements `Array`, that means there is some underlying array with the location and shape dictated by
/// the extent.
pub trait Array {
    fn extent(&self) -> &ExtentN;
}

/// A map from lattice location `IndexN` to data `T`, stored as a linear sequence of records.
#[derive(Clone)]
pub struct ArrayN<T, S = Vec<T>> {
    storage: S,
    extent: ExtentN,
    strides: Vec<u64>,
    marker: PhantomData<T>,
}

impl<T, S> ArrayN<T, S> {
    /// Moves the raw extent and storage out of `self`.
    #[inline]
    pub fn into_parts(self) -> (ExtentN, S) {
        (self.extent, self.storage)
    }

    #[inline]
    pub fn extent(&self) -> &ExtentN {
        &self.extent
    }

    /// The length of each dimension.
    #[inline]
    pub fn dims(&self) -> &[i64] {
        self.extent.shape.as_slice()
    }

    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Sets the extent minimum to `p`.
    #[inline]
    pub fn set_minimum(&mut self, p: IndexN) {
        assert_eq!(p.dims(), self.extent.dims());
        self.extent.minimum = p;
    }

    /// Adds `p` to the extent minimum.
    #[inline]
    pub fn translate(&mut self, p: &IndexN) {
        self.extent.minimum = &self.extent.minimum + p;
    }

    /// Returns `true` iff this map contains point `p`.
    #[inline]
    pub fn contains(&self, p: &IndexN) -> bool {
        self.extent.contains(p)
    }

    /// The linear index of the point `local` (relative to the extent minimum).
    #[inline]
    pub fn stride_from_local_point(&self, local: &IndexN) -> Stride {
        debug_assert_eq!(local.dims(), self.strides.len());

        let mut s = Stride(0);
        for (&c, &stride) in local.as_slice().iter().zip(self.strides.iter()) {
            s += Stride(c as u64) * stride;
        }

        s
    }

    /// The linear index of the global point `p`.
    #[inline]
    pub fn stride_from_point(&self, p: &IndexN) -> Stride {
        debug_assert_eq!(p.dims(), self.strides.len());

        let mut s = Stride(0);
        for ((&c, &min), &stride) in p
            .as_slice()
            .iter()
            .zip(self.extent.minimum.as_slice())
            .zip(self.strides.iter())
        {
            s += Stride(c.wrapping_sub(min) as u64) * stride;
        }

        s
    }

    /// Converts each of the `local` offsets into a `Stride` offset. Negative offsets wrap, so they can be added to the
    /// stride of a point to get the stride of its neighbor.
    pub fn strides_from_local_points(&self, local: &[IndexN], strides: &mut [Stride]) {
        for (p, s) in local.iter().zip(strides.iter_mut()) {
            *s = self.stride_from_local_point(p);
        }
    }
}

impl<T, S> ArrayN<T, S>
where
    S: LinearStorage<T>,
{
    /// Create a new `ArrayN` directly from the extent and storage. Fails unless the number of points in the extent matches the
    /// length of the storage.
    pub fn new(extent: ExtentN, storage: S) -> Result<Self> {
        let num_points = extent.num_points()?;
        if num_points != storage.len() {
            return Err(Error::invalid_config(format!(
                "extent has {} points but storage holds {} records",
                num_points,
                storage.len()
            )));
        }
        let strides = axis_strides(extent.shape.as_slice());

        Ok(Self {
            storage,
            extent,
            strides,
            marker: PhantomData,
        })
    }

    /// An array anchored at the origin with the given dimension sizes.
    pub fn from_dims(dims: &[i64], storage: S) -> Result<Self> {
        Self::new(ExtentN::from_shape(IndexN::from_slice(dims)), storage)
    }

    /// A one-dimensional view of `storage` over `[0, len)`.
    pub fn linear(storage: S) -> Result<Self> {
        let len = i64::try_from(storage.len())
            .map_err(|_| Error::invalid_config(format!("{} records exceed a one-dimensional extent", storage.len())))?;

        Self::from_dims(&[len], storage)
    }

    /// A deep copy with independent storage.
    pub fn duplicate(&self) -> Result<Self> {
        Ok(Self {
            storage: self.storage.duplicate()?,
            extent: self.extent.clone(),
            strides: self.strides.clone(),
            marker: PhantomData,
        })
    }

    #[inline]
    pub fn identity(&self) -> StorageIdentity {
        self.storage.identity()
    }

    #[inline]
    pub fn single_threaded_only(&self) -> bool {
        self.storage.single_threaded_only()
    }

    /// Sets every point in the extent to the value returned by `filler`.
    pub fn fill_with(&mut self, mut filler: impl FnMut(&IndexN) -> T) {
        let mut iter = self.extent.iter_points();
        let mut p = IndexN::zeros(self.extent.dims());
        let mut i = 0;
        while iter.next_into(&mut p) {
            let value = filler(&p);
            self.storage.set(i, &value);
            i += 1;
        }
    }

    /// All records in linear order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Default,
    {
        (0..self.storage.len()).map(|i| self.storage.value(i)).collect()
    }
}

impl<T> ArrayN<T, Vec<T>>
where
    T: Clone,
{
    /// Creates a map that fills the entire `extent` with the same `value`.
    pub fn fill(extent: ExtentN, value: T) -> Result<Self> {
        let len = addressable_len(extent.num_points()?)?;
        let mut values = try_vec_with_capacity(len)?;
        values.resize(len, value);

        Self::new(extent, values)
    }

    /// Create a new array for `extent` where each point's value is determined by the `filler` function.
    pub fn fill_from(extent: ExtentN, mut filler: impl FnMut(&IndexN) -> T) -> Result<Self> {
        let mut values = try_vec_with_capacity(addressable_len(extent.num_points()?)?)?;
        values.extend(extent.iter_points().map(|p| filler(&p)));

        Self::new(extent, values)
    }
}

impl<T, S> Array for ArrayN<T, S> {
    #[inline]
    fn extent(&self) -> &ExtentN {
        &self.extent
    }
}

//  ██████╗ ███████╗████████╗████████╗███████╗██████╗ ███████╗
// ██╔════╝ ██╔════╝╚══██╔══╝╚══██╔══╝██╔════╝██╔══██╗██╔════╝
// ██║  ███╗█████╗     ██║      ██║   █████╗  ██████╔╝███████╗
// ██║   ██║██╔══╝     ██║      ██║   ██╔══╝  ██╔══██╗╚════██║
// ╚██████╔╝███████╗   ██║      ██║   ███████╗██║  ██║███████║
//  ╚═════╝ ╚══════╝   ╚═╝      ╚═╝   ╚══════╝╚═╝  ╚═╝╚══════╝

impl<T, S> GetInto<Stride> for ArrayN<T, S>
where
    S: LinearStorage<T>,
{
    type Data = T;

    #[inline]
    fn get_into(&self, stride: Stride, out: &mut T) {
        self.storage.get(stride.0, out)
    }
}

impl<'a, T, S> GetInto<&'a IndexN> for ArrayN<T, S>
where
    S: LinearStorage<T>,
{
    type Data = T;

    #[inline]
    fn get_into(&self, p: &'a IndexN, out: &mut T) {
        assert!(self.extent.contains(p), "{} is outside of {:?}", p, self.extent);

        self.get_into(self.stride_from_point(p), out)
    }
}

impl<T, S> Set<Stride> for ArrayN<T, S>
where
    S: LinearStorage<T>,
{
    type Data = T;

    #[inline]
    fn set(&mut self, stride: Stride, value: &T) {
        self.storage.set(stride.0, value)
    }
}

impl<'a, T, S> Set<&'a IndexN> for ArrayN<T, S>
where
    S: LinearStorage<T>,
{
    type Data = T;

    #[inline]
    fn set(&mut self, p: &'a IndexN, value: &T) {
        assert!(self.extent.contains(p), "{} is outside of {:?}", p, self.extent);

        let stride = self.stride_from_point(p);
        self.set(stride, value)
    }
}

impl_get_via_get_into!(ArrayN<T, S>, T, S);

// ███████╗ ██████╗ ██████╗     ███████╗ █████╗  ██████╗██╗  ██╗
// ██╔════╝██╔═══██╗██╔══██╗    ██╔════╝██╔══██╗██╔════╝██║  ██║
// █████╗  ██║   ██║██████╔╝    █████╗  ███████║██║     ███████║
// ██╔══╝  ██║   ██║██╔══██╗    ██╔══╝  ██╔══██║██║     ██╔══██║
// ██║     ╚██████╔╝██║  ██║    ███████╗██║  ██║╚██████╗██║  ██║
// ╚═╝      ╚═════╝ ╚═╝  ╚═╝    ╚══════╝╚═╝  ╚═╝ ╚═════╝╚═╝  ╚═╝

impl<T, S> ForEach for ArrayN<T, S>
where
    S: LinearStorage<T>,
    T: Default,
{
    type Item = T;

    fn for_each(&self, extent: &ExtentN, mut f: impl FnMut(&IndexN, &T)) {
        let visit = self.extent.intersection(extent);
        let mut iter = visit.iter_points();
        let mut p = IndexN::zeros(visit.dims());
        let mut value = T::default();
        while iter.next_into(&mut p) {
            self.storage.get(self.stride_from_point(&p).0, &mut value);
            f(&p, &value);
        }
    }
}

impl<T, S> core::fmt::Debug for ArrayN<T, S>
where
    S: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ArrayN")
            .field("extent", &self.extent)
            .field("storage", &self.storage)
            .finish()
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
