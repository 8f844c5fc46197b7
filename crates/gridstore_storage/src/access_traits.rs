//! Traits defining different ways to access data from dimensioned data sources.
//!
//! # Strided Access
//!
//! The fastest way to visit every record of an array is with a simple loop over linear offsets, we call them "stride"s:
//! ```
//! use gridstore_core::prelude::*;
//! use gridstore_storage::prelude::*;
//!
//! let extent = ExtentN::from_shape(IndexN::from([10, 10, 10]));
//! let mut array = ArrayN::fill(extent.clone(), 0u16).unwrap();
//!
//! for i in 0..extent.num_points().unwrap() {
//!     // Use the `Set<Stride>` impl of the array.
//!     array.set(Stride(i), &1);
//! }
//! assert_eq!(array.get(&IndexN::from([9, 9, 9])), 1);
//! ```
//!
//! # `ForEach` over Extent
//!
//! Often, you only want to visit a sub-extent of the array. `ForEach` only visits the part of the extent that is in bounds:
//! ```
//! # use gridstore_core::prelude::*;
//! # use gridstore_storage::prelude::*;
//! # let extent = ExtentN::from_shape(IndexN::from([10, 10, 10]));
//! # let array = ArrayN::fill(extent.clone(), 1u16).unwrap();
//! let overhanging = ExtentN::from_min_and_shape(IndexN::from([5, 5, 5]), IndexN::from([10, 10, 10]));
//! let mut count = 0;
//! array.for_each(&overhanging, |_p: &IndexN, value: &u16| count += *value as u32);
//! assert_eq!(count, 125);
//! ```
//!
//! # Copy an Extent
//!
//! `copy_extent` copies the records of any `ForEach` source into any `Set` destination, clipped to the destination's extent:
//! ```
//! # use gridstore_core::prelude::*;
//! # use gridstore_storage::prelude::*;
//! # let extent = ExtentN::from_shape(IndexN::from([10, 10, 10]));
//! let mut array = ArrayN::fill(extent.clone(), 0i64).unwrap();
//!
//! // You can even copy from a `Fn(&IndexN) -> T`.
//! copy_extent(&extent, &Func(|p: &IndexN| p.get(0) * p.get(1)), &mut array);
//! assert_eq!(array.get(&IndexN::from([3, 4, 0])), 12);
//! ```

use crate::Array;

use gridstore_core::{ExtentN, IndexN};

//  ██████╗ ███████╗████████╗████████╗███████╗██████╗ ███████╗
// ██╔════╝ ██╔════╝╚══██╔══╝╚══██╔══╝██╔════╝██╔══██╗██╔════╝
// ██║  ███╗█████╗     ██║      ██║   █████╗  ██████╔╝███████╗
// ██║   ██║██╔══╝     ██║      ██║   ██╔══╝  ██╔══██╗╚════██║
// ╚██████╔╝███████╗   ██║      ██║   ███████╗██║  ██║███████║
//  ╚═════╝ ╚══════╝   ╚═╝      ╚═╝   ╚══════╝╚═╝  ╚═╝╚══════╝

pub trait Get<L> {
    type Data;

    /// Get an owned value at `location`.
    fn get(&self, location: L) -> Self::Data;
}

/// Reads into a caller-supplied record. This is the hot-path accessor: a loop can reuse one scratch record instead of
/// allocating a new one per point.
pub trait GetInto<L> {
    type Data;

    /// Decode the value at `location` into `out`.
    fn get_into(&self, location: L, out: &mut Self::Data);
}

pub trait Set<L> {
    type Data;

    /// Encode `value` at `location`.
    fn set(&mut self, location: L, value: &Self::Data);
}

// We need this macro because doing a blanket impl causes conflicts due to Rust's orphan rules.
macro_rules! impl_get_via_get_into {
    ($map:ty, $($type_params:tt)*) => {
        impl<$($type_params)*, L> $crate::Get<L> for $map
        where
            Self: $crate::GetInto<L>,
            <Self as $crate::GetInto<L>>::Data: Default,
        {
            type Data = <Self as $crate::GetInto<L>>::Data;

            #[inline]
            fn get(&self, location: L) -> <Self as $crate::GetInto<L>>::Data {
                let mut out = <<Self as $crate::GetInto<L>>::Data as Default>::default();
                self.get_into(location, &mut out);

                out
            }
        }
    };
}

// ███████╗ ██████╗ ██████╗     ███████╗ █████╗  ██████╗██╗  ██╗
// ██╔════╝██╔═══██╗██╔══██╗    ██╔════╝██╔══██╗██╔════╝██║  ██║
// █████╗  ██║   ██║██████╔╝    █████╗  ███████║██║     ███████║
// ██╔══╝  ██║   ██║██╔══██╗    ██╔══╝  ██╔══██║██║     ██╔══██║
// ██║     ╚██████╔╝██║  ██║    ███████╗██║  ██║╚██████╗██║  ██║
// ╚═╝      ╚═════╝ ╚═╝  ╚═╝    ╚══════╝╚═╝  ╚═╝ ╚═════╝╚═╝  ╚═╝

pub trait ForEach {
    type Item;

    /// Calls `f` on every point of `extent` that this source has data for, in grid order (axis 0 fastest).
    fn for_each(&self, extent: &ExtentN, f: impl FnMut(&IndexN, &Self::Item));
}

//  ██████╗ ██████╗ ██████╗ ██╗   ██╗
// ██╔════╝██╔═══██╗██╔══██╗╚██╗ ██╔╝
// ██║     ██║   ██║██████╔╝ ╚████╔╝
// ██║     ██║   ██║██╔═══╝   ╚██╔╝
// ╚██████╗╚██████╔╝██║        ██║
//  ╚═════╝ ╚═════╝ ╚═╝        ╚═╝

/// Copy all points in `extent` from the `src` map to the `dst` map. Points outside of `dst` are skipped.
pub fn copy_extent<Src, Dst, T>(extent: &ExtentN, src: &Src, dst: &mut Dst)
where
    Src: ForEach<Item = T>,
    Dst: Array + for<'r> Set<&'r IndexN, Data = T>,
{
    let clipped = extent.intersection(dst.extent());
    src.for_each(&clipped, |p, value| dst.set(p, value));
}
