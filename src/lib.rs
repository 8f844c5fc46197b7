//! Fixed-size record storage with N-dimensional addressing.
//!
//! This library is organized into several crates. The most fundamental are:
//! - **core**: coordinates (`IndexN`), boxes (`ExtentN`), grid iteration and the error type
//! - **storage**: record coders, bit-packed and byte-aligned storage in memory or memory-mapped files, dimensioned arrays,
//!   and out-of-bounds padding
//!
//! Then you get extra bits of functionality from the optional **algo** crate: the parallel chunked driver, convolution,
//! resampling and in-place sequence algorithms.
//!
//! To learn the basics, start with these doc pages:
//!
//! - [`ExtentN`](crate::core::ExtentN)
//! - [`ArrayN`](crate::storage::array)
//! - [access traits](crate::storage::access_traits)
//! - [`Padded`](crate::storage::padded)
//!
//! ```
//! use gridstore::prelude::*;
//!
//! // A 3-bit signed field stored in a temporary memory-mapped file.
//! let extent = ExtentN::from_shape(IndexN::from([16, 16]));
//! let mut field = ArrayN::new(extent.clone(), BitFileStorage::<IntN<3>>::temp(256).unwrap()).unwrap();
//! field.fill_with(|p| IntN::new(p[0] - p[1]));
//! assert_eq!(field.get(&IndexN::from([1, 5])).v(), -4);
//!
//! // Blur a float copy of it across 4 workers.
//! let src = ArrayN::fill_from(extent.clone(), |p| field.get(p).v() as f32).unwrap();
//! let filter = ArrayN::fill(ExtentN::from_shape(IndexN::from([3, 3])), 1.0 / 9.0).unwrap();
//! let mut blurred = ArrayN::fill(extent, 0.0).unwrap();
//! convolve(&src, &filter, &Clamp, &mut blurred, &ParallelConfig::default().with_max_pieces(4)).unwrap();
//! ```

pub use gridstore_core as core;
pub use gridstore_storage as storage;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::storage::prelude::*;

    #[cfg(feature = "algo")]
    pub use super::algo::prelude::*;
}

#[cfg(feature = "algo")]
pub use gridstore_algo as algo;
