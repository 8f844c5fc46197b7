#![allow(clippy::type_complexity, clippy::too_many_arguments)]

//! Algorithms on top of gridstore storage.
//!
//! - `parallel_map`: the chunked driver. Splits the output extent along its largest axis into slabs (sized by `arrange`)
//!   and computes each slab on its own worker.
//! - `convolve`, `correlate`: N-dimensional filtering with odd-length, centered filters
//! - `resample_nearest`, `resample_linear`: rescaling an array onto a differently sized extent
//! - `fill`, `reverse`, `shuffle`, `sort_by`, `is_sorted_by`: in-place sequence algorithms over any `LinearStorage`

pub mod arrange;
pub mod config;
pub mod convolution;
pub mod driver;
pub mod resample;
pub mod sequence;

pub use arrange::{arrange, Arrangement};
pub use config::ParallelConfig;
pub use convolution::{convolve, correlate};
pub use driver::{check_same_dims, ensure_disjoint, parallel_map, PointKernel};
pub use resample::{resample_linear, resample_nearest};
pub use sequence::{fill, is_sorted, is_sorted_by, reverse, shuffle, sort, sort_by};

pub mod prelude {
    pub use super::{
        convolve, correlate, parallel_map, resample_linear, resample_nearest, ParallelConfig, PointKernel,
    };
}
