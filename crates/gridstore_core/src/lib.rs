//! The core data types for addressing N-dimensional integer lattices:
//! - `IndexN`: an N-dimensional coordinate with `i64` components
//! - `ExtentN`: an N-dimensional box, the bounds of every query
//! - `GridIter`: a restartable cursor over the points of a box, axis 0 fastest
//!
//! Plus the checked arithmetic that guards every allocation (`num_elements`) and the boundary folding rules used to extend
//! data past the edges of an extent.

pub mod approx;
pub mod error;
pub mod extent;
pub mod grid_iter;
pub mod index;
pub mod int_math;

pub use approx::approx_equal_within;
pub use error::{Error, Result};
pub use extent::{bounding_extent, ExtentN};
pub use grid_iter::GridIter;
pub use index::IndexN;
pub use int_math::{clamp_to_edge, div_ceil, num_elements, reflect_mirror, wrap_cyclic};

pub use num;

pub mod prelude {
    pub use super::{num_elements, Error, ExtentN, GridIter, IndexN, Result};
}
