//! Data source access traits implemented for functions and closures.
//!
//! This is particularly useful for filling arrays and for writing synthetic kernels.
//!
//! ```
//! use gridstore_core::prelude::*;
//! use gridstore_storage::prelude::*;
//!
//! let sample_extent = ExtentN::from_min_and_max(IndexN::from([-15, -15]), IndexN::from([15, 15]));
//! let mut sampled_disk = ArrayN::fill(sample_extent.clone(), 0.0f32).unwrap();
//!
//! let distance = Func(|p: &IndexN| ((p[0] * p[0] + p[1] * p[1]) as f32).sqrt() - 10.0);
//! copy_extent(&sample_extent, &distance, &mut sampled_disk);
//! assert_eq!(sampled_disk.get(&IndexN::from([0, 0])), -10.0);
//! ```

use crate::{ForEach, Get};

use gridstore_core::prelude::*;

#[derive(Clone, Copy)]
pub struct Func<F>(pub F);

impl<'a, F, T> Get<&'a IndexN> for Func<F>
where
    F: Fn(&IndexN) -> T,
{
    type Data = T;

    #[inline]
    fn get(&self, p: &'a IndexN) -> T {
        (self.0)(p)
    }
}

impl<F, T> ForEach for Func<F>
where
    F: Fn(&IndexN) -> T,
{
    type Item = T;

    fn for_each(&self, extent: &ExtentN, mut f: impl FnMut(&IndexN, &Self::Item)) {
        let mut iter = extent.iter_points();
        let mut p = IndexN::zeros(extent.dims());
        while iter.next_into(&mut p) {
            let value = (self.0)(&p);
            f(&p, &value);
        }
    }
}
