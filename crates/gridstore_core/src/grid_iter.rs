//! Lazy, restartable enumeration of every point in a closed N-dimensional box.
//!
//! Points are produced with axis 0 varying fastest, which is the same order that dimensioned data sources use to linearize
//! coordinates. So when the box spans whole dimensions of a source, consecutive points map to consecutive linear indices.
//!
//! ```
//! use gridstore_core::{GridIter, IndexN};
//!
//! let mut iter = GridIter::new(IndexN::from([0, 0]), IndexN::from([1, 1]));
//! let first_pass: Vec<_> = iter.by_ref().collect();
//! assert_eq!(first_pass.len(), 4);
//!
//! // Re-scan the same box without reconstructing the iterator.
//! iter.reset();
//! let mut p = IndexN::zeros(2);
//! let mut count = 0;
//! while iter.next_into(&mut p) {
//!     count += 1;
//! }
//! assert_eq!(count, 4);
//! ```

use crate::{ExtentN, IndexN};

/// Visits every point in `[min, max]` (both inclusive). One iterator is one cursor: share it between callers and they will
/// steal points from each other.
#[derive(Clone, Debug)]
pub struct GridIter {
    min: IndexN,
    max: IndexN,
    cursor: IndexN,
    empty: bool,
    exhausted: bool,
}

impl GridIter {
    pub fn new(min: IndexN, max: IndexN) -> Self {
        assert_eq!(min.dims(), max.dims());

        let empty = !min.all_le(&max);

        Self::with_emptiness(min, max, empty)
    }

    /// Iterates over the points of `extent`.
    pub fn over(extent: &ExtentN) -> Self {
        // An empty extent at `i64::MIN` has no representable max below its minimum.
        Self::with_emptiness(extent.minimum.clone(), extent.max(), extent.is_empty())
    }

    fn with_emptiness(min: IndexN, max: IndexN, empty: bool) -> Self {
        Self {
            cursor: min.clone(),
            min,
            max,
            empty,
            exhausted: empty,
        }
    }

    #[inline]
    pub fn min(&self) -> &IndexN {
        &self.min
    }

    #[inline]
    pub fn max(&self) -> &IndexN {
        &self.max
    }

    /// Rewinds to the first point.
    #[inline]
    pub fn reset(&mut self) {
        self.cursor.copy_from(&self.min);
        self.exhausted = self.empty;
    }

    /// Writes the next point into `out` and returns `true`, or returns `false` when the box is exhausted. Unlike `next`, this
    /// never allocates.
    #[inline]
    pub fn next_into(&mut self, out: &mut IndexN) -> bool {
        if self.exhausted {
            return false;
        }

        out.copy_from(&self.cursor);
        self.advance();

        true
    }

    #[inline]
    fn advance(&mut self) {
        let n = self.cursor.dims();
        for axis in 0..n {
            if self.cursor[axis] < self.max[axis] {
                self.cursor[axis] += 1;
                return;
            }
            self.cursor[axis] = self.min[axis];
        }
        self.exhausted = true;
    }
}

impl Iterator for GridIter {
    type Item = IndexN;

    #[inline]
    fn next(&mut self) -> Option<IndexN> {
        if self.exhausted {
            return None;
        }

        let p = self.cursor.clone();
        self.advance();

        Some(p)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
