//! The parallel chunked driver that every N-dimensional kernel runs on.
//!
//! The output extent is split along its largest axis into contiguous slabs, one per worker. Each worker reads the shared
//! (immutable) source and computes the values of its slab into a private buffer. After all workers have joined, the calling
//! thread writes the buffers into the destination. Bit-packed records can share a byte across a slab boundary, so workers
//! never write to the destination themselves.
//!
//! ```
//! use gridstore_algo::{parallel_map, ParallelConfig, PointKernel};
//! use gridstore_core::prelude::*;
//! use gridstore_storage::prelude::*;
//!
//! struct Double;
//!
//! impl PointKernel<i32, Vec<i32>> for Double {
//!     type Output = i32;
//!     type Scratch = ();
//!
//!     fn new_scratch(&self, _dims: usize) {}
//!
//!     fn compute(&self, src: &ArrayN<i32>, p: &IndexN, _scratch: &mut (), out: &mut i32) {
//!         *out = 2 * src.get(p);
//!     }
//! }
//!
//! let extent = ExtentN::from_shape(IndexN::from([4, 3]));
//! let src = ArrayN::fill_from(extent.clone(), |p| (p[0] + p[1]) as i32).unwrap();
//! let mut dst = ArrayN::fill(extent, 0).unwrap();
//!
//! parallel_map(&src, &mut dst, &ParallelConfig::default().with_max_pieces(2), &Double).unwrap();
//! assert_eq!(dst.get(&IndexN::from([3, 2])), 10);
//! ```

use crate::{arrange, Arrangement, ParallelConfig};

use gridstore_core::prelude::*;
use gridstore_storage::{addressable_len, prelude::*, try_vec_with_capacity};

use rayon::prelude::*;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Computes one output record from the source. Implementations must only depend on the source and on their own
/// configuration, never on the destination.
pub trait PointKernel<A, SA>: Sync {
    type Output;
    /// Per-worker state reused across every point of a slab, like index buffers for scanning a filter window.
    type Scratch;

    fn new_scratch(&self, dims: usize) -> Self::Scratch;

    /// Writes the value for output point `p` into `out`.
    fn compute(&self, src: &ArrayN<A, SA>, p: &IndexN, scratch: &mut Self::Scratch, out: &mut Self::Output);
}

/// Fails with `Aliasing` if `dst` shares bytes with any of `inputs`.
pub fn ensure_disjoint<'a>(inputs: impl IntoIterator<Item = &'a StorageIdentity>, dst: &StorageIdentity) -> Result<()> {
    if inputs.into_iter().any(|i| i.aliases(dst)) {
        return Err(Error::Aliasing);
    }

    Ok(())
}

/// Fails with `InvalidConfig` unless every extent has the same dimensionality.
pub fn check_same_dims<'a>(extents: impl IntoIterator<Item = (&'static str, &'a ExtentN)>) -> Result<()> {
    let mut expected: Option<(&str, usize)> = None;
    for (name, extent) in extents {
        match expected {
            None => expected = Some((name, extent.dims())),
            Some((first, dims)) if dims != extent.dims() => {
                return Err(Error::invalid_config(format!(
                    "{} has {} dimensions but {} has {}",
                    first,
                    dims,
                    name,
                    extent.dims()
                )))
            }
            Some(_) => {}
        }
    }

    Ok(())
}

/// Fills every point of `dst`'s extent with the kernel's output.
///
/// Fails before doing any work if `src` and `dst` share storage or differ in dimensionality. If a worker panics, the whole
/// operation fails with `WorkerFailed` and `dst` is left untouched.
pub fn parallel_map<A, SA, U, SB, K>(
    src: &ArrayN<A, SA>,
    dst: &mut ArrayN<U, SB>,
    config: &ParallelConfig,
    kernel: &K,
) -> Result<()>
where
    A: Sync,
    SA: LinearStorage<A> + Sync,
    U: Default + Clone + Send,
    SB: LinearStorage<U>,
    K: PointKernel<A, SA, Output = U>,
{
    ensure_disjoint(Some(&src.identity()), &dst.identity())?;

    check_same_dims(vec![("source", src.extent()), ("destination", dst.extent())])?;

    let out_extent = dst.extent().clone();
    if out_extent.is_empty() {
        return Ok(());
    }

    let force_single = config.force_single_threaded || src.single_threaded_only() || dst.single_threaded_only();
    let (axis, slabs, workers) = match out_extent.largest_axis() {
        Some(axis) => {
            let axis_len = out_extent.shape.get(axis) as u64;
            let Arrangement { workers, per_worker } = arrange(config.max_pieces as u64, axis_len, force_single)?;

            (axis, out_extent.split_along(axis, per_worker as i64), workers)
        }
        // A 0-dimensional extent is a single point.
        None => (0, vec![out_extent.clone()], 1),
    };

    let span = tracing::debug_span!("parallel_map", axis, workers, slabs = slabs.len());
    let _enter = span.enter();

    let results: Vec<Result<Vec<U>>> = if workers <= 1 {
        slabs.iter().map(|slab| compute_slab(src, slab, kernel)).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers as usize)
            .thread_name(|i| format!("gridstore-worker-{}", i))
            .build()
            .map_err(|e| Error::WorkerFailed(format!("could not build worker pool: {}", e)))?;

        pool.install(|| slabs.par_iter().map(|slab| compute_slab(src, slab, kernel)).collect())
    };
    // Nothing is written unless every worker succeeded.
    let results = results.into_iter().collect::<Result<Vec<_>>>()?;

    let mut p = IndexN::zeros(out_extent.dims());
    for (slab, values) in slabs.iter().zip(results) {
        let mut iter = slab.iter_points();
        for value in values.iter() {
            iter.next_into(&mut p);
            dst.set(&p, value);
        }
    }

    Ok(())
}

fn compute_slab<A, SA, U, K>(src: &ArrayN<A, SA>, slab: &ExtentN, kernel: &K) -> Result<Vec<U>>
where
    SA: LinearStorage<A>,
    U: Default + Clone,
    K: PointKernel<A, SA, Output = U>,
{
    tracing::trace!(minimum = ?slab.minimum, shape = ?slab.shape, "computing slab");

    let mut values = try_vec_with_capacity(addressable_len(slab.num_points()?)?)?;

    catch_unwind(AssertUnwindSafe(|| {
        let mut scratch = kernel.new_scratch(slab.dims());
        let mut iter = slab.iter_points();
        let mut p = IndexN::zeros(slab.dims());
        let mut value = U::default();
        while iter.next_into(&mut p) {
            kernel.compute(src, &p, &mut scratch, &mut value);
            values.push(value.clone());
        }

        values
    }))
    .map_err(|payload| Error::WorkerFailed(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
