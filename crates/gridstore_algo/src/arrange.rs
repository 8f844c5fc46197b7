use gridstore_core::{div_ceil, Error, Result};

/// How `total` elements are dealt out to workers.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Arrangement {
    pub workers: u64,
    /// Every worker gets this many elements, except the last, which gets the remainder.
    pub per_worker: u64,
}

/// Splits `total` elements into at most `budget` nearly equal, contiguous pieces.
///
/// The result always satisfies `workers * per_worker >= total`, `workers <= budget` and `workers <= total`, and no worker is
/// left empty. `force_single` puts everything on one worker regardless of `budget`.
///
/// ```
/// use gridstore_algo::{arrange, Arrangement};
///
/// assert_eq!(arrange(2, 51, false).unwrap(), Arrangement { workers: 2, per_worker: 26 });
/// assert_eq!(arrange(400, 51, false).unwrap(), Arrangement { workers: 51, per_worker: 1 });
/// assert_eq!(arrange(400, 51, true).unwrap(), Arrangement { workers: 1, per_worker: 51 });
/// ```
pub fn arrange(budget: u64, total: u64, force_single: bool) -> Result<Arrangement> {
    if budget == 0 {
        return Err(Error::invalid_config("a parallelism budget of 0 workers can't do any work"));
    }
    if total == 0 {
        return Ok(Arrangement {
            workers: 0,
            per_worker: 0,
        });
    }
    if force_single {
        return Ok(Arrangement {
            workers: 1,
            per_worker: total,
        });
    }

    let workers = budget.min(total);
    let per_worker = div_ceil(total, workers);
    // Rounding up can leave the last workers with nothing; drop them.
    let workers = div_ceil(total, per_worker);

    Ok(Arrangement { workers, per_worker })
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
