/// Knobs for the parallel chunked driver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParallelConfig {
    /// Upper bound on the number of slabs (and therefore workers). Must be at least 1.
    pub max_pieces: usize,
    /// Run every slab on the calling thread.
    pub force_single_threaded: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_pieces: rayon::current_num_threads(),
            force_single_threaded: false,
        }
    }
}

impl ParallelConfig {
    /// A config that never spawns workers.
    pub fn serial() -> Self {
        Self {
            max_pieces: 1,
            force_single_threaded: true,
        }
    }

    pub fn with_max_pieces(mut self, max_pieces: usize) -> Self {
        self.max_pieces = max_pieces;

        self
    }

    pub fn single_threaded(mut self, force: bool) -> Self {
        self.force_single_threaded = force;

        self
    }
}
