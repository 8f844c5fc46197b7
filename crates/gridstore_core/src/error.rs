use thiserror::Error;

/// Every failure this workspace reports. None of these are retried internally; they are surfaced to the caller as soon as
/// they are detected.
#[derive(Debug, Error)]
pub enum Error {
    /// Negative or overflowing dimensions/capacities, even-length filters, mismatched dimensionality, bad tolerances.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The source and destination of an algorithm that cannot run in place refer to the same storage.
    #[error("source and destination refer to the same storage")]
    Aliasing,

    /// Raw storage access outside of `[0, len)`.
    #[error("index {index} is out of range for storage of length {len}")]
    OutOfRange { index: u64, len: u64 },

    /// A parallel worker did not complete its slab.
    #[error("parallel worker failed: {0}")]
    WorkerFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig(message.into())
    }

    /// `true` for errors caused by how an operation was configured, as opposed to failures while it ran.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Error::InvalidConfig(_) | Error::Aliasing)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
