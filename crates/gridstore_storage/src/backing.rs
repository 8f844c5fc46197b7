use gridstore_core::{Error, Result};

use core::ops::{Deref, DerefMut};
use std::convert::TryFrom;
use std::path::PathBuf;

/// Where the bytes of a storage live. Two storages alias iff writes through one can be observed through the other.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StorageIdentity {
    /// An address range in this process.
    Memory { address: usize, len: usize },
    /// A file, by canonical path.
    File(PathBuf),
}

impl StorageIdentity {
    #[inline]
    pub fn of_slice<T>(slice: &[T]) -> Self {
        StorageIdentity::Memory {
            address: slice.as_ptr() as usize,
            len: slice.len() * core::mem::size_of::<T>(),
        }
    }

    /// Returns `true` iff the two identities share any bytes.
    pub fn aliases(&self, other: &StorageIdentity) -> bool {
        match (self, other) {
            (
                StorageIdentity::Memory { address: a, len: a_len },
                StorageIdentity::Memory { address: b, len: b_len },
            ) => *a_len > 0 && *b_len > 0 && *a < b + b_len && *b < a + a_len,
            (StorageIdentity::File(a), StorageIdentity::File(b)) => a == b,
            _ => false,
        }
    }
}

/// A contiguous, fixed-length byte buffer that record storages are built on. Implemented for `Vec<u8>` (process memory) and
/// `FileBuffer` (a memory-mapped file).
pub trait Backing: Deref<Target = [u8]> + DerefMut + Sized {
    /// A buffer of `num_bytes` zeroes.
    fn zeroed(num_bytes: u64) -> Result<Self>;

    /// A deep copy with an independent lifetime. Mutating the copy never affects `self`.
    fn deep_copy(&self) -> Result<Self>;

    fn identity(&self) -> StorageIdentity;

    /// Parallel algorithms run on a single thread when any participating buffer says so.
    #[inline]
    fn single_threaded_only(&self) -> bool {
        false
    }
}

/// Converts a byte count into a `usize`, failing if this process could never address that many bytes.
///
/// No allocation may exceed `isize::MAX` bytes, so that is the limit even where `usize` is wider.
#[inline]
pub fn addressable_len(num_bytes: u64) -> Result<usize> {
    usize::try_from(num_bytes)
        .ok()
        .filter(|&len| isize::try_from(len).is_ok())
        .ok_or_else(|| Error::invalid_config(format!("{} bytes cannot be addressed on this platform", num_bytes)))
}

/// An empty `Vec` with room for exactly `len` values, or `InvalidConfig` if the allocator refuses.
pub fn try_vec_with_capacity<T>(len: usize) -> Result<Vec<T>> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|e| Error::invalid_config(format!("cannot allocate {} records: {}", len, e)))?;

    Ok(values)
}

impl Backing for Vec<u8> {
    fn zeroed(num_bytes: u64) -> Result<Self> {
        let len = addressable_len(num_bytes)?;
        let mut bytes = try_vec_with_capacity(len)?;
        bytes.resize(len, 0);

        Ok(bytes)
    }

    fn deep_copy(&self) -> Result<Self> {
        Ok(self.clone())
    }

    fn identity(&self) -> StorageIdentity {
        StorageIdentity::of_slice(self.as_slice())
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
