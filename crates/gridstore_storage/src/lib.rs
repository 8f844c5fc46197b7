#![allow(clippy::type_complexity, clippy::len_without_is_empty)]

//! Fixed-size record storage and N-dimensional addressing.
//!
//! Every record type describes its size with a `Coder`, then encodes either whole bytes (`ByteCoder`) or an arbitrary-width
//! bit pattern (`BitCoder`). The storage types are:
//!   - `ArrayStorage`, `FileStorage`: byte-aligned records in memory or in a memory-mapped file
//!   - `BitArrayStorage`, `BitFileStorage`: records packed at the bit level, such as `IntN<3>`
//!   - `Vec<T>`: any `Clone` type, stored as-is
//!
//! All of them implement `LinearStorage`, a fixed-length sequence addressed by a `u64` index. An `ArrayN` adds an `ExtentN`
//! on top so records can be addressed by `IndexN`.
//!
//! Then there are "meta" data sources that provide some extra utility:
//!   - `Padded`: a wrapper of an array that answers reads outside of its extent using an out-of-bounds policy
//!   - `Func`: access traits are implemented for functions `Fn(&IndexN) -> T`

#[macro_use]
pub mod access_traits;
pub mod array;
pub mod backing;
pub mod bit_storage;
pub mod bits;
pub mod byte_storage;
pub mod coder;
pub mod file;
pub mod func;
pub mod linear;
pub mod oob;
pub mod padded;
pub mod rollover;

pub use access_traits::*;
pub use array::*;
pub use backing::*;
pub use bit_storage::*;
pub use bits::*;
pub use byte_storage::*;
pub use coder::*;
pub use file::*;
pub use func::*;
pub use linear::*;
pub use oob::*;
pub use padded::*;
pub use rollover::*;

pub mod prelude {
    pub use super::{
        copy_extent, Array, ArrayN, ArrayStorage, BitArrayStorage, BitCoder, BitFileStorage, ByteCoder, Clamp, Coder,
        Constant, Cyclic, FileStorage, FileStorageOptions, ForEach, Func, Get, GetInto, IntN, LinearStorage, Mirror,
        OobPolicy, OobResolution, OutOfBounds, Padded, Set, StorageIdentity, StorageUnit, Stride, UintN,
    };
}
