//! Storage for records packed at the bit level, such as `IntN<3>`.

use crate::{
    check_file_len, packed_len, read_bits, write_bits, Backing, BitCoder, FileBuffer, FileStorageOptions, LinearStorage,
    StorageIdentity,
};

use gridstore_core::{Error, Result};

use core::marker::PhantomData;
use std::path::Path;

/// Records of type `T` packed back-to-back with no padding, `T::record_bits()` bits each.
pub struct BitStorage<T, B = Vec<u8>> {
    bytes: B,
    len: u64,
    marker: PhantomData<T>,
}

/// Bit-packed records in process memory.
pub type BitArrayStorage<T> = BitStorage<T, Vec<u8>>;
/// Bit-packed records in a memory-mapped file.
pub type BitFileStorage<T> = BitStorage<T, FileBuffer>;

fn checked_packed_len<T: BitCoder>(len: u64) -> Result<u64> {
    let width = T::record_bits();
    if !(1..=64).contains(&width) {
        return Err(Error::invalid_config(format!("bit records must be 1 to 64 bits wide, not {}", width)));
    }

    packed_len(len, width)
        .ok_or_else(|| Error::invalid_config(format!("{} records of {} bits overflow u64", len, width)))
}

impl<T, B> BitStorage<T, B>
where
    T: BitCoder,
    B: Backing,
{
    /// `len` records whose bit patterns are all zero.
    pub fn new(len: u64) -> Result<Self> {
        let bytes = B::zeroed(checked_packed_len::<T>(len)?)?;

        Ok(Self::from_backing_unchecked(bytes, len))
    }

    pub fn from_values<'a>(values: impl ExactSizeIterator<Item = &'a T>) -> Result<Self>
    where
        T: 'a,
    {
        let mut storage = Self::new(values.len() as u64)?;
        for (i, v) in values.enumerate() {
            storage.set(i as u64, v);
        }

        Ok(storage)
    }

    fn from_backing_unchecked(bytes: B, len: u64) -> Self {
        Self {
            bytes,
            len,
            marker: PhantomData,
        }
    }

    /// Interprets an existing buffer as `len` packed records. The buffer must be exactly as long as `len` records need.
    pub fn from_backing(bytes: B, len: u64) -> Result<Self> {
        let expected = checked_packed_len::<T>(len)?;
        if bytes.len() as u64 != expected {
            return Err(Error::invalid_config(format!(
                "{} packed records need {} bytes, buffer has {}",
                len,
                expected,
                bytes.len()
            )));
        }

        Ok(Self::from_backing_unchecked(bytes, len))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_backing(self) -> B {
        self.bytes
    }

    #[inline]
    fn bit_pos(index: u64) -> u64 {
        index * T::record_bits()
    }
}

impl<T> BitArrayStorage<T>
where
    T: BitCoder,
{
    pub fn from_bytes(bytes: Vec<u8>, len: u64) -> Result<Self> {
        Self::from_backing(bytes, len)
    }
}

impl<T> BitFileStorage<T>
where
    T: BitCoder,
{
    pub fn with_options(options: &FileStorageOptions, len: u64) -> Result<Self> {
        let bytes = FileBuffer::create(options, checked_packed_len::<T>(len)?)?;

        Ok(Self::from_backing_unchecked(bytes, len))
    }

    pub fn create(path: impl AsRef<Path>, len: u64) -> Result<Self> {
        Self::with_options(&FileStorageOptions::at_path(path.as_ref()), len)
    }

    pub fn temp(len: u64) -> Result<Self> {
        Self::with_options(&FileStorageOptions::default(), len)
    }

    /// Reopens a file written earlier by a `BitFileStorage<T>` of `len` records.
    pub fn open(path: impl AsRef<Path>, len: u64) -> Result<Self> {
        let bytes = FileBuffer::open(path, false)?;
        check_file_len(&bytes, checked_packed_len::<T>(len)?)?;

        Ok(Self::from_backing_unchecked(bytes, len))
    }

    pub fn flush(&self) -> Result<()> {
        self.bytes.flush()
    }

    pub fn path(&self) -> &Path {
        self.bytes.path()
    }
}

impl<T, B> LinearStorage<T> for BitStorage<T, B>
where
    T: BitCoder,
    B: Backing,
{
    #[inline]
    fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    fn get(&self, index: u64, out: &mut T) {
        assert!(index < self.len, "index {} out of range for length {}", index, self.len);
        out.decode_bits(read_bits(&self.bytes, Self::bit_pos(index), T::record_bits() as u32));
    }

    #[inline]
    fn set(&mut self, index: u64, value: &T) {
        assert!(index < self.len, "index {} out of range for length {}", index, self.len);
        write_bits(
            &mut self.bytes,
            Self::bit_pos(index),
            T::record_bits() as u32,
            value.encode_bits(),
        );
    }

    fn duplicate(&self) -> Result<Self> {
        Ok(Self::from_backing_unchecked(self.bytes.deep_copy()?, self.len))
    }

    fn identity(&self) -> StorageIdentity {
        self.bytes.identity()
    }

    fn single_threaded_only(&self) -> bool {
        self.bytes.single_threaded_only()
    }
}

impl<T, B> core::fmt::Debug for BitStorage<T, B>
where
    B: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BitStorage")
            .field("len", &self.len)
            .field("bytes", &self.bytes)
            .finish()
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
