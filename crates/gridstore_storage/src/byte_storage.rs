//! Storage for records that occupy whole bytes.

use crate::{
    check_file_len, read_record, write_record, Backing, ByteCoder, FileBuffer, FileStorageOptions, LinearStorage,
    StorageIdentity,
};

use gridstore_core::{Error, Result};

use core::marker::PhantomData;
use std::io::{Read, Write};
use std::path::Path;

/// Records of type `T` encoded back-to-back in a byte buffer `B`. Record `i` occupies bytes
/// `[i * T::record_bytes(), (i + 1) * T::record_bytes())`.
pub struct ByteStorage<T, B = Vec<u8>> {
    bytes: B,
    len: u64,
    marker: PhantomData<T>,
}

/// Byte records in process memory.
pub type ArrayStorage<T> = ByteStorage<T, Vec<u8>>;
/// Byte records in a memory-mapped file.
pub type FileStorage<T> = ByteStorage<T, FileBuffer>;

/// The byte size of `len` records of `record_bytes` each.
pub(crate) fn checked_byte_len(len: u64, record_bytes: usize) -> Result<u64> {
    len.checked_mul(record_bytes as u64)
        .ok_or_else(|| Error::invalid_config(format!("{} records of {} bytes overflow u64", len, record_bytes)))
}

impl<T, B> ByteStorage<T, B>
where
    T: ByteCoder + Default,
    B: Backing,
{
    /// `len` records equal to `T::default()`.
    pub fn new(len: u64) -> Result<Self> {
        let bytes = B::zeroed(checked_byte_len(len, T::record_bytes())?)?;
        let mut storage = Self::from_backing_unchecked(bytes, len);
        storage.fill_default();

        Ok(storage)
    }

    pub fn from_values<'a>(values: impl ExactSizeIterator<Item = &'a T>) -> Result<Self>
    where
        T: 'a,
    {
        let len = values.len() as u64;
        let bytes = B::zeroed(checked_byte_len(len, T::record_bytes())?)?;
        let mut storage = Self::from_backing_unchecked(bytes, len);
        for (i, v) in values.enumerate() {
            storage.set(i as u64, v);
        }

        Ok(storage)
    }

    fn fill_default(&mut self) {
        let n = T::record_bytes();
        let mut encoded = vec![0; n];
        T::default().encode(&mut encoded);
        // A zero-filled buffer already holds the default for most types.
        if encoded.iter().all(|&b| b == 0) {
            return;
        }
        for chunk in self.bytes.chunks_exact_mut(n) {
            chunk.copy_from_slice(&encoded);
        }
    }
}

impl<T, B> ByteStorage<T, B>
where
    T: ByteCoder,
    B: Backing,
{
    fn from_backing_unchecked(bytes: B, len: u64) -> Self {
        Self {
            bytes,
            len,
            marker: PhantomData,
        }
    }

    /// Interprets an existing buffer as records. Fails unless the buffer holds a whole number of records.
    pub fn from_backing(bytes: B) -> Result<Self> {
        let n = T::record_bytes();
        if n == 0 || bytes.len() % n != 0 {
            return Err(Error::invalid_config(format!(
                "{} bytes is not a whole number of {}-byte records",
                bytes.len(),
                n
            )));
        }
        let len = (bytes.len() / n) as u64;

        Ok(Self::from_backing_unchecked(bytes, len))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn backing(&self) -> &B {
        &self.bytes
    }

    pub fn into_backing(self) -> B {
        self.bytes
    }

    #[inline]
    fn record_range(index: u64) -> core::ops::Range<usize> {
        let n = T::record_bytes();
        let start = index as usize * n;

        start..start + n
    }

    /// Streams every record to `writer` in index order.
    pub fn write_to(&self, writer: &mut impl Write) -> Result<()>
    where
        T: Default,
    {
        let mut scratch = T::default();
        for i in 0..self.len {
            self.get(i, &mut scratch);
            write_record(&scratch, writer)?;
        }

        Ok(())
    }

    /// Overwrites every record with the next one read from `reader`.
    pub fn read_from(&mut self, reader: &mut impl Read) -> Result<()>
    where
        T: Default,
    {
        let mut scratch = T::default();
        for i in 0..self.len {
            read_record(reader, &mut scratch)?;
            self.set(i, &scratch);
        }

        Ok(())
    }
}

impl<T> ArrayStorage<T>
where
    T: ByteCoder,
{
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_backing(bytes)
    }
}

impl<T> FileStorage<T>
where
    T: ByteCoder + Default,
{
    /// `len` default records in a new file described by `options`.
    pub fn with_options(options: &FileStorageOptions, len: u64) -> Result<Self> {
        let bytes = FileBuffer::create(options, checked_byte_len(len, T::record_bytes())?)?;
        let mut storage = Self::from_backing_unchecked(bytes, len);
        storage.fill_default();

        Ok(storage)
    }

    /// `len` default records in a new file at `path`, truncating any existing file.
    pub fn create(path: impl AsRef<Path>, len: u64) -> Result<Self> {
        Self::with_options(&FileStorageOptions::at_path(path.as_ref()), len)
    }

    /// `len` default records in an anonymous file that is deleted on drop.
    pub fn temp(len: u64) -> Result<Self> {
        Self::with_options(&FileStorageOptions::default(), len)
    }
}

impl<T> FileStorage<T>
where
    T: ByteCoder,
{
    /// Reopens a file written earlier by a `FileStorage<T>` of `len` records.
    pub fn open(path: impl AsRef<Path>, len: u64) -> Result<Self> {
        let bytes = FileBuffer::open(path, false)?;
        check_file_len(&bytes, checked_byte_len(len, T::record_bytes())?)?;

        Ok(Self::from_backing_unchecked(bytes, len))
    }

    pub fn flush(&self) -> Result<()> {
        self.bytes.flush()
    }

    pub fn path(&self) -> &Path {
        self.bytes.path()
    }
}

impl<T, B> LinearStorage<T> for ByteStorage<T, B>
where
    T: ByteCoder,
    B: Backing,
{
    #[inline]
    fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    fn get(&self, index: u64, out: &mut T) {
        assert!(index < self.len, "index {} out of range for length {}", index, self.len);
        out.decode(&self.bytes[Self::record_range(index)]);
    }

    #[inline]
    fn set(&mut self, index: u64, value: &T) {
        assert!(index < self.len, "index {} out of range for length {}", index, self.len);
        value.encode(&mut self.bytes[Self::record_range(index)]);
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

impl<T, B> core::fmt::Debug for ByteStorage<T, B>
where
    B: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteStorage")
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
