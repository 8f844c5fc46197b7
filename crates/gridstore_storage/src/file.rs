//! A byte buffer backed by a memory-mapped file.
//!
//! Records are laid out as a flat, header-less sequence of fixed-size encodings at byte offset `index * record_bytes`. There
//! is no metadata; whoever reopens a file must know the record type and count.
//!
//! All I/O goes through the mapping, so there is no shared file cursor: concurrent readers at different offsets never
//! interfere, and the OS page cache does the buffering instead of one syscall per record.

use crate::{addressable_len, Backing, StorageIdentity};

use gridstore_core::{Error, Result};

use core::ops::{Deref, DerefMut};
use memmap2::{MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// How to create a file-backed buffer.
#[derive(Clone, Debug, Default)]
pub struct FileStorageOptions {
    /// The backing file. `None` means a temporary file that is deleted when the buffer is dropped.
    pub path: Option<PathBuf>,
    /// Ask parallel algorithms to stay on one thread when touching this buffer.
    pub single_threaded_only: bool,
}

impl FileStorageOptions {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn single_threaded_only(mut self, yes: bool) -> Self {
        self.single_threaded_only = yes;
        self
    }
}

/// A fixed-length, memory-mapped file.
pub struct FileBuffer {
    // Field order matters: the mapping must be dropped before the file, and the file before its temp path deletes it.
    map: Option<MmapMut>,
    file: File,
    path: PathBuf,
    _temp_path: Option<TempPath>,
    single_threaded_only: bool,
}

impl FileBuffer {
    /// Creates (or truncates) a file of `num_bytes` zeroes.
    pub fn create(options: &FileStorageOptions, num_bytes: u64) -> Result<Self> {
        let (file, path, temp_path) = match &options.path {
            Some(path) => {
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)?;
                (file, path.clone(), None)
            }
            None => {
                let (file, temp_path) = tempfile::NamedTempFile::new()?.into_parts();
                let path = temp_path.to_path_buf();
                (file, path, Some(temp_path))
            }
        };
        file.set_len(num_bytes)?;

        tracing::debug!(path = %path.display(), num_bytes, "created file buffer");

        Self::map(file, path, temp_path, num_bytes, options.single_threaded_only)
    }

    /// Maps an existing file without changing its contents.
    pub fn open(path: impl AsRef<Path>, single_threaded_only: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        let num_bytes = file.metadata()?.len();

        tracing::debug!(path = %path.display(), num_bytes, "opened file buffer");

        Self::map(file, path, None, num_bytes, single_threaded_only)
    }

    fn map(
        file: File,
        path: PathBuf,
        temp_path: Option<TempPath>,
        num_bytes: u64,
        single_threaded_only: bool,
    ) -> Result<Self> {
        let len = addressable_len(num_bytes)?;
        // Zero-length mappings are rejected by the OS.
        let map = if len == 0 {
            None
        } else {
            // SAFETY: the file was opened read-write by us and sized to `len`. Other processes truncating the file while it
            // is mapped is outside of what this crate can defend against.
            Some(unsafe { MmapOptions::new().len(len).map_mut(&file)? })
        };
        let path = std::fs::canonicalize(&path)?;

        Ok(Self {
            map,
            file,
            path,
            _temp_path: temp_path,
            single_threaded_only,
        })
    }

    /// The canonical path of the backing file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes dirty pages back to the file.
    pub fn flush(&self) -> Result<()> {
        if let Some(map) = &self.map {
            map.flush()?;
        }

        Ok(())
    }

    /// Copies the whole buffer into a new file at `path`, returning a buffer over the copy.
    pub fn copy_to(&self, options: &FileStorageOptions) -> Result<Self> {
        let mut copy = Self::create(options, self.len() as u64)?;
        copy.copy_from_slice(self);

        tracing::debug!(from = %self.path.display(), to = %copy.path.display(), "copied file buffer");

        Ok(copy)
    }

    /// The length of the backing file as the OS reports it.
    pub fn file_len(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }
}

impl Deref for FileBuffer {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        match &self.map {
            Some(map) => map,
            None => &[],
        }
    }
}

impl DerefMut for FileBuffer {
    #[inline]
    fn deref_mut(&mut self) -> &mut [u8] {
        match &mut self.map {
            Some(map) => map,
            None => &mut [],
        }
    }
}

impl Backing for FileBuffer {
    fn zeroed(num_bytes: u64) -> Result<Self> {
        Self::create(&FileStorageOptions::default(), num_bytes)
    }

    fn deep_copy(&self) -> Result<Self> {
        self.copy_to(&FileStorageOptions::default().single_threaded_only(self.single_threaded_only))
    }

    fn identity(&self) -> StorageIdentity {
        StorageIdentity::File(self.path.clone())
    }

    fn single_threaded_only(&self) -> bool {
        self.single_threaded_only
    }
}

impl core::fmt::Debug for FileBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FileBuffer")
            .field("path", &self.path)
            .field("len", &self.len())
            .finish()
    }
}

/// Fails unless the file at `path` holds exactly `expected_bytes`.
pub(crate) fn check_file_len(buffer: &FileBuffer, expected_bytes: u64) -> Result<()> {
    let actual = buffer.len() as u64;
    if actual != expected_bytes {
        return Err(Error::invalid_config(format!(
            "{} holds {} bytes, expected {}",
            buffer.path().display(),
            actual,
            expected_bytes
        )));
    }

    Ok(())
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
