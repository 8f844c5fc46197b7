use crate::StorageIdentity;

use gridstore_core::{Error, Result};

use std::convert::TryFrom;

/// A fixed-length sequence of records addressed by a 64-bit index.
///
/// The length never changes after construction. `get` and `set` panic when `index >= len()`, the same as slice indexing;
/// use `try_get` and `try_set` for checked access.
pub trait LinearStorage<T>: Sized {
    fn len(&self) -> u64;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes record `index` into `out`.
    fn get(&self, index: u64, out: &mut T);

    /// Encodes `value` as record `index`.
    fn set(&mut self, index: u64, value: &T);

    /// A deep copy whose mutations are independent of `self`.
    fn duplicate(&self) -> Result<Self>;

    /// Where the records live, for detecting aliasing between a source and destination.
    fn identity(&self) -> StorageIdentity;

    #[inline]
    fn single_threaded_only(&self) -> bool {
        false
    }

    #[inline]
    fn try_get(&self, index: u64, out: &mut T) -> Result<()> {
        check_index(index, self.len())?;
        self.get(index, out);

        Ok(())
    }

    #[inline]
    fn try_set(&mut self, index: u64, value: &T) -> Result<()> {
        check_index(index, self.len())?;
        self.set(index, value);

        Ok(())
    }

    /// Returns record `index` as a new value.
    #[inline]
    fn value(&self, index: u64) -> T
    where
        T: Default,
    {
        let mut out = T::default();
        self.get(index, &mut out);

        out
    }

    /// Exchanges records `i` and `j`.
    #[inline]
    fn swap(&mut self, i: u64, j: u64)
    where
        T: Default,
    {
        if i == j {
            return;
        }
        let a = self.value(i);
        let b = self.value(j);
        self.set(i, &b);
        self.set(j, &a);
    }
}

#[inline]
pub(crate) fn check_index(index: u64, len: u64) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::OutOfRange { index, len })
    }
}

#[inline]
fn slice_index(index: u64) -> usize {
    // Any index that doesn't fit a usize is past the end of a slice anyway.
    usize::try_from(index).unwrap_or(usize::MAX)
}

impl<T> LinearStorage<T> for Vec<T>
where
    T: Clone,
{
    #[inline]
    fn len(&self) -> u64 {
        self.as_slice().len() as u64
    }

    #[inline]
    fn get(&self, index: u64, out: &mut T) {
        out.clone_from(&self[slice_index(index)]);
    }

    #[inline]
    fn set(&mut self, index: u64, value: &T) {
        self[slice_index(index)].clone_from(value);
    }

    fn duplicate(&self) -> Result<Self> {
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

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vec_storage_basics() {
        let mut v = vec![1u32, 2, 3];
        assert_eq!(LinearStorage::len(&v), 3);

        LinearStorage::swap(&mut v, 0, 2);
        assert_eq!(v, vec![3, 2, 1]);

        LinearStorage::set(&mut v, 1, &7);
        assert_eq!(v.value(1), 7);
    }

    #[test]
    fn checked_access_reports_range() {
        let mut v = vec![0i64; 2];
        let mut out = 0;

        match v.try_get(2, &mut out) {
            Err(Error::OutOfRange { index, len }) => assert_eq!((index, len), (2, 2)),
            other => panic!("unexpected {:?}", other),
        }
        assert!(v.try_set(u64::MAX, &1).is_err());
        assert!(v.try_set(1, &5).is_ok());
        assert_eq!(v, vec![0, 5]);
    }

    #[test]
    fn duplicate_is_independent() {
        let v = vec![1u8, 2];
        let mut d = LinearStorage::duplicate(&v).unwrap();
        LinearStorage::set(&mut d, 0, &9);

        assert_eq!(v, vec![1, 2]);
        assert!(!LinearStorage::identity(&v).aliases(&LinearStorage::identity(&d)));
    }
}
