//! How a record maps to and from primitive storage units.
//!
//! Every value type that can live in a `LinearStorage` describes its fixed size with `Coder`, then picks one of two
//! encodings:
//!   - `ByteCoder`: the record occupies a whole number of bytes and is written little-endian.
//!   - `BitCoder`: the record is an arbitrary-width bit pattern, packed back-to-back with its neighbors.
//!
//! The allocation contract is `Default`: storage materializes scratch records with `T::default()` and decodes into them.
//!
//! ```
//! use gridstore_storage::{ByteCoder, Coder, StorageUnit};
//!
//! let rgb = [0.5f32, 0.25, 1.0];
//! assert_eq!(<[f32; 3]>::UNIT, StorageUnit::Int);
//! assert_eq!(<[f32; 3]>::record_size_in_units(), 3);
//! assert_eq!(<[f32; 3]>::record_bytes(), 12);
//!
//! let mut buf = [0; 12];
//! rgb.encode(&mut buf);
//! let mut decoded = [0.0f32; 3];
//! decoded.decode(&buf);
//! assert_eq!(decoded, rgb);
//! ```

use gridstore_core::Result;

use std::io::{Read, Write};

/// The primitive unit a record's size is counted in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StorageUnit {
    Bit,
    Byte,
    Int,
    Long,
    Double,
}

impl StorageUnit {
    #[inline]
    pub const fn bits(self) -> u64 {
        match self {
            StorageUnit::Bit => 1,
            StorageUnit::Byte => 8,
            StorageUnit::Int => 32,
            StorageUnit::Long | StorageUnit::Double => 64,
        }
    }
}

/// The statically known size of one record.
pub trait Coder {
    const UNIT: StorageUnit;
    const SIZE_IN_UNITS: usize;

    /// The count of `UNIT`s one record occupies.
    #[inline]
    fn record_size_in_units() -> usize {
        Self::SIZE_IN_UNITS
    }

    #[inline]
    fn record_bits() -> u64 {
        Self::UNIT.bits() * Self::SIZE_IN_UNITS as u64
    }

    /// The number of whole bytes needed to hold one record on its own.
    #[inline]
    fn record_bytes() -> usize {
        ((Self::record_bits() + 7) / 8) as usize
    }
}

/// Records that occupy whole bytes. `dst` and `src` are always exactly `record_bytes()` long.
pub trait ByteCoder: Coder {
    fn encode(&self, dst: &mut [u8]);

    fn decode(&mut self, src: &[u8]);
}

/// Records packed at the bit level. The pattern occupies the low `record_bits()` bits; higher bits are ignored on decode and
/// must be zero on encode.
pub trait BitCoder: Coder {
    fn encode_bits(&self) -> u64;

    fn decode_bits(&mut self, bits: u64);
}

/// Streams one record into `writer`.
pub fn write_record<T, W>(value: &T, writer: &mut W) -> Result<()>
where
    T: ByteCoder,
    W: Write,
{
    let mut buf = vec![0; T::record_bytes()];
    value.encode(&mut buf);
    writer.write_all(&buf)?;

    Ok(())
}

/// Reads one record from `reader` into `out`.
pub fn read_record<T, R>(reader: &mut R, out: &mut T) -> Result<()>
where
    T: ByteCoder,
    R: Read,
{
    let mut buf = vec![0; T::record_bytes()];
    reader.read_exact(&mut buf)?;
    out.decode(&buf);

    Ok(())
}

macro_rules! impl_byte_coder_for_primitive {
    ($t:ty, $unit:expr, $units:expr) => {
        impl Coder for $t {
            const UNIT: StorageUnit = $unit;
            const SIZE_IN_UNITS: usize = $units;
        }

        impl ByteCoder for $t {
            #[inline]
            fn encode(&self, dst: &mut [u8]) {
                dst.copy_from_slice(&self.to_le_bytes());
            }

            #[inline]
            fn decode(&mut self, src: &[u8]) {
                let mut buf = [0; core::mem::size_of::<$t>()];
                buf.copy_from_slice(src);
                *self = <$t>::from_le_bytes(buf);
            }
        }
    };
}

impl_byte_coder_for_primitive!(u8, StorageUnit::Byte, 1);
impl_byte_coder_for_primitive!(i8, StorageUnit::Byte, 1);
impl_byte_coder_for_primitive!(u16, StorageUnit::Byte, 2);
impl_byte_coder_for_primitive!(i16, StorageUnit::Byte, 2);
impl_byte_coder_for_primitive!(u32, StorageUnit::Int, 1);
impl_byte_coder_for_primitive!(i32, StorageUnit::Int, 1);
impl_byte_coder_for_primitive!(f32, StorageUnit::Int, 1);
impl_byte_coder_for_primitive!(u64, StorageUnit::Long, 1);
impl_byte_coder_for_primitive!(i64, StorageUnit::Long, 1);
impl_byte_coder_for_primitive!(f64, StorageUnit::Double, 1);
impl_byte_coder_for_primitive!(u128, StorageUnit::Long, 2);
impl_byte_coder_for_primitive!(i128, StorageUnit::Long, 2);

impl Coder for bool {
    const UNIT: StorageUnit = StorageUnit::Byte;
    const SIZE_IN_UNITS: usize = 1;
}

impl ByteCoder for bool {
    #[inline]
    fn encode(&self, dst: &mut [u8]) {
        dst[0] = *self as u8;
    }

    #[inline]
    fn decode(&mut self, src: &[u8]) {
        *self = src[0] != 0;
    }
}

impl<T, const K: usize> Coder for [T; K]
where
    T: Coder,
{
    const UNIT: StorageUnit = T::UNIT;
    const SIZE_IN_UNITS: usize = T::SIZE_IN_UNITS * K;
}

impl<T, const K: usize> ByteCoder for [T; K]
where
    T: ByteCoder,
{
    #[inline]
    fn encode(&self, dst: &mut [u8]) {
        let n = T::record_bytes();
        for (v, chunk) in self.iter().zip(dst.chunks_exact_mut(n)) {
            v.encode(chunk);
        }
    }

    #[inline]
    fn decode(&mut self, src: &[u8]) {
        let n = T::record_bytes();
        for (v, chunk) in self.iter_mut().zip(src.chunks_exact(n)) {
            v.decode(chunk);
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
