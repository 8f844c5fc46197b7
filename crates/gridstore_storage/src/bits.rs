//! Bit-level packing of fixed-width records into a byte buffer.
//!
//! Record `i` of an `M`-bit type occupies bits `[i * M, i * M + M)`, where bit `k` of the buffer is bit `k & 7` of byte
//! `k >> 3`. Reads and writes touch only the bytes spanned by the record (at most 2 for `M <= 8`, at most 9 for `M <= 64`)
//! and never disturb the bits of neighboring records.

#[inline]
fn low_mask(width: u32) -> u128 {
    (1u128 << width) - 1
}

#[inline]
fn byte_span(bit_pos: u64, width: u32) -> (usize, u32, usize) {
    let byte_index = (bit_pos >> 3) as usize;
    let bit_offset = (bit_pos & 7) as u32;
    let num_bytes = ((bit_offset + width + 7) / 8) as usize;

    (byte_index, bit_offset, num_bytes)
}

/// Reads the `width`-bit pattern starting at `bit_pos`.
#[inline]
pub fn read_bits(bytes: &[u8], bit_pos: u64, width: u32) -> u64 {
    debug_assert!((1..=64).contains(&width));

    let (byte_index, bit_offset, num_bytes) = byte_span(bit_pos, width);

    let mut acc = 0u128;
    for (i, &b) in bytes[byte_index..byte_index + num_bytes].iter().enumerate() {
        acc |= (b as u128) << (8 * i);
    }

    ((acc >> bit_offset) & low_mask(width)) as u64
}

/// Writes the low `width` bits of `value` starting at `bit_pos`.
#[inline]
pub fn write_bits(bytes: &mut [u8], bit_pos: u64, width: u32, value: u64) {
    debug_assert!((1..=64).contains(&width));

    let (byte_index, bit_offset, num_bytes) = byte_span(bit_pos, width);
    let span = &mut bytes[byte_index..byte_index + num_bytes];

    let mut acc = 0u128;
    for (i, &b) in span.iter().enumerate() {
        acc |= (b as u128) << (8 * i);
    }

    let mask = low_mask(width) << bit_offset;
    acc = (acc & !mask) | (((value as u128) << bit_offset) & mask);

    for (i, b) in span.iter_mut().enumerate() {
        *b = (acc >> (8 * i)) as u8;
    }
}

/// The number of bytes needed to pack `count` records of `width` bits, or `None` on overflow.
#[inline]
pub fn packed_len(count: u64, width: u64) -> Option<u64> {
    let bits = count.checked_mul(width)?;

    Some(bits / 8 + u64::from(bits % 8 != 0))
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
