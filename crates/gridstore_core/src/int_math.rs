use crate::{Error, Result};

/// The number of points in a box with the given side lengths. Fails if any length is negative or if the product does not
/// fit in a `u64`. Every allocation in this workspace goes through this check.
pub fn num_elements(dims: &[i64]) -> Result<u64> {
    let mut count: u64 = 1;
    for (axis, &d) in dims.iter().enumerate() {
        if d < 0 {
            return Err(Error::invalid_config(format!(
                "dimension {} has negative size {}",
                axis, d
            )));
        }
        count = count.checked_mul(d as u64).ok_or_else(|| {
            Error::invalid_config(format!("element count of {:?} overflows 64 bits", dims))
        })?;
    }

    Ok(count)
}

/// Wraps `c` into `[0, size)` as if the axis were a ring.
#[inline]
pub fn wrap_cyclic(c: i64, size: i64) -> i64 {
    debug_assert!(size > 0);
    c.rem_euclid(size)
}

/// Folds `c` into `[0, size)` by reflecting at both boundaries. The pattern repeats with period `2 * size`, and the boundary
/// value is repeated (`-1` maps to `0`).
#[inline]
pub fn reflect_mirror(c: i64, size: i64) -> i64 {
    debug_assert!(size > 0);
    // i128 so that a period of 2 * size cannot overflow.
    let period = 2 * size as i128;
    let m = (c as i128).rem_euclid(period);

    if m >= size as i128 {
        (period - 1 - m) as i64
    } else {
        m as i64
    }
}

/// Clamps `c` into `[0, size)`.
#[inline]
pub fn clamp_to_edge(c: i64, size: i64) -> i64 {
    debug_assert!(size > 0);
    c.max(0).min(size - 1)
}

/// Division rounding toward positive infinity, without overflowing for large numerators.
#[inline]
pub fn div_ceil(numerator: u64, denominator: u64) -> u64 {
    numerator / denominator + u64::from(numerator % denominator != 0)
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
