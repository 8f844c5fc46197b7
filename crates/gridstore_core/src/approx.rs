use crate::{Error, Result};

use num::Float;

/// Returns `true` iff `a` and `b` differ by at most `tolerance`. Used to compare sampled values near extent boundaries, where
/// resampling accumulates rounding error.
pub fn approx_equal_within<T: Float>(a: T, b: T, tolerance: T) -> Result<bool> {
    if !(tolerance > T::zero()) {
        return Err(Error::invalid_config("tolerance must be positive"));
    }

    Ok((a - b).abs() <= tolerance)
}
