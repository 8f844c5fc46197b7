use gridstore_core::prelude::*;
use gridstore_storage::ArrayN;

use rand::prelude::*;

// TODO: it would be nice if all crates could share this module, but it causes this issue:
// https://github.com/rust-lang/cargo/issues/6765

/// The same seed everywhere, so failures reproduce.
pub const SEED: u64 = 0x5EED_0F_6121D;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(SEED)
}

/// `0..n` in a random (but deterministic) order.
pub fn shuffled_u32(n: u32) -> Vec<u32> {
    let mut values: Vec<u32> = (0..n).collect();
    values.shuffle(&mut seeded_rng());

    values
}

/// A cube with edge length `array_edge_length` centered on the origin, holding `inner_value` inside a sphere and
/// `outer_value` outside of it. Returns the sphere radius too.
pub fn sphere_array<T>(array_edge_length: i64, inner_value: T, outer_value: T) -> (ArrayN<T>, i64)
where
    T: Clone,
{
    let array_radius = array_edge_length / 2;
    let sphere_radius = array_radius - 1;
    let extent = ExtentN::from_min_and_shape(IndexN::filled(3, -array_radius), IndexN::filled(3, array_edge_length));

    let array = ArrayN::fill_from(extent, |p| {
        let norm_sq: i64 = p.as_slice().iter().map(|c| c * c).sum();
        if norm_sq < sphere_radius * sphere_radius {
            inner_value.clone()
        } else {
            outer_value.clone()
        }
    })
    .unwrap();

    (array, sphere_radius)
}

/// Uniform noise in `[-1, 1)` over `extent`.
pub fn noise_array(extent: ExtentN) -> ArrayN<f64> {
    let mut rng = seeded_rng();

    ArrayN::fill_from(extent, |_| rng.gen_range(-1.0..1.0)).unwrap()
}
