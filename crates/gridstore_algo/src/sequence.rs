//! In-place algorithms over any `LinearStorage`.
//!
//! These work record by record through `get`/`set`, holding at most a few decoded records at once, so they run directly on
//! bit-packed and file-backed storage without materializing it.
//!
//! ```
//! use gridstore_algo::{is_sorted, shuffle, sort};
//! use gridstore_storage::prelude::*;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut storage = BitArrayStorage::from_values((0..40).map(UintN::<6>::new).collect::<Vec<_>>().iter()).unwrap();
//! shuffle(&mut storage, &mut StdRng::seed_from_u64(7));
//! sort(&mut storage);
//! assert!(is_sorted(&storage));
//! ```

use gridstore_storage::LinearStorage;

use core::cmp::Ordering;
use rand::Rng;

/// Sets every record to `value`.
pub fn fill<T, S>(storage: &mut S, value: &T)
where
    S: LinearStorage<T>,
{
    for i in 0..storage.len() {
        storage.set(i, value);
    }
}

/// Reverses the order of the records.
pub fn reverse<T, S>(storage: &mut S)
where
    T: Default,
    S: LinearStorage<T>,
{
    let len = storage.len();
    let (mut a, mut b) = (T::default(), T::default());
    for i in 0..len / 2 {
        swap_with(storage, i, len - 1 - i, &mut a, &mut b);
    }
}

/// Uniformly permutes the records (Fisher-Yates).
pub fn shuffle<T, S, R>(storage: &mut S, rng: &mut R)
where
    T: Default,
    S: LinearStorage<T>,
    R: Rng + ?Sized,
{
    let (mut a, mut b) = (T::default(), T::default());
    for i in (1..storage.len()).rev() {
        let j = rng.gen_range(0..=i);
        if i != j {
            swap_with(storage, i, j, &mut a, &mut b);
        }
    }
}

pub fn sort<T, S>(storage: &mut S)
where
    T: Default + Ord,
    S: LinearStorage<T>,
{
    sort_by(storage, T::cmp)
}

/// Heapsort: in place, `O(n log n)` comparisons, not stable.
pub fn sort_by<T, S, F>(storage: &mut S, mut cmp: F)
where
    T: Default,
    S: LinearStorage<T>,
    F: FnMut(&T, &T) -> Ordering,
{
    let len = storage.len();
    if len < 2 {
        return;
    }

    let mut heap = SiftScratch::new();
    for root in (0..len / 2).rev() {
        storage.get(root, &mut heap.item);
        heap.sift_down(storage, root, len, &mut cmp);
    }
    for end in (1..len).rev() {
        // Move the max to `end` and sift the displaced record down from the root.
        storage.get(end, &mut heap.item);
        storage.get(0, &mut heap.child);
        storage.set(end, &heap.child);
        heap.sift_down(storage, 0, end, &mut cmp);
    }
}

pub fn is_sorted<T, S>(storage: &S) -> bool
where
    T: Default + Ord,
    S: LinearStorage<T>,
{
    is_sorted_by(storage, T::cmp)
}

/// Returns `true` iff no record compares `Greater` than its successor.
pub fn is_sorted_by<T, S, F>(storage: &S, mut cmp: F) -> bool
where
    T: Default,
    S: LinearStorage<T>,
    F: FnMut(&T, &T) -> Ordering,
{
    let len = storage.len();
    if len < 2 {
        return true;
    }

    let (mut prev, mut next) = (T::default(), T::default());
    storage.get(0, &mut prev);
    for i in 1..len {
        storage.get(i, &mut next);
        if cmp(&prev, &next) == Ordering::Greater {
            return false;
        }
        core::mem::swap(&mut prev, &mut next);
    }

    true
}

#[inline]
fn swap_with<T, S>(storage: &mut S, i: u64, j: u64, a: &mut T, b: &mut T)
where
    S: LinearStorage<T>,
{
    storage.get(i, a);
    storage.get(j, b);
    storage.set(i, b);
    storage.set(j, a);
}

/// The records a sift holds while moving a "hole" down the heap.
struct SiftScratch<T> {
    item: T,
    child: T,
    sibling: T,
}

impl<T> SiftScratch<T>
where
    T: Default,
{
    fn new() -> Self {
        Self {
            item: T::default(),
            child: T::default(),
            sibling: T::default(),
        }
    }

    /// Places `self.item` into the max-heap `[0, end)`, starting at the hole `root`.
    fn sift_down<S, F>(&mut self, storage: &mut S, mut root: u64, end: u64, cmp: &mut F)
    where
        S: LinearStorage<T>,
        F: FnMut(&T, &T) -> Ordering,
    {
        loop {
            let mut child = match root.checked_mul(2).and_then(|c| c.checked_add(1)) {
                Some(c) if c < end => c,
                _ => break,
            };
            storage.get(child, &mut self.child);
            if child + 1 < end {
                storage.get(child + 1, &mut self.sibling);
                if cmp(&self.child, &self.sibling) == Ordering::Less {
                    child += 1;
                    core::mem::swap(&mut self.child, &mut self.sibling);
                }
            }
            if cmp(&self.item, &self.child) != Ordering::Less {
                break;
            }
            storage.set(root, &self.child);
            root = child;
        }
        storage.set(root, &self.item);
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

    use gridstore_storage::{ArrayStorage, BitArrayStorage, IntN};
    use pretty_assertions::assert_eq;
    use utilities::data_sets::seeded_rng;

    #[test]
    fn fill_and_reverse() {
        let mut v = vec![0u8; 5];
        fill(&mut v, &3);
        assert_eq!(v, vec![3; 5]);

        let mut v: Vec<i32> = (0..7).collect();
        reverse(&mut v);
        assert_eq!(v, vec![6, 5, 4, 3, 2, 1, 0]);

        let mut v: Vec<i32> = (0..6).collect();
        reverse(&mut v);
        assert_eq!(v, vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn shuffle_is_a_seeded_permutation() {
        let original: Vec<u32> = (0..500).collect();

        let mut a = original.clone();
        shuffle(&mut a, &mut seeded_rng());
        let mut b = original.clone();
        shuffle(&mut b, &mut seeded_rng());

        assert_eq!(a, b);
        assert_ne!(a, original);
        a.sort_unstable();
        assert_eq!(a, original);
    }

    #[test]
    fn sorts_small_and_degenerate_inputs() {
        for len in 0..40u32 {
            let mut v: Vec<u32> = (0..len).map(|i| (i * 7919) % 13).collect();
            let mut expected = v.clone();
            expected.sort_unstable();

            sort(&mut v);
            assert_eq!(v, expected, "len {}", len);
            assert!(is_sorted(&v));
        }
    }

    #[test]
    fn sort_recovers_a_shuffled_range() {
        let mut v = utilities::data_sets::shuffled_u32(10_000);
        assert!(!is_sorted(&v));

        sort(&mut v);
        assert_eq!(v, (0..10_000).collect::<Vec<u32>>());
    }

    #[test]
    fn sort_by_custom_order() {
        let mut v: Vec<i32> = vec![3, -8, 0, 12, -1, 5];
        sort_by(&mut v, |a, b| b.cmp(a));
        assert_eq!(v, vec![12, 5, 3, 0, -1, -8]);
        assert!(is_sorted_by(&v, |a, b| b.cmp(a)));
        assert!(!is_sorted(&v));
    }

    #[test]
    fn sorts_bit_packed_records() {
        let mut rng = seeded_rng();
        let values: Vec<IntN<5>> = (0..300).map(|_| IntN::new(rng.gen_range(-16..16))).collect();
        let mut storage = BitArrayStorage::from_values(values.iter()).unwrap();

        sort_by(&mut storage, |a, b| a.v().cmp(&b.v()));

        assert!(is_sorted_by(&storage, |a, b| a.v().cmp(&b.v())));
        let mut expected: Vec<i64> = values.iter().map(|v| v.v()).collect();
        expected.sort_unstable();
        let sorted: Vec<i64> = (0..300).map(|i| storage.value(i).v()).collect();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn sorts_floats_with_total_order() {
        let values = [2.5f64, -0.0, 1e9, -3.25, 0.0, 7.0];
        let mut storage = ArrayStorage::from_values(values.iter()).unwrap();
        sort_by(&mut storage, |a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let sorted: Vec<f64> = (0..6).map(|i| storage.value(i)).collect();
        assert_eq!(sorted[0], -3.25);
        assert_eq!(sorted[5], 1e9);
        assert!(is_sorted_by(&storage, |a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal)));
    }
}
