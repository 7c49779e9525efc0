//! Key hashing.
//!
//! The table only needs a deterministic `&str -> u64` mapping; it reduces
//! the result modulo its own capacity. `FoldHasher` is the default and is
//! stable across runs and platforms, so slot positions in a dump are
//! reproducible.

/// A pure string hash. Implementations must return the same value for the
/// same key for the whole lifetime of a table.
pub trait KeyHasher {
    fn hash(&self, key: &str) -> u64;
}

/// String folding: UTF-16 code units are summed in groups of four, unit
/// `k` of each group weighted by `256^k`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FoldHasher;

impl KeyHasher for FoldHasher {
    fn hash(&self, key: &str) -> u64 {
        let mut sum = 0u64;
        let mut mult = 1u64;
        for (i, unit) in key.encode_utf16().enumerate() {
            if i % 4 == 0 {
                mult = 1;
            }
            sum = sum.wrapping_add(u64::from(unit).wrapping_mul(mult));
            mult = mult.wrapping_mul(256);
        }
        sum
    }
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64,
{
    fn hash(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Home position of `key` in a table of `capacity` slots.
#[inline]
pub fn home_slot<H: KeyHasher + ?Sized>(hasher: &H, key: &str, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (hasher.hash(key) % capacity as u64) as usize
}
