//! Prime capacities for the probing table.
//!
//! Quadratic probing over a prime-length array visits at least
//! `(p + 1) / 2` distinct slots, which is what lets the table promise a
//! free slot whenever fewer than half of its slots are active.

/// Trial division over `6k ± 1` candidates.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut d = 5usize;
    while d.saturating_mul(d) <= n {
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}

/// Smallest prime `>= max(n, 2)`.
pub fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}
