//! Deterministic coordinate-to-outcome hashing.
//!
//! Stands in for a pseudo-random source indexed by spatial coordinates: the
//! same key always yields the same value, across processes and sessions,
//! with no state or seed beyond the key itself. Whether a cell spawns a
//! cache and how many coins it starts with are therefore functions of
//! location rather than of visit order.

use geocache_core::CellIndex;
use sha2::{Digest, Sha256};

/// Maps an arbitrary string key to a reproducible value in `[0, 1)`.
///
/// Total over all strings; no error conditions. The top 53 bits of the
/// digest head are scaled by 2^-53 so the result is exactly representable
/// and strictly below one.
#[must_use]
pub fn fraction(key: &str) -> f64 {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    let value = u64::from_le_bytes(bytes);
    (value >> 11) as f64 / (1u64 << 53) as f64
}

/// Key deciding whether a cell spawns a cache.
#[must_use]
pub fn cell_key(cell: CellIndex) -> String {
    format!("{},{}", cell.i(), cell.j())
}

/// Key deciding a cell's initial coin count, discriminated from the spawn
/// key so the two outcomes are independent.
#[must_use]
pub fn initial_value_key(cell: CellIndex) -> String {
    format!("{},{},initialValue", cell.i(), cell.j())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_keys_yield_identical_fractions() {
        assert_eq!(fraction("3,-7"), fraction("3,-7"));
    }

    #[test]
    fn fractions_stay_within_the_half_open_unit_interval() {
        for key in ["", "0,0", "369995,-1220533", "1,2,initialValue"] {
            let value = fraction(key);
            assert!((0.0..1.0).contains(&value), "{key} mapped to {value}");
        }
    }

    #[test]
    fn discriminated_keys_differ_from_spawn_keys() {
        let cell = CellIndex::new(4, 2);
        assert_ne!(cell_key(cell), initial_value_key(cell));
    }
}
