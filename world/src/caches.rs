//! Transient cache entities materialized for the visible neighborhood.

use geocache_core::{CellIndex, Coin, WorldPoint};

/// Discoverable resource entity placed at a specific cell.
///
/// The entity itself is transient: it is created when its cell enters the
/// visible neighborhood and discarded when the cell leaves it. Durable state
/// lives in the memento store, which the world updates after every mutation.
#[derive(Debug)]
pub(crate) struct Geocache {
    cell: CellIndex,
    location: WorldPoint,
    coins: Vec<Coin>,
}

impl Geocache {
    /// Materializes a cache holding `count` coins with serials `0..count`.
    pub(crate) fn with_count(cell: CellIndex, location: WorldPoint, count: u32) -> Self {
        let coins = (0..count).map(|serial| Coin::new(cell, serial)).collect();
        Self {
            cell,
            location,
            coins,
        }
    }

    /// Cell that owns the cache.
    pub(crate) fn cell(&self) -> CellIndex {
        self.cell
    }

    /// World coordinate derived from the owning cell scaled by tile width.
    pub(crate) fn location(&self) -> WorldPoint {
        self.location
    }

    /// Number of coins currently pooled in the cache.
    pub(crate) fn count(&self) -> u32 {
        self.coins.len() as u32
    }

    /// Removes one coin from the pool, yielding it to the caller.
    pub(crate) fn collect(&mut self) -> Option<Coin> {
        self.coins.pop()
    }

    /// Returns a previously collected coin to the pool.
    pub(crate) fn deposit(&mut self, coin: Coin) {
        self.coins.push(coin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(count: u32) -> Geocache {
        Geocache::with_count(CellIndex::new(2, -3), WorldPoint::new(0.0002, -0.0003), count)
    }

    #[test]
    fn minted_coins_carry_unique_batch_serials() {
        let mut cache = cache(3);
        let mut serials = Vec::new();
        while let Some(coin) = cache.collect() {
            assert_eq!(coin.cell(), CellIndex::new(2, -3));
            serials.push(coin.serial());
        }

        serials.sort_unstable();
        assert_eq!(serials, vec![0, 1, 2]);
    }

    #[test]
    fn empty_cache_is_valid_and_rejects_collection() {
        let mut cache = cache(0);
        assert_eq!(cache.count(), 0);
        assert!(cache.collect().is_none());
    }

    #[test]
    fn deposited_coin_is_the_next_one_collected() {
        let mut cache = cache(2);
        let coin = cache.collect().expect("coin available");
        cache.deposit(coin);

        assert_eq!(cache.count(), 2);
        assert_eq!(cache.collect(), Some(coin));
    }
}
