#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Geocache Grid engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Geocache Grid.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Configures the session grid, resetting all per-session state.
    ConfigureGrid {
        /// Immutable grid parameters supplied at startup.
        config: GridConfig,
    },
    /// Moves the player to a new world position.
    MovePlayer {
        /// Position reported by the world-position source.
        position: WorldPoint,
    },
    /// Discards every materialized cache ahead of neighborhood repopulation.
    ClearCaches,
    /// Materializes a cache at the provided cell with a procedural seed count.
    SpawnCache {
        /// Cell determined to spawn a cache by the generation system.
        cell: CellIndex,
        /// Procedurally derived coin count used only when no memento exists.
        seeded_count: u32,
    },
    /// Requests that one coin move from a cache into the player inventory.
    Collect {
        /// Cell hosting the cache targeted by the interaction.
        cell: CellIndex,
    },
    /// Requests that a held coin move from the player inventory into a cache.
    Deposit {
        /// Cell hosting the cache targeted by the interaction.
        cell: CellIndex,
        /// Coin the player intends to return.
        coin: Coin,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Announces that the session grid was (re)configured.
    GridConfigured {
        /// Parameters now governing the session.
        config: GridConfig,
    },
    /// Confirms that the player moved and names the resolved center cell.
    PlayerMoved {
        /// World position the player now occupies.
        position: WorldPoint,
        /// Canonical cell containing the position.
        cell: CellIndex,
    },
    /// Reports that a materialized cache left the visible neighborhood.
    CacheRemoved {
        /// Cell whose cache visual must be discarded by adapters.
        cell: CellIndex,
    },
    /// Confirms that a cache was materialized within the neighborhood.
    CacheSpawned {
        /// Cell hosting the new cache.
        cell: CellIndex,
        /// Authoritative coin count after restore-or-seed resolution.
        count: u32,
        /// Indicates the count was restored from a memento rather than seeded.
        restored: bool,
    },
    /// Confirms that a coin moved from a cache into the player inventory.
    CoinCollected {
        /// Coin now held by the player.
        coin: Coin,
        /// Coins remaining in the cache after the transfer.
        remaining: u32,
    },
    /// Confirms that a coin moved from the player inventory into a cache.
    CoinDeposited {
        /// Coin returned to the cache pool.
        coin: Coin,
        /// Coins held by the cache after the transfer.
        count: u32,
    },
    /// Reports that a collect or deposit request was rejected as a no-op.
    TransferRejected {
        /// Cell named by the rejected request.
        cell: CellIndex,
        /// Specific reason the transfer failed.
        reason: TransferError,
    },
    /// Reports that a stored memento could not be decoded for a cell.
    CacheCorrupted {
        /// Cell whose memento is unusable; no cache is materialized there.
        cell: CellIndex,
    },
}

/// Location of a single grid cell expressed in tile-index space.
///
/// Indices are signed because the grid is conceptually unbounded in every
/// direction and world coordinates may be negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex {
    i: i64,
    j: i64,
}

impl CellIndex {
    /// Creates a new tile-index coordinate.
    #[must_use]
    pub const fn new(i: i64, j: i64) -> Self {
        Self { i, j }
    }

    /// Index along the latitude axis.
    #[must_use]
    pub const fn i(&self) -> i64 {
        self.i
    }

    /// Index along the longitude axis.
    #[must_use]
    pub const fn j(&self) -> i64 {
        self.j
    }

    /// Returns the cell displaced by the provided offsets.
    #[must_use]
    pub const fn offset(self, di: i64, dj: i64) -> Self {
        Self {
            i: self.i.saturating_add(di),
            j: self.j.saturating_add(dj),
        }
    }

    /// Computes the Chebyshev distance between two cells.
    ///
    /// Both axes are bounded independently, so two cells lie within radius
    /// `r` of each other exactly when this distance does not exceed `r`.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellIndex) -> u64 {
        let di = self.i.abs_diff(other.i);
        let dj = self.j.abs_diff(other.j);
        di.max(dj)
    }
}

/// Position expressed in continuous world coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    lat: f64,
    lng: f64,
}

impl WorldPoint {
    /// Creates a new world position.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude component of the position.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude component of the position.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }
}

/// Axis-aligned rectangle covering one cell in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBounds {
    min: WorldPoint,
    max: WorldPoint,
}

impl CellBounds {
    /// Constructs bounds from minimum and maximum corners.
    #[must_use]
    pub const fn new(min: WorldPoint, max: WorldPoint) -> Self {
        Self { min, max }
    }

    /// Minimum corner of the rectangle.
    #[must_use]
    pub const fn min(&self) -> WorldPoint {
        self.min
    }

    /// Maximum corner of the rectangle.
    #[must_use]
    pub const fn max(&self) -> WorldPoint {
        self.max
    }

    /// Extent of the rectangle along the latitude axis.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.lat() - self.min.lat()
    }

    /// Extent of the rectangle along the longitude axis.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.lng() - self.min.lng()
    }
}

/// Individually identified unit of resource tracked for inventory transfer.
///
/// Serial numbers are unique within the coin batch minted when a cache is
/// first seeded; a coin keeps its identity across every later transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coin {
    cell: CellIndex,
    serial: u32,
}

impl Coin {
    /// Creates a new coin minted by the cache at the provided cell.
    #[must_use]
    pub const fn new(cell: CellIndex, serial: u32) -> Self {
        Self { cell, serial }
    }

    /// Cell whose cache originally minted the coin.
    #[must_use]
    pub const fn cell(&self) -> CellIndex {
        self.cell
    }

    /// Serial number distinguishing the coin within its minting batch.
    #[must_use]
    pub const fn serial(&self) -> u32 {
        self.serial
    }
}

/// Immutable grid parameters supplied at startup and never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    tile_width: f64,
    visibility_radius: u32,
    spawn_probability: f64,
    max_initial_coins: u32,
}

impl GridConfig {
    /// Creates a new grid configuration.
    #[must_use]
    pub const fn new(
        tile_width: f64,
        visibility_radius: u32,
        spawn_probability: f64,
        max_initial_coins: u32,
    ) -> Self {
        Self {
            tile_width,
            visibility_radius,
            spawn_probability,
            max_initial_coins,
        }
    }

    /// Side length of a square cell expressed in world units.
    #[must_use]
    pub const fn tile_width(&self) -> f64 {
        self.tile_width
    }

    /// Radius of the visible neighborhood measured in cells.
    #[must_use]
    pub const fn visibility_radius(&self) -> u32 {
        self.visibility_radius
    }

    /// Threshold below which a cell's spawn hash materializes a cache.
    #[must_use]
    pub const fn spawn_probability(&self) -> f64 {
        self.spawn_probability
    }

    /// Upper bound used when scaling the procedural initial coin count.
    #[must_use]
    pub const fn max_initial_coins(&self) -> u32 {
        self.max_initial_coins
    }
}

/// Reasons a collect or deposit request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferError {
    /// No materialized cache exists at the named cell.
    CacheMissing,
    /// The cache holds no coins, so there is nothing to collect.
    CacheEmpty,
    /// The player inventory does not hold the offered coin.
    CoinNotHeld,
}
