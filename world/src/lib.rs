#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Geocache Grid.
//!
//! The world owns the canonical cell registry, the memento store that keeps
//! cache state alive across the visibility lifecycle, the currently
//! materialized caches, and the player inventory. All mutation flows through
//! [`apply`]; adapters and systems read back through [`query`].

use geocache_core::{
    CellIndex, Coin, Command, Event, GridConfig, TransferError, WorldPoint, WELCOME_BANNER,
};

mod board;
mod caches;
mod mementos;

use board::Board;
use caches::Geocache;
use mementos::MementoStore;

pub use mementos::MementoError;

/// Default side length of a square cell in world units.
pub const DEFAULT_TILE_WIDTH: f64 = 1e-4;
/// Default visible neighborhood radius measured in cells.
pub const DEFAULT_VISIBILITY_RADIUS: u32 = 8;
/// Default threshold below which a cell's spawn hash materializes a cache.
pub const DEFAULT_SPAWN_PROBABILITY: f64 = 0.1;
/// Default upper bound for procedurally seeded coin counts.
pub const DEFAULT_MAX_INITIAL_COINS: u32 = 100;
/// Default player location used when no position source has reported yet.
pub const DEFAULT_PLAYER_LOCATION: WorldPoint = WorldPoint::new(36.9995, -122.0533);

/// Represents the authoritative Geocache Grid session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GridConfig,
    board: Board,
    mementos: MementoStore,
    caches: Vec<Geocache>,
    inventory: Vec<Coin>,
    player: WorldPoint,
    player_cell: CellIndex,
}

impl World {
    /// Creates a new session using the default grid configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GridConfig::new(
            DEFAULT_TILE_WIDTH,
            DEFAULT_VISIBILITY_RADIUS,
            DEFAULT_SPAWN_PROBABILITY,
            DEFAULT_MAX_INITIAL_COINS,
        ))
    }

    fn with_config(config: GridConfig) -> Self {
        let mut board = Board::new(config.tile_width(), config.visibility_radius());
        let player = DEFAULT_PLAYER_LOCATION;
        let player_cell = board.cell_for_point(player);
        Self {
            banner: WELCOME_BANNER,
            config,
            board,
            mementos: MementoStore::new(),
            caches: Vec::new(),
            inventory: Vec::new(),
            player,
            player_cell,
        }
    }

    fn cache_index(&self, cell: CellIndex) -> Option<usize> {
        self.caches.iter().position(|cache| cache.cell() == cell)
    }

    fn remove_all_caches(&mut self, out_events: &mut Vec<Event>) {
        for cache in self.caches.drain(..) {
            out_events.push(Event::CacheRemoved { cell: cache.cell() });
        }
    }

    fn spawn_cache(&mut self, cell: CellIndex, seeded_count: u32, out_events: &mut Vec<Event>) {
        if self.cache_index(cell).is_some() {
            return;
        }

        let cell = self.board.canonical_cell(cell);
        let (count, restored) = match self.mementos.load(cell) {
            Ok(Some(count)) => (count, true),
            Ok(None) => {
                self.mementos.save(cell, seeded_count);
                (seeded_count, false)
            }
            Err(_) => {
                out_events.push(Event::CacheCorrupted { cell });
                return;
            }
        };

        let location = WorldPoint::new(
            cell.i() as f64 * self.board.tile_width(),
            cell.j() as f64 * self.board.tile_width(),
        );
        self.caches.push(Geocache::with_count(cell, location, count));
        out_events.push(Event::CacheSpawned {
            cell,
            count,
            restored,
        });
    }

    fn collect_from(&mut self, cell: CellIndex, out_events: &mut Vec<Event>) {
        let Some(index) = self.cache_index(cell) else {
            out_events.push(Event::TransferRejected {
                cell,
                reason: TransferError::CacheMissing,
            });
            return;
        };

        let cache = &mut self.caches[index];
        let Some(coin) = cache.collect() else {
            out_events.push(Event::TransferRejected {
                cell,
                reason: TransferError::CacheEmpty,
            });
            return;
        };

        let remaining = cache.count();
        self.inventory.push(coin);
        self.mementos.save(cell, remaining);
        out_events.push(Event::CoinCollected { coin, remaining });
    }

    fn deposit_into(&mut self, cell: CellIndex, coin: Coin, out_events: &mut Vec<Event>) {
        let Some(index) = self.cache_index(cell) else {
            out_events.push(Event::TransferRejected {
                cell,
                reason: TransferError::CacheMissing,
            });
            return;
        };

        let Some(held) = self.inventory.iter().position(|held| *held == coin) else {
            out_events.push(Event::TransferRejected {
                cell,
                reason: TransferError::CoinNotHeld,
            });
            return;
        };

        let coin = self.inventory.remove(held);
        let cache = &mut self.caches[index];
        cache.deposit(coin);
        let count = cache.count();
        self.mementos.save(cell, count);
        out_events.push(Event::CoinDeposited { coin, count });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { config } => {
            world.remove_all_caches(out_events);
            world.config = config;
            world.board = Board::new(config.tile_width(), config.visibility_radius());
            world.mementos = MementoStore::new();
            world.inventory.clear();
            world.player_cell = world.board.cell_for_point(world.player);
            out_events.push(Event::GridConfigured { config });
        }
        Command::MovePlayer { position } => {
            world.player = position;
            world.player_cell = world.board.cell_for_point(position);
            out_events.push(Event::PlayerMoved {
                position,
                cell: world.player_cell,
            });
        }
        Command::ClearCaches => {
            world.remove_all_caches(out_events);
        }
        Command::SpawnCache { cell, seeded_count } => {
            world.spawn_cache(cell, seeded_count, out_events);
        }
        Command::Collect { cell } => {
            world.collect_from(cell, out_events);
        }
        Command::Deposit { cell, coin } => {
            world.deposit_into(cell, coin, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use geocache_core::{CellBounds, CellIndex, Coin, GridConfig, WorldPoint};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Grid parameters currently governing the session.
    #[must_use]
    pub fn grid_config(world: &World) -> GridConfig {
        world.config
    }

    /// World position the player currently occupies.
    #[must_use]
    pub fn player_position(world: &World) -> WorldPoint {
        world.player
    }

    /// Canonical cell containing the player position.
    #[must_use]
    pub fn player_cell(world: &World) -> CellIndex {
        world.player_cell
    }

    /// Coins currently held by the player, in collection order.
    #[must_use]
    pub fn inventory(world: &World) -> &[Coin] {
        &world.inventory
    }

    /// Player point total, one point per held coin.
    #[must_use]
    pub fn points(world: &World) -> u32 {
        world.inventory.len() as u32
    }

    /// Computes the world-space rectangle covered by a cell.
    #[must_use]
    pub fn cell_bounds(world: &World, cell: CellIndex) -> CellBounds {
        world.board.bounds_of(cell)
    }

    /// Enumerates previously-registered cells within the visibility radius
    /// of the provided center, sorted for deterministic iteration.
    #[must_use]
    pub fn cells_within_radius(world: &World, center: CellIndex) -> Vec<CellIndex> {
        world.board.cells_within_radius(center)
    }

    /// Number of canonical cells registered so far in the session.
    #[must_use]
    pub fn known_cell_count(world: &World) -> usize {
        world.board.known_cell_count()
    }

    /// Number of cells with durable state recorded in the memento store.
    #[must_use]
    pub fn remembered_cell_count(world: &World) -> usize {
        world.mementos.len()
    }

    /// Captures a read-only view of the materialized caches.
    #[must_use]
    pub fn cache_view(world: &World) -> CacheView {
        let mut snapshots: Vec<CacheSnapshot> = world
            .caches
            .iter()
            .map(|cache| CacheSnapshot {
                cell: cache.cell(),
                location: cache.location(),
                count: cache.count(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.cell);
        CacheView { snapshots }
    }

    /// Read-only snapshot describing all materialized caches.
    #[derive(Clone, Debug)]
    pub struct CacheView {
        snapshots: Vec<CacheSnapshot>,
    }

    impl CacheView {
        /// Iterator over the captured cache snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &CacheSnapshot> {
            self.snapshots.iter()
        }

        /// Number of materialized caches.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether no caches are materialized.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Retrieves the snapshot for a specific cell, if materialized.
        #[must_use]
        pub fn get(&self, cell: CellIndex) -> Option<&CacheSnapshot> {
            self.snapshots
                .iter()
                .find(|snapshot| snapshot.cell == cell)
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<CacheSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single cache's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct CacheSnapshot {
        /// Cell hosting the cache.
        pub cell: CellIndex,
        /// World coordinate derived from the cell scaled by tile width.
        pub location: WorldPoint,
        /// Live coin count.
        pub count: u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocache_core::{Command, Event, GridConfig, TransferError};

    fn configured_world() -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureGrid {
                config: GridConfig::new(1e-4, 8, 0.1, 100),
            },
            &mut events,
        );
        world
    }

    fn spawn(world: &mut World, cell: CellIndex, seeded_count: u32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::SpawnCache { cell, seeded_count }, &mut events);
        events
    }

    #[test]
    fn move_player_resolves_the_canonical_center_cell() {
        let mut world = configured_world();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MovePlayer {
                position: WorldPoint::new(36.9995, -122.0533),
            },
            &mut events,
        );

        let expected = CellIndex::new(369_994, -1_220_533);
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            Event::PlayerMoved {
                position: WorldPoint::new(36.9995, -122.0533),
                cell: expected,
            }
        );
        assert_eq!(query::player_cell(&world), expected);
    }

    #[test]
    fn first_spawn_seeds_and_persists_the_procedural_count() {
        let mut world = configured_world();
        let cell = CellIndex::new(12, -4);

        let events = spawn(&mut world, cell, 42);

        assert_eq!(
            events,
            vec![Event::CacheSpawned {
                cell,
                count: 42,
                restored: false,
            }]
        );
        assert_eq!(query::remembered_cell_count(&world), 1);
    }

    #[test]
    fn respawn_restores_the_memento_over_the_procedural_seed() {
        let mut world = configured_world();
        let cell = CellIndex::new(3, 3);
        let _ = spawn(&mut world, cell, 5);

        let mut events = Vec::new();
        apply(&mut world, Command::ClearCaches, &mut events);
        assert_eq!(events, vec![Event::CacheRemoved { cell }]);

        // A different seed must lose to the stored count.
        let events = spawn(&mut world, cell, 99);
        assert_eq!(
            events,
            vec![Event::CacheSpawned {
                cell,
                count: 5,
                restored: true,
            }]
        );
    }

    #[test]
    fn mutated_count_survives_the_visibility_lifecycle() {
        let mut world = configured_world();
        let cell = CellIndex::new(7, 7);
        let _ = spawn(&mut world, cell, 3);

        let mut events = Vec::new();
        apply(&mut world, Command::Collect { cell }, &mut events);
        apply(&mut world, Command::ClearCaches, &mut events);

        let events = spawn(&mut world, cell, 3);
        assert_eq!(
            events,
            vec![Event::CacheSpawned {
                cell,
                count: 2,
                restored: true,
            }]
        );
    }

    #[test]
    fn zero_coin_cache_is_still_materialized() {
        let mut world = configured_world();
        let cell = CellIndex::new(-1, -1);

        let events = spawn(&mut world, cell, 0);

        assert_eq!(
            events,
            vec![Event::CacheSpawned {
                cell,
                count: 0,
                restored: false,
            }]
        );
        assert_eq!(query::cache_view(&world).len(), 1);
    }

    #[test]
    fn collect_from_empty_cache_is_a_rejected_no_op() {
        let mut world = configured_world();
        let cell = CellIndex::new(0, 0);
        let _ = spawn(&mut world, cell, 0);

        let mut events = Vec::new();
        apply(&mut world, Command::Collect { cell }, &mut events);

        assert_eq!(
            events,
            vec![Event::TransferRejected {
                cell,
                reason: TransferError::CacheEmpty,
            }]
        );
        assert_eq!(query::points(&world), 0);
    }

    #[test]
    fn collect_without_a_cache_reports_it_missing() {
        let mut world = configured_world();
        let cell = CellIndex::new(5, 5);

        let mut events = Vec::new();
        apply(&mut world, Command::Collect { cell }, &mut events);

        assert_eq!(
            events,
            vec![Event::TransferRejected {
                cell,
                reason: TransferError::CacheMissing,
            }]
        );
    }

    #[test]
    fn deposit_requires_a_held_coin() {
        let mut world = configured_world();
        let cell = CellIndex::new(2, 2);
        let _ = spawn(&mut world, cell, 1);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Deposit {
                cell,
                coin: Coin::new(cell, 0),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::TransferRejected {
                cell,
                reason: TransferError::CoinNotHeld,
            }]
        );
    }

    #[test]
    fn collect_then_deposit_round_trips_count_and_memento() {
        let mut world = configured_world();
        let cell = CellIndex::new(4, -4);
        let _ = spawn(&mut world, cell, 3);

        let mut events = Vec::new();
        apply(&mut world, Command::Collect { cell }, &mut events);
        apply(&mut world, Command::Collect { cell }, &mut events);

        let collected: Vec<Coin> = query::inventory(&world).to_vec();
        assert_eq!(collected.len(), 2);
        assert_eq!(query::points(&world), 2);

        for coin in collected.into_iter().rev() {
            apply(&mut world, Command::Deposit { cell, coin }, &mut events);
        }

        assert_eq!(query::points(&world), 0);
        let view = query::cache_view(&world);
        assert_eq!(view.get(cell).map(|snapshot| snapshot.count), Some(3));

        // The memento must read back the restored count as well.
        apply(&mut world, Command::ClearCaches, &mut events);
        let events = spawn(&mut world, cell, 77);
        assert_eq!(
            events,
            vec![Event::CacheSpawned {
                cell,
                count: 3,
                restored: true,
            }]
        );
    }

    #[test]
    fn corrupted_memento_is_fatal_for_the_cell() {
        let mut world = configured_world();
        let cell = CellIndex::new(8, 8);
        world.mementos.insert_raw(cell, vec![0xff]);

        let events = spawn(&mut world, cell, 10);

        assert_eq!(events, vec![Event::CacheCorrupted { cell }]);
        assert!(query::cache_view(&world).is_empty());
    }

    #[test]
    fn reconfiguring_the_grid_resets_the_session() {
        let mut world = configured_world();
        let cell = CellIndex::new(1, 1);
        let _ = spawn(&mut world, cell, 4);
        let mut events = Vec::new();
        apply(&mut world, Command::Collect { cell }, &mut events);

        events.clear();
        let config = GridConfig::new(2e-4, 4, 0.2, 10);
        apply(&mut world, Command::ConfigureGrid { config }, &mut events);

        assert_eq!(
            events,
            vec![
                Event::CacheRemoved { cell },
                Event::GridConfigured { config },
            ]
        );
        assert_eq!(query::points(&world), 0);
        assert_eq!(query::remembered_cell_count(&world), 0);
        assert_eq!(query::grid_config(&world), config);
    }
}
