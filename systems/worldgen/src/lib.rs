#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic generation system that populates the visible neighborhood.
//!
//! The system consumes world events and responds exclusively with new
//! command batches: on every player move it clears the materialized caches
//! and re-enumerates the square neighborhood around the center cell,
//! emitting one spawn command per cell whose hash clears the spawn
//! threshold. Restore-versus-seed resolution belongs to the world; this
//! system only supplies the procedural seed.

use geocache_core::{CellIndex, Command, Event, GridConfig};

pub mod luck;

/// Configuration parameters required to construct the generation system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    visibility_radius: u32,
    spawn_probability: f64,
    max_initial_coins: u32,
}

impl Config {
    /// Creates a new configuration from explicit parameters.
    #[must_use]
    pub const fn new(visibility_radius: u32, spawn_probability: f64, max_initial_coins: u32) -> Self {
        Self {
            visibility_radius,
            spawn_probability,
            max_initial_coins,
        }
    }

    /// Derives the system configuration from the session grid parameters.
    #[must_use]
    pub const fn from_grid(config: GridConfig) -> Self {
        Self::new(
            config.visibility_radius(),
            config.spawn_probability(),
            config.max_initial_coins(),
        )
    }
}

/// Pure system that deterministically repopulates the neighborhood.
#[derive(Debug)]
pub struct WorldGen {
    visibility_radius: u32,
    spawn_probability: f64,
    max_initial_coins: u32,
}

impl WorldGen {
    /// Creates a new generation system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            visibility_radius: config.visibility_radius,
            spawn_probability: config.spawn_probability,
            max_initial_coins: config.max_initial_coins,
        }
    }

    /// Consumes events to emit neighborhood population commands.
    pub fn handle(&self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::PlayerMoved { cell, .. } = event {
                self.populate(*cell, out);
            }
        }
    }

    fn populate(&self, center: CellIndex, out: &mut Vec<Command>) {
        out.push(Command::ClearCaches);

        let radius = i64::from(self.visibility_radius);
        for di in -radius..radius {
            for dj in -radius..radius {
                let cell = center.offset(di, dj);
                if self.spawns(cell) {
                    out.push(Command::SpawnCache {
                        cell,
                        seeded_count: self.seeded_count(cell),
                    });
                }
            }
        }
    }

    /// Decides whether the provided cell spawns a cache.
    ///
    /// The comparison is strict, so a hash exactly at the threshold does
    /// not spawn.
    #[must_use]
    pub fn spawns(&self, cell: CellIndex) -> bool {
        luck::fraction(&luck::cell_key(cell)) < self.spawn_probability
    }

    /// Computes the procedural initial coin count for the provided cell.
    #[must_use]
    pub fn seeded_count(&self, cell: CellIndex) -> u32 {
        let scaled = luck::fraction(&luck::initial_value_key(cell))
            * f64::from(self.max_initial_coins);
        scaled.floor() as u32
    }
}
