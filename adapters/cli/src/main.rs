#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Geocache Grid experience.
//!
//! Acts as the world-position source and the presentation surface at once:
//! it replays a deterministic simulated walk, pumps the generation system
//! after every move, and renders each stop as a text frame.

mod session_config;

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use geocache_core::{Command, Event, WorldPoint};
use geocache_rendering::{
    Backend, CacheVisual, NeighborhoodDiff, PlayerMarker, Scene, PLAYER_TOOLTIP,
};
use geocache_system_bootstrap::Bootstrap;
use geocache_system_worldgen::{Config, WorldGen};
use geocache_world::{self as world, query, World};
use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Simulated field session for the Geocache Grid experience.
#[derive(Debug, Parser)]
#[command(
    name = "geocache",
    about = "Explore a deterministic geocache grid from the terminal"
)]
struct Args {
    /// Starting latitude of the player.
    #[arg(long, default_value_t = 36.9995)]
    lat: f64,
    /// Starting longitude of the player.
    #[arg(long, default_value_t = -122.0533)]
    lng: f64,
    /// Number of simulated one-cell movement steps after the first stop.
    #[arg(long, default_value_t = 0)]
    steps: u32,
    /// Seed driving the simulated movement source.
    #[arg(long, default_value_t = 0x6a0c_ac4e)]
    seed: u64,
    /// Collect one coin from the richest visible cache at every stop.
    #[arg(long)]
    collect: bool,
    /// Optional TOML manifest overriding the default grid parameters.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Entry point for the Geocache Grid command-line interface.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = session_config::load(args.config.as_deref())?;

    let mut world = World::new();
    let bootstrap = Bootstrap::default();
    println!("{}", bootstrap.welcome_banner(&world));

    let mut events = Vec::new();
    world::apply(&mut world, Command::ConfigureGrid { config }, &mut events);
    let generation = WorldGen::new(Config::from_grid(bootstrap.grid_config(&world)));

    let start = WorldPoint::new(args.lat, args.lng);
    let mut scene = Scene::new(PlayerMarker::at(DVec2::new(start.lat(), start.lng())));
    let mut backend = TextBackend;

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut position = start;

    for stop in 0..=args.steps {
        visit(&mut world, &generation, position, &mut scene)?;
        if args.collect {
            collect_richest(&mut world, &mut scene);
        }
        println!("stop {stop}");
        backend.present(&scene)?;
        position = wander(&mut rng, position, config.tile_width());
    }

    Ok(())
}

/// Moves the player, pumps the generation system, and projects the
/// resulting events into the scene.
fn visit(
    world: &mut World,
    generation: &WorldGen,
    position: WorldPoint,
    scene: &mut Scene,
) -> anyhow::Result<()> {
    let mut events = Vec::new();
    world::apply(world, Command::MovePlayer { position }, &mut events);

    let mut commands = Vec::new();
    generation.handle(&events, &mut commands);
    for command in commands {
        world::apply(world, command, &mut events);
    }

    project(world, &events, scene)
}

fn project(world: &World, events: &[Event], scene: &mut Scene) -> anyhow::Result<()> {
    let mut diff = NeighborhoodDiff::default();

    for event in events {
        match event {
            Event::PlayerMoved { position, .. } => {
                scene.move_player(DVec2::new(position.lat(), position.lng()));
            }
            Event::CacheRemoved { cell } => diff.removed.push(*cell),
            Event::CacheSpawned { cell, count, .. } => {
                let bounds = query::cell_bounds(world, *cell);
                diff.added.push(CacheVisual::new(*cell, bounds, *count)?);
            }
            Event::CacheCorrupted { cell } => {
                bail!("memento for cell ({}, {}) is corrupted", cell.i(), cell.j());
            }
            _ => {}
        }
    }

    scene.apply_neighborhood(diff);
    Ok(())
}

/// Collects one coin from the fullest visible cache, mirroring the change
/// into the scene.
fn collect_richest(world: &mut World, scene: &mut Scene) {
    let target = query::cache_view(world)
        .into_vec()
        .into_iter()
        .filter(|snapshot| snapshot.count > 0)
        .max_by_key(|snapshot| (snapshot.count, snapshot.cell));

    let Some(snapshot) = target else {
        return;
    };

    let mut events = Vec::new();
    world::apply(world, Command::Collect { cell: snapshot.cell }, &mut events);

    for event in events {
        if let Event::CoinCollected { coin, remaining } = event {
            scene.update_cache_count(coin.cell(), remaining);
        }
    }
    scene.set_points(query::points(world));
}

/// Advances the simulated position by one cell in a seeded random direction.
fn wander(rng: &mut ChaCha8Rng, position: WorldPoint, tile_width: f64) -> WorldPoint {
    loop {
        let di: i64 = rng.gen_range(-1..=1);
        let dj: i64 = rng.gen_range(-1..=1);
        if di == 0 && dj == 0 {
            continue;
        }

        return WorldPoint::new(
            position.lat() + di as f64 * tile_width,
            position.lng() + dj as f64 * tile_width,
        );
    }
}

/// Minimal text presenter for declarative scenes.
#[derive(Debug, Default)]
struct TextBackend;

impl Backend for TextBackend {
    fn present(&mut self, scene: &Scene) -> anyhow::Result<()> {
        let player = scene.player().position;
        println!("  player at ({:.4}, {:.4}) - {PLAYER_TOOLTIP}", player.x, player.y);
        println!("  {}", scene.status_line());
        for visual in scene.caches() {
            println!(
                "    cache ({}, {}) holds {} coins",
                visual.cell.i(),
                visual.cell.j(),
                visual.count
            );
        }
        Ok(())
    }
}
