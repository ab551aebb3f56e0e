#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Geocache Grid experience.

use geocache_core::{GridConfig, WorldPoint};
use geocache_world::{query, World};

/// Produces data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Exposes the grid configuration required for rendering.
    #[must_use]
    pub fn grid_config(&self, world: &World) -> GridConfig {
        query::grid_config(world)
    }

    /// Exposes the player starting position for presentation purposes.
    #[must_use]
    pub fn player_position(&self, world: &World) -> WorldPoint {
        query::player_position(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocache_core::{Command, Event, WELCOME_BANNER};
    use geocache_world::{apply, DEFAULT_PLAYER_LOCATION};

    #[test]
    fn banner_matches_the_canonical_greeting() {
        let world = World::new();
        assert_eq!(Bootstrap.welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn startup_queries_reflect_the_configured_session() {
        let mut world = World::new();
        let config = GridConfig::new(2e-4, 4, 0.2, 10);
        let mut events = Vec::new();
        apply(&mut world, Command::ConfigureGrid { config }, &mut events);

        let bootstrap = Bootstrap;
        assert_eq!(bootstrap.grid_config(&world), config);
        assert_eq!(bootstrap.player_position(&world), DEFAULT_PLAYER_LOCATION);
        assert_eq!(events, vec![Event::GridConfigured { config }]);
    }
}
