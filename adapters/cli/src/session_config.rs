//! Session configuration loading for the command-line adapter.

use std::{fs, path::Path};

use anyhow::{ensure, Context};
use geocache_core::GridConfig;
use geocache_world::{
    DEFAULT_MAX_INITIAL_COINS, DEFAULT_SPAWN_PROBABILITY, DEFAULT_TILE_WIDTH,
    DEFAULT_VISIBILITY_RADIUS,
};
use serde::Deserialize;

/// Optional overrides read from a TOML session manifest.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionManifest {
    tile_width: Option<f64>,
    visibility_radius: Option<u32>,
    spawn_probability: Option<f64>,
    max_initial_coins: Option<u32>,
}

/// Resolves the grid configuration, applying manifest overrides on top of
/// the session defaults.
pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<GridConfig> {
    let manifest = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read session config {}", path.display()))?;
            parse(&contents)?
        }
        None => SessionManifest::default(),
    };

    let config = GridConfig::new(
        manifest.tile_width.unwrap_or(DEFAULT_TILE_WIDTH),
        manifest
            .visibility_radius
            .unwrap_or(DEFAULT_VISIBILITY_RADIUS),
        manifest
            .spawn_probability
            .unwrap_or(DEFAULT_SPAWN_PROBABILITY),
        manifest
            .max_initial_coins
            .unwrap_or(DEFAULT_MAX_INITIAL_COINS),
    );

    ensure!(
        config.tile_width() > 0.0,
        "tile_width must be positive (received {})",
        config.tile_width()
    );
    ensure!(
        (0.0..=1.0).contains(&config.spawn_probability()),
        "spawn_probability must lie in [0, 1] (received {})",
        config.spawn_probability()
    );

    Ok(config)
}

fn parse(contents: &str) -> anyhow::Result<SessionManifest> {
    toml::from_str(contents).context("failed to parse session config toml contents")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_manifest() {
        let config = load(None).expect("defaults are valid");
        assert_eq!(config.tile_width(), DEFAULT_TILE_WIDTH);
        assert_eq!(config.visibility_radius(), DEFAULT_VISIBILITY_RADIUS);
    }

    #[test]
    fn manifest_overrides_only_the_named_fields() {
        let manifest = parse("visibility_radius = 4\nspawn_probability = 0.25\n")
            .expect("manifest parses");
        assert_eq!(manifest.visibility_radius, Some(4));
        assert_eq!(manifest.spawn_probability, Some(0.25));
        assert_eq!(manifest.tile_width, None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse("tile_widht = 0.1\n").is_err());
    }
}
