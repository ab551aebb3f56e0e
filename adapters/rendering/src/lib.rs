#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Geocache Grid adapters.
//!
//! The core never draws anything itself: adapters own the visual lifecycle
//! of every cache. This crate defines the declarative scene the core hands
//! to adapters and the neighborhood-change contract through which cache
//! visuals are created and destroyed.

use anyhow::Result as AnyResult;
use geocache_core::{CellBounds, CellIndex};
use glam::DVec2;
use std::{error::Error, fmt};

/// Tooltip attached to the player marker.
pub const PLAYER_TOOLTIP: &str = "That's you!";

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Stroke color used for cache rectangles.
pub const CACHE_STROKE_COLOR: Color = Color::from_rgb_u8(0x2a, 0x6f, 0xc8);
/// Color used for the player marker.
pub const PLAYER_MARKER_COLOR: Color = Color::from_rgb_u8(0xc8, 0x2a, 0x36);

/// Marker representing the player on the map surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerMarker {
    /// Position of the marker in world coordinates.
    pub position: DVec2,
    /// Color used when drawing the marker.
    pub color: Color,
}

impl PlayerMarker {
    /// Creates a marker at the provided world position.
    #[must_use]
    pub const fn at(position: DVec2) -> Self {
        Self {
            position,
            color: PLAYER_MARKER_COLOR,
        }
    }
}

/// Declarative rectangle visual for one materialized cache.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CacheVisual {
    /// Cell whose cache the visual represents.
    pub cell: CellIndex,
    /// Minimum corner of the rectangle in world coordinates.
    pub min: DVec2,
    /// Maximum corner of the rectangle in world coordinates.
    pub max: DVec2,
    /// Live coin count displayed alongside the rectangle.
    pub count: u32,
    /// Stroke color of the rectangle.
    pub color: Color,
}

impl CacheVisual {
    /// Creates a visual from a cell's world bounds and live count.
    ///
    /// Returns an error when the bounds are degenerate along either axis.
    pub fn new(cell: CellIndex, bounds: CellBounds, count: u32) -> Result<Self, RenderingError> {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Err(RenderingError::DegenerateBounds { cell });
        }

        Ok(Self {
            cell,
            min: DVec2::new(bounds.min().lat(), bounds.min().lng()),
            max: DVec2::new(bounds.max().lat(), bounds.max().lng()),
            count,
            color: CACHE_STROKE_COLOR,
        })
    }
}

/// Neighborhood delta handed to adapters after repopulation.
///
/// Adapters must destroy the visuals for `removed` cells and create visuals
/// (with bound interaction handlers) for `added` caches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighborhoodDiff {
    /// Cells whose cache visuals must be removed.
    pub removed: Vec<CellIndex>,
    /// Caches that entered visibility and need visuals.
    pub added: Vec<CacheVisual>,
}

/// Declarative scene presented by adapters each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    player: PlayerMarker,
    caches: Vec<CacheVisual>,
    status_line: String,
}

impl Scene {
    /// Creates an empty scene centered on the player marker.
    #[must_use]
    pub fn new(player: PlayerMarker) -> Self {
        Self {
            player,
            caches: Vec::new(),
            status_line: status_line(0),
        }
    }

    /// Marker representing the player.
    #[must_use]
    pub const fn player(&self) -> PlayerMarker {
        self.player
    }

    /// Cache visuals currently part of the scene.
    #[must_use]
    pub fn caches(&self) -> &[CacheVisual] {
        &self.caches
    }

    /// Status panel text reflecting the player point total.
    #[must_use]
    pub fn status_line(&self) -> &str {
        &self.status_line
    }

    /// Moves the player marker to a new world position.
    pub fn move_player(&mut self, position: DVec2) {
        self.player.position = position;
    }

    /// Applies a neighborhood delta, removing stale visuals and adding new
    /// ones.
    pub fn apply_neighborhood(&mut self, diff: NeighborhoodDiff) {
        self.caches
            .retain(|visual| !diff.removed.contains(&visual.cell));
        self.caches.extend(diff.added);
    }

    /// Updates the displayed count for one cache after a transfer.
    pub fn update_cache_count(&mut self, cell: CellIndex, count: u32) {
        for visual in &mut self.caches {
            if visual.cell == cell {
                visual.count = count;
            }
        }
    }

    /// Refreshes the status panel from the player point total.
    pub fn set_points(&mut self, points: u32) {
        self.status_line = status_line(points);
    }
}

/// Formats the status panel text for a point total.
#[must_use]
pub fn status_line(points: u32) -> String {
    if points == 0 {
        "No points yet...".to_owned()
    } else {
        format!("{points} points accumulated")
    }
}

/// Presentation backend implemented by concrete adapters.
pub trait Backend {
    /// Presents the scene to the player.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Cache bounds collapsed to zero area, so no rectangle can be drawn.
    DegenerateBounds {
        /// Cell whose bounds failed validation.
        cell: CellIndex,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateBounds { cell } => {
                write!(
                    f,
                    "cache bounds for cell ({}, {}) are degenerate",
                    cell.i(),
                    cell.j()
                )
            }
        }
    }
}

impl Error for RenderingError {}
