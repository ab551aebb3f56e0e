//! Canonical cell registry over the sparse, unbounded grid.

use std::collections::HashMap;

use geocache_core::{CellBounds, CellIndex, WorldPoint};

/// Flyweight registry that assigns stable identity to grid cells.
///
/// Cells are recorded under their `(i, j)` key the first time any consumer
/// touches them and are never evicted afterwards, so every lookup for the
/// same coordinates observes the same canonical record. The registry grows
/// monotonically for the life of the session.
#[derive(Debug)]
pub(crate) struct Board {
    tile_width: f64,
    visibility_radius: u32,
    known_cells: HashMap<(i64, i64), CellIndex>,
}

impl Board {
    /// Creates an empty registry governed by the provided grid parameters.
    pub(crate) fn new(tile_width: f64, visibility_radius: u32) -> Self {
        debug_assert!(tile_width > 0.0, "tile width must be positive");
        Self {
            tile_width,
            visibility_radius,
            known_cells: HashMap::new(),
        }
    }

    /// Side length of a square cell expressed in world units.
    pub(crate) fn tile_width(&self) -> f64 {
        self.tile_width
    }

    /// Resolves the canonical cell for the provided index, registering it on
    /// first contact.
    pub(crate) fn canonical_cell(&mut self, cell: CellIndex) -> CellIndex {
        *self.known_cells.entry((cell.i(), cell.j())).or_insert(cell)
    }

    /// Resolves the canonical cell containing the provided world position.
    ///
    /// Both components are floor-divided by the tile width, so every point
    /// inside one tile maps to the same identity.
    pub(crate) fn cell_for_point(&mut self, point: WorldPoint) -> CellIndex {
        let i = (point.lat() / self.tile_width).floor() as i64;
        let j = (point.lng() / self.tile_width).floor() as i64;
        self.canonical_cell(CellIndex::new(i, j))
    }

    /// Computes the world-space rectangle covered by a cell.
    ///
    /// Pure function of the tile width and the cell indices; the cell does
    /// not need to be registered.
    pub(crate) fn bounds_of(&self, cell: CellIndex) -> CellBounds {
        let min = WorldPoint::new(
            cell.i() as f64 * self.tile_width,
            cell.j() as f64 * self.tile_width,
        );
        let max = WorldPoint::new(
            (cell.i() + 1) as f64 * self.tile_width,
            (cell.j() + 1) as f64 * self.tile_width,
        );
        CellBounds::new(min, max)
    }

    /// Reports whether two cells lie within the visibility radius of each
    /// other along both axes independently.
    pub(crate) fn is_within_radius(&self, cell: CellIndex, other: CellIndex) -> bool {
        cell.chebyshev_distance(other) <= u64::from(self.visibility_radius)
    }

    /// Enumerates every previously-registered cell within the visibility
    /// radius of the center, sorted for deterministic iteration.
    ///
    /// Unseen cells are never synthesized here; enumerating candidates is
    /// the generation system's job.
    pub(crate) fn cells_within_radius(&self, center: CellIndex) -> Vec<CellIndex> {
        let mut cells: Vec<CellIndex> = self
            .known_cells
            .values()
            .copied()
            .filter(|cell| self.is_within_radius(center, *cell))
            .collect();
        cells.sort_unstable();
        cells
    }

    /// Number of canonical cells registered so far.
    pub(crate) fn known_cell_count(&self) -> usize {
        self.known_cells.len()
    }
}
