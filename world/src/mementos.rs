//! Memento storage that outlives transient cache entities.

use std::collections::HashMap;

use geocache_core::CellIndex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a stored memento cannot be used.
#[derive(Debug, Error)]
pub enum MementoError {
    /// The stored bytes no longer decode into a coin count.
    ///
    /// This is a data-integrity failure for the affected cell: the caller
    /// must not regenerate the cell procedurally, since doing so would
    /// silently overwrite whatever progress the memento recorded.
    #[error("memento for cell ({i}, {j}) is malformed: {source}")]
    Malformed {
        /// Latitude-axis index of the affected cell.
        i: i64,
        /// Longitude-axis index of the affected cell.
        j: i64,
        /// Underlying decode failure.
        source: bincode::Error,
    },
}

/// Serialized snapshot of a cache's mutable state.
#[derive(Debug, Serialize, Deserialize)]
struct CacheMemento {
    count: u32,
}

/// Mapping from cell identity to the opaque serialized state of its cache.
///
/// Entries are written on first creation and on every mutation, and persist
/// for the remainder of the process lifetime. Last write wins; there is no
/// versioning, TTL, or eviction.
#[derive(Debug, Default)]
pub(crate) struct MementoStore {
    entries: HashMap<CellIndex, Vec<u8>>,
}

impl MementoStore {
    /// Creates an empty store.
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Inserts or overwrites the memento for a cell.
    pub(crate) fn save(&mut self, cell: CellIndex, count: u32) {
        let bytes = bincode::serialize(&CacheMemento { count })
            .expect("fixed-size memento encoding cannot fail");
        let _ = self.entries.insert(cell, bytes);
    }

    /// Returns the stored count for a cell, distinguishing "never visited"
    /// (`Ok(None)`) from a stored zero and from undecodable bytes.
    pub(crate) fn load(&self, cell: CellIndex) -> Result<Option<u32>, MementoError> {
        let Some(bytes) = self.entries.get(&cell) else {
            return Ok(None);
        };

        let memento: CacheMemento =
            bincode::deserialize(bytes).map_err(|source| MementoError::Malformed {
                i: cell.i(),
                j: cell.j(),
                source,
            })?;
        Ok(Some(memento.count))
    }

    /// Number of cells with recorded state.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn insert_raw(&mut self, cell: CellIndex, bytes: Vec<u8>) {
        let _ = self.entries.insert(cell, bytes);
    }
}
