use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Coordinate-only record of a round, enough to rebuild it on a fresh grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub bomb: Cell,
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub stopped: bool,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub collection: Vec<Cell>,
    #[serde(default)]
    pub input_value: CellCount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterator: Option<Vec<Cell>>,
    #[serde(
        default,
        rename = "iteratorCursor",
        skip_serializing_if = "Option::is_none"
    )]
    pub iterator_cursor: Option<usize>,
}

impl StorageKey for PersistedSnapshot {
    const KEY: &'static str = "bret:state";
}

/// A snapshot with every coordinate resolved against the current grid.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconstructedState {
    pub bomb: Cell,
    pub iteration_order: Option<IterationOrder>,
    pub cursor: usize,
    pub collection: Vec<Cell>,
    pub input_value: CellCount,
    pub started: bool,
    pub stopped: bool,
    pub resolved: bool,
}

impl PersistedSnapshot {
    /// Resolves all stored coordinates against `grid` without touching any live state, so a snapshot from another
    /// grid is rejected as a whole.
    pub fn reconstruct(&self, grid: &Grid) -> Result<ReconstructedState> {
        let bomb = grid.lookup_cell(self.bomb)?;
        let iteration_order = self
            .iterator
            .as_ref()
            .map(|cells| IterationOrder::from_cells(grid, cells.clone()))
            .transpose()?;

        let cursor = self.iterator_cursor.unwrap_or(0);
        let order_len = iteration_order
            .as_ref()
            .map_or(usize::from(grid.total_cells()), IterationOrder::len);
        if cursor > order_len {
            return Err(TaskError::MalformedSnapshot);
        }

        let collection = self
            .collection
            .iter()
            .map(|&cell| grid.lookup_cell(cell))
            .collect::<Result<Vec<_>>>()?;

        Ok(ReconstructedState {
            bomb,
            iteration_order,
            cursor,
            collection,
            input_value: self.input_value.min(grid.total_cells()),
            started: self.started,
            stopped: self.stopped,
            resolved: self.resolved,
        })
    }
}

/// Reads and writes [`PersistedSnapshot`]s through a [`SessionStore`].
///
/// Once the store reports [`TaskError::StorageUnavailable`] the gateway turns every later call into a no-op.
#[derive(Clone, Debug)]
pub struct PersistenceGateway<S> {
    store: S,
    available: bool,
}

impl<S: SessionStore> PersistenceGateway<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            available: true,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Previously saved snapshot, if there is a readable one.
    pub fn load(&mut self) -> Option<PersistedSnapshot> {
        if !self.available {
            return None;
        }
        let raw = match self.store.get_item(PersistedSnapshot::KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                self.handle_error(err, "read");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                log::warn!("Ignoring unreadable round state: {}", err);
                None
            }
        }
    }

    pub fn save(&mut self, snapshot: &PersistedSnapshot) {
        if !self.available {
            return;
        }
        let raw = match serde_json::to_string(snapshot) {
            Ok(raw) => raw,
            Err(err) => {
                log::error!("Could not serialize round state: {}", err);
                return;
            }
        };
        if let Err(err) = self.store.set_item(PersistedSnapshot::KEY, &raw) {
            self.handle_error(err, "save");
        }
    }

    /// Removes the saved snapshot, whether or not there is one.
    pub fn reset(&mut self) {
        if !self.available {
            return;
        }
        if let Err(err) = self.store.remove_item(PersistedSnapshot::KEY) {
            self.handle_error(err, "remove");
        }
    }

    fn handle_error(&mut self, err: TaskError, action: &str) {
        if err == TaskError::StorageUnavailable {
            log::warn!("Session storage unavailable, round state will not be kept");
            self.available = false;
        } else {
            log::error!("Could not {} round state: {}", action, err);
        }
    }
}
