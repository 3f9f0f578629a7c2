use alloc::vec::Vec;
use serde::Serialize;

use crate::*;

/// What the presentation layer needs to draw one card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub row: Coord,
    pub col: Coord,
    pub active: bool,
    pub disabled: bool,
    pub resolved: bool,
    pub bomb_revealed: bool,
}

/// Read-only projection of a round for display binding.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
    pub rows: Coord,
    pub cols: Coord,
    pub phase: RoundPhase,
    pub collected_count: CellCount,
    pub remaining_count: CellCount,
    pub bomb_row: Coord,
    pub bomb_col: Coord,
    pub bomb_collected: bool,
    pub input_value: CellCount,
    /// Row-major.
    pub cards: Vec<CardView>,
}

impl RoundView {
    pub fn from_task<S: SessionStore, T: Scheduler>(task: &BombTask<S, T>) -> Self {
        let grid = task.grid();
        let bomb = task.bomb();
        let cards = grid
            .cells()
            .map(|cell| {
                let resolved = task.is_revealed(cell);
                CardView {
                    row: cell.row,
                    col: cell.col,
                    active: task.collection().contains(cell),
                    disabled: !task.can_toggle(cell),
                    resolved,
                    bomb_revealed: resolved && cell == bomb,
                }
            })
            .collect();

        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            phase: task.phase(),
            collected_count: task.collected_count(),
            remaining_count: task.remaining_count(),
            bomb_row: bomb.row,
            bomb_col: bomb.col,
            bomb_collected: task.has_bomb(),
            input_value: task.input_value(),
            cards,
        }
    }

    pub fn card(&self, cell: Cell) -> Option<&CardView> {
        if cell.row == 0 || cell.col == 0 || cell.row > self.rows || cell.col > self.cols {
            return None;
        }
        let index = usize::from(cell.row - 1) * usize::from(self.cols) + usize::from(cell.col - 1);
        self.cards.get(index)
    }
}
