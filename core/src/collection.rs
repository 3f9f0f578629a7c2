use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    NoChange,
    Changed,
}

impl ToggleOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Cards the player currently holds, in the order they were picked.
#[derive(Clone, Debug, PartialEq)]
pub struct Collection {
    cells: Vec<Cell>,
    members: Array2<bool>,
}

impl Collection {
    pub fn new(grid: &Grid) -> Self {
        Self {
            cells: Vec::new(),
            members: Array2::default(grid.nd_shape()),
        }
    }

    /// Adds or removes `cell`. Adding a member, removing a non-member or naming a cell off the grid changes nothing.
    pub fn toggle(&mut self, cell: Cell, active: bool) -> ToggleOutcome {
        let Some(member) = self.members.get_mut(cell.to_nd_index()) else {
            return ToggleOutcome::NoChange;
        };
        match (*member, active) {
            (false, true) => {
                *member = true;
                self.cells.push(cell);
                ToggleOutcome::Changed
            }
            (true, false) => {
                *member = false;
                self.cells.retain(|&other| other != cell);
                ToggleOutcome::Changed
            }
            _ => ToggleOutcome::NoChange,
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.members
            .get(cell.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    pub fn has_bomb(&self, bomb: Cell) -> bool {
        self.contains(bomb)
    }

    pub fn count(&self) -> CellCount {
        // never more members than grid cells
        self.cells.len() as CellCount
    }

    pub fn remaining(&self, total: CellCount) -> CellCount {
        total.saturating_sub(self.count())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Members in insertion order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> (Grid, Collection) {
        let grid = Grid::new(3, 3).unwrap();
        (grid, Collection::new(&grid))
    }

    #[test]
    fn toggle_on_twice_is_idempotent() {
        let (_, mut collection) = collection();

        assert_eq!(collection.toggle(Cell::new(2, 2), true), ToggleOutcome::Changed);
        let before = collection.clone();
        assert_eq!(collection.toggle(Cell::new(2, 2), true), ToggleOutcome::NoChange);

        assert_eq!(collection, before);
        assert_eq!(collection.count(), 1);
    }

    #[test]
    fn toggle_on_then_off_restores_previous_state() {
        let (_, mut collection) = collection();
        collection.toggle(Cell::new(1, 1), true);
        collection.toggle(Cell::new(3, 2), true);
        let before = collection.clone();

        collection.toggle(Cell::new(2, 3), true);
        collection.toggle(Cell::new(2, 3), false);

        assert_eq!(collection, before);
    }

    #[test]
    fn removing_absent_cell_is_no_change() {
        let (_, mut collection) = collection();

        assert_eq!(collection.toggle(Cell::new(1, 2), false), ToggleOutcome::NoChange);
        assert!(collection.is_empty());
    }

    #[test]
    fn cells_off_the_grid_are_ignored() {
        let (_, mut collection) = collection();

        assert_eq!(collection.toggle(Cell::new(4, 1), true), ToggleOutcome::NoChange);
        assert_eq!(collection.toggle(Cell::new(0, 2), true), ToggleOutcome::NoChange);
        assert_eq!(collection.toggle(Cell::new(1, 9), false), ToggleOutcome::NoChange);
        assert!(collection.is_empty());
    }

    #[test]
    fn keeps_insertion_order() {
        let (_, mut collection) = collection();
        for cell in [Cell::new(3, 3), Cell::new(1, 1), Cell::new(2, 1)] {
            collection.toggle(cell, true);
        }
        collection.toggle(Cell::new(1, 1), false);
        collection.toggle(Cell::new(1, 1), true);

        assert_eq!(
            collection.cells(),
            &[Cell::new(3, 3), Cell::new(2, 1), Cell::new(1, 1)]
        );
    }

    #[test]
    fn bomb_and_counts() {
        let (grid, mut collection) = collection();
        let bomb = Cell::new(2, 2);
        collection.toggle(Cell::new(1, 3), true);

        assert!(!collection.has_bomb(bomb));

        collection.toggle(Cell::new(2, 2), true);

        assert!(collection.has_bomb(bomb));
        assert!(collection.contains(Cell::new(1, 3)));
        assert_eq!(collection.count(), 2);
        assert_eq!(collection.remaining(grid.total_cells()), 7);
    }
}
