use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// One card position on the grid, 1-based.
///
/// Cells are plain values: two cells built independently from the same coordinates are equal, which is what bomb
/// matching and collection membership rely on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: Coord,
    pub col: Coord,
}

impl Cell {
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl ToNdIndex for Cell {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        // row/col 0 wraps to an index no array has
        [
            usize::from(self.row).wrapping_sub(1),
            usize::from(self.col).wrapping_sub(1),
        ]
    }
}

/// Fixed `rows × cols` arrangement of cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: Coord,
    cols: Coord,
}

/// A freshly built grid together with the order its cells get revealed or bulk-selected in.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    pub grid: Grid,
    pub iteration_order: IterationOrder,
}

impl Grid {
    pub fn new(rows: Coord, cols: Coord) -> Result<Self> {
        if rows == 0 {
            return Err(TaskError::configuration("rows", "must be at least 1"));
        }
        if cols == 0 {
            return Err(TaskError::configuration("cols", "must be at least 1"));
        }
        Ok(Self { rows, cols })
    }

    /// Builds the grid row-major from `(1, 1)` to `(rows, cols)`.
    ///
    /// With `randomized` set, every cell is shuffled into the iteration order as it is created, so the random source
    /// is consumed once per cell in construction order. Otherwise the order is row-major and nothing is drawn.
    pub fn build<R>(rows: Coord, cols: Coord, randomized: bool, rng: &mut R) -> Result<GridLayout>
    where
        R: RandomSource + ?Sized,
    {
        let grid = Self::new(rows, cols)?;
        let mut cells = Vec::with_capacity(grid.total_cells().into());
        for cell in grid.cells() {
            if randomized {
                inside_out_push(&mut cells, cell, rng);
            } else {
                cells.push(cell);
            }
        }
        Ok(GridLayout {
            grid,
            iteration_order: IterationOrder { cells },
        })
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn cols(&self) -> Coord {
        self.cols
    }

    pub const fn size(&self) -> (Coord, Coord) {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn contains(&self, cell: Cell) -> bool {
        cell.row >= 1 && cell.row <= self.rows && cell.col >= 1 && cell.col <= self.cols
    }

    /// Resolves coordinates into a cell of this grid.
    ///
    /// Takes wide integers so host coordinates that don't fit a [`Coord`] are reported as they are.
    pub fn lookup(&self, row: u32, col: u32) -> Result<Cell> {
        let in_range = |value: u32, max: Coord| (1..=u32::from(max)).contains(&value);
        if in_range(row, self.rows) && in_range(col, self.cols) {
            // both fit a Coord after the range check
            Ok(Cell::new(row as Coord, col as Coord))
        } else {
            Err(TaskError::OutOfBounds { row, col })
        }
    }

    pub fn lookup_cell(&self, cell: Cell) -> Result<Cell> {
        self.lookup(cell.row.into(), cell.col.into())
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let cols = self.cols;
        (1..=self.rows).flat_map(move |row| (1..=cols).map(move |col| Cell::new(row, col)))
    }

    pub(crate) fn nd_shape(&self) -> [usize; 2] {
        [self.rows.into(), self.cols.into()]
    }
}

/// Sequence of every grid cell used by automatic reveal and input-driven selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IterationOrder {
    cells: Vec<Cell>,
}

impl IterationOrder {
    /// Accepts `cells` only when it is a permutation of `grid`.
    pub fn from_cells(grid: &Grid, cells: Vec<Cell>) -> Result<Self> {
        if cells.len() != usize::from(grid.total_cells()) {
            return Err(TaskError::MalformedSnapshot);
        }
        let mut seen = ndarray::Array2::<bool>::default(grid.nd_shape());
        for &cell in &cells {
            let cell = grid.lookup_cell(cell)?;
            let slot = &mut seen[cell.to_nd_index()];
            if *slot {
                return Err(TaskError::MalformedSnapshot);
            }
            *slot = true;
        }
        Ok(Self { cells })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }
}
