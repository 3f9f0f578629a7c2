use crate::*;

/// Picks the bomb uniformly from `grid`.
///
/// Draws the row index first and the column index second, two separate draws rather than one flattened index, so a
/// seeded source always lands on the same cell.
pub fn place_bomb<R>(grid: &Grid, rng: &mut R) -> Cell
where
    R: RandomSource + ?Sized,
{
    let row = rng.uniform_int(0, usize::from(grid.rows()) - 1);
    let col = rng.uniform_int(0, usize::from(grid.cols()) - 1);
    // indices stay below rows/cols, which are Coord themselves
    Cell::new(row as Coord + 1, col as Coord + 1)
}
