/// Single coordinate axis used for grid rows, columns, and positions.
pub type Coord = u8;

/// Count type used for total-cell and collected-cell counts.
pub type CellCount = u16;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}
