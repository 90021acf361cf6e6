use core::fmt;

/// A cell address on a [Grid](crate::grid::Grid), given as (row, column).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub const fn new(row: usize, col: usize) -> Coordinate {
        Coordinate { row, col }
    }

    /// Offsets the coordinate by a signed delta. Returns [None] if either component would become
    /// negative; the upper bound is checked by the grid.
    pub fn offset(&self, d_row: i32, d_col: i32) -> Option<Coordinate> {
        let row = self.row.checked_add_signed(d_row as isize)?;
        let col = self.col.checked_add_signed(d_col as isize)?;
        Some(Coordinate { row, col })
    }

    /// Whether `other` is one step away, orthogonally or diagonally.
    pub fn touches(&self, other: &Coordinate) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((row, col): (usize, usize)) -> Self {
        Coordinate { row, col }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
