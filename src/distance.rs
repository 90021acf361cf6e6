use crate::coordinate::Coordinate;

/// Straight-line distance. Used as the step cost between adjacent cells, so orthogonal steps
/// cost 1 and diagonal steps cost √2.
#[inline]
pub fn euclidean(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_row = a.row.abs_diff(b.row) as f64;
    let d_col = a.col.abs_diff(b.col) as f64;
    (d_row * d_row + d_col * d_col).sqrt()
}

/// Manhattan (L1) distance, the A* heuristic. Admissible on 4-connected grids only; on
/// 8-connected grids it can overestimate the remaining cost.
#[inline]
pub fn manhattan(a: &Coordinate, b: &Coordinate) -> usize {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

/// Chebyshev (L∞) distance, the number of steps separating two cells on an open 8-connected grid.
#[inline]
pub fn chebyshev(a: &Coordinate, b: &Coordinate) -> usize {
    a.row.abs_diff(b.row).max(a.col.abs_diff(b.col))
}
