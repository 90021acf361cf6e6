//! Route reconstruction from parent links, and helpers for inspecting finished paths.
use crate::coordinate::Coordinate;
use crate::distance::euclidean;
use crate::grid::Grid;
use itertools::Itertools;
use std::iter;

/// Arena indices from `goal` back to the node without a parent, goal first. The walk is bounded
/// by the grid size so a corrupted parent chain cannot loop forever.
pub(crate) fn parent_indices(grid: &Grid, goal: usize) -> impl Iterator<Item = usize> + '_ {
    iter::successors(Some(goal), move |&ix| grid.node_at(ix).parent).take(grid.len())
}

/// Walks the parent links from `goal` to the start of the run, yielding goal first. Yields
/// nothing if `goal` is out of bounds.
pub fn parent_chain(grid: &Grid, goal: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
    grid.index_of(goal)
        .into_iter()
        .flat_map(move |ix| parent_indices(grid, ix))
        .map(move |ix| grid.coordinate_of(ix))
}

/// Reconstructs the route ending in `goal`, ordered from the start to `goal`. A goal without a
/// parent yields the single-node path `[goal]`.
pub fn extract_path(grid: &Grid, goal: Coordinate) -> Vec<Coordinate> {
    let mut path = parent_chain(grid, goal).collect::<Vec<_>>();
    path.reverse();
    path
}

pub(crate) fn extract_index_path(grid: &Grid, goal: usize) -> Vec<Coordinate> {
    let mut path = parent_indices(grid, goal)
        .map(|ix| grid.coordinate_of(ix))
        .collect::<Vec<_>>();
    path.reverse();
    path
}

/// Sum of the euclidean step costs along a path.
pub fn path_cost(path: &[Coordinate]) -> f64 {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| euclidean(a, b))
        .sum()
}

/// Whether every node of the path is traversable and every consecutive pair are neighbours on
/// the grid. The empty path is valid.
pub fn is_valid_path(grid: &Grid, path: &[Coordinate]) -> bool {
    path.iter().all(|c| grid.is_traversable(*c))
        && path.iter().tuple_windows().all(|(a, b)| {
            grid.neighbours_of(*a)
                .is_some_and(|neighbours| neighbours.contains(b))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Connectivity;

    fn chain(grid: &mut Grid, cells: &[(usize, usize)]) {
        let ixs = cells
            .iter()
            .map(|&c| grid.index_of(c.into()).unwrap())
            .collect::<Vec<_>>();
        for (&parent, &child) in ixs.iter().tuple_windows() {
            grid.node_mut(child).parent = Some(parent);
        }
    }

    #[test]
    fn extracts_start_to_goal() {
        let mut grid = Grid::new(3, Connectivity::Eight);
        chain(&mut grid, &[(0, 0), (1, 1), (2, 1), (2, 2)]);
        let path = extract_path(&grid, Coordinate::new(2, 2));
        assert_eq!(
            path,
            vec![
                Coordinate::new(0, 0),
                Coordinate::new(1, 1),
                Coordinate::new(2, 1),
                Coordinate::new(2, 2)
            ]
        );
        let back = parent_chain(&grid, Coordinate::new(2, 2)).collect::<Vec<_>>();
        assert_eq!(back.first(), Some(&Coordinate::new(2, 2)));
        assert_eq!(back.last(), Some(&Coordinate::new(0, 0)));
        assert!(is_valid_path(&grid, &path));
        assert!((path_cost(&path) - (2.0 + 2f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn parentless_goal_is_a_single_node_path() {
        let grid = Grid::new(2, Connectivity::Four);
        let goal = Coordinate::new(1, 1);
        assert_eq!(extract_path(&grid, goal), vec![goal]);
        assert_eq!(path_cost(&[goal]), 0.0);
        assert!(extract_path(&grid, Coordinate::new(4, 4)).is_empty());
    }

    #[test]
    fn cyclic_parents_terminate() {
        let mut grid = Grid::new(2, Connectivity::Eight);
        grid.node_mut(0).parent = Some(3);
        grid.node_mut(3).parent = Some(0);
        assert_eq!(extract_path(&grid, Coordinate::new(1, 1)).len(), grid.len());
    }

    #[test]
    fn invalid_paths() {
        let mut grid = Grid::new(3, Connectivity::Four);
        let jump = [Coordinate::new(0, 0), Coordinate::new(1, 1)];
        assert!(!is_valid_path(&grid, &jump));
        grid.set_obstacle(Coordinate::new(0, 1), true).unwrap();
        let blocked = [Coordinate::new(0, 0), Coordinate::new(0, 1)];
        assert!(!is_valid_path(&grid, &blocked));
        assert!(is_valid_path(&grid, &[]));
    }
}
