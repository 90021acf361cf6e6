use crate::coordinate::Coordinate;
use crate::distance::{euclidean, manhattan};
use crate::frontier::{Frontier, FxIndexSet, OpenSet, Side};
use crate::grid::{Grid, Neighbours};
use crate::path::extract_index_path;
use crate::solver::{GridSolver, SearchHooks};
use log::trace;

/// Best-first search shared by A* and Dijkstra. OPEN is ordered by `f = g + h`, ties going to the
/// smaller `h`; step costs are euclidean. The goal test happens when a node is selected, so with
/// a zero heuristic the returned route has minimum cost.
pub(crate) fn best_first<H>(
    grid: &mut Grid,
    start: usize,
    goal: usize,
    hooks: &mut SearchHooks<'_>,
    heuristic: H,
) -> Option<Vec<Coordinate>>
where
    H: Fn(&Coordinate, &Coordinate) -> f64,
{
    let goal_pos = grid.coordinate_of(goal);
    {
        let node = grid.node_mut(start);
        node.g = 0.0;
        node.h = heuristic(&node.coordinate(), &goal_pos);
        node.f = node.h;
        node.parent = None;
    }
    let mut open: OpenSet<f64> = OpenSet::with_start(start, grid.node_at(start).f);
    let mut closed: FxIndexSet<usize> = FxIndexSet::default();

    while let Some(q) = open.pop() {
        if q == goal {
            return Some(extract_index_path(grid, goal));
        }
        if !hooks.proceed() {
            return None;
        }
        let q_pos = grid.coordinate_of(q);
        let q_g = grid.node_at(q).g;
        trace!("expanding {q_pos} (g = {q_g:.3})");
        for n in Neighbours::from_slice(grid.neighbour_indices(q)) {
            if closed.contains(&n) || !grid.node_at(n).traversable() {
                continue;
            }
            let n_pos = grid.coordinate_of(n);
            let tentative_g = q_g + euclidean(&q_pos, &n_pos);
            let node = grid.node_mut(n);
            // Unseen nodes still carry the infinite g of the reset.
            if tentative_g >= node.g {
                continue;
            }
            node.g = tentative_g;
            node.h = heuristic(&n_pos, &goal_pos);
            node.f = node.g + node.h;
            node.parent = Some(q);
            open.push(n, node.f, node.g);
        }
        closed.insert(q);
        let expansion = hooks.expansions();
        hooks.report(&Frontier::new(
            grid,
            open.members(),
            &closed,
            q,
            expansion,
            Side::Forward,
        ));
    }
    None
}

/// A* with the Manhattan heuristic.
///
/// Manhattan distance is consistent on 4-connected grids. On 8-connected grids it overestimates
/// diagonal progress, so routes are not guaranteed to be of minimum cost there.
#[derive(Clone, Copy, Debug, Default)]
pub struct AstarSolver;

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver
    }

    pub fn heuristic(&self, a: &Coordinate, b: &Coordinate) -> f64 {
        manhattan(a, b) as f64
    }
}

impl GridSolver for AstarSolver {
    fn name(&self) -> &'static str {
        "A*"
    }

    fn solve(
        &self,
        grid: &mut Grid,
        start: usize,
        goal: usize,
        hooks: &mut SearchHooks<'_>,
    ) -> Option<Vec<Coordinate>> {
        best_first(grid, start, goal, hooks, |a, b| self.heuristic(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Connectivity;
    use crate::observer::FrontierRecorder;
    use crate::path::is_valid_path;
    use crate::solver::SearchStatus;

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        for connectivity in [Connectivity::Four, Connectivity::Eight] {
            let mut grid = Grid::new(1, connectivity);
            let start = Coordinate::new(0, 0);
            let result = AstarSolver::new().search(&mut grid, start, start);
            assert_eq!(result.path, vec![start]);
            assert_eq!(result.cost, 0.0);
            assert_eq!(result.status, SearchStatus::Found);
        }
    }

    /// Asserts that the forced detour around a blocked centre is found.
    #[test]
    fn solve_simple_problem() {
        for (connectivity, expected) in [(Connectivity::Four, 5), (Connectivity::Eight, 4)] {
            let mut grid = Grid::new(3, connectivity);
            grid.set_obstacle(Coordinate::new(1, 1), true).unwrap();
            let start = Coordinate::new(0, 0);
            let end = Coordinate::new(2, 2);
            let path = AstarSolver::new().search(&mut grid, start, end).path;
            assert_eq!(path.len(), expected);
            assert_eq!(path.first(), Some(&start));
            assert_eq!(path.last(), Some(&end));
            assert!(is_valid_path(&grid, &path));
        }
    }

    #[test]
    fn diagonal_on_open_grid() {
        let mut grid = Grid::new(5, Connectivity::Eight);
        let path = AstarSolver::new()
            .search(&mut grid, Coordinate::new(0, 0), Coordinate::new(4, 4))
            .path;
        let expected = (0..5).map(|i| Coordinate::new(i, i)).collect::<Vec<_>>();
        assert_eq!(path, expected);
    }

    #[test]
    fn test_complex() {
        for (connectivity, expected) in [(Connectivity::Four, 15), (Connectivity::Eight, 9)] {
            let mut grid = Grid::new(10, connectivity);
            for (row, col) in [(1, 1), (5, 0), (0, 5), (8, 8), (4, 4), (5, 5), (6, 6)] {
                grid.set_obstacle(Coordinate::new(row, col), true).unwrap();
            }
            let start = Coordinate::new(0, 0);
            let end = Coordinate::new(7, 7);
            let path = AstarSolver::new().search(&mut grid, start, end).path;
            assert_eq!(path.len(), expected);
            assert!(is_valid_path(&grid, &path));
        }
    }

    #[test]
    fn walled_goal_is_exhausted_without_reachability_check() {
        let mut grid = Grid::from_ascii(
            "S....
             ..###
             ..#G#
             ..###",
            Connectivity::Eight,
        )
        .unwrap();
        let mut recorder = FrontierRecorder::new();
        let mut hooks = SearchHooks::new(&mut recorder);
        let result = crate::solver::execute(
            &AstarSolver::new(),
            &mut grid,
            Coordinate::new(0, 0),
            Coordinate::new(2, 3),
            &mut hooks,
            false,
        );
        assert!(result.path.is_empty());
        assert_eq!(result.status, SearchStatus::Exhausted);
        assert_eq!(result.expansions, 11);
        assert_eq!(recorder.len(), 11);
    }

    #[test]
    fn snapshots_follow_every_expansion() {
        let mut grid = Grid::new(4, Connectivity::Four);
        let mut recorder = FrontierRecorder::new();
        let result = AstarSolver::new().search_observed(
            &mut grid,
            Coordinate::new(0, 0),
            Coordinate::new(3, 3),
            &mut recorder,
        );
        assert!(result.is_found());
        assert_eq!(recorder.len(), result.expansions);
        for (i, size) in recorder.sizes.iter().enumerate() {
            assert_eq!(size.expansion, i + 1);
            assert_eq!(size.closed, i + 1);
        }
    }
}
