use crate::coordinate::Coordinate;
use crate::grid::Grid;
use crate::solver::astar::best_first;
use crate::solver::{GridSolver, SearchHooks};

/// Uniform-cost search: [best_first] with the heuristic fixed at zero, so `f = g`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraSolver;

impl GridSolver for DijkstraSolver {
    fn name(&self) -> &'static str {
        "Dijkstra"
    }

    fn solve(
        &self,
        grid: &mut Grid,
        start: usize,
        goal: usize,
        hooks: &mut SearchHooks<'_>,
    ) -> Option<Vec<Coordinate>> {
        best_first(grid, start, goal, hooks, |_, _| 0.0)
    }
}
