use crate::config::SearchConfig;
use crate::coordinate::Coordinate;
use crate::distance::manhattan;
use crate::frontier::{Frontier, FxIndexSet, Side};
use crate::grid::{Grid, Neighbours};
use crate::path::{extract_index_path, parent_indices};
use crate::solver::{GridSolver, SearchHooks};
use crate::{DEFAULT_EXPLORATION, DEFAULT_ROLLOUT_DEPTH, ROLLOUT_REWARD_SCALE};
use log::{trace, warn};
use rand::prelude::*;

/// Monte Carlo tree search adapted to a fixed start and goal.
///
/// The open node with the highest upper confidence bound is expanded next. Each newly reached
/// neighbour is scored by random rollouts and the score is propagated to all of its ancestors.
/// Routes are found quickly on open boards but are not shortest in general.
#[derive(Clone, Debug, PartialEq)]
pub struct MonteCarloSolver {
    pub rollout_depth: usize,
    pub exploration: f64,
    pub reward_scale: f64,
    pub seed: u64,
}

impl MonteCarloSolver {
    pub fn new() -> MonteCarloSolver {
        MonteCarloSolver {
            rollout_depth: DEFAULT_ROLLOUT_DEPTH,
            exploration: DEFAULT_EXPLORATION,
            reward_scale: ROLLOUT_REWARD_SCALE,
            seed: 0,
        }
    }

    pub fn from_config(config: &SearchConfig) -> MonteCarloSolver {
        MonteCarloSolver {
            rollout_depth: config.rollout_depth,
            exploration: config.exploration,
            reward_scale: config.rollout_reward_scale,
            seed: config.seed,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> MonteCarloSolver {
        self.seed = seed;
        self
    }

    fn score(&self, grid: &Grid, ix: usize) -> f64 {
        let node = grid.node_at(ix);
        let parent_visits = node.parent.map(|p| grid.node_at(p).visits);
        node.upper_confidence_bound(parent_visits, self.exploration)
    }

    /// The open node with the highest bound, the earliest inserted among equals.
    fn select(&self, grid: &Grid, open: &FxIndexSet<usize>) -> Option<usize> {
        open.iter()
            .map(|&ix| (ix, self.score(grid, ix)))
            .min_by(|(_, a), (_, b)| b.total_cmp(a))
            .map(|(ix, _)| ix)
    }

    /// Estimates the value of `node` with one random walk from each unvisited, traversable
    /// neighbour. Walks only step onto unvisited nodes and never repeat one. A walk that touches
    /// the goal makes the estimate infinite; otherwise it is worth `reward_scale` divided by the
    /// Manhattan distance from where it ended to the goal, and the estimate is the mean over all
    /// walks.
    fn simulate<R: Rng>(&self, grid: &Grid, node: usize, goal: usize, rng: &mut R) -> f64 {
        let goal_pos = grid.coordinate_of(goal);
        let fresh = |ix: usize| {
            let node = grid.node_at(ix);
            node.traversable() && node.visits == 0
        };
        let mut total = 0.0;
        let mut walks = 0usize;
        for &first in grid.neighbour_indices(node) {
            if !fresh(first) {
                continue;
            }
            if first == goal {
                return f64::INFINITY;
            }
            walks += 1;
            let mut walk: Vec<usize> = vec![first];
            let mut tip = first;
            for _ in 0..self.rollout_depth {
                let choices: Neighbours = grid
                    .neighbour_indices(tip)
                    .iter()
                    .copied()
                    .filter(|&n| fresh(n) && !walk.contains(&n))
                    .collect();
                let Some(&next) = choices.choose(rng) else {
                    break;
                };
                if next == goal {
                    return f64::INFINITY;
                }
                walk.push(next);
                tip = next;
            }
            let distance = manhattan(&grid.coordinate_of(tip), &goal_pos);
            total += self.reward_scale / distance as f64;
        }
        if walks == 0 {
            0.0
        } else {
            total / walks as f64
        }
    }

    /// Adds one visit and `reward` to `from` and every ancestor of it.
    fn backpropagate(grid: &mut Grid, from: usize, reward: f64) {
        let chain = parent_indices(grid, from).collect::<Vec<_>>();
        for ix in chain {
            let node = grid.node_mut(ix);
            node.visits = node.visits.saturating_add(1);
            node.reward += reward;
        }
    }
}

impl Default for MonteCarloSolver {
    fn default() -> MonteCarloSolver {
        MonteCarloSolver::new()
    }
}

impl GridSolver for MonteCarloSolver {
    fn name(&self) -> &'static str {
        "MCTS"
    }

    fn solve(
        &self,
        grid: &mut Grid,
        start: usize,
        goal: usize,
        hooks: &mut SearchHooks<'_>,
    ) -> Option<Vec<Coordinate>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut open: FxIndexSet<usize> = FxIndexSet::default();
        let mut closed: FxIndexSet<usize> = FxIndexSet::default();
        open.insert(start);

        while let Some(r) = self.select(grid, &open) {
            open.shift_remove(&r);
            if !hooks.proceed() {
                return None;
            }
            trace!(
                "expanding {} (visits = {}, reward = {:.3})",
                grid.coordinate_of(r),
                grid.node_at(r).visits,
                grid.node_at(r).reward
            );
            let mut reached = false;
            for n in Neighbours::from_slice(grid.neighbour_indices(r)) {
                if closed.contains(&n) || !grid.node_at(n).traversable() {
                    continue;
                }
                if n == goal {
                    grid.node_mut(n).parent = Some(r);
                    reached = true;
                    break;
                }
                if grid.node_at(n).visits == 0 {
                    let mut reward = self.simulate(grid, n, goal, &mut rng);
                    if reward.is_nan() {
                        warn!(
                            "rollouts from {} produced no usable reward",
                            grid.coordinate_of(n)
                        );
                        reward = 0.0;
                    }
                    let node = grid.node_mut(n);
                    node.reward = reward;
                    node.visits = 1;
                    node.parent = Some(r);
                    Self::backpropagate(grid, r, reward);
                }
                open.insert(n);
            }
            closed.insert(r);
            let expansion = hooks.expansions();
            hooks.report(&Frontier::new(
                grid,
                &open,
                &closed,
                r,
                expansion,
                Side::Forward,
            ));
            if reached {
                return Some(extract_index_path(grid, goal));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Connectivity;
    use crate::observer::{FrontierRecorder, NoopObserver};
    use crate::path::is_valid_path;
    use crate::solver::{execute, SearchStatus};

    #[test]
    fn finds_route_on_open_grid() {
        for connectivity in [Connectivity::Four, Connectivity::Eight] {
            let mut grid = Grid::new(8, connectivity);
            let start = Coordinate::new(0, 0);
            let goal = Coordinate::new(7, 5);
            let result = MonteCarloSolver::new().search(&mut grid, start, goal);
            assert!(result.is_found());
            assert_eq!(result.path.first(), Some(&start));
            assert_eq!(result.path.last(), Some(&goal));
            assert!(is_valid_path(&grid, &result.path));
        }
    }

    #[test]
    fn seeded_runs_repeat() {
        let text = "S.....#...
                    .##.#.#.#.
                    ....#...#.
                    .####.###.
                    ........#G";
        let mut grid = Grid::from_ascii(text, Connectivity::Eight).unwrap();
        let start = grid.start().unwrap();
        let goal = grid.goals()[0];
        let solver = MonteCarloSolver::new().with_seed(42);
        let first = solver.search(&mut grid, start, goal);
        let second = solver.search(&mut grid, start, goal);
        assert!(first.is_found());
        assert_eq!(first, second);
    }

    #[test]
    fn adjacent_goal_takes_one_expansion() {
        let mut grid = Grid::new(4, Connectivity::Four);
        let start = Coordinate::new(1, 1);
        let goal = Coordinate::new(2, 1);
        let mut recorder = FrontierRecorder::new();
        let result =
            MonteCarloSolver::new().search_observed(&mut grid, start, goal, &mut recorder);
        assert_eq!(result.path, vec![start, goal]);
        assert_eq!(result.expansions, 1);
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn shallow_rollouts_average_distance_rewards() {
        let grid = Grid::with_size(1, 5, Connectivity::Four);
        let solver = MonteCarloSolver {
            rollout_depth: 0,
            ..MonteCarloSolver::new()
        };
        let mut rng = StdRng::seed_from_u64(0);
        // Walks end on (0, 0) and (0, 2), 4 and 2 steps from the goal.
        let value = solver.simulate(&grid, 1, 4, &mut rng);
        assert!((value - 37.5).abs() < 1e-9);
        // A neighbour of (0, 3) is the goal itself.
        assert_eq!(solver.simulate(&grid, 3, 4, &mut rng), f64::INFINITY);
    }

    #[test]
    fn backpropagation_reaches_the_root() {
        let mut grid = Grid::with_size(1, 4, Connectivity::Four);
        grid.node_mut(1).parent = Some(0);
        grid.node_mut(2).parent = Some(1);
        MonteCarloSolver::backpropagate(&mut grid, 2, 5.0);
        MonteCarloSolver::backpropagate(&mut grid, 1, 1.0);
        let visits = grid.nodes().iter().map(|n| n.visits).collect::<Vec<_>>();
        assert_eq!(visits, vec![2, 2, 1, 0]);
        assert_eq!(grid.node_at(0).reward, 6.0);
        assert_eq!(grid.node_at(2).reward, 5.0);
    }

    #[test]
    fn walled_goal_exhausts() {
        let mut grid = Grid::from_ascii(
            "S..#.
             ...#G
             ...#.",
            Connectivity::Eight,
        )
        .unwrap();
        let mut observer = NoopObserver;
        let mut hooks = SearchHooks::new(&mut observer);
        let result = execute(
            &MonteCarloSolver::new(),
            &mut grid,
            Coordinate::new(0, 0),
            Coordinate::new(1, 4),
            &mut hooks,
            false,
        );
        assert!(result.path.is_empty());
        assert_eq!(result.status, SearchStatus::Exhausted);
        assert_eq!(result.expansions, 9);
    }
}
