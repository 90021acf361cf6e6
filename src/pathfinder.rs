//! Entry point that runs a chosen [Algorithm] over a [Grid], either for a single start/goal pair or
//! along the grid's designated start and goals.
use crate::cancel::CancellationToken;
use crate::config::SearchConfig;
use crate::coordinate::Coordinate;
use crate::grid::Grid;
use crate::observer::{FrontierObserver, NoopObserver};
use crate::solver::astar::AstarSolver;
use crate::solver::bidirectional::BidirectionalDijkstraSolver;
use crate::solver::dijkstra::DijkstraSolver;
use crate::solver::exhaustive::{BfsSolver, DfsSolver};
use crate::solver::mcts::MonteCarloSolver;
use crate::solver::{execute, Algorithm, GridSolver, SearchHooks, SearchResult};
use log::{debug, info, warn};

/// One leg of a multi-goal route.
#[derive(Clone, Debug, PartialEq)]
pub struct Leg {
    pub from: Coordinate,
    pub to: Coordinate,
    pub result: SearchResult,
}

/// Runs searches with a fixed [SearchConfig] and an optional [CancellationToken] shared by every
/// run.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    config: SearchConfig,
    cancel: Option<CancellationToken>,
}

impl Pathfinder {
    pub fn new(config: SearchConfig) -> Pathfinder {
        Pathfinder {
            config,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Pathfinder {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn search(
        &self,
        grid: &mut Grid,
        algorithm: Algorithm,
        start: Coordinate,
        goal: Coordinate,
    ) -> SearchResult {
        self.search_observed(grid, algorithm, start, goal, &mut NoopObserver)
    }

    /// Like [search](Self::search), reporting the frontier to `observer` after every expansion.
    pub fn search_observed(
        &self,
        grid: &mut Grid,
        algorithm: Algorithm,
        start: Coordinate,
        goal: Coordinate,
        observer: &mut dyn FrontierObserver,
    ) -> SearchResult {
        match algorithm {
            Algorithm::AStar => self.run(&AstarSolver::new(), grid, start, goal, observer),
            Algorithm::Dijkstra => self.run(&DijkstraSolver, grid, start, goal, observer),
            Algorithm::BidirectionalDijkstra => {
                self.run(&BidirectionalDijkstraSolver, grid, start, goal, observer)
            }
            Algorithm::DfsShortest => {
                let solver = DfsSolver::with_max_paths(self.config.max_enumerated_paths);
                self.run(&solver, grid, start, goal, observer)
            }
            Algorithm::BfsShortest => self.run(&BfsSolver, grid, start, goal, observer),
            Algorithm::MonteCarlo => {
                let solver = MonteCarloSolver::from_config(&self.config);
                self.run(&solver, grid, start, goal, observer)
            }
        }
    }

    /// The route from `start` to `goal`, empty if there is none.
    pub fn find_path(
        &self,
        grid: &mut Grid,
        algorithm: Algorithm,
        start: Coordinate,
        goal: Coordinate,
    ) -> Vec<Coordinate> {
        self.search(grid, algorithm, start, goal).path
    }

    fn run<S: GridSolver>(
        &self,
        solver: &S,
        grid: &mut Grid,
        start: Coordinate,
        goal: Coordinate,
        observer: &mut dyn FrontierObserver,
    ) -> SearchResult {
        let mut hooks = SearchHooks::new(observer)
            .with_cancellation(self.cancel.as_ref())
            .with_max_expansions(self.config.max_expansions);
        execute(
            solver,
            grid,
            start,
            goal,
            &mut hooks,
            self.config.check_reachability,
        )
    }

    /// Visits the grid's goals in insertion order, starting from its designated start; every leg
    /// after the first starts at the previous goal. Stops after the first leg without a path, so
    /// the last leg returned may be a failed one. Returns no legs if the grid has no start.
    pub fn route(&self, grid: &mut Grid, algorithm: Algorithm) -> Vec<Leg> {
        self.route_observed(grid, algorithm, &mut NoopObserver)
    }

    pub fn route_observed(
        &self,
        grid: &mut Grid,
        algorithm: Algorithm,
        observer: &mut dyn FrontierObserver,
    ) -> Vec<Leg> {
        let Some(mut from) = grid.start() else {
            warn!("cannot route without a start");
            return Vec::new();
        };
        let goals = grid.goals();
        info!("routing {algorithm} through {} goals", goals.len());
        let mut legs = Vec::with_capacity(goals.len());
        for to in goals {
            let result = self.search_observed(grid, algorithm, from, to, &mut *observer);
            debug!(
                "leg {from} -> {to}: {:?}, {} nodes, cost {:.3}",
                result.status,
                result.path.len(),
                result.cost
            );
            let found = result.is_found();
            legs.push(Leg { from, to, result });
            if !found {
                break;
            }
            from = to;
        }
        legs
    }
}
