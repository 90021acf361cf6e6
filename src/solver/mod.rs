use crate::cancel::CancellationToken;
use crate::coordinate::Coordinate;
use crate::frontier::Frontier;
use crate::grid::Grid;
use crate::observer::{FrontierObserver, NoopObserver};
use crate::path::path_cost;
use core::fmt;
use log::{debug, info, warn};
use std::str::FromStr;

pub mod astar;
pub mod bidirectional;
pub mod dijkstra;
pub mod exhaustive;
pub mod mcts;

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// A path was found.
    Found,
    /// The frontier emptied without reaching the goal.
    Exhausted,
    /// Start and goal lie on different connected components; no search was performed.
    Unreachable,
    /// The run was stopped through its [CancellationToken].
    Cancelled,
    /// The run hit its expansion budget.
    BudgetExceeded,
    /// Start or goal lies outside the grid.
    InvalidCoordinate,
}

/// Outcome of a single start → goal run. An empty path means no route, with `status` saying why.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// The route ordered from start to goal, both included.
    pub path: Vec<Coordinate>,
    pub status: SearchStatus,
    pub expansions: usize,
    /// Sum of the euclidean step costs of `path`.
    pub cost: f64,
}

impl SearchResult {
    fn found(path: Vec<Coordinate>, expansions: usize) -> SearchResult {
        SearchResult {
            cost: path_cost(&path),
            path,
            status: SearchStatus::Found,
            expansions,
        }
    }

    fn empty(status: SearchStatus, expansions: usize) -> SearchResult {
        SearchResult {
            path: Vec::new(),
            status,
            expansions,
            cost: 0.0,
        }
    }

    pub fn is_found(&self) -> bool {
        self.status == SearchStatus::Found
    }
}

/// Per-run plumbing handed to a solver: the observer, the cancellation flag and the expansion
/// budget.
pub struct SearchHooks<'a> {
    observer: &'a mut dyn FrontierObserver,
    cancel: Option<&'a CancellationToken>,
    max_expansions: Option<usize>,
    expansions: usize,
    stopped: Option<SearchStatus>,
}

impl<'a> SearchHooks<'a> {
    pub fn new(observer: &'a mut dyn FrontierObserver) -> SearchHooks<'a> {
        SearchHooks {
            observer,
            cancel: None,
            max_expansions: None,
            expansions: 0,
            stopped: None,
        }
    }

    pub fn with_cancellation(mut self, token: Option<&'a CancellationToken>) -> SearchHooks<'a> {
        self.cancel = token;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: Option<usize>) -> SearchHooks<'a> {
        self.max_expansions = max_expansions;
        self
    }

    /// Accounts for one more expansion. Returns false, and remembers why, when the run has to
    /// stop instead.
    pub fn proceed(&mut self) -> bool {
        if self.cancel.is_some_and(CancellationToken::is_cancelled) {
            self.stopped = Some(SearchStatus::Cancelled);
            return false;
        }
        if self.max_expansions.is_some_and(|m| self.expansions >= m) {
            self.stopped = Some(SearchStatus::BudgetExceeded);
            return false;
        }
        self.expansions += 1;
        true
    }

    pub fn report(&mut self, frontier: &Frontier<'_>) {
        self.observer.observe(frontier);
    }

    pub fn expansions(&self) -> usize {
        self.expansions
    }

    pub fn stopped(&self) -> Option<SearchStatus> {
        self.stopped
    }
}

/// A search algorithm over a [Grid]. Implementors only provide [solve](Self::solve); endpoint
/// validation, run-state reset and reachability checks happen in [execute].
pub trait GridSolver {
    fn name(&self) -> &'static str;

    /// Searches from arena index `start` to `goal` (distinct, both valid for `grid`, run-scoped
    /// node state freshly reset). Returns the route ordered start → goal, or [None] if the
    /// frontier empties or `hooks` stops the run.
    fn solve(
        &self,
        grid: &mut Grid,
        start: usize,
        goal: usize,
        hooks: &mut SearchHooks<'_>,
    ) -> Option<Vec<Coordinate>>;

    fn search(&self, grid: &mut Grid, start: Coordinate, goal: Coordinate) -> SearchResult {
        let mut observer = NoopObserver;
        let mut hooks = SearchHooks::new(&mut observer);
        execute(self, grid, start, goal, &mut hooks, true)
    }

    fn search_observed(
        &self,
        grid: &mut Grid,
        start: Coordinate,
        goal: Coordinate,
        observer: &mut dyn FrontierObserver,
    ) -> SearchResult {
        let mut hooks = SearchHooks::new(observer);
        execute(self, grid, start, goal, &mut hooks, true)
    }
}

/// Runs `solver` from `start` to `goal`, resetting the run-scoped node state first.
pub fn execute<S: GridSolver + ?Sized>(
    solver: &S,
    grid: &mut Grid,
    start: Coordinate,
    goal: Coordinate,
    hooks: &mut SearchHooks<'_>,
    check_reachability: bool,
) -> SearchResult {
    let (Some(start_ix), Some(goal_ix)) = (grid.index_of(start), grid.index_of(goal)) else {
        warn!("{start} or {goal} lies outside the grid");
        return SearchResult::empty(SearchStatus::InvalidCoordinate, 0);
    };
    if !grid.node_at(start_ix).traversable() || !grid.node_at(goal_ix).traversable() {
        info!("{start} or {goal} is an obstacle");
        return SearchResult::empty(SearchStatus::Unreachable, 0);
    }
    grid.reset_search_state();
    if start_ix == goal_ix {
        let node = grid.node_mut(start_ix);
        node.g = 0.0;
        node.f = 0.0;
        return SearchResult::found(vec![start], 0);
    }
    if check_reachability {
        grid.update();
        if grid.unreachable(start, goal) {
            info!("{goal} is not reachable from {start}");
            return SearchResult::empty(SearchStatus::Unreachable, 0);
        }
    }
    info!("{} search from {start} to {goal}", solver.name());
    match solver.solve(grid, start_ix, goal_ix, hooks) {
        Some(path) => {
            debug!(
                "{} reached {goal} in {} expansions, {} nodes",
                solver.name(),
                hooks.expansions(),
                path.len()
            );
            SearchResult::found(path, hooks.expansions())
        }
        None => {
            let status = hooks.stopped().unwrap_or(SearchStatus::Exhausted);
            match status {
                SearchStatus::Cancelled => warn!("{} search cancelled", solver.name()),
                SearchStatus::BudgetExceeded => warn!(
                    "{} search stopped after {} expansions",
                    solver.name(),
                    hooks.expansions()
                ),
                _ => debug!("{} found no path from {start} to {goal}", solver.name()),
            }
            SearchResult::empty(status, hooks.expansions())
        }
    }
}

/// The algorithm families the engine can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    AStar,
    Dijkstra,
    BidirectionalDijkstra,
    DfsShortest,
    BfsShortest,
    MonteCarlo,
}

const ALGORITHM_NAMES: [(Algorithm, &str); 6] = [
    (Algorithm::AStar, "astar"),
    (Algorithm::Dijkstra, "dijkstra"),
    (Algorithm::BidirectionalDijkstra, "bidirectional_dijkstra"),
    (Algorithm::DfsShortest, "dfs"),
    (Algorithm::BfsShortest, "bfs"),
    (Algorithm::MonteCarlo, "mcts"),
];

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::AStar,
        Algorithm::Dijkstra,
        Algorithm::BidirectionalDijkstra,
        Algorithm::DfsShortest,
        Algorithm::BfsShortest,
        Algorithm::MonteCarlo,
    ];

    pub fn name(&self) -> &'static str {
        ALGORITHM_NAMES
            .iter()
            .find(|(a, _)| a == self)
            .map_or("unknown", |(_, name)| name)
    }

    /// Whether the family guarantees a minimum-cost route on every connectivity.
    pub fn is_optimal(&self) -> bool {
        matches!(self, Algorithm::Dijkstra | Algorithm::BidirectionalDijkstra)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown algorithm '{}'", self.0)
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALGORITHM_NAMES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
            .map(|(a, _)| *a)
            .ok_or_else(|| UnknownAlgorithm(s.to_owned()))
    }
}
