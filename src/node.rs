use crate::coordinate::Coordinate;

/// A single grid cell together with the state the search algorithms keep on it.
///
/// The run-scoped fields (`g`, `h`, `f`, `parent`, `visits`, `reward`) belong to the current search
/// and are reinitialised by [Grid::reset_search_state](crate::grid::Grid::reset_search_state)
/// before every run.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    coordinate: Coordinate,
    pub(crate) traversable: bool,
    pub(crate) special: bool,
    /// Accumulated cost from the start of the run.
    pub g: f64,
    /// Heuristic estimate to the goal of the run.
    pub h: f64,
    /// Ordering key, `g + h`.
    pub f: f64,
    /// Arena index of the node this one was reached from.
    pub parent: Option<usize>,
    /// MCTS visit count.
    pub visits: u32,
    /// MCTS accumulated reward.
    pub reward: f64,
}

impl Node {
    pub fn new(coordinate: Coordinate) -> Node {
        Node {
            coordinate,
            traversable: true,
            special: false,
            g: f64::INFINITY,
            h: 0.0,
            f: f64::INFINITY,
            parent: None,
            visits: 0,
            reward: 0.0,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// False for obstacles.
    pub fn traversable(&self) -> bool {
        self.traversable
    }

    /// True for the start and goal nodes.
    pub fn special(&self) -> bool {
        self.special
    }

    pub(crate) fn reset_run(&mut self) {
        self.g = f64::INFINITY;
        self.h = 0.0;
        self.f = f64::INFINITY;
        self.parent = None;
        self.visits = 0;
        self.reward = 0.0;
    }

    /// Upper confidence bound used by the Monte Carlo search. Unvisited nodes score `+∞` so that
    /// each one is tried before any node is revisited. `parent_visits` is [None] for the root.
    pub fn upper_confidence_bound(&self, parent_visits: Option<u32>, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let n = self.visits as f64;
        let exploitation = self.reward / n;
        let explore = match parent_visits {
            Some(p) if p > 0 => exploration * ((p as f64).ln() / n).sqrt(),
            _ => 0.0,
        };
        exploitation + explore
    }
}
