//! # grid_search
//!
//! Pathfinding on a 2D grid of traversable and blocked cells, with 4- or 8-connected moves and
//! euclidean step costs. Implements
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm),
//! [Dijkstra](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm) and its bidirectional variant,
//! exhaustive depth-first and breadth-first path enumeration and a
//! [Monte Carlo tree search](https://en.wikipedia.org/wiki/Monte_Carlo_tree_search) adapted to
//! routing. Every algorithm reports its open and closed sets to a [FrontierObserver] after each
//! expansion, so a caller can animate the search without the search knowing about it.
//! Pre-computes [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! to answer unreachable goals without flood-filling the board.
//!
//! ```
//! use grid_search::{Algorithm, Connectivity, Coordinate, Grid, Pathfinder};
//!
//! let mut grid = Grid::new(3, Connectivity::Four);
//! grid.set_obstacle(Coordinate::new(1, 1), true).unwrap();
//! let path = Pathfinder::default().find_path(
//!     &mut grid,
//!     Algorithm::AStar,
//!     Coordinate::new(0, 0),
//!     Coordinate::new(2, 2),
//! );
//! assert_eq!(path.len(), 5);
//! ```
pub mod cancel;
pub mod config;
pub mod coordinate;
pub mod distance;
pub mod error;
pub mod frontier;
pub mod grid;
pub mod node;
pub mod observer;
pub mod path;
pub mod pathfinder;
pub mod solver;

pub use cancel::CancellationToken;
pub use config::SearchConfig;
pub use coordinate::Coordinate;
pub use error::GridError;
pub use frontier::{Frontier, Side};
pub use grid::{Connectivity, GoalToggle, Grid};
pub use node::Node;
pub use observer::{FnObserver, FrontierObserver, FrontierRecorder, NoopObserver, Throttle};
pub use path::{extract_path, is_valid_path, path_cost};
pub use pathfinder::{Leg, Pathfinder};
pub use solver::exhaustive::all_simple_paths;
pub use solver::{Algorithm, GridSolver, SearchResult, SearchStatus};

/// Steps of a Monte Carlo rollout.
pub const DEFAULT_ROLLOUT_DEPTH: usize = 10;
/// Weight of the exploration term of the upper confidence bound.
pub const DEFAULT_EXPLORATION: f64 = 2.0;
/// Reward of a rollout ending one step from the goal.
pub const ROLLOUT_REWARD_SCALE: f64 = 100.0;
