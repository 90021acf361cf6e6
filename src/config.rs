use crate::{DEFAULT_EXPLORATION, DEFAULT_ROLLOUT_DEPTH, ROLLOUT_REWARD_SCALE};

/// Tunables for a search run. By default rollouts are 10 steps deep, the exploration constant is
/// 2 and there is no step budget.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Maximum number of steps of an MCTS rollout.
    pub rollout_depth: usize,
    /// Weight of the exploration term of the upper confidence bound.
    pub exploration: f64,
    /// A rollout ending `d` steps (Manhattan) from the goal is worth `rollout_reward_scale / d`.
    pub rollout_reward_scale: f64,
    /// Seed of the rollout random number generator. Every run reseeds, so runs are repeatable.
    pub seed: u64,
    /// Stops a run after this many expansions.
    pub max_expansions: Option<usize>,
    /// Stops the exhaustive depth-first enumeration after this many complete paths.
    pub max_enumerated_paths: Option<usize>,
    /// Returns an empty path without searching when start and goal lie on different connected
    /// components.
    pub check_reachability: bool,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            rollout_depth: DEFAULT_ROLLOUT_DEPTH,
            exploration: DEFAULT_EXPLORATION,
            rollout_reward_scale: ROLLOUT_REWARD_SCALE,
            seed: 0,
            max_expansions: None,
            max_enumerated_paths: None,
            check_reachability: true,
        }
    }
}

impl SearchConfig {
    pub fn with_seed(mut self, seed: u64) -> SearchConfig {
        self.seed = seed;
        self
    }

    pub fn with_rollout_depth(mut self, rollout_depth: usize) -> SearchConfig {
        self.rollout_depth = rollout_depth;
        self
    }

    pub fn with_exploration(mut self, exploration: f64) -> SearchConfig {
        self.exploration = exploration;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> SearchConfig {
        self.max_expansions = Some(max_expansions);
        self
    }

    pub fn with_max_enumerated_paths(mut self, max_paths: usize) -> SearchConfig {
        self.max_enumerated_paths = Some(max_paths);
        self
    }

    pub fn with_reachability_check(mut self, check_reachability: bool) -> SearchConfig {
        self.check_reachability = check_reachability;
        self
    }
}
