//! Cost-blind searches that carry the path so far explicitly instead of reconstructing it from
//! parent links: exhaustive depth-first enumeration of simple paths and breadth-first search.
use crate::coordinate::Coordinate;
use crate::distance::euclidean;
use crate::frontier::{Frontier, FxIndexSet, Side};
use crate::grid::Grid;
use crate::observer::NoopObserver;
use crate::solver::{GridSolver, SearchHooks};
use itertools::Itertools;
use log::{debug, trace};
use std::collections::VecDeque;

/// Depth-first enumeration of the simple paths from `start` to `goal`. `visit` receives every
/// complete path and returns whether to keep enumerating. Returns false if `hooks` stopped the
/// run.
fn depth_first<F>(
    grid: &Grid,
    start: usize,
    goal: usize,
    hooks: &mut SearchHooks<'_>,
    mut visit: F,
) -> bool
where
    F: FnMut(&FxIndexSet<usize>) -> bool,
{
    let extendable = |path: &FxIndexSet<usize>, n: usize| {
        grid.node_at(n).traversable() && !path.contains(&n)
    };
    let mut path: FxIndexSet<usize> = FxIndexSet::default();
    path.insert(start);
    // Position of the next neighbour to try, one entry per node on the path.
    let mut cursors: Vec<usize> = vec![0];
    while let Some(&tip) = path.last() {
        let neighbours = grid.neighbour_indices(tip);
        let from = cursors.last().copied().unwrap_or(neighbours.len());
        let next = neighbours[from..]
            .iter()
            .position(|&n| extendable(&path, n))
            .map(|offset| from + offset);
        let Some(position) = next else {
            path.pop();
            cursors.pop();
            continue;
        };
        if let Some(cursor) = cursors.last_mut() {
            *cursor = position + 1;
        }
        if !hooks.proceed() {
            return false;
        }
        let n = neighbours[position];
        path.insert(n);
        let open: FxIndexSet<usize> = if n == goal {
            FxIndexSet::default()
        } else {
            grid.neighbour_indices(n)
                .iter()
                .copied()
                .filter(|&m| extendable(&path, m))
                .collect()
        };
        let expansion = hooks.expansions();
        hooks.report(&Frontier::new(
            grid,
            &open,
            &path,
            n,
            expansion,
            Side::Forward,
        ));
        if n == goal {
            if !visit(&path) {
                return true;
            }
            path.pop();
        } else {
            cursors.push(0);
        }
    }
    true
}

/// Every simple path from `start` to `goal`, in depth-first discovery order, stopping after
/// `limit` paths if given. The count grows exponentially with the free area, so this is only
/// practical on small boards.
///
/// Returns nothing if either endpoint is out of bounds or blocked, and `[[start]]` if the two
/// coincide.
pub fn all_simple_paths(
    grid: &Grid,
    start: Coordinate,
    goal: Coordinate,
    limit: Option<usize>,
) -> Vec<Vec<Coordinate>> {
    let (Some(start_ix), Some(goal_ix)) = (grid.index_of(start), grid.index_of(goal)) else {
        return Vec::new();
    };
    if !grid.is_traversable(start) || !grid.is_traversable(goal) || limit == Some(0) {
        return Vec::new();
    }
    if start_ix == goal_ix {
        return vec![vec![start]];
    }
    let mut observer = NoopObserver;
    let mut hooks = SearchHooks::new(&mut observer);
    let mut paths: Vec<Vec<Coordinate>> = Vec::new();
    depth_first(grid, start_ix, goal_ix, &mut hooks, |path| {
        paths.push(path.iter().map(|&ix| grid.coordinate_of(ix)).collect());
        limit.map_or(true, |limit| paths.len() < limit)
    });
    paths
}

/// Writes `path` into the nodes' parent links and costs, so the route can also be read back
/// with [extract_path](crate::path::extract_path).
fn link_path(grid: &mut Grid, path: &[usize]) -> Vec<Coordinate> {
    let mut g = 0.0;
    for (&from, &to) in path.iter().tuple_windows() {
        g += euclidean(&grid.coordinate_of(from), &grid.coordinate_of(to));
        let node = grid.node_mut(to);
        node.parent = Some(from);
        node.g = g;
        node.f = g;
    }
    if let Some(&first) = path.first() {
        let node = grid.node_mut(first);
        node.parent = None;
        node.g = 0.0;
        node.f = 0.0;
    }
    path.iter().map(|&ix| grid.coordinate_of(ix)).collect()
}

/// Enumerates every simple path depth-first and keeps the one with the fewest nodes, the
/// earliest found among equals.
#[derive(Clone, Copy, Debug, Default)]
pub struct DfsSolver {
    /// Stops the enumeration after this many complete paths. The answer is then the shortest of
    /// those seen, which need not be the shortest overall.
    pub max_paths: Option<usize>,
}

impl DfsSolver {
    pub fn new() -> DfsSolver {
        DfsSolver { max_paths: None }
    }

    pub fn with_max_paths(max_paths: Option<usize>) -> DfsSolver {
        DfsSolver { max_paths }
    }
}

impl GridSolver for DfsSolver {
    fn name(&self) -> &'static str {
        "DFS"
    }

    fn solve(
        &self,
        grid: &mut Grid,
        start: usize,
        goal: usize,
        hooks: &mut SearchHooks<'_>,
    ) -> Option<Vec<Coordinate>> {
        let mut best: Option<Vec<usize>> = None;
        let mut found = 0usize;
        let completed = depth_first(grid, start, goal, hooks, |path| {
            found += 1;
            if best.as_ref().map_or(true, |best| path.len() < best.len()) {
                trace!("path {found} is the shortest so far ({} nodes)", path.len());
                best = Some(path.iter().copied().collect());
            }
            self.max_paths.map_or(true, |max| found < max)
        });
        if !completed {
            return None;
        }
        debug!("enumerated {found} simple paths");
        best.map(|path| link_path(grid, &path))
    }
}

/// Breadth-first search over explicit paths. A node is queued at most once, on the first and
/// therefore shallowest path that reaches it, so the first path to touch the goal has the fewest
/// steps.
#[derive(Clone, Copy, Debug, Default)]
pub struct BfsSolver;

impl BfsSolver {
    pub fn new() -> BfsSolver {
        BfsSolver
    }
}

impl GridSolver for BfsSolver {
    fn name(&self) -> &'static str {
        "BFS"
    }

    fn solve(
        &self,
        grid: &mut Grid,
        start: usize,
        goal: usize,
        hooks: &mut SearchHooks<'_>,
    ) -> Option<Vec<Coordinate>> {
        let mut queue: VecDeque<Vec<usize>> = VecDeque::from([vec![start]]);
        let mut seen: FxIndexSet<usize> = FxIndexSet::default();
        seen.insert(start);
        let mut closed: FxIndexSet<usize> = FxIndexSet::default();

        while let Some(path) = queue.pop_front() {
            let Some(&tip) = path.last() else {
                continue;
            };
            if !hooks.proceed() {
                return None;
            }
            trace!(
                "expanding {} at depth {}",
                grid.coordinate_of(tip),
                path.len() - 1
            );
            let mut found = None;
            for &n in grid.neighbour_indices(tip) {
                if !grid.node_at(n).traversable() || seen.contains(&n) {
                    continue;
                }
                let mut next = path.clone();
                next.push(n);
                if n == goal {
                    found = Some(next);
                    break;
                }
                seen.insert(n);
                queue.push_back(next);
            }
            closed.insert(tip);
            let open: FxIndexSet<usize> =
                queue.iter().filter_map(|p| p.last().copied()).collect();
            let expansion = hooks.expansions();
            hooks.report(&Frontier::new(
                grid,
                &open,
                &closed,
                tip,
                expansion,
                Side::Forward,
            ));
            if let Some(path) = found {
                return Some(link_path(grid, &path));
            }
        }
        None
    }
}
