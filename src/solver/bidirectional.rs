use crate::coordinate::Coordinate;
use crate::distance::euclidean;
use crate::frontier::{Frontier, FxIndexSet, OpenSet, Side};
use crate::grid::Grid;
use crate::path::extract_index_path;
use crate::solver::{GridSolver, SearchHooks};
use fxhash::FxHashMap;
use log::trace;
use std::iter;

#[derive(Clone, Copy, Debug)]
struct Label {
    g: f64,
    parent: Option<usize>,
}

/// An edge joining the two searches: `near` is closed on the side that found it, `far` on the
/// other one.
#[derive(Clone, Copy, Debug)]
struct Meeting {
    cost: f64,
    near: usize,
    far: usize,
}

/// One direction of the search. Its labels live here rather than on the nodes, so both halves
/// can run over the same grid.
struct Half {
    side: Side,
    open: OpenSet<f64>,
    closed: FxIndexSet<usize>,
    labels: FxHashMap<usize, Label>,
}

impl Half {
    fn new(side: Side, root: usize) -> Half {
        let mut labels = FxHashMap::default();
        labels.insert(root, Label { g: 0.0, parent: None });
        Half {
            side,
            open: OpenSet::with_start(root, 0.0),
            closed: FxIndexSet::default(),
            labels,
        }
    }

    fn g(&self, ix: usize) -> f64 {
        self.labels.get(&ix).map_or(f64::INFINITY, |label| label.g)
    }

    fn parent(&self, ix: usize) -> Option<usize> {
        self.labels.get(&ix).and_then(|label| label.parent)
    }

    fn top(&mut self) -> f64 {
        self.open.peek_estimate().unwrap_or(f64::INFINITY)
    }

    /// Expands `q`, relaxing its neighbours. Returns the cheapest edge from `q` into the closed
    /// set of `other`, if any.
    fn expand(&mut self, grid: &Grid, other: &Half, q: usize) -> Option<Meeting> {
        let q_pos = grid.coordinate_of(q);
        let q_g = self.g(q);
        trace!("{:?} expanding {q_pos} (g = {q_g:.3})", self.side);
        let mut meeting: Option<Meeting> = None;
        for &n in grid.neighbour_indices(q) {
            if !grid.node_at(n).traversable() {
                continue;
            }
            let step = euclidean(&q_pos, &grid.coordinate_of(n));
            if other.closed.contains(&n) {
                let cost = q_g + step + other.g(n);
                if meeting.map_or(true, |m| cost < m.cost) {
                    meeting = Some(Meeting { cost, near: q, far: n });
                }
            }
            if self.closed.contains(&n) {
                continue;
            }
            let tentative_g = q_g + step;
            if tentative_g < self.g(n) {
                self.labels.insert(
                    n,
                    Label {
                        g: tentative_g,
                        parent: Some(q),
                    },
                );
                self.open.push(n, tentative_g, tentative_g);
            }
        }
        self.closed.insert(q);
        meeting
    }
}

/// Dijkstra run simultaneously from start and goal, alternating one expansion per side.
///
/// The searches stop once the best joining edge found so far costs no more than the sum of the
/// two smallest open keys; no route through an unexpanded node can beat it after that.
#[derive(Clone, Copy, Debug, Default)]
pub struct BidirectionalDijkstraSolver;

impl BidirectionalDijkstraSolver {
    pub fn new() -> BidirectionalDijkstraSolver {
        BidirectionalDijkstraSolver
    }
}

/// Pops and expands the next node of `this`, updating `best` with any cheaper meeting. Returns
/// false when `hooks` stops the run.
fn step(
    grid: &Grid,
    this: &mut Half,
    other: &Half,
    hooks: &mut SearchHooks<'_>,
    best: &mut Option<(f64, usize, usize)>,
) -> bool {
    let Some(q) = this.open.pop() else {
        return true;
    };
    if !hooks.proceed() {
        return false;
    }
    if let Some(meeting) = this.expand(grid, other, q) {
        if best.map_or(true, |(cost, _, _)| meeting.cost < cost) {
            let (forward, backward) = match this.side {
                Side::Forward => (meeting.near, meeting.far),
                Side::Backward => (meeting.far, meeting.near),
            };
            *best = Some((meeting.cost, forward, backward));
        }
    }
    let expansion = hooks.expansions();
    hooks.report(&Frontier::new(
        grid,
        this.open.members(),
        &this.closed,
        q,
        expansion,
        this.side,
    ));
    true
}

/// Writes the joined route into the nodes' parent links and extracts it. `u` is reached by
/// `forward`, `v` by `backward`, and the two are neighbours.
fn splice(
    grid: &mut Grid,
    forward: &Half,
    backward: &Half,
    cost: f64,
    u: usize,
    v: usize,
) -> Vec<Coordinate> {
    let limit = grid.len();
    let head: Vec<usize> = iter::successors(Some(u), |&ix| forward.parent(ix))
        .take(limit)
        .collect();
    for &ix in &head {
        let node = grid.node_mut(ix);
        node.parent = forward.parent(ix);
        node.g = forward.g(ix);
        node.f = node.g;
    }
    let tail: Vec<usize> = iter::successors(Some(v), |&ix| backward.parent(ix))
        .take(limit)
        .collect();
    let mut previous = u;
    for &ix in &tail {
        let node = grid.node_mut(ix);
        node.parent = Some(previous);
        node.g = cost - backward.g(ix);
        node.f = node.g;
        previous = ix;
    }
    extract_index_path(grid, previous)
}

impl GridSolver for BidirectionalDijkstraSolver {
    fn name(&self) -> &'static str {
        "Bidirectional Dijkstra"
    }

    fn solve(
        &self,
        grid: &mut Grid,
        start: usize,
        goal: usize,
        hooks: &mut SearchHooks<'_>,
    ) -> Option<Vec<Coordinate>> {
        let mut forward = Half::new(Side::Forward, start);
        let mut backward = Half::new(Side::Backward, goal);
        let mut best: Option<(f64, usize, usize)> = None;
        loop {
            if let Some((cost, u, v)) = best {
                if forward.top() + backward.top() >= cost {
                    trace!(
                        "searches met on {} -> {}",
                        grid.coordinate_of(u),
                        grid.coordinate_of(v)
                    );
                    return Some(splice(grid, &forward, &backward, cost, u, v));
                }
            }
            if forward.open.is_empty() || backward.open.is_empty() {
                return None;
            }
            if !step(grid, &mut forward, &backward, hooks, &mut best) {
                return None;
            }
            if !step(grid, &mut backward, &forward, hooks, &mut best) {
                return None;
            }
        }
    }
}
