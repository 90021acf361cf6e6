//! Open/closed set bookkeeping shared by the cost-driven searches, and the read-only
//! [Frontier] view handed to observers after every expansion.
use crate::coordinate::Coordinate;
use crate::grid::Grid;
use crate::node::Node;
use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use num_traits::Zero;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

pub type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

struct SmallestCostHolder<K> {
    estimated_cost: K,
    cost: K,
    sequence: usize,
    index: usize,
}

impl<K: PartialOrd> Eq for SmallestCostHolder<K> {}

impl<K: PartialOrd> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: PartialOrd> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: PartialOrd> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // First orders per estimated cost, then favours the larger accumulated cost (the smaller
        // heuristic), then the earlier insertion.
        let by_estimate = other
            .estimated_cost
            .partial_cmp(&self.estimated_cost)
            .unwrap_or(Ordering::Equal);
        let by_cost = self
            .cost
            .partial_cmp(&other.cost)
            .unwrap_or(Ordering::Equal);
        by_estimate
            .then(by_cost)
            .then(other.sequence.cmp(&self.sequence))
    }
}

/// Priority set keyed by ascending estimated cost. Improving an entry pushes a fresh copy; the
/// superseded one is discarded lazily when it surfaces, since it is no longer a member.
pub(crate) struct OpenSet<C> {
    heap: BinaryHeap<SmallestCostHolder<C>>,
    members: FxIndexSet<usize>,
    sequence: usize,
}

impl<C: PartialOrd + Copy + Zero> OpenSet<C> {
    pub fn new() -> OpenSet<C> {
        OpenSet {
            heap: BinaryHeap::new(),
            members: FxIndexSet::default(),
            sequence: 0,
        }
    }

    pub fn with_start(index: usize, estimated_cost: C) -> OpenSet<C> {
        let mut open = OpenSet::new();
        open.push(index, estimated_cost, Zero::zero());
        open
    }

    pub fn push(&mut self, index: usize, estimated_cost: C, cost: C) {
        self.members.insert(index);
        self.heap.push(SmallestCostHolder {
            estimated_cost,
            cost,
            sequence: self.sequence,
            index,
        });
        self.sequence += 1;
    }

    pub fn pop(&mut self) -> Option<usize> {
        while let Some(SmallestCostHolder { index, .. }) = self.heap.pop() {
            if self.members.swap_remove(&index) {
                return Some(index);
            }
        }
        None
    }

    /// Estimated cost of the entry [pop](Self::pop) would return next.
    pub fn peek_estimate(&mut self) -> Option<C> {
        while let Some(top) = self.heap.peek() {
            if self.members.contains(&top.index) {
                return Some(top.estimated_cost);
            }
            self.heap.pop();
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &FxIndexSet<usize> {
        &self.members
    }
}

/// Which end of a bidirectional search a [Frontier] belongs to. Single-ended searches only report
/// [Side::Forward].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Forward,
    Backward,
}

/// Snapshot of the open and closed sets right after a node has been expanded.
pub struct Frontier<'a> {
    grid: &'a Grid,
    open: &'a FxIndexSet<usize>,
    closed: &'a FxIndexSet<usize>,
    /// The node that was just expanded.
    pub current: Coordinate,
    /// Number of expansions performed so far in the run, this one included.
    pub expansion: usize,
    pub side: Side,
}

impl<'a> Frontier<'a> {
    pub(crate) fn new(
        grid: &'a Grid,
        open: &'a FxIndexSet<usize>,
        closed: &'a FxIndexSet<usize>,
        current: usize,
        expansion: usize,
        side: Side,
    ) -> Frontier<'a> {
        Frontier {
            grid,
            open,
            closed,
            current: grid.coordinate_of(current),
            expansion,
            side,
        }
    }

    pub fn open(&self) -> impl Iterator<Item = &'a Node> + 'a {
        let grid = self.grid;
        self.open.iter().map(move |&ix| grid.node_at(ix))
    }

    pub fn closed(&self) -> impl Iterator<Item = &'a Node> + 'a {
        let grid = self.grid;
        self.closed.iter().map(move |&ix| grid.node_at(ix))
    }

    pub fn open_coordinates(&self) -> Vec<Coordinate> {
        self.open().map(Node::coordinate).collect()
    }

    pub fn closed_coordinates(&self) -> Vec<Coordinate> {
        self.closed().map(Node::coordinate).collect()
    }

    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_lowest_estimate_first() {
        let mut open: OpenSet<f64> = OpenSet::new();
        open.push(1, 5.0, 1.0);
        open.push(2, 3.0, 1.0);
        open.push(3, 4.0, 1.0);
        assert_eq!(open.pop(), Some(2));
        assert_eq!(open.pop(), Some(3));
        assert_eq!(open.pop(), Some(1));
        assert_eq!(open.pop(), None);
        assert!(open.is_empty());
    }

    #[test]
    fn ties_prefer_smaller_heuristic_then_insertion() {
        let mut open: OpenSet<f64> = OpenSet::new();
        open.push(1, 4.0, 1.0);
        open.push(2, 4.0, 3.0);
        open.push(3, 4.0, 3.0);
        assert_eq!(open.pop(), Some(2));
        assert_eq!(open.pop(), Some(3));
        assert_eq!(open.pop(), Some(1));
    }

    #[test]
    fn superseded_entries_are_skipped() {
        let mut open: OpenSet<f64> = OpenSet::with_start(0, 0.0);
        assert_eq!(open.pop(), Some(0));
        open.push(7, 9.0, 9.0);
        open.push(7, 2.0, 2.0);
        open.push(8, 5.0, 5.0);
        assert_eq!(open.members().len(), 2);
        assert_eq!(open.peek_estimate(), Some(2.0));
        assert_eq!(open.pop(), Some(7));
        assert_eq!(open.pop(), Some(8));
        assert_eq!(open.pop(), None);
    }
}
