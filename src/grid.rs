use crate::coordinate::Coordinate;
use crate::error::GridError;
use crate::node::Node;
use core::fmt;
use itertools::iproduct;
use log::debug;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// Arena indices of the cells adjacent to a node.
pub type Neighbours = SmallVec<[usize; 8]>;

const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (1, 1), (1, -1), (-1, 1)];

/// Neighbour pattern of a [Grid], fixed at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Connectivity {
    /// Orthogonal moves only.
    Four,
    /// Orthogonal and diagonal moves.
    #[default]
    Eight,
}

impl Connectivity {
    /// Row and column offsets of the neighbourhood, orthogonal offsets first.
    pub fn offsets(&self) -> impl Iterator<Item = (i32, i32)> {
        let diagonal: &'static [(i32, i32)] = match self {
            Connectivity::Four => &[],
            Connectivity::Eight => &DIAGONAL,
        };
        ORTHOGONAL.into_iter().chain(diagonal.iter().copied())
    }
}

/// Result of [Grid::add_goal], which toggles goal membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoalToggle {
    Added,
    Removed,
}

/// [Grid] owns every [Node] of a rows × cols board in a flat arena indexed by
/// `row * cols + col`, the adjacency computed once at construction, the start designation and the
/// ordered goal list. Connected components of traversable cells are tracked in a [UnionFind]
/// so that unreachable goals can be detected without a search.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    connectivity: Connectivity,
    nodes: Vec<Node>,
    neighbours: Vec<Neighbours>,
    start: Option<usize>,
    goals: Vec<usize>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Grid {
    /// A square `dimension` × `dimension` board with every cell traversable.
    pub fn new(dimension: usize, connectivity: Connectivity) -> Grid {
        Grid::with_size(dimension, dimension, connectivity)
    }

    pub fn with_size(rows: usize, cols: usize, connectivity: Connectivity) -> Grid {
        let nodes = iproduct!(0..rows, 0..cols)
            .map(|(row, col)| Node::new(Coordinate::new(row, col)))
            .collect::<Vec<_>>();
        let mut grid = Grid {
            rows,
            cols,
            connectivity,
            nodes,
            neighbours: Vec::new(),
            start: None,
            goals: Vec::new(),
            components: UnionFind::new(rows * cols),
            components_dirty: false,
        };
        grid.neighbours = (0..grid.nodes.len())
            .map(|ix| grid.compute_neighbours(ix))
            .collect();
        grid.generate_components();
        grid
    }

    fn compute_neighbours(&self, ix: usize) -> Neighbours {
        let coordinate = self.coordinate_of(ix);
        self.connectivity
            .offsets()
            .filter_map(|(d_row, d_col)| coordinate.offset(d_row, d_col))
            .filter_map(|c| self.index_of(c))
            .collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bounds test on signed components, false for negative values on either axis.
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        coordinate.row < self.rows && coordinate.col < self.cols
    }

    pub fn index_of(&self, coordinate: Coordinate) -> Option<usize> {
        self.contains(&coordinate)
            .then(|| coordinate.row * self.cols + coordinate.col)
    }

    /// Inverse of [index_of](Self::index_of). The index must come from this grid.
    pub fn coordinate_of(&self, ix: usize) -> Coordinate {
        debug_assert!(ix < self.nodes.len());
        Coordinate::new(ix / self.cols, ix % self.cols)
    }

    pub fn node(&self, coordinate: Coordinate) -> Option<&Node> {
        self.index_of(coordinate).map(|ix| &self.nodes[ix])
    }

    pub fn node_at(&self, ix: usize) -> &Node {
        &self.nodes[ix]
    }

    pub(crate) fn node_mut(&mut self, ix: usize) -> &mut Node {
        &mut self.nodes[ix]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The precomputed neighbourhood of a cell, [None] if the coordinate is out of bounds.
    pub fn neighbours_of(&self, coordinate: Coordinate) -> Option<SmallVec<[Coordinate; 8]>> {
        let ix = self.index_of(coordinate)?;
        Some(
            self.neighbours[ix]
                .iter()
                .map(|&n| self.nodes[n].coordinate())
                .collect(),
        )
    }

    pub(crate) fn neighbour_indices(&self, ix: usize) -> &[usize] {
        &self.neighbours[ix]
    }

    /// Whether the cell exists and is not an obstacle.
    pub fn is_traversable(&self, coordinate: Coordinate) -> bool {
        self.node(coordinate).is_some_and(Node::traversable)
    }

    pub fn start(&self) -> Option<Coordinate> {
        self.start.map(|ix| self.coordinate_of(ix))
    }

    /// Goals in insertion order, which is also the visiting order of a multi-goal route.
    pub fn goals(&self) -> Vec<Coordinate> {
        self.goals.iter().map(|&ix| self.coordinate_of(ix)).collect()
    }

    pub fn is_goal(&self, coordinate: Coordinate) -> bool {
        self.index_of(coordinate)
            .is_some_and(|ix| self.goals.contains(&ix))
    }

    fn checked_index(&self, coordinate: Coordinate) -> Result<usize, GridError> {
        self.index_of(coordinate)
            .ok_or(GridError::OutOfBounds { coordinate })
    }

    /// Marks or unmarks a cell as an obstacle. Start and goal nodes are never turned into
    /// obstacles.
    pub fn set_obstacle(&mut self, coordinate: Coordinate, obstacle: bool) -> Result<(), GridError> {
        let ix = self.checked_index(coordinate)?;
        if self.nodes[ix].special {
            return Err(GridError::SpecialNode { coordinate });
        }
        self.set_blocked(ix, obstacle);
        Ok(())
    }

    /// Flips the obstacle state of a cell, returning the new state.
    pub fn toggle_obstacle(&mut self, coordinate: Coordinate) -> Result<bool, GridError> {
        let ix = self.checked_index(coordinate)?;
        let obstacle = self.nodes[ix].traversable;
        self.set_obstacle(coordinate, obstacle)?;
        Ok(obstacle)
    }

    /// Joins newly connected components when a cell opens and flags the components as dirty if
    /// they are (potentially) broken apart into multiple.
    fn set_blocked(&mut self, ix: usize, blocked: bool) {
        let was_blocked = !self.nodes[ix].traversable;
        if was_blocked != blocked && blocked {
            self.components_dirty = true;
        } else if !blocked {
            for &n in &self.neighbours[ix] {
                if self.nodes[n].traversable {
                    self.components.union(ix, n);
                }
            }
        }
        self.nodes[ix].traversable = !blocked;
    }

    /// Makes the cell the start node, releasing the previous start. A goal cannot become the start.
    pub fn designate_start(&mut self, coordinate: Coordinate) -> Result<(), GridError> {
        let ix = self.checked_index(coordinate)?;
        if self.start == Some(ix) {
            return Ok(());
        }
        if self.nodes[ix].special {
            return Err(GridError::SpecialNode { coordinate });
        }
        self.remove_start();
        self.set_blocked(ix, false);
        self.nodes[ix].special = true;
        self.start = Some(ix);
        Ok(())
    }

    /// Turns the start node back into a normal node.
    pub fn remove_start(&mut self) -> Option<Coordinate> {
        let ix = self.start.take()?;
        self.nodes[ix].special = false;
        Some(self.coordinate_of(ix))
    }

    /// Appends a goal, or removes it if the cell already is one. The start cannot become a goal.
    pub fn add_goal(&mut self, coordinate: Coordinate) -> Result<GoalToggle, GridError> {
        let ix = self.checked_index(coordinate)?;
        if self.goals.contains(&ix) {
            self.remove_goal(coordinate)?;
            return Ok(GoalToggle::Removed);
        }
        if self.nodes[ix].special {
            return Err(GridError::SpecialNode { coordinate });
        }
        self.set_blocked(ix, false);
        self.nodes[ix].special = true;
        self.goals.push(ix);
        Ok(GoalToggle::Added)
    }

    pub fn remove_goal(&mut self, coordinate: Coordinate) -> Result<(), GridError> {
        let ix = self.checked_index(coordinate)?;
        let position = self
            .goals
            .iter()
            .position(|&g| g == ix)
            .ok_or(GridError::NotAGoal { coordinate })?;
        self.goals.remove(position);
        self.nodes[ix].special = false;
        Ok(())
    }

    pub fn clear_goals(&mut self) {
        for ix in self.goals.drain(..) {
            self.nodes[ix].special = false;
        }
    }

    /// Reinitialises the run-scoped fields of every node.
    pub fn reset_search_state(&mut self) {
        for node in &mut self.nodes {
            node.reset_run();
        }
    }

    /// Restores the freshly constructed board in place: no obstacles, no start, no goals.
    pub fn clear(&mut self) {
        self.remove_start();
        self.clear_goals();
        for node in &mut self.nodes {
            node.traversable = true;
            node.reset_run();
        }
        self.generate_components();
    }

    /// Retrieves the component id a given [Coordinate] belongs to.
    pub fn component_of(&self, coordinate: Coordinate) -> Option<usize> {
        self.index_of(coordinate).map(|ix| self.components.find(ix))
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: Coordinate, goal: Coordinate) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: Coordinate, goal: Coordinate) -> bool {
        match (self.index_of(start), self.index_of(goal)) {
            (Some(s), Some(g)) => !self.components.equiv(s, g),
            _ => true,
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            debug!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up traversable neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.nodes.len());
        self.components_dirty = false;
        for ix in 0..self.nodes.len() {
            if !self.nodes[ix].traversable {
                continue;
            }
            for &n in &self.neighbours[ix] {
                if n > ix && self.nodes[n].traversable {
                    self.components.union(ix, n);
                }
            }
        }
    }

    /// Parses a board drawn with `.` (free), `#` (obstacle), `S` (start) and `G` (goal). Goals are
    /// added in reading order. Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(text: &str, connectivity: Connectivity) -> Result<Grid, GridError> {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();
        let cols = lines.first().map_or(0, |l| l.chars().count());
        if let Some(row) = lines.iter().position(|l| l.chars().count() != cols) {
            return Err(GridError::Malformed { row });
        }
        let mut grid = Grid::with_size(lines.len(), cols, connectivity);
        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let c = Coordinate::new(row, col);
                match ch {
                    '.' => {}
                    '#' => grid.set_obstacle(c, true)?,
                    'S' => grid.designate_start(c)?,
                    'G' => {
                        grid.add_goal(c)?;
                    }
                    _ => return Err(GridError::Malformed { row }),
                }
            }
        }
        grid.update();
        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let ix = row * self.cols + col;
                let ch = if self.start == Some(ix) {
                    'S'
                } else if self.goals.contains(&ix) {
                    'G'
                } else if !self.nodes[ix].traversable {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbour_counts() {
        let grid = Grid::new(3, Connectivity::Eight);
        assert_eq!(grid.neighbour_indices(0).len(), 3);
        assert_eq!(grid.neighbour_indices(4).len(), 8);
        assert_eq!(grid.neighbour_indices(1).len(), 5);
        let grid = Grid::new(3, Connectivity::Four);
        assert_eq!(grid.neighbour_indices(0).len(), 2);
        assert_eq!(grid.neighbour_indices(4).len(), 4);
    }

    #[test]
    fn neighbours_are_in_bounds_and_not_self() {
        for connectivity in [Connectivity::Four, Connectivity::Eight] {
            let grid = Grid::with_size(4, 6, connectivity);
            assert_eq!(grid.dimensions(), (4, 6));
            for ix in 0..grid.len() {
                let c = grid.coordinate_of(ix);
                for &n in grid.neighbour_indices(ix) {
                    assert_ne!(n, ix);
                    let nc = grid.coordinate_of(n);
                    assert!(grid.contains(&nc));
                    assert!(c.touches(&nc));
                }
            }
        }
    }

    #[test]
    fn bounds() {
        let grid = Grid::new(5, Connectivity::Eight);
        assert!(grid.in_bounds(0, 4));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(0, 5));
        assert!(grid.node(Coordinate::new(5, 0)).is_none());
        assert!(grid.neighbours_of(Coordinate::new(0, 9)).is_none());
    }

    #[test]
    fn special_nodes_cannot_be_obstacles() {
        let mut grid = Grid::new(3, Connectivity::Eight);
        let start = Coordinate::new(0, 0);
        let goal = Coordinate::new(2, 2);
        grid.designate_start(start).unwrap();
        grid.add_goal(goal).unwrap();
        assert_eq!(
            grid.set_obstacle(start, true),
            Err(GridError::SpecialNode { coordinate: start })
        );
        assert!(grid.set_obstacle(goal, true).is_err());
        assert!(grid.is_traversable(start));
        assert!(grid.is_traversable(goal));
    }

    #[test]
    fn start_replaces_previous_start() {
        let mut grid = Grid::new(3, Connectivity::Four);
        grid.designate_start(Coordinate::new(0, 0)).unwrap();
        grid.designate_start(Coordinate::new(1, 1)).unwrap();
        assert_eq!(grid.start(), Some(Coordinate::new(1, 1)));
        assert!(!grid.node(Coordinate::new(0, 0)).unwrap().special());
        grid.add_goal(Coordinate::new(2, 2)).unwrap();
        assert!(grid.designate_start(Coordinate::new(2, 2)).is_err());
        assert_eq!(grid.start(), Some(Coordinate::new(1, 1)));
    }

    #[test]
    fn start_clears_obstacle() {
        let mut grid = Grid::new(3, Connectivity::Four);
        let c = Coordinate::new(1, 1);
        grid.set_obstacle(c, true).unwrap();
        grid.designate_start(c).unwrap();
        assert!(grid.is_traversable(c));
    }

    #[test]
    fn add_goal_toggles() {
        let mut grid = Grid::new(4, Connectivity::Eight);
        let a = Coordinate::new(0, 3);
        let b = Coordinate::new(3, 3);
        assert_eq!(grid.add_goal(a), Ok(GoalToggle::Added));
        assert_eq!(grid.add_goal(b), Ok(GoalToggle::Added));
        assert_eq!(grid.goals(), vec![a, b]);
        assert_eq!(grid.add_goal(a), Ok(GoalToggle::Removed));
        assert_eq!(grid.goals(), vec![b]);
        assert!(!grid.node(a).unwrap().special());
        grid.designate_start(a).unwrap();
        assert!(grid.add_goal(a).is_err());
        assert_eq!(
            grid.remove_goal(a),
            Err(GridError::NotAGoal { coordinate: a })
        );
    }

    #[test]
    fn toggle_obstacle_alternates() {
        let mut grid = Grid::new(3, Connectivity::Four);
        let c = Coordinate::new(1, 1);
        assert_eq!(grid.toggle_obstacle(c), Ok(true));
        assert!(!grid.is_traversable(c));
        assert_eq!(grid.toggle_obstacle(c), Ok(false));
        assert!(grid.is_traversable(c));
        let start = Coordinate::new(0, 0);
        grid.designate_start(start).unwrap();
        assert_eq!(
            grid.toggle_obstacle(start),
            Err(GridError::SpecialNode { coordinate: start })
        );
        assert!(grid.is_traversable(start));
    }

    #[test]
    fn remove_start_releases_node() {
        let mut grid = Grid::new(3, Connectivity::Four);
        let c = Coordinate::new(2, 1);
        assert_eq!(grid.remove_start(), None);
        grid.designate_start(c).unwrap();
        assert_eq!(grid.remove_start(), Some(c));
        assert_eq!(grid.start(), None);
        assert!(!grid.node(c).unwrap().special());
        grid.set_obstacle(c, true).unwrap();
    }

    #[test]
    fn clear_goals_releases_nodes() {
        let mut grid = Grid::new(3, Connectivity::Eight);
        let goals = [Coordinate::new(0, 2), Coordinate::new(2, 0)];
        for goal in goals {
            grid.add_goal(goal).unwrap();
        }
        grid.clear_goals();
        assert!(grid.goals().is_empty());
        for goal in goals {
            assert!(!grid.is_goal(goal));
            assert!(!grid.node(goal).unwrap().special());
            assert_eq!(grid.add_goal(goal), Ok(GoalToggle::Added));
        }
    }

    #[test]
    fn out_of_bounds_mutations_are_rejected() {
        let mut grid = Grid::new(2, Connectivity::Four);
        let c = Coordinate::new(2, 0);
        assert_eq!(
            grid.set_obstacle(c, true),
            Err(GridError::OutOfBounds { coordinate: c })
        );
        assert!(grid.designate_start(c).is_err());
        assert!(grid.add_goal(c).is_err());
    }

    #[test]
    fn clear_restores_board() {
        let mut grid = Grid::from_ascii(
            "S#.
             .#G",
            Connectivity::Four,
        )
        .unwrap();
        grid.node_mut(0).g = 4.0;
        grid.clear();
        assert_eq!(grid.start(), None);
        assert!(grid.goals().is_empty());
        assert!(grid.nodes().iter().all(|n| n.traversable() && !n.special()));
        assert!(grid.node_at(0).g.is_infinite());
        assert!(grid.reachable(Coordinate::new(0, 0), Coordinate::new(1, 2)));
    }

    #[test]
    fn ascii_round_trip() {
        let text = "S..#\n.##.\n...G\n";
        let grid = Grid::from_ascii(text, Connectivity::Eight).unwrap();
        assert_eq!(grid.to_string(), text);
        assert_eq!(grid.start(), Some(Coordinate::new(0, 0)));
        assert_eq!(grid.goals(), vec![Coordinate::new(2, 3)]);
    }

    #[test]
    fn malformed_ascii() {
        assert_eq!(
            Grid::from_ascii("...\n..", Connectivity::Four).unwrap_err(),
            GridError::Malformed { row: 1 }
        );
        assert!(Grid::from_ascii("..x", Connectivity::Four).is_err());
    }

    /// Tests whether points are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // |.#.|
        // |.#.|
        let mut grid = Grid::with_size(2, 3, Connectivity::Eight);
        grid.set_obstacle(Coordinate::new(0, 1), true).unwrap();
        grid.set_obstacle(Coordinate::new(1, 1), true).unwrap();
        assert!(grid.components_dirty);
        grid.update();
        let p1 = Coordinate::new(0, 0);
        let p2 = Coordinate::new(1, 1);
        let p3 = Coordinate::new(1, 0);
        let p4 = Coordinate::new(0, 2);
        assert!(grid.unreachable(p1, p2));
        assert!(grid.reachable(p1, p3));
        assert!(grid.unreachable(p1, p4));
        grid.set_obstacle(Coordinate::new(0, 1), false).unwrap();
        assert!(grid.reachable(p1, p4));
    }

    // Tests whether connectivity has the expected effect on diagonal reachability in a minimal setting.
    #[test]
    fn test_diagonal_switch_reachable() {
        //  __
        // |.#|
        // |#.|
        //  __
        let text = ".#\n#.";
        let four = Grid::from_ascii(text, Connectivity::Four).unwrap();
        let eight = Grid::from_ascii(text, Connectivity::Eight).unwrap();
        let start = Coordinate::new(0, 0);
        let end = Coordinate::new(1, 1);
        assert!(four.unreachable(start, end));
        assert!(eight.reachable(start, end));
    }
}
