use grid_search::{
    Algorithm, Connectivity, Coordinate, FnObserver, Frontier, Grid, Pathfinder, Side, Throttle,
};
use std::time::Duration;

// In this example the frontier of a bidirectional Dijkstra search is printed after every
// expansion, slowed down the way an animated board would show it.
fn main() {
    let mut grid = Grid::new(12, Connectivity::Eight);
    for row in 2..10 {
        grid.set_obstacle(Coordinate::new(row, 6), true).unwrap();
    }
    let start = Coordinate::new(5, 1);
    let goal = Coordinate::new(6, 10);
    let printer = FnObserver(|frontier: &Frontier<'_>| {
        let side = match frontier.side {
            Side::Forward => "forward",
            Side::Backward => "backward",
        };
        println!(
            "#{:<3} {side:<8} expanded {}: {} open, {} closed",
            frontier.expansion,
            frontier.current,
            frontier.open_len(),
            frontier.closed_len()
        );
    });
    let mut observer = Throttle::new(printer, Duration::from_millis(20));
    let result = Pathfinder::default().search_observed(
        &mut grid,
        Algorithm::BidirectionalDijkstra,
        start,
        goal,
        &mut observer,
    );
    println!("{:?}, cost {:.3}", result.status, result.cost);
    println!("{}", grid);
}
