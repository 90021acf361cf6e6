use grid_search::{Algorithm, Connectivity, Coordinate, Grid, Pathfinder};

// In this example a path is found on a grid with shape
// S..
// .#.
// ..G
// S marks the start
// G marks the goal
// Every algorithm is run on the same board; the grid resets its search state between runs.
fn main() {
    let mut grid = Grid::new(3, Connectivity::Four);
    grid.set_obstacle(Coordinate::new(1, 1), true).unwrap();
    let start = Coordinate::new(0, 0);
    let goal = Coordinate::new(2, 2);
    let pathfinder = Pathfinder::default();
    for algorithm in Algorithm::ALL {
        let result = pathfinder.search(&mut grid, algorithm, start, goal);
        println!(
            "{algorithm}: {:?} after {} expansions",
            result.status, result.expansions
        );
        for p in result.path {
            println!("  {p}");
        }
    }
}
