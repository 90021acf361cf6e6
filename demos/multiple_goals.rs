use grid_search::{Algorithm, Connectivity, Grid, Pathfinder};

// In this example the goals of the board are visited in the order they were added, each leg
// starting where the previous one ended. The board has shape
// S...#....
// .##.#.##.
// ...G#..G.
// .#.......
// G........
// where
// - \# marks an obstacle
// - S marks the start
// - G marks a goal, numbered in reading order
fn main() {
    let mut grid = Grid::from_ascii(
        "S...#....
         .##.#.##.
         ...G#..G.
         .#.......
         G........",
        Connectivity::Eight,
    )
    .unwrap();
    println!("{grid}");
    let legs = Pathfinder::default().route(&mut grid, Algorithm::AStar);
    for leg in legs {
        println!(
            "{} -> {}: {:?}, cost {:.3}",
            leg.from, leg.to, leg.result.status, leg.result.cost
        );
        for p in leg.result.path {
            println!("  {p}");
        }
    }
}
