//! Shared dungeon builders for the integration suite.

use gridworld_rl::{GridWorld, RewardModel, State};

/// The example dungeon: a 4x3 grid with the start bottom-left, the goal
/// top-right, one obstacle in the middle, and the hazard cell at (3, 1).
///
/// ```text
/// ...G
/// .X..
/// S...
/// ```
#[allow(dead_code)]
pub fn example_dungeon() -> (GridWorld, RewardModel) {
    let mut grid = GridWorld::new(4, 3);
    grid.set_start(0, 2).unwrap();
    grid.set_goal(3, 0).unwrap();
    grid.set_obstacle(1, 1).unwrap();
    let rewards = RewardModel::new(grid.goal().unwrap()).with_hazard(State::new(3, 1));
    (grid, rewards)
}

/// A 2x1 corridor with the goal on the right and no hazard.
#[allow(dead_code)]
pub fn corridor() -> (GridWorld, RewardModel) {
    let mut grid = GridWorld::new(2, 1);
    grid.set_start(0, 0).unwrap();
    grid.set_goal(1, 0).unwrap();
    let rewards = RewardModel::new(grid.goal().unwrap());
    (grid, rewards)
}
