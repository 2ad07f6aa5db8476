//! Grid-world environment: bounds, obstacles, and start/goal bookkeeping

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    types::{Action, State},
};

/// A rectangular grid world with obstacle cells, a start cell, and a goal
/// cell.
///
/// Coordinates are `(x, y)` with the origin in the top-left corner and `y`
/// growing downward. Moves that would leave the grid or land on an obstacle
/// are resolved by [`GridWorld::step`] to the originating cell - bumping
/// into a wall is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridWorld {
    width: i32,
    height: i32,
    obstacles: HashSet<State>,
    start: Option<State>,
    goal: Option<State>,
}

impl GridWorld {
    /// Create a grid of the given dimensions with every cell open.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            obstacles: HashSet::new(),
            start: None,
            goal: None,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn check_bounds(&self, x: i32, y: i32) -> Result<()> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Mark the start cell.
    ///
    /// # Errors
    ///
    /// `Error::OutOfBounds` outside the grid, `Error::InvalidConfiguration`
    /// on an obstacle cell.
    pub fn set_start(&mut self, x: i32, y: i32) -> Result<()> {
        self.check_bounds(x, y)?;
        let cell = State::new(x, y);
        if self.obstacles.contains(&cell) {
            return Err(Error::InvalidConfiguration {
                message: format!("start cell {cell} is an obstacle"),
            });
        }
        self.start = Some(cell);
        Ok(())
    }

    /// Mark the goal cell.
    ///
    /// # Errors
    ///
    /// `Error::OutOfBounds` outside the grid, `Error::InvalidConfiguration`
    /// on an obstacle cell.
    pub fn set_goal(&mut self, x: i32, y: i32) -> Result<()> {
        self.check_bounds(x, y)?;
        let cell = State::new(x, y);
        if self.obstacles.contains(&cell) {
            return Err(Error::InvalidConfiguration {
                message: format!("goal cell {cell} is an obstacle"),
            });
        }
        self.goal = Some(cell);
        Ok(())
    }

    /// Mark an obstacle cell.
    ///
    /// # Errors
    ///
    /// `Error::OutOfBounds` outside the grid, `Error::InvalidConfiguration`
    /// on the start or goal cell.
    pub fn set_obstacle(&mut self, x: i32, y: i32) -> Result<()> {
        self.check_bounds(x, y)?;
        let cell = State::new(x, y);
        if self.start == Some(cell) || self.goal == Some(cell) {
            return Err(Error::InvalidConfiguration {
                message: format!("obstacle cell {cell} collides with the start or goal"),
            });
        }
        self.obstacles.insert(cell);
        Ok(())
    }

    /// The configured start cell, or `Error::StartNotSet`.
    pub fn start(&self) -> Result<State> {
        self.start.ok_or(Error::StartNotSet)
    }

    /// The configured goal cell, or `Error::GoalNotSet`.
    pub fn goal(&self) -> Result<State> {
        self.goal.ok_or(Error::GoalNotSet)
    }

    /// Whether `(x, y)` is in bounds and not an obstacle.
    pub fn is_available(&self, x: i32, y: i32) -> bool {
        x >= 0
            && x < self.width
            && y >= 0
            && y < self.height
            && !self.obstacles.contains(&State::new(x, y))
    }

    pub fn is_goal(&self, state: State) -> bool {
        self.goal == Some(state)
    }

    /// Attempt a move. Blocked and out-of-grid moves return the
    /// originating state unchanged.
    pub fn step(&self, state: State, action: Action) -> State {
        let candidate = action.apply(state);
        if self.is_available(candidate.x, candidate.y) {
            candidate
        } else {
            state
        }
    }

    /// Every cell in row-major order, obstacles included.
    pub fn states(&self) -> Vec<State> {
        let mut states = Vec::with_capacity((self.width * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                states.push(State::new(x, y));
            }
        }
        states
    }

    /// The non-obstacle cells in row-major order.
    pub fn open_states(&self) -> Vec<State> {
        self.states()
            .into_iter()
            .filter(|state| !self.obstacles.contains(state))
            .collect()
    }
}

impl fmt::Display for GridWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = State::new(x, y);
                let glyph = if self.start == Some(cell) {
                    'S'
                } else if self.goal == Some(cell) {
                    'G'
                } else if self.obstacles.contains(&cell) {
                    'X'
                } else {
                    '.'
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dungeon() -> GridWorld {
        let mut grid = GridWorld::new(4, 3);
        grid.set_start(0, 2).unwrap();
        grid.set_goal(3, 0).unwrap();
        grid.set_obstacle(1, 1).unwrap();
        grid
    }

    #[test]
    fn step_moves_into_open_cells() {
        let grid = dungeon();
        assert_eq!(
            grid.step(State::new(0, 2), Action::Right),
            State::new(1, 2)
        );
    }

    #[test]
    fn step_blocked_by_walls_and_obstacles() {
        let grid = dungeon();
        // Out of the grid on two sides.
        assert_eq!(grid.step(State::new(0, 2), Action::Left), State::new(0, 2));
        assert_eq!(grid.step(State::new(0, 2), Action::Down), State::new(0, 2));
        // Into the obstacle.
        assert_eq!(grid.step(State::new(1, 2), Action::Up), State::new(1, 2));
    }

    #[test]
    fn states_enumerate_row_major() {
        let grid = dungeon();
        let states = grid.states();
        assert_eq!(states.len(), 12);
        assert_eq!(states[0], State::new(0, 0));
        assert_eq!(states[3], State::new(3, 0));
        assert_eq!(states[4], State::new(0, 1));
        assert!(grid.open_states().len() == 11);
        assert!(!grid.open_states().contains(&State::new(1, 1)));
    }

    #[test]
    fn configuration_errors() {
        let mut grid = GridWorld::new(4, 3);
        assert!(matches!(grid.start(), Err(Error::StartNotSet)));
        assert!(matches!(grid.goal(), Err(Error::GoalNotSet)));
        assert!(matches!(
            grid.set_goal(4, 0),
            Err(Error::OutOfBounds { .. })
        ));
        grid.set_goal(3, 0).unwrap();
        assert!(matches!(
            grid.set_obstacle(3, 0),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn renders_the_dungeon() {
        let grid = dungeon();
        assert_eq!(format!("{grid}"), "...G\n.X..\nS...\n");
    }
}
