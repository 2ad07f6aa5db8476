//! Grid coordinates and the directional action set

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate on the grid.
///
/// Equality and hashing are structural, so states are usable directly as
/// map keys. `y` grows downward, matching row-major rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State {
    pub x: i32,
    pub y: i32,
}

impl State {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four directional moves.
///
/// The declaration order is the canonical enumeration order: action
/// sampling walks distributions in this order, and greedy argmax ties
/// resolve to the first maximal action in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
}

impl Action {
    /// All actions in declaration order.
    pub const ALL: [Action; 4] = [Action::Left, Action::Right, Action::Up, Action::Down];

    /// Coordinate delta of this move.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
            Action::Up => (0, -1),
            Action::Down => (0, 1),
        }
    }

    /// The cell this move aims at, ignoring bounds and obstacles.
    pub fn apply(self, state: State) -> State {
        let (dx, dy) = self.offset();
        State::new(state.x + dx, state.y + dy)
    }

    /// Single-character rendering for policy maps.
    pub fn glyph(self) -> char {
        match self {
            Action::Left => '<',
            Action::Right => '>',
            Action::Up => '^',
            Action::Down => 'v',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Left => "Left",
            Action::Right => "Right",
            Action::Up => "Up",
            Action::Down => "Down",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_move_one_cell() {
        let origin = State::new(2, 1);
        assert_eq!(Action::Left.apply(origin), State::new(1, 1));
        assert_eq!(Action::Right.apply(origin), State::new(3, 1));
        assert_eq!(Action::Up.apply(origin), State::new(2, 0));
        assert_eq!(Action::Down.apply(origin), State::new(2, 2));
    }

    #[test]
    fn enumeration_order_is_declaration_order() {
        assert_eq!(
            Action::ALL,
            [Action::Left, Action::Right, Action::Up, Action::Down]
        );
    }
}
