use serde::{Deserialize, Serialize};

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Direction after a quarter turn counter-clockwise (the snake's left)
    pub fn turned_left(&self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    /// Direction after a quarter turn clockwise (the snake's right)
    pub fn turned_right(&self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }
}

/// Action that can be taken in the game, relative to the current heading
///
/// Relative actions make reversing into the body impossible, so every live
/// state has exactly three legal actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Keep the current heading
    Straight,
    /// Quarter turn to the snake's left
    TurnLeft,
    /// Quarter turn to the snake's right
    TurnRight,
}

impl Action {
    /// All actions, in a fixed order
    pub const ALL: [Action; 3] = [Action::Straight, Action::TurnLeft, Action::TurnRight];

    /// Heading that results from taking this action while facing `heading`
    pub fn apply(&self, heading: Direction) -> Direction {
        match self {
            Action::Straight => heading,
            Action::TurnLeft => heading.turned_left(),
            Action::TurnRight => heading.turned_right(),
        }
    }
}
