use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Euclidean distance to another position, in cells
    pub fn distance(&self, other: Position) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// The snake: a queue of cells, head at the front
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub body: VecDeque<Position>,
    /// Heading the next move will follow
    pub direction: Direction,
}

impl Snake {
    /// Straight snake of `length` cells trailing behind `head`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();
        Self { body, direction }
    }

    /// Snake occupying exactly `cells`, head first
    pub fn from_cells(cells: impl IntoIterator<Item = Position>, direction: Direction) -> Self {
        Self {
            body: cells.into_iter().collect(),
            direction,
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Cells behind the head
    pub fn body_segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter().skip(1)
    }

    /// Whether `pos` is one of the cells behind the head
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().any(|&cell| cell == pos)
    }

    /// Advance one cell along `direction`; the tail stays put when growing
    pub fn move_snake(&mut self, should_grow: bool) {
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.push_front(new_head);
        if !should_grow {
            self.body.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Step limit reached
    Starvation,
}

/// Occupancy matrix of the board, row-major, `true` for obstacle cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Create an empty grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// Mark a cell as occupied; out-of-bounds cells are ignored
    pub fn mark(&mut self, pos: Position) {
        if self.contains(pos) {
            let idx = pos.y as usize * self.width + pos.x as usize;
            self.cells[idx] = true;
        }
    }

    /// Whether a cell is occupied; out-of-bounds cells read as free
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.contains(pos) && self.cells[pos.y as usize * self.width + pos.x as usize]
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }
}

/// Exact lookup key for a board configuration
///
/// Two boards share a key only if body layout, heading and food cell all
/// match. Score and step count are not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateKey {
    pub body: Vec<Position>,
    pub heading: Direction,
    pub food: Position,
}

/// Snapshot of one board
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Food eaten this episode
    pub score: u32,
    /// Moves made this episode, checked against the step limit
    pub steps: u32,
    pub is_alive: bool,
}

impl GameState {
    /// Fresh live board with zero score and steps
    pub fn new(snake: Snake, food: Position, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            is_alive: true,
        }
    }

    pub fn is_in_bounds(&self, pos: Position) -> bool {
        (0..self.grid_width as i32).contains(&pos.x) && (0..self.grid_height as i32).contains(&pos.y)
    }

    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body.contains(&pos)
    }

    /// Board as an occupancy matrix (snake cells are obstacles)
    pub fn occupancy(&self) -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(self.grid_width, self.grid_height);
        for &pos in &self.snake.body {
            grid.mark(pos);
        }
        grid
    }

    /// Exact lookup key for this configuration
    pub fn key(&self) -> StateKey {
        StateKey {
            body: self.snake.body.iter().copied().collect(),
            heading: self.snake.direction,
            food: self.food,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_state() -> GameState {
        GameState::new(
            Snake::new(Position::new(3, 2), Direction::Right, 3),
            Position::new(7, 7),
            10,
            10,
        )
    }

    #[test]
    fn test_position_steps_follow_direction_deltas() {
        let origin = Position::new(4, 4);
        assert_eq!(origin.moved_in_direction(Direction::Up), Position::new(4, 3));
        assert_eq!(origin.moved_in_direction(Direction::Down), Position::new(4, 5));
        assert_eq!(origin.moved_in_direction(Direction::Left), Position::new(3, 4));
        assert_eq!(origin.moved_by(2, -3), Position::new(6, 1));
    }

    #[test]
    fn test_position_distance() {
        assert_eq!(Position::new(0, 0).distance(Position::new(3, 4)), 5.0);
        assert_eq!(Position::new(2, 2).distance(Position::new(2, 2)), 0.0);
    }

    #[test]
    fn test_new_snake_trails_behind_head() {
        let snake = Snake::new(Position::new(3, 2), Direction::Right, 3);
        let cells: Vec<Position> = snake.body.iter().copied().collect();
        assert_eq!(
            cells,
            vec![Position::new(3, 2), Position::new(2, 2), Position::new(1, 2)]
        );

        let upward = Snake::new(Position::new(4, 4), Direction::Up, 2);
        assert_eq!(upward.body[1], Position::new(4, 5));
    }

    #[test]
    fn test_move_keeps_length_unless_growing() {
        let mut snake = Snake::new(Position::new(3, 2), Direction::Right, 3);

        snake.move_snake(false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(4, 2));
        assert_eq!(snake.body.back(), Some(&Position::new(2, 2)));

        snake.direction = Direction::Down;
        snake.move_snake(true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(4, 3));
        assert_eq!(snake.body.back(), Some(&Position::new(2, 2)));
    }

    #[test]
    fn test_body_collision_excludes_head() {
        let snake = Snake::new(Position::new(3, 2), Direction::Right, 3);
        assert!(!snake.collides_with_body(Position::new(3, 2)));
        assert!(snake.collides_with_body(Position::new(1, 2)));
        assert!(!snake.collides_with_body(Position::new(0, 2)));
        assert_eq!(snake.body_segments().count(), 2);
    }

    #[test]
    fn test_bounds_checking() {
        let state = start_state();

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(9, 9)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(10, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 10)));
    }

    #[test]
    fn test_occupancy_marks_whole_snake() {
        let state = start_state();
        let grid = state.occupancy();

        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 10);
        assert_eq!(grid.occupied_count(), 3);
        assert!(grid.is_occupied(Position::new(3, 2)));
        assert!(grid.is_occupied(Position::new(1, 2)));
        assert!(!grid.is_occupied(Position::new(7, 7))); // food is not an obstacle
        assert!(!grid.is_occupied(Position::new(-1, 2)));
    }

    #[test]
    fn test_key_ignores_score_and_steps() {
        let a = start_state();
        let mut b = a.clone();
        b.score = 4;
        b.steps = 17;
        assert_eq!(a.key(), b.key());

        let mut c = a.clone();
        c.food = Position::new(6, 7);
        assert_ne!(a.key(), c.key());
    }
}
