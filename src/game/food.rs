use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::state::{Position, Snake};

/// Source of food positions shared by every episode of a run
///
/// Food cells are replayed in order from the start of each episode, and the
/// sequence grows with random free cells once it runs out. This keeps the
/// board layout reproducible across episodes, which the tabular agent relies
/// on. With `randomize` set, every cell is drawn at random and nothing is
/// recorded.
#[derive(Debug, Clone)]
pub struct FoodPlan {
    positions: Vec<Position>,
    cursor: usize,
    randomize: bool,
    rng: StdRng,
}

impl FoodPlan {
    /// Create an empty plan
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            positions: Vec::new(),
            cursor: 0,
            randomize: false,
            rng,
        }
    }

    /// Create a plan that replays a known sequence first
    pub fn from_positions(positions: Vec<Position>, seed: Option<u64>) -> Self {
        Self {
            positions,
            ..Self::new(seed)
        }
    }

    pub fn set_randomize(&mut self, randomize: bool) {
        self.randomize = randomize;
    }

    pub fn is_randomized(&self) -> bool {
        self.randomize
    }

    /// Recorded food sequence
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Restart the sequence (called at the start of each episode)
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Cell the next replayed spawn will use, without advancing the plan
    ///
    /// `None` whenever that spawn will be drawn at random instead.
    pub fn peek_planned(&self, snake: &Snake) -> Option<Position> {
        if self.randomize {
            return None;
        }
        self.positions
            .get(self.cursor)
            .copied()
            .filter(|pos| !snake.body.contains(pos))
    }

    /// Next food cell for the given snake, or `None` if the board is full
    pub fn next_position(
        &mut self,
        snake: &Snake,
        grid_width: usize,
        grid_height: usize,
    ) -> Option<Position> {
        if self.randomize {
            return self.random_free_cell(snake, grid_width, grid_height);
        }

        let index = self.cursor;
        self.cursor += 1;

        match self.positions.get(index) {
            Some(&pos) if !snake.body.contains(&pos) => Some(pos),
            // Planned cell is under the snake this time around
            Some(_) => self.random_free_cell(snake, grid_width, grid_height),
            None => {
                let pos = self.random_free_cell(snake, grid_width, grid_height)?;
                self.positions.push(pos);
                Some(pos)
            }
        }
    }

    fn random_free_cell(
        &mut self,
        snake: &Snake,
        grid_width: usize,
        grid_height: usize,
    ) -> Option<Position> {
        let free: Vec<Position> = (0..grid_height as i32)
            .flat_map(|y| (0..grid_width as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.body.contains(pos))
            .collect();
        free.choose(&mut self.rng).copied()
    }
}
