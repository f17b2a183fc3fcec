use serde::{Deserialize, Serialize};

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Episode is cut off (as a starvation death) after this many steps
    pub max_steps: u32,

    // Rewards (for RL)
    /// Reward for eating food
    pub food_reward: f64,
    /// Penalty for each step (encourages efficiency)
    pub step_penalty: f64,
    /// Penalty for dying
    pub death_penalty: f64,

    /// Seed for food placement; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 10,
            grid_height: 10,
            initial_snake_length: 3,
            max_steps: 1000,
            food_reward: 10.0,
            step_penalty: -0.01,
            death_penalty: -10.0,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Fix the food placement seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the configuration
    ///
    /// The starting snake is laid out along one row behind (3, 2), so the
    /// board must fit it.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width < 5 || self.grid_height < 3 {
            return Err(format!(
                "grid must be at least 5x3, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.initial_snake_length == 0 || self.initial_snake_length > 4 {
            return Err(format!(
                "initial_snake_length must be in [1, 4], got {}",
                self.initial_snake_length
            ));
        }

        if self.max_steps == 0 {
            return Err("max_steps must be at least 1".to_string());
        }

        Ok(())
    }
}
