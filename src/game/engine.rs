use super::{
    action::{Action, Direction},
    config::GameConfig,
    food::FoodPlan,
    state::{CollisionType, GameState, Position, Snake},
};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f64,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// Head cell of the starting snake; the body trails to the left of it
const START_HEAD: Position = Position { x: 3, y: 2 };

/// The game engine that handles all game logic
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: GameConfig,
    food: FoodPlan,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let food = FoodPlan::new(config.seed);
        Self { config, food }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn food_plan(&self) -> &FoodPlan {
        &self.food
    }

    pub fn food_plan_mut(&mut self) -> &mut FoodPlan {
        &mut self.food
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        self.food.rewind();

        let snake = Snake::new(START_HEAD, Direction::Right, self.config.initial_snake_length);
        let mut state = GameState::new(
            snake,
            START_HEAD,
            self.config.grid_width,
            self.config.grid_height,
        );

        match self.next_food(&state) {
            Some(food) => state.food = food,
            None => state.is_alive = false,
        }

        state
    }

    /// Compute the state that follows `action` without touching food placement
    ///
    /// If the snake eats while food is replayed, the next planned cell is
    /// shown without advancing the plan. Otherwise the food cell is left
    /// under the head until the live [`step`](Self::step) respawns it.
    pub fn transition(&self, state: &GameState, action: Action) -> (GameState, StepResult) {
        let mut next = state.clone();

        if !state.is_alive {
            return (
                next,
                StepResult {
                    reward: 0.0,
                    terminated: true,
                    info: StepInfo {
                        ate_food: false,
                        collision_type: None,
                    },
                },
            );
        }

        next.snake.direction = action.apply(state.snake.direction);
        next.steps += 1;

        // Calculate new head position
        let new_head = next.snake.head().moved_in_direction(next.snake.direction);

        // Check for collisions
        if let Some(collision_type) = self.check_collision(&next, new_head) {
            next.is_alive = false;
            return (next, self.death(collision_type));
        }

        // Check if snake ate food
        let ate_food = new_head == next.food;
        next.snake.move_snake(ate_food);
        if ate_food {
            if let Some(food) = self.food.peek_planned(&next.snake) {
                next.food = food;
            }
        }

        let mut reward = self.config.step_penalty;
        if ate_food {
            next.score += 1;
            reward += self.config.food_reward;
        }

        if next.steps >= self.config.max_steps {
            next.is_alive = false;
            return (next, self.death(CollisionType::Starvation));
        }

        (
            next,
            StepResult {
                reward,
                terminated: false,
                info: StepInfo {
                    ate_food,
                    collision_type: None,
                },
            },
        )
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        let (mut next, result) = self.transition(state, action);

        if result.info.ate_food && next.is_alive {
            match self.next_food(&next) {
                Some(food) => next.food = food,
                // Board is full, nothing left to play for
                None => next.is_alive = false,
            }
        }

        let terminated = result.terminated || !next.is_alive;
        *state = next;

        StepResult {
            terminated,
            ..result
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        // Check wall collision
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // Check self-collision
        if state.snake.collides_with_body(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    fn death(&self, collision_type: CollisionType) -> StepResult {
        StepResult {
            reward: self.config.death_penalty,
            terminated: true,
            info: StepInfo {
                ate_food: false,
                collision_type: Some(collision_type),
            },
        }
    }

    fn next_food(&mut self, state: &GameState) -> Option<Position> {
        self.food
            .next_position(&state.snake, state.grid_width, state.grid_height)
    }
}
