use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::game::{
    Action, Direction, GameConfig, GameEngine, GameState, OccupancyGrid, Position, StateKey,
};

/// Result of applying an action to the live environment
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome<S> {
    /// State after the step
    pub state: S,
    /// Reward collected by the step
    pub reward: f64,
    /// Whether the episode is over
    pub terminated: bool,
    /// Game score after the step
    pub score: u32,
}

/// Capability the learning agents consume
///
/// The query methods (`legal_actions`, `successor`, `reward`, `state_key`)
/// form a model of the game and must not disturb the live episode.
/// `reset` and `step` drive the live episode for the training harness.
pub trait Environment {
    type State: Clone + Debug;
    type Action: Copy + Eq + Hash + Debug + Serialize + DeserializeOwned;
    /// Exact lookup key for tabular learning
    type Key: Clone + Eq + Hash + Debug + Serialize + DeserializeOwned;

    /// Legal actions in `state`; empty means terminal
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// State that follows taking `action` in `state`
    fn successor(&self, state: &Self::State, action: Self::Action) -> Self::State;

    /// Reward for taking `action` in `state` as the `step`-th move of the episode
    fn reward(&self, state: &Self::State, action: Self::Action, step: usize) -> f64;

    /// Exact lookup key for `state`
    fn state_key(&self, state: &Self::State) -> Self::Key;

    /// Start a new live episode and return its first state
    fn reset(&mut self) -> Self::State;

    /// Apply `action` to the live episode
    fn step(&mut self, action: Self::Action) -> StepOutcome<Self::State>;
}

/// Board geometry a state exposes to feature extraction
pub trait BoardSensors {
    fn heading(&self) -> Direction;
    fn head(&self) -> Position;
    fn food(&self) -> Position;
    /// Occupancy matrix, obstacles marked
    fn occupancy(&self) -> OccupancyGrid;
    fn width(&self) -> usize;
    fn height(&self) -> usize;
}

impl BoardSensors for GameState {
    fn heading(&self) -> Direction {
        self.snake.direction
    }

    fn head(&self) -> Position {
        self.snake.head()
    }

    fn food(&self) -> Position {
        self.food
    }

    fn occupancy(&self) -> OccupancyGrid {
        GameState::occupancy(self)
    }

    fn width(&self) -> usize {
        self.grid_width
    }

    fn height(&self) -> usize {
        self.grid_height
    }
}

/// Snake environment for reinforcement learning
///
/// Wraps the game engine: the model queries go through the engine's
/// deterministic transition, the live episode through its food-spawning step.
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
}

impl SnakeEnvironment {
    /// Create a new Snake environment
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.reset();
        Self { engine, state }
    }

    /// Draw every food cell at random instead of replaying the shared sequence
    pub fn set_random_food(&mut self, randomize: bool) {
        self.engine.food_plan_mut().set_randomize(randomize);
    }

    /// Food cells recorded so far
    pub fn food_positions(&self) -> &[Position] {
        self.engine.food_plan().positions()
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    /// Get reference to current game state (for testing/debugging)
    pub fn state(&self) -> &GameState {
        &self.state
    }
}

impl Environment for SnakeEnvironment {
    type State = GameState;
    type Action = Action;
    type Key = StateKey;

    fn legal_actions(&self, state: &GameState) -> Vec<Action> {
        if state.is_alive {
            Action::ALL.to_vec()
        } else {
            Vec::new()
        }
    }

    fn successor(&self, state: &GameState, action: Action) -> GameState {
        self.engine.transition(state, action).0
    }

    /// The game tracks its own step counter for the step limit, so `step` is
    /// not consulted here.
    fn reward(&self, state: &GameState, action: Action, _step: usize) -> f64 {
        self.engine.transition(state, action).1.reward
    }

    fn state_key(&self, state: &GameState) -> StateKey {
        state.key()
    }

    fn reset(&mut self) -> GameState {
        self.state = self.engine.reset();
        self.state.clone()
    }

    fn step(&mut self, action: Action) -> StepOutcome<GameState> {
        let result = self.engine.step(&mut self.state, action);
        StepOutcome {
            state: self.state.clone(),
            reward: result.reward,
            terminated: result.terminated,
            score: self.state.score,
        }
    }
}
