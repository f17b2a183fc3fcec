//! Small deterministic environment for agent tests

use serde::{Deserialize, Serialize};

use crate::rl::environment::{Environment, StepOutcome};
use crate::rl::features::{FeatureExtractor, FeatureVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Move {
    /// Advance one cell
    A,
    /// Stay
    B,
    /// Stay
    C,
}

/// Corridor of cells `0..=goal`; reaching `goal` pays `goal_reward` and ends
/// the episode. Live episodes also end after `max_steps` steps.
#[derive(Debug, Clone)]
pub struct TableEnv {
    pub goal: u32,
    pub goal_reward: f64,
    /// Live episodes are cut off after this many steps
    pub max_steps: u32,
    position: u32,
    steps: u32,
}

impl Default for TableEnv {
    fn default() -> Self {
        Self {
            goal: 3,
            goal_reward: 10.0,
            max_steps: 50,
            position: 0,
            steps: 0,
        }
    }
}

impl Environment for TableEnv {
    type State = u32;
    type Action = Move;
    type Key = u32;

    fn legal_actions(&self, state: &u32) -> Vec<Move> {
        if *state >= self.goal {
            Vec::new()
        } else {
            vec![Move::A, Move::B, Move::C]
        }
    }

    fn successor(&self, state: &u32, action: Move) -> u32 {
        match action {
            Move::A => (*state + 1).min(self.goal),
            Move::B | Move::C => *state,
        }
    }

    fn reward(&self, state: &u32, action: Move, _step: usize) -> f64 {
        if *state < self.goal && self.successor(state, action) == self.goal {
            self.goal_reward
        } else {
            0.0
        }
    }

    fn state_key(&self, state: &u32) -> u32 {
        *state
    }

    fn reset(&mut self) -> u32 {
        self.position = 0;
        self.steps = 0;
        self.position
    }

    fn step(&mut self, action: Move) -> StepOutcome<u32> {
        let reward = self.reward(&self.position, action, 0);
        self.position = self.successor(&self.position, action);
        self.steps += 1;
        StepOutcome {
            state: self.position,
            reward,
            terminated: self.position >= self.goal || self.steps >= self.max_steps,
            score: self.position,
        }
    }
}

/// Fires a single feature `unit` = 1.0 for every (state, action)
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitFeature;

impl FeatureExtractor<TableEnv> for UnitFeature {
    fn extract(&self, _env: &TableEnv, _state: &u32, _action: Move) -> FeatureVector {
        [("unit", 1.0)].into_iter().collect()
    }
}

/// Fires `move_a`, `move_b` or `move_c` = 1.0 depending on the action
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionFeature;

impl FeatureExtractor<TableEnv> for ActionFeature {
    fn extract(&self, _env: &TableEnv, _state: &u32, action: Move) -> FeatureVector {
        let name = match action {
            Move::A => "move_a",
            Move::B => "move_b",
            Move::C => "move_c",
        };
        [(name, 1.0)].into_iter().collect()
    }
}
