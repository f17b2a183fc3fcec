//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! It is the environment the learning agents are trained against.

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use food::FoodPlan;
pub use state::{CollisionType, GameState, OccupancyGrid, Position, Snake, StateKey};
