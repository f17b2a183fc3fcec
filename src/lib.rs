//! Snake Q-learning - reinforcement learning agents for the Snake game
//!
//! This library provides:
//! - Core game logic and a deterministic transition model (game module)
//! - Tabular and approximate Q-learning agents (rl module)
//! - Training statistics and evaluation summaries (metrics module)
//! - The training and evaluation harness (modes module)

pub mod game;
pub mod metrics;
pub mod modes;
pub mod rl;
