//! Q-learning agents for the Snake game
//!
//! Provides:
//! - Environment capability consumed by the learners
//! - Tabular and linear Q-functions behind one `ValueModel` trait
//! - Hand-engineered snake features for the linear model
//! - Epsilon-greedy agent with linear exploration decay
//! - JSON checkpoints of learned parameters

pub mod agent;
pub mod config;
pub mod environment;
pub mod features;
pub mod linear;
pub mod model;
pub mod persistence;
pub mod policy;
pub mod q_table;

#[cfg(test)]
pub(crate) mod testing;

pub use agent::{Agent, ApproxQAgent, QLearningAgent};
pub use config::QLearningConfig;
pub use environment::{BoardSensors, Environment, SnakeEnvironment, StepOutcome};
pub use features::{FeatureExtractor, FeatureVector, SnakeFeatures};
pub use linear::{LinearModel, WEIGHTS_CHECKPOINT};
pub use model::ValueModel;
pub use persistence::{Checkpoint, CheckpointMetadata, ModelKind};
pub use q_table::{QTable, QTABLE_CHECKPOINT};
