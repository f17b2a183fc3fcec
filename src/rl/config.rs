//! Q-learning hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Hyperparameters for a Q-learning training session
///
/// # Example
///
/// ```rust
/// use snake_qlearn::rl::QLearningConfig;
///
/// // Use default hyperparameters
/// let config = QLearningConfig::default();
///
/// // Or customize specific parameters
/// let config = QLearningConfig {
///     alpha: 0.5,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QLearningConfig {
    /// Learning rate
    ///
    /// Default: 0.3
    pub alpha: f64,

    /// Discount factor for future rewards
    ///
    /// Default: 0.8
    pub gamma: f64,

    /// Initial exploration rate
    ///
    /// Decays linearly to zero over the planned training episodes.
    ///
    /// Default: 0.8
    pub epsilon: f64,

    /// Seed for exploration and tie-break draws; `None` draws from entropy
    pub seed: Option<u64>,
}

impl QLearningConfig {
    /// Create a new configuration with default hyperparameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    ///
    /// # Example
    ///
    /// ```rust
    /// use snake_qlearn::rl::QLearningConfig;
    ///
    /// let mut config = QLearningConfig::default();
    /// config.gamma = 1.5;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(format!("alpha must be in [0, 1], got {}", self.alpha));
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(format!("gamma must be in [0, 1], got {}", self.gamma));
        }

        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(format!("epsilon must be in [0, 1], got {}", self.epsilon));
        }

        Ok(())
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            gamma: 0.8,
            epsilon: 0.8,
            seed: None,
        }
    }
}
