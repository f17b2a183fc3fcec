use std::path::Path;

use anyhow::Result;

use crate::rl::environment::Environment;

/// A learned Q-function
///
/// The agent drives exploration, episodes and decay; the model only answers
/// Q-value queries, moves toward TD targets, and persists itself.
pub trait ValueModel<E: Environment> {
    /// Q(state, action); unseen pairs read as 0.0
    fn q_value(&self, env: &E, state: &E::State, action: E::Action) -> f64;

    /// Move Q(state, action) toward the bootstrapped `target` with step size `alpha`
    fn update(&mut self, env: &E, state: &E::State, action: E::Action, target: f64, alpha: f64);

    /// Write the learned parameters to `path`
    fn save(&self, path: &Path) -> Result<()>;

    /// Replace the learned parameters with those saved at `path`
    fn load(&mut self, path: &Path) -> Result<()>;

    /// File name used when no checkpoint path is given
    fn default_checkpoint(&self) -> &'static str;

    fn name(&self) -> &'static str;

    /// Number of stored parameters
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
