//! Epsilon-greedy Q-learning agent
//!
//! The agent owns a [`ValueModel`] and drives everything around it: episode
//! bookkeeping, exploration, the TD target, and the training schedule.
//! [`QLearningAgent`] and [`ApproxQAgent`] are the two compositions.

use std::marker::PhantomData;
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::config::QLearningConfig;
use super::environment::Environment;
use super::features::SnakeFeatures;
use super::linear::LinearModel;
use super::model::ValueModel;
use super::policy;
use super::q_table::QTable;

/// Exact tabular Q-learning over the environment's state keys
pub type QLearningAgent<E> =
    Agent<E, QTable<<E as Environment>::Key, <E as Environment>::Action>>;

/// Approximate Q-learning with a linear model over extracted features
pub type ApproxQAgent<E, X = SnakeFeatures> = Agent<E, LinearModel<X>>;

/// Q-learning driver shared by the tabular and approximate agents
///
/// Lifecycle: [`start_training`](Agent::start_training), then per episode
/// [`start_episode`](Agent::start_episode), repeated
/// [`next_action`](Agent::next_action), [`stop_episode`](Agent::stop_episode);
/// finally [`stop_training`](Agent::stop_training) before greedy evaluation.
///
/// # Example
///
/// ```rust
/// use snake_qlearn::game::GameConfig;
/// use snake_qlearn::rl::{Agent, Environment, QLearningAgent, QLearningConfig, QTable, SnakeEnvironment};
///
/// let mut env = SnakeEnvironment::new(GameConfig::default().with_seed(7));
/// let config = QLearningConfig { seed: Some(7), ..Default::default() };
/// let mut agent: QLearningAgent<SnakeEnvironment> = Agent::new(QTable::new(), config);
///
/// agent.start_training(1);
/// agent.start_episode();
/// let state = env.reset();
/// let action = agent.next_action(&env, &state).unwrap();
/// env.step(action);
/// agent.stop_episode();
/// ```
pub struct Agent<E: Environment, M> {
    /// Learned Q-function
    model: M,

    /// Hyperparameters applied by `start_training`
    config: QLearningConfig,

    /// Learning rate in effect
    alpha: f64,

    /// Discount factor in effect
    gamma: f64,

    /// Exploration rate in effect
    epsilon: f64,

    /// Exploration rate at the start of training, sets the decay step
    initial_epsilon: f64,

    /// Planned number of training episodes
    num_training: usize,

    training: bool,

    /// Reward collected in the current episode
    episode_rewards: f64,

    /// Steps taken in the current episode
    step: usize,

    accum_train_rewards: f64,
    accum_test_rewards: f64,
    episodes_so_far: usize,

    /// Single source for exploration and tie-break draws
    rng: StdRng,

    _env: PhantomData<fn() -> E>,
}

impl<E, M> Agent<E, M>
where
    E: Environment,
    M: ValueModel<E>,
{
    /// Create an idle agent around `model`
    ///
    /// Until [`start_training`](Agent::start_training) is called the agent
    /// acts greedily and never updates its model.
    pub fn new(model: M, config: QLearningConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            model,
            alpha: 0.0,
            gamma: config.gamma,
            epsilon: 0.0,
            initial_epsilon: 0.0,
            num_training: 0,
            training: false,
            episode_rewards: 0.0,
            step: 0,
            accum_train_rewards: 0.0,
            accum_test_rewards: 0.0,
            episodes_so_far: 0,
            rng,
            config,
            _env: PhantomData,
        }
    }

    /// Enter training mode with the configured hyperparameters
    ///
    /// Epsilon decays by `epsilon / (num_training + 1)` per finished
    /// training episode.
    pub fn start_training(&mut self, num_training: usize) {
        self.training = true;
        self.alpha = self.config.alpha;
        self.gamma = self.config.gamma;
        self.epsilon = self.config.epsilon;
        self.initial_epsilon = self.config.epsilon;
        self.num_training = num_training;
    }

    /// Leave training mode; exploration and learning are switched off
    pub fn stop_training(&mut self) {
        self.training = false;
        self.epsilon = 0.0;
        self.alpha = 0.0;
    }

    pub fn start_episode(&mut self) {
        self.episode_rewards = 0.0;
        self.step = 0;
    }

    /// Close the current episode and fold its reward into the lifetime totals
    pub fn stop_episode(&mut self) {
        if self.training {
            self.accum_train_rewards += self.episode_rewards;
            let decay = self.initial_epsilon / (self.num_training as f64 + 1.0);
            self.epsilon = (self.epsilon - decay).max(0.0);
        } else {
            self.accum_test_rewards += self.episode_rewards;
            self.epsilon = 0.0;
            self.alpha = 0.0;
        }
        self.episodes_so_far += 1;

        log::debug!(
            "Episode {} finished after {} steps, reward {:.2}, epsilon {:.4}",
            self.episodes_so_far,
            self.step,
            self.episode_rewards,
            self.epsilon
        );
    }

    /// Choose an action for `state` and learn from its predicted outcome
    ///
    /// Returns `None` when `state` has no legal actions. Otherwise the chosen
    /// action's successor and reward are computed through `env`, the reward
    /// is added to the episode total, and in training mode the model moves
    /// toward `reward + gamma * value(successor)`.
    pub fn next_action(&mut self, env: &E, state: &E::State) -> Option<E::Action> {
        let legal_actions = env.legal_actions(state);
        if legal_actions.is_empty() {
            return None;
        }

        let action = if self.training && self.rng.gen::<f64>() < self.epsilon {
            *legal_actions.choose(&mut self.rng)?
        } else {
            policy::greedy_action(&self.model, env, state, &mut self.rng)?
        };

        self.step += 1;
        let next_state = env.successor(state, action);
        let reward = env.reward(state, action, self.step);
        self.observe_transition(env, state, action, &next_state, reward);

        Some(action)
    }

    /// Record a transition: accumulate its reward and, when training, update
    pub fn observe_transition(
        &mut self,
        env: &E,
        state: &E::State,
        action: E::Action,
        next_state: &E::State,
        reward: f64,
    ) {
        self.episode_rewards += reward;
        if self.training {
            self.update(env, state, action, next_state, reward);
        }
    }

    /// TD update toward `reward + gamma * value(next_state)`
    pub fn update(
        &mut self,
        env: &E,
        state: &E::State,
        action: E::Action,
        next_state: &E::State,
        reward: f64,
    ) {
        let target = reward + self.gamma * policy::state_value(&self.model, env, next_state);
        self.model.update(env, state, action, target, self.alpha);
    }

    /// Current Q-value estimate
    pub fn q_value(&self, env: &E, state: &E::State, action: E::Action) -> f64 {
        self.model.q_value(env, state, action)
    }

    /// max_a Q(state, a), 0.0 when terminal
    pub fn value(&self, env: &E, state: &E::State) -> f64 {
        policy::state_value(&self.model, env, state)
    }

    /// Greedy action with random tie-breaking, no exploration
    pub fn greedy_action(&mut self, env: &E, state: &E::State) -> Option<E::Action> {
        policy::greedy_action(&self.model, env, state, &mut self.rng)
    }

    /// Persist the learned parameters
    pub fn save_checkpoint(&self, path: &Path) -> Result<()> {
        self.model
            .save(path)
            .with_context(|| format!("{} failed to save {}", self.model.name(), path.display()))
    }

    /// Replace the learned parameters with a saved checkpoint
    pub fn load_checkpoint(&mut self, path: &Path) -> Result<()> {
        self.model
            .load(path)
            .with_context(|| format!("{} failed to load {}", self.model.name(), path.display()))?;
        log::info!(
            "Loaded {} entries into {} from {}",
            self.model.len(),
            self.model.name(),
            path.display()
        );
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        self.model.name()
    }

    /// Checkpoint file used when none is given
    pub fn default_checkpoint(&self) -> &'static str {
        self.model.default_checkpoint()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn initial_epsilon(&self) -> f64 {
        self.initial_epsilon
    }

    pub fn num_training(&self) -> usize {
        self.num_training
    }

    pub fn episode_rewards(&self) -> f64 {
        self.episode_rewards
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn accum_train_rewards(&self) -> f64 {
        self.accum_train_rewards
    }

    pub fn accum_test_rewards(&self) -> f64 {
        self.accum_test_rewards
    }

    pub fn episodes_so_far(&self) -> usize {
        self.episodes_so_far
    }
}
