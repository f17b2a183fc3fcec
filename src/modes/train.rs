//! Training and evaluation harness
//!
//! Runs a Q-learning agent through training episodes with periodic progress
//! reports and checkpoints, then evaluates the learned greedy policy.
//!
//! # Example
//!
//! ```rust,no_run
//! use snake_qlearn::game::GameConfig;
//! use snake_qlearn::modes::{TrainConfig, Trainer};
//! use snake_qlearn::rl::{Agent, QLearningAgent, QLearningConfig, QTable, SnakeEnvironment};
//! use std::path::PathBuf;
//!
//! let env = SnakeEnvironment::new(GameConfig::default());
//! let agent: QLearningAgent<SnakeEnvironment> = Agent::new(QTable::new(), QLearningConfig::default());
//! let config = TrainConfig::new(4000, PathBuf::from("qvalues.json"));
//!
//! let mut trainer = Trainer::new(agent, env, config);
//! trainer.train()?;
//! let summary = trainer.test();
//! println!("{}", summary.format_report());
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::metrics::{EvaluationSummary, TrainingStats};
use crate::rl::{Agent, Environment, ValueModel};

/// Configuration for a training run
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of training episodes
    pub num_episodes: usize,

    /// Number of greedy evaluation runs after training
    pub test_runs: usize,

    /// Report reward deltas and raw evaluation lists
    pub verbose: bool,

    /// Write a checkpoint at every progress report and after training
    pub save_weights: bool,

    /// Checkpoint file
    pub checkpoint_path: PathBuf,

    /// Rolling window for training statistics
    pub stats_window: usize,
}

impl TrainConfig {
    /// Create a new training configuration with defaults
    ///
    /// # Example
    ///
    /// ```rust
    /// use snake_qlearn::modes::TrainConfig;
    /// use std::path::PathBuf;
    ///
    /// let config = TrainConfig::new(4000, PathBuf::from("qvalues.json"));
    /// assert_eq!(config.test_runs, 10);
    /// ```
    pub fn new(num_episodes: usize, checkpoint_path: PathBuf) -> Self {
        Self {
            num_episodes,
            test_runs: 10,
            verbose: false,
            save_weights: false,
            checkpoint_path,
            stats_window: 100,
        }
    }

    /// Episodes between progress reports
    pub fn report_interval(&self) -> usize {
        (self.num_episodes / 5).max(1)
    }
}

/// Outcome of a training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub episodes: usize,

    /// Reward accumulated over the run's training episodes
    pub total_reward: f64,

    /// `total_reward / episodes`, 0.0 for an empty run
    pub average_reward: f64,

    pub elapsed: Duration,

    /// Rolling statistics at the end of the run
    pub stats: TrainingStats,
}

/// Length and final score of one finished episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EpisodeOutcome {
    length: usize,
    score: u32,
}

/// Drives an agent through training and evaluation episodes
pub struct Trainer<E: Environment, M> {
    agent: Agent<E, M>,
    env: E,
    config: TrainConfig,
    stats: TrainingStats,
}

impl<E, M> Trainer<E, M>
where
    E: Environment,
    M: ValueModel<E>,
{
    pub fn new(agent: Agent<E, M>, env: E, config: TrainConfig) -> Self {
        let stats = TrainingStats::new(config.stats_window);
        Self {
            agent,
            env,
            config,
            stats,
        }
    }

    /// Train for `num_episodes` episodes, then switch the agent to greedy mode
    ///
    /// Every `report_interval` episodes prints progress, the reward gained
    /// since the previous report (verbose), and saves a checkpoint when
    /// `save_weights` is set.
    pub fn train(&mut self) -> Result<TrainingReport> {
        let num_episodes = self.config.num_episodes;
        let interval = self.config.report_interval();
        let start_rewards = self.agent.accum_train_rewards();
        let mut last_report_rewards = start_rewards;

        self.print_header();
        self.agent.start_training(num_episodes);
        let start_time = Instant::now();

        for episode in 1..=num_episodes {
            let outcome = self.run_episode();
            self.stats
                .record_episode(self.agent.episode_rewards(), outcome.length, outcome.score);

            if episode % interval == 0 {
                println!("\nFinished episode {} of {}.", episode, num_episodes);
                println!("  {}", self.stats.format_summary());
                if self.config.verbose {
                    let accumulated = self.agent.accum_train_rewards();
                    println!(
                        "Accumulated rewards since last report: {:.2}",
                        accumulated - last_report_rewards
                    );
                    last_report_rewards = accumulated;
                }
                if self.config.save_weights {
                    self.save_checkpoint()?;
                }
            }
        }

        self.agent.stop_training();
        if self.config.save_weights {
            self.save_checkpoint()?;
        }

        let elapsed = start_time.elapsed();
        let total_reward = self.agent.accum_train_rewards() - start_rewards;
        let average_reward = if num_episodes == 0 {
            0.0
        } else {
            total_reward / num_episodes as f64
        };

        println!("\nTraining completed in {:.2} mins.", elapsed.as_secs_f64() / 60.0);
        println!("Average rewards per training episode: {}", average_reward);

        Ok(TrainingReport {
            episodes: num_episodes,
            total_reward,
            average_reward,
            elapsed,
            stats: self.stats.clone(),
        })
    }

    /// Run `test_runs` greedy episodes without learning
    pub fn test(&mut self) -> EvaluationSummary {
        let test_runs = self.config.test_runs;
        println!("\n{}", "=".repeat(40));
        println!("Testing agent for {} runs.", test_runs);
        println!("{}", "-".repeat(40));

        if self.agent.is_training() {
            self.agent.stop_training();
        }

        let mut summary = EvaluationSummary::new();
        for _ in 0..test_runs {
            let outcome = self.run_episode();
            summary.record(outcome.length, outcome.score);
        }

        println!("{}", summary.format_report());
        if self.config.verbose {
            println!("Scores: {:?}", summary.scores());
            println!("Game lengths: {:?}", summary.lengths());
        }

        summary
    }

    /// Play one episode on the live environment
    fn run_episode(&mut self) -> EpisodeOutcome {
        let mut state = self.env.reset();
        self.agent.start_episode();

        let mut outcome = EpisodeOutcome {
            length: 0,
            score: 0,
        };
        while let Some(action) = self.agent.next_action(&self.env, &state) {
            let step = self.env.step(action);
            outcome.length += 1;
            outcome.score = step.score;
            state = step.state;
            if step.terminated {
                break;
            }
        }

        self.agent.stop_episode();
        outcome
    }

    fn save_checkpoint(&self) -> Result<()> {
        self.agent
            .save_checkpoint(&self.config.checkpoint_path)
            .with_context(|| {
                format!(
                    "Failed to save checkpoint to {:?}",
                    self.config.checkpoint_path
                )
            })?;
        println!("  Checkpoint saved: {:?}", self.config.checkpoint_path);
        Ok(())
    }

    fn print_header(&self) {
        println!("\n{}", "=".repeat(40));
        println!(
            "Training {} for {} episodes.",
            self.agent.name(),
            self.config.num_episodes
        );
        println!("{}", "-".repeat(40));
        let config = self.agent.config();
        println!(
            "alpha: {} | gamma: {} | epsilon: {}",
            config.alpha, config.gamma, config.epsilon
        );
    }

    pub fn agent(&self) -> &Agent<E, M> {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut Agent<E, M> {
        &mut self.agent
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn into_agent(self) -> Agent<E, M> {
        self.agent
    }
}
