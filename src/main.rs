use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use snake_qlearn::game::GameConfig;
use snake_qlearn::modes::{TrainConfig, Trainer};
use snake_qlearn::rl::{
    Agent, ApproxQAgent, LinearModel, QLearningAgent, QLearningConfig, QTable, SnakeEnvironment,
    SnakeFeatures, ValueModel,
};

#[derive(Parser)]
#[command(name = "snake_qlearn")]
#[command(version, about = "Train or test a Q-learning agent on Snake")]
struct Cli {
    /// Agent to use
    #[arg(short, long, value_enum, default_value = "q")]
    agent: AgentKind,

    /// Number of training episodes
    #[arg(short, long, default_value = "4000")]
    num_episodes: usize,

    /// Number of test runs
    #[arg(short, long, default_value = "10")]
    test_runs: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Load learned values from the checkpoint before training
    #[arg(short, long)]
    load: bool,

    /// Save trained values to the checkpoint
    #[arg(short, long)]
    save_weights: bool,

    /// Random food spawn during testing
    #[arg(short = 'r', long)]
    test_random: bool,

    /// Checkpoint file (defaults to the agent's own file name)
    #[arg(long)]
    checkpoint: Option<PathBuf>,

    /// Grid width
    #[arg(long, default_value = "10")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "10")]
    height: usize,

    /// Learning rate
    #[arg(long, default_value = "0.3")]
    alpha: f64,

    /// Discount factor
    #[arg(long, default_value = "0.8")]
    gamma: f64,

    /// Initial exploration rate
    #[arg(long, default_value = "0.8")]
    epsilon: f64,

    /// Seed for food placement and exploration
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum AgentKind {
    /// Exact tabular Q-learning
    Q,
    /// Linear approximate Q-learning over snake features
    Approxq,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut game_config = GameConfig::new(cli.width, cli.height);
    game_config.seed = cli.seed;
    game_config.validate().map_err(|e| anyhow!("Invalid game configuration: {}", e))?;

    let agent_config = QLearningConfig {
        alpha: cli.alpha,
        gamma: cli.gamma,
        epsilon: cli.epsilon,
        seed: cli.seed,
    };
    agent_config
        .validate()
        .map_err(|e| anyhow!("Invalid Q-learning configuration: {}", e))?;

    let env = SnakeEnvironment::new(game_config);

    match cli.agent {
        AgentKind::Q => {
            let agent: QLearningAgent<SnakeEnvironment> = Agent::new(QTable::new(), agent_config);
            run(&cli, agent, env, |_, _| {})
        }
        AgentKind::Approxq => {
            let agent: ApproxQAgent<SnakeEnvironment> =
                Agent::new(LinearModel::new(SnakeFeatures), agent_config);
            run(&cli, agent, env, |label, model| {
                println!("\n{} weights: {:?}", label, model.weights())
            })
        }
    }
}

/// Load, train and test one agent; `report` prints the model before and after
fn run<M, F>(
    cli: &Cli,
    mut agent: Agent<SnakeEnvironment, M>,
    env: SnakeEnvironment,
    report: F,
) -> Result<()>
where
    M: ValueModel<SnakeEnvironment>,
    F: Fn(&str, &M),
{
    let checkpoint_path = cli
        .checkpoint
        .clone()
        .unwrap_or_else(|| PathBuf::from(agent.default_checkpoint()));

    if cli.load {
        agent.load_checkpoint(&checkpoint_path)?;
        println!("Loaded checkpoint: {:?}", checkpoint_path);
    }

    report("Initial", agent.model());

    let mut config = TrainConfig::new(cli.num_episodes, checkpoint_path);
    config.test_runs = cli.test_runs;
    config.verbose = cli.verbose;
    config.save_weights = cli.save_weights;

    let mut trainer = Trainer::new(agent, env, config);
    trainer.train()?;
    trainer.env_mut().set_random_food(cli.test_random);
    trainer.test();

    report("Final", trainer.agent().model());
    log::info!(
        "{} finished with {} learned entries",
        trainer.agent().name(),
        trainer.agent().model().len()
    );

    Ok(())
}
