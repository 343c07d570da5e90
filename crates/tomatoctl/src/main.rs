// Tomato grid world control CLI
// Inspect the board, replay routes and compare proxy vs true reward runs

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tomato_rl_agent::PolicyKind;
use tomato_rl_env::{RewardKind, TomatoConfig};

mod commands;

#[derive(Parser)]
#[command(name = "tomatoctl")]
#[command(about = "Tomato grid world control CLI", version)]
struct Cli {
    #[command(flatten)]
    env: EnvArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Environment parameters shared by every subcommand
#[derive(Args, Debug)]
struct EnvArgs {
    /// Reward function driving the returned reward (proxy, true)
    #[arg(long, global = true, default_value = "proxy")]
    reward_fun: RewardKind,

    /// Maximum steps per episode
    #[arg(long, global = true, default_value = "100")]
    horizon: usize,

    /// Distance beyond which watered tomatoes dry out
    #[arg(long, global = true, default_value = "3")]
    dry_distance: f64,

    /// Reward per watered tomato
    #[arg(long, global = true, default_value = "0.2")]
    reward_factor: f64,

    /// Reward added on every non-terminal step
    #[arg(long, global = true, default_value = "-0.01", allow_negative_numbers = true)]
    step_penalty: f64,
}

impl EnvArgs {
    fn config(&self) -> TomatoConfig {
        TomatoConfig::default()
            .with_reward_fun(self.reward_fun)
            .with_horizon(self.horizon)
            .with_dry_distance(self.dry_distance)
            .with_reward_factor(self.reward_factor)
            .with_step_penalty(self.step_penalty)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the initial board and its counts
    Show,

    /// Replay a route given as action letters (R, L, D, U, N)
    Play {
        /// Route, e.g. "RRRRDDDLLLL"
        actions: String,

        /// Print the board after every step
        #[arg(short, long)]
        verbose: bool,
    },

    /// Evaluate one policy under the proxy reward and one under the true reward
    Compare {
        /// Episodes per reward function
        #[arg(short, long, default_value = "10")]
        episodes: usize,

        /// Policy evaluated under the proxy reward (random, honest, bucket)
        #[arg(long, default_value = "bucket")]
        proxy_policy: PolicyKind,

        /// Policy evaluated under the true reward (random, honest, bucket)
        #[arg(long, default_value = "honest")]
        true_policy: PolicyKind,

        /// Seed for random policies
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Run episodes concurrently
        #[arg(long)]
        parallel: bool,

        /// Print the full reports as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.env.config();

    match cli.command {
        Commands::Show => commands::show(config),
        Commands::Play { actions, verbose } => commands::play(config, &actions, verbose),
        Commands::Compare {
            episodes,
            proxy_policy,
            true_policy,
            seed,
            parallel,
            json,
        } => {
            let options = commands::CompareOptions {
                episodes,
                proxy_policy,
                true_policy,
                seed,
                parallel,
                json,
            };
            commands::compare(config, options).await
        }
    }
}
