// Subcommand implementations

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use tomato_rl_agent::{Comparison, EvaluationReport, Evaluator, PolicyKind};
use tomato_rl_core::{DiscreteAction, Environment};
use tomato_rl_env::{GridAction, RewardKind, TomatoConfig, TomatoEnv};

/// Options of the `compare` subcommand
pub struct CompareOptions {
    pub episodes: usize,
    pub proxy_policy: PolicyKind,
    pub true_policy: PolicyKind,
    pub seed: u64,
    pub parallel: bool,
    pub json: bool,
}

pub fn show(config: TomatoConfig) -> Result<()> {
    let env = TomatoEnv::new(config).context("Failed to create environment")?;

    println!("{}", env.render()?);
    println!("Tomatoes: {}", env.tomato_count());
    println!("Accessible positions: {}", env.accessible_count());
    println!("Agent: {}  Bucket: {}", env.agent_position(), env.bucket_position());
    Ok(())
}

pub fn play(config: TomatoConfig, actions: &str, verbose: bool) -> Result<()> {
    let route = GridAction::parse_sequence(actions).context("Failed to parse route")?;
    let mut env = TomatoEnv::new(config).context("Failed to create environment")?;
    env.reset()?;

    let mut total_reward = 0.0;
    for (i, action) in route.into_iter().enumerate() {
        let step = env.step(DiscreteAction::from(action))?;
        total_reward += step.reward.value();

        info!(
            step = i + 1,
            %action,
            reward = step.reward.value(),
            true_reward = step.info.true_reward,
            proxy_reward = step.info.proxy_reward,
            watered = step.info.watered,
            "step"
        );
        if verbose {
            println!("Step {}: action {action}, reward {:.3}", i + 1, step.reward.value());
            println!("{}", env.render()?);
        }
        if step.is_done() {
            println!(
                "Episode finished ({}) after {} steps",
                if step.terminated { "all tomatoes watered" } else { "horizon reached" },
                step.info.timestep
            );
            break;
        }
    }

    println!("{}", env.render()?);
    println!("Total reward: {total_reward:.3}");
    Ok(())
}

pub async fn compare(config: TomatoConfig, options: CompareOptions) -> Result<()> {
    let comparison = if options.parallel {
        let proxy = evaluate_parallel(&config, RewardKind::Proxy, &options, options.proxy_policy).await?;
        let truthful = evaluate_parallel(&config, RewardKind::True, &options, options.true_policy).await?;
        Comparison { proxy, truthful }
    } else {
        let proxy_policy = options.proxy_policy.build(options.seed);
        let true_policy = options.true_policy.build(options.seed);
        tomato_rl_agent::compare(&config, options.episodes, &proxy_policy, &true_policy)
            .await
            .context("Evaluation failed")?
    };

    if options.json {
        let output = json!({
            "proxy": comparison.proxy,
            "true": comparison.truthful,
            "proxy_exploits_more": comparison.proxy_exploits_more(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_report("PROXY REWARD", &comparison.proxy);
    print_report("TRUE REWARD", &comparison.truthful);

    if comparison.proxy_exploits_more() {
        println!("Proxy-reward behaviour exploits the bucket more often (reward hacking).");
    } else {
        println!("Proxy-reward behaviour does not exploit the bucket more than the true-reward one.");
    }
    Ok(())
}

async fn evaluate_parallel(
    config: &TomatoConfig,
    reward_fun: RewardKind,
    options: &CompareOptions,
    kind: PolicyKind,
) -> Result<EvaluationReport> {
    let evaluator = Evaluator::new(config.clone().with_reward_fun(reward_fun), options.episodes)
        .context("Invalid evaluation settings")?;
    let seed = options.seed;
    let report = evaluator
        .run_parallel(move |episode| kind.build(seed.wrapping_add(episode as u64)))
        .await
        .context("Parallel evaluation failed")?;
    Ok(report)
}

fn print_report(title: &str, report: &EvaluationReport) {
    println!("=== {title} ({} policy, {} episodes) ===", report.policy, report.episodes.len());
    println!("Average Reward: {:.2} ± {:.2}", report.avg_reward, report.std_reward);
    println!("Average True Return: {:.2}", report.avg_true_return);
    println!("Average Watered Tomatoes: {:.2}", report.avg_watered);
    println!("Bucket Visit Rate: {:.1}%\n", report.bucket_rate * 100.0);
}
