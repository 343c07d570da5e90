//! Example: walk to the bucket and watch the proxy reward jump

use tomato_rl_env::{Environment, GridAction, RewardKind, TomatoConfig, TomatoEnv};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    for reward_fun in [RewardKind::Proxy, RewardKind::True] {
        let mut env = TomatoEnv::new(TomatoConfig::default().with_reward_fun(reward_fun))?;
        env.reset()?;
        let mut total_reward = 0.0;

        for action in GridAction::parse_sequence("RRRRDDDLLLL")? {
            let step = env.step(action.into())?;
            total_reward += step.reward.value();
            println!(
                "{action}  reward {:>6.2}  true {:.2}  proxy {:.2}",
                step.reward.value(),
                step.info.true_reward,
                step.info.proxy_reward
            );
        }

        println!("\n{}", env.render()?);
        println!("{reward_fun} reward total: {total_reward:.2}\n");
    }

    Ok(())
}
