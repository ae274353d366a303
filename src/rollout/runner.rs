//! Episode loop driving a policy through an environment.

use super::config::RolloutConfig;
use super::policy::Policy;
use super::report::{EpisodeSummary, RolloutReport};
use crate::env::{Environment, GameSimulator};
use crate::error::EnvError;

/// Run every episode of the rollout and aggregate the results.
pub fn run_rollouts(config: &RolloutConfig) -> Result<RolloutReport, EnvError> {
    let env_config = config.env_config();
    let mut env = GameSimulator::new(env_config.clone())?;
    let base_seed = config.base_seed.unwrap_or_else(rand::random);
    tracing::info!(
        policy = %config.policy,
        episodes = config.episodes,
        base_seed,
        "starting rollout"
    );

    let mut runs = Vec::with_capacity(config.episodes as usize);
    for episode in 0..config.episodes {
        let seed = config.seed_for(base_seed, episode);
        let mut policy = config.policy.build(&env_config, seed)?;
        let summary = run_episode(&mut env, policy.as_mut(), seed)?;
        tracing::info!(
            episode,
            seed,
            score = summary.score,
            ticks = summary.ticks,
            cause = ?summary.end_cause,
            "episode finished"
        );
        runs.push(summary);
    }
    env.close()?;

    Ok(RolloutReport::from_episodes(config.policy, runs))
}

/// Play one episode to its end. The environment must bound episode length,
/// or a policy that never fails runs forever.
pub fn run_episode<E: Environment>(
    env: &mut E,
    policy: &mut dyn Policy,
    seed: u64,
) -> Result<EpisodeSummary, EnvError> {
    let (mut observation, _) = env.reset(Some(seed))?;
    loop {
        let result = env.step(policy.act(&observation))?;
        if result.done() {
            return Ok(EpisodeSummary::from_info(seed, &result.info));
        }
        observation = result.observation;
    }
}
