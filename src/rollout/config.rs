//! Rollout configuration.

use super::policy::PolicyKind;
use crate::config::EnvConfig;
use serde::{Deserialize, Serialize};

/// Configuration for a batch of evaluation episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RolloutConfig {
    /// Number of episodes to play
    pub episodes: u32,

    /// Episode `i` is reset with `base_seed + i` (None = random base)
    pub base_seed: Option<u64>,

    pub policy: PolicyKind,

    /// Tick cap per episode, applied when the environment sets no tighter one
    pub max_ticks: u64,

    pub env: EnvConfig,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            base_seed: None,
            policy: PolicyKind::GapFollower,
            max_ticks: 10_000,
            env: EnvConfig::default(),
        }
    }
}

impl RolloutConfig {
    /// Ten seeded episodes, for smoke checks
    pub fn quick() -> Self {
        Self {
            episodes: 10,
            base_seed: Some(0),
            max_ticks: 2_000,
            ..Default::default()
        }
    }

    /// Seeded comparison run for one policy
    pub fn baseline(policy: PolicyKind, episodes: u32) -> Self {
        Self {
            episodes,
            base_seed: Some(0),
            policy,
            ..Default::default()
        }
    }

    /// Environment config with the rollout tick cap folded in.
    pub fn env_config(&self) -> EnvConfig {
        let mut env = self.env.clone();
        env.max_steps = Some(env.max_steps.map_or(self.max_ticks, |m| m.min(self.max_ticks)));
        env
    }

    pub fn seed_for(&self, base: u64, episode: u32) -> u64 {
        base.wrapping_add(episode as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_cap_folded_into_env() {
        let config = RolloutConfig::quick();
        assert_eq!(config.env_config().max_steps, Some(2_000));

        let mut config = RolloutConfig::quick();
        config.env.max_steps = Some(50);
        assert_eq!(config.env_config().max_steps, Some(50));
    }

    #[test]
    fn test_seeds_are_consecutive() {
        let config = RolloutConfig::default();
        assert_eq!(config.seed_for(100, 0), 100);
        assert_eq!(config.seed_for(100, 7), 107);
        assert_eq!(config.seed_for(u64::MAX, 1), 0);
    }

    #[test]
    fn test_parses_from_json() {
        let config: RolloutConfig = serde_json::from_str(
            r#"{ "episodes": 3, "policy": "noop", "env": { "score_limit": 5 } }"#,
        )
        .unwrap();
        assert_eq!(config.episodes, 3);
        assert_eq!(config.policy, PolicyKind::Noop);
        assert_eq!(config.env.score_limit, Some(5));
        assert_eq!(config.max_ticks, 10_000);
    }
}
