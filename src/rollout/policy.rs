//! Scripted policies for evaluating the environment without a learner.

use crate::config::{EnvConfig, ObservationMode};
use crate::env::{ActionSpec, Observation};
use crate::error::EnvError;
use crate::game::Action;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pixels below the gap center at which the gap follower flaps.
const FOLLOW_MARGIN: f64 = 15.0;

/// Index of the nearest pipe's gap offset in the feature vector.
const GAP_OFFSET_FEATURE: usize = 3;

pub trait Policy {
    fn act(&mut self, observation: &Observation) -> Action;
}

/// Never flaps.
pub struct NoOpPolicy;

impl Policy for NoOpPolicy {
    fn act(&mut self, _observation: &Observation) -> Action {
        Action::Noop
    }
}

/// Uniformly random actions from a seeded generator.
pub struct RandomPolicy {
    rng: ChaCha8Rng,
    space: ActionSpec,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            space: ActionSpec::default(),
        }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &Observation) -> Action {
        self.space.sample(&mut self.rng)
    }
}

/// Flaps whenever the bird sinks too far below the next gap's center.
/// Reads the feature observation.
pub struct GapFollower {
    threshold: f32,
}

impl GapFollower {
    pub fn new(config: &EnvConfig) -> Result<Self, EnvError> {
        if config.observation != ObservationMode::Features {
            return Err(EnvError::invalid_config(
                "observation",
                "the gap_follower policy needs feature observations",
            ));
        }
        let threshold = if config.normalize_obs {
            FOLLOW_MARGIN / config.screen_height as f64
        } else {
            FOLLOW_MARGIN
        };
        Ok(Self {
            threshold: threshold as f32,
        })
    }
}

impl Policy for GapFollower {
    fn act(&mut self, observation: &Observation) -> Action {
        let offset = observation
            .as_vector()
            .and_then(|features| features.get(GAP_OFFSET_FEATURE).copied())
            .unwrap_or(0.0);
        // Offset is gap center minus bird center; negative means the gap is above.
        Action::from(offset < -self.threshold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Noop,
    Random,
    #[default]
    GapFollower,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 3] = [PolicyKind::Noop, PolicyKind::Random, PolicyKind::GapFollower];

    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::Noop => "noop",
            PolicyKind::Random => "random",
            PolicyKind::GapFollower => "gap_follower",
        }
    }

    /// Instantiate the policy for one episode.
    pub fn build(self, config: &EnvConfig, seed: u64) -> Result<Box<dyn Policy>, EnvError> {
        Ok(match self {
            PolicyKind::Noop => Box::new(NoOpPolicy),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
            PolicyKind::GapFollower => Box::new(GapFollower::new(config)?),
        })
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PolicyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown policy '{s}' (expected noop, random or gap_follower)"))
    }
}
