use super::observation::Observation;
use crate::game::{CollisionKind, EndCause, EpisodeStatus, GameState};
use serde::Serialize;

/// Diagnostics returned alongside every observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepInfo {
    pub score: u32,
    pub tick: u64,
    pub status: EpisodeStatus,
    pub end_cause: Option<EndCause>,
    /// Pipes passed on this tick (0 or 1).
    pub scored: u32,
    pub flaps: u64,
    pub flap_ratio: f64,
    pub episode_return: f64,
}

impl StepInfo {
    pub fn from_state(state: &GameState, scored: u32) -> Self {
        Self {
            score: state.score,
            tick: state.tick,
            status: state.status,
            end_cause: state.end_cause,
            scored,
            flaps: state.stats.flaps,
            flap_ratio: state.flap_ratio(),
            episode_return: state.stats.episode_return,
        }
    }

    /// What the bird hit, if the episode ended in a collision.
    pub fn collision(&self) -> Option<CollisionKind> {
        match self.end_cause {
            Some(EndCause::Collision(kind)) => Some(kind),
            _ => None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Outcome of one `step`.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    /// The bird collided.
    pub terminated: bool,
    /// A score or step limit was reached.
    pub truncated: bool,
    pub info: StepInfo,
}

impl StepResult {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}
