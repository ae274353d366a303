use super::bird::Bird;
use super::collision::CollisionKind;
use super::pipes::PipeQueue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of an episode. Both end states are absorbing until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeStatus {
    Running,
    /// Ended by a collision.
    Terminated,
    /// Ended by a limit, without failure.
    Truncated,
}

impl EpisodeStatus {
    pub fn is_over(self) -> bool {
        self != EpisodeStatus::Running
    }
}

impl fmt::Display for EpisodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Terminated => write!(f, "terminated"),
            Self::Truncated => write!(f, "truncated"),
        }
    }
}

/// Why an episode stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "with")]
pub enum EndCause {
    Collision(CollisionKind),
    ScoreLimit,
    StepLimit,
}

impl EndCause {
    pub fn status(self) -> EpisodeStatus {
        match self {
            EndCause::Collision(_) => EpisodeStatus::Terminated,
            EndCause::ScoreLimit | EndCause::StepLimit => EpisodeStatus::Truncated,
        }
    }
}

impl fmt::Display for EndCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collision(kind) => write!(f, "collision:{kind}"),
            Self::ScoreLimit => write!(f, "score_limit"),
            Self::StepLimit => write!(f, "step_limit"),
        }
    }
}

/// Running totals for the current episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub flaps: u64,
    pub episode_return: f64,
}

impl EpisodeStats {
    /// Fraction of ticks on which the agent flapped.
    pub fn flap_ratio(&self, ticks: u64) -> f64 {
        if ticks == 0 {
            0.0
        } else {
            self.flaps as f64 / ticks as f64
        }
    }
}

/// Complete mutable world of one episode.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub bird: Bird,
    pub pipes: PipeQueue,
    pub ground_y: f64,
    pub tick: u64,
    pub score: u32,
    pub status: EpisodeStatus,
    pub end_cause: Option<EndCause>,
    pub stats: EpisodeStats,
}

impl GameState {
    pub fn new(bird: Bird, pipes: PipeQueue, ground_y: f64) -> Self {
        Self {
            bird,
            pipes,
            ground_y,
            tick: 0,
            score: 0,
            status: EpisodeStatus::Running,
            end_cause: None,
            stats: EpisodeStats::default(),
        }
    }

    /// Record the end of the episode. The first cause wins.
    pub fn finish(&mut self, cause: EndCause) {
        if self.status.is_over() {
            return;
        }
        if let EndCause::Collision(_) = cause {
            self.bird.alive = false;
        }
        self.status = cause.status();
        self.end_cause = Some(cause);
    }

    pub fn flap_ratio(&self) -> f64 {
        self.stats.flap_ratio(self.tick)
    }
}
