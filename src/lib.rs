//! flappy-env - a deterministic side-scrolling bird game as a reinforcement
//! learning environment.
//!
//! Create a [`GameSimulator`] from an [`EnvConfig`], call `reset`, then
//! `step` with one [`Action`] per tick. Each step returns the observation,
//! reward, terminated/truncated flags and a [`StepInfo`].

pub mod config;
pub mod constants;
pub mod env;
pub mod error;
pub mod game;
pub mod render;
pub mod rollout;

pub use config::{EnvConfig, ObservationMode, PhysicsConfig, RenderMode, RewardConfig, Theme};
pub use env::{
    ActionSpec, Environment, GameSimulator, Observation, ObservationSpec, StepInfo, StepResult,
};
pub use error::{EnvError, ErrorKind};
pub use game::{Action, EndCause, EpisodeStatus};
pub use render::{Frame, RgbFrame};
