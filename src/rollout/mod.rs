//! Seeded multi-episode evaluation of scripted policies.
//!
//! Plays a policy through a fresh episode per seed and aggregates score,
//! return, length and end causes into a report, so physics or reward
//! changes can be compared against fixed baselines.

mod config;
mod policy;
mod report;
mod runner;

pub use config::RolloutConfig;
pub use policy::{GapFollower, NoOpPolicy, Policy, PolicyKind, RandomPolicy};
pub use report::{EpisodeSummary, RolloutReport};
pub use runner::{run_episode, run_rollouts};
