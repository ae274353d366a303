//! Core game simulation.
//!
//! Pure physics and bookkeeping with no I/O or rendering dependencies: a
//! bird falling under gravity, pipes scrolling in from the right, and the
//! collision and scoring rules between them.

pub mod action;
pub mod bird;
pub mod collision;
pub mod pipes;
pub mod state;

pub use action::Action;
pub use bird::Bird;
pub use collision::CollisionKind;
pub use pipes::{Pipe, PipeLayout, PipeQueue};
pub use state::{EndCause, EpisodeStats, EpisodeStatus, GameState};
