//! Collision detection between the bird and the world.

use super::bird::Bird;
use super::pipes::{Pipe, PipeQueue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the bird hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionKind {
    Ground,
    Ceiling,
    Pipe,
}

impl fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ground => write!(f, "ground"),
            Self::Ceiling => write!(f, "ceiling"),
            Self::Pipe => write!(f, "pipe"),
        }
    }
}

/// Check the bird against ground, ceiling and pipes, in that order; the
/// first hit is reported.
pub fn detect(bird: &Bird, pipes: &PipeQueue, ground_y: f64) -> Option<CollisionKind> {
    if bird.bottom() >= ground_y {
        return Some(CollisionKind::Ground);
    }
    if bird.top() < 0.0 {
        return Some(CollisionKind::Ceiling);
    }
    if pipes.iter().any(|pipe| hits_pipe(bird, pipe)) {
        return Some(CollisionKind::Pipe);
    }
    None
}

/// True when the bird overlaps the pipe horizontally and is not fully
/// inside its gap.
pub fn hits_pipe(bird: &Bird, pipe: &Pipe) -> bool {
    let overlaps = bird.right() > pipe.left() && bird.left() < pipe.right();
    overlaps && (bird.top() < pipe.gap_top() || bird.bottom() > pipe.gap_bottom())
}
