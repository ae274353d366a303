//! Bird vertical dynamics.

use super::action::Action;
use crate::config::PhysicsConfig;
use crate::constants::{
    BIRD_HEIGHT, BIRD_WIDTH, MAX_ROTATION_DEG, MIN_ROTATION_DEG, ROTATION_PER_VELOCITY,
};

/// The player. `x` never changes; `y` is the top edge, growing downward.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    /// Vertical velocity in pixels/tick (positive = downward).
    pub velocity: f64,
    pub alive: bool,
}

impl Bird {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            alive: true,
        }
    }

    /// Update velocity for this tick. A flap replaces the velocity outright,
    /// so gravity does not act on the flapping tick.
    pub fn apply_action(&mut self, action: Action, physics: &PhysicsConfig) {
        if action.is_flap() {
            self.velocity = physics.flap_velocity;
        } else {
            self.velocity = (self.velocity + physics.gravity).min(physics.max_fall_speed);
        }
    }

    /// Euler step, stopping at the ground line.
    pub fn integrate(&mut self, ground_y: f64) {
        let room_below = ground_y - self.bottom();
        self.y += self.velocity.min(room_below);
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + BIRD_HEIGHT
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + BIRD_WIDTH
    }

    pub fn center_x(&self) -> f64 {
        self.x + BIRD_WIDTH / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + BIRD_HEIGHT / 2.0
    }

    /// Visual tilt in degrees: nose up while rising, diving when falling fast.
    pub fn rotation_degrees(&self) -> f64 {
        (-self.velocity * ROTATION_PER_VELOCITY).clamp(MIN_ROTATION_DEG, MAX_ROTATION_DEG)
    }
}
