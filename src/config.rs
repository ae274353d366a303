//! Environment configuration.
//!
//! Every section deserializes with defaults, so a JSON file only needs the
//! fields it overrides.

use crate::constants::*;
use crate::error::EnvError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What `reset` and `step` hand back as the observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationMode {
    /// Bird state plus distances to the nearest pipes.
    #[default]
    Features,
    /// Fan of distance rays cast from the bird's beak.
    Lidar,
    /// The full RGB frame.
    Pixels,
}

/// What `render` produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    RgbArray,
    Ansi,
    Human,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BirdColor {
    #[default]
    Yellow,
    Red,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipeColor {
    #[default]
    Green,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    #[default]
    Day,
    Night,
    #[serde(alias = "none")]
    Plain,
}

/// Cosmetic settings. Nothing here changes the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
    pub bird: BirdColor,
    pub pipe: PipeColor,
    pub background: Background,
}

/// Per-tick physics, in pixels and pixels per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsConfig {
    /// Added to the bird's velocity every tick it does not flap.
    pub gravity: f64,
    /// Velocity set by a flap (negative = upward).
    pub flap_velocity: f64,
    /// Terminal downward velocity.
    pub max_fall_speed: f64,
    /// Leftward pipe movement per tick.
    pub scroll_speed: f64,
    /// Horizontal distance between consecutive pipes. `None` = half the screen width.
    pub pipe_spacing: Option<f64>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            flap_velocity: DEFAULT_FLAP_VELOCITY,
            max_fall_speed: DEFAULT_MAX_FALL_SPEED,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            pipe_spacing: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewardConfig {
    /// Paid every tick the bird survives.
    pub survive: f64,
    /// Bonus per pipe passed, on top of `survive`.
    pub pass_pipe: f64,
    /// The whole reward of a colliding tick.
    pub collision: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            survive: DEFAULT_SURVIVE_REWARD,
            pass_pipe: DEFAULT_PASS_REWARD,
            collision: DEFAULT_COLLISION_PENALTY,
        }
    }
}

/// Configuration for a [`GameSimulator`](crate::env::GameSimulator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    /// Vertical opening of every pipe.
    pub pipe_gap: f64,
    pub observation: ObservationMode,
    /// Scale vector observations into roughly unit range. Ignored for pixels.
    pub normalize_obs: bool,
    pub render_mode: Option<RenderMode>,
    pub theme: Theme,
    /// Truncate the episode once this many pipes are passed.
    pub score_limit: Option<u32>,
    /// Truncate the episode after this many ticks.
    pub max_steps: Option<u64>,
    /// Seed used when the simulator is built. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub physics: PhysicsConfig,
    pub rewards: RewardConfig,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            pipe_gap: DEFAULT_PIPE_GAP,
            observation: ObservationMode::Features,
            normalize_obs: true,
            render_mode: None,
            theme: Theme::default(),
            score_limit: None,
            max_steps: None,
            seed: None,
            physics: PhysicsConfig::default(),
            rewards: RewardConfig::default(),
        }
    }
}

impl EnvConfig {
    /// Create a configuration with a custom screen size
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            screen_width,
            screen_height,
            ..Default::default()
        }
    }

    /// Pixel observations, with RGB rendering enabled for recording
    pub fn pixels() -> Self {
        Self {
            observation: ObservationMode::Pixels,
            render_mode: Some(RenderMode::RgbArray),
            ..Default::default()
        }
    }

    /// Narrower pipe gap for a harder game
    pub fn small_gap() -> Self {
        Self {
            pipe_gap: SMALL_PIPE_GAP,
            ..Default::default()
        }
    }

    /// Lidar observations
    pub fn lidar() -> Self {
        Self {
            observation: ObservationMode::Lidar,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_score_limit(mut self, limit: u32) -> Self {
        self.score_limit = Some(limit);
        self
    }

    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = Some(mode);
        self
    }

    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, EnvError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EnvError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| EnvError::ConfigIo(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Top of the ground band.
    pub fn ground_y(&self) -> f64 {
        (self.screen_height as f64 * GROUND_FRACTION).floor()
    }

    pub fn bird_x(&self) -> f64 {
        (self.screen_width as f64 * BIRD_X_FRACTION).floor()
    }

    pub fn bird_start_y(&self) -> f64 {
        ((self.screen_height as f64 - BIRD_HEIGHT) / 2.0).floor()
    }

    pub fn pipe_spacing(&self) -> f64 {
        self.physics
            .pipe_spacing
            .unwrap_or(self.screen_width as f64 / 2.0)
    }

    /// Smallest gap-top y a new pipe can be given.
    pub fn gap_top_base(&self) -> f64 {
        (self.ground_y() * GAP_TOP_BASE_FRACTION).floor()
    }

    pub fn lidar_range(&self) -> f64 {
        self.screen_width as f64 * LIDAR_RANGE_FRACTION
    }

    /// Check every field, reporting the first one that is out of range.
    pub fn validate(&self) -> Result<(), EnvError> {
        if self.screen_width < MIN_SCREEN_WIDTH {
            return Err(EnvError::invalid_config(
                "screen_width",
                format!("must be at least {MIN_SCREEN_WIDTH}, got {}", self.screen_width),
            ));
        }
        if self.screen_height < MIN_SCREEN_HEIGHT {
            return Err(EnvError::invalid_config(
                "screen_height",
                format!(
                    "must be at least {MIN_SCREEN_HEIGHT}, got {}",
                    self.screen_height
                ),
            ));
        }

        if !self.pipe_gap.is_finite() || self.pipe_gap <= 0.0 {
            return Err(EnvError::invalid_config(
                "pipe_gap",
                format!("must be positive, got {}", self.pipe_gap),
            ));
        }
        if self.pipe_gap <= BIRD_HEIGHT {
            return Err(EnvError::invalid_config(
                "pipe_gap",
                format!(
                    "{} leaves no room for a {BIRD_HEIGHT}px bird",
                    self.pipe_gap
                ),
            ));
        }
        let deepest_gap_top = self.gap_top_base() + GAP_TOP_SLOTS[GAP_TOP_SLOTS.len() - 1];
        let max_gap = self.ground_y() - deepest_gap_top;
        if self.pipe_gap >= max_gap {
            return Err(EnvError::invalid_config(
                "pipe_gap",
                format!(
                    "{} does not fit above the ground on a {}px screen (must be below {max_gap})",
                    self.pipe_gap, self.screen_height
                ),
            ));
        }

        self.validate_physics()?;
        self.validate_rewards()?;

        if self.score_limit == Some(0) {
            return Err(EnvError::invalid_config(
                "score_limit",
                "must be at least 1 (use null for no limit)",
            ));
        }
        if self.max_steps == Some(0) {
            return Err(EnvError::invalid_config(
                "max_steps",
                "must be at least 1 (use null for no limit)",
            ));
        }

        Ok(())
    }

    fn validate_physics(&self) -> Result<(), EnvError> {
        let p = &self.physics;
        if !p.gravity.is_finite() || p.gravity <= 0.0 {
            return Err(EnvError::invalid_config(
                "physics.gravity",
                format!("must be positive, got {}", p.gravity),
            ));
        }
        if !p.flap_velocity.is_finite() || p.flap_velocity >= 0.0 {
            return Err(EnvError::invalid_config(
                "physics.flap_velocity",
                format!("must be negative (upward), got {}", p.flap_velocity),
            ));
        }
        if !p.max_fall_speed.is_finite() || p.max_fall_speed <= 0.0 {
            return Err(EnvError::invalid_config(
                "physics.max_fall_speed",
                format!("must be positive, got {}", p.max_fall_speed),
            ));
        }
        // Pipes moving a full pipe width per tick could skip over the bird.
        if !p.scroll_speed.is_finite() || p.scroll_speed <= 0.0 || p.scroll_speed >= PIPE_WIDTH {
            return Err(EnvError::invalid_config(
                "physics.scroll_speed",
                format!("must be in (0, {PIPE_WIDTH}), got {}", p.scroll_speed),
            ));
        }
        let spacing = self.pipe_spacing();
        let min_spacing = PIPE_WIDTH + BIRD_WIDTH;
        if !spacing.is_finite() || spacing <= min_spacing {
            return Err(EnvError::invalid_config(
                "physics.pipe_spacing",
                format!("must exceed {min_spacing}, got {spacing}"),
            ));
        }
        Ok(())
    }

    fn validate_rewards(&self) -> Result<(), EnvError> {
        let r = &self.rewards;
        if !r.survive.is_finite() || r.survive < 0.0 {
            return Err(EnvError::invalid_config(
                "rewards.survive",
                format!("must be non-negative, got {}", r.survive),
            ));
        }
        if !r.pass_pipe.is_finite() || r.pass_pipe <= 0.0 {
            return Err(EnvError::invalid_config(
                "rewards.pass_pipe",
                format!("must be positive, got {}", r.pass_pipe),
            ));
        }
        if !r.collision.is_finite() || -r.collision <= r.survive + r.pass_pipe {
            return Err(EnvError::invalid_config(
                "rewards.collision",
                format!(
                    "must be negative and larger in magnitude than survive + pass_pipe ({}), got {}",
                    r.survive + r.pass_pipe,
                    r.collision
                ),
            ));
        }
        Ok(())
    }
}
