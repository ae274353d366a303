//! Observation builders for the three observation modes.

use crate::config::{EnvConfig, ObservationMode};
use crate::constants::{FEATURE_COUNT, LIDAR_RAYS, OBSERVED_PIPES};
use crate::game::GameState;
use crate::render::{pixels, RgbFrame};
use std::f64::consts::PI;

/// What the agent sees after `reset` and every `step`.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// Features or lidar distances.
    Vector(Vec<f32>),
    /// Raw pixels, `height x width x 3`.
    Image(RgbFrame),
}

impl Observation {
    pub fn as_vector(&self) -> Option<&[f32]> {
        match self {
            Observation::Vector(values) => Some(values),
            Observation::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&RgbFrame> {
        match self {
            Observation::Image(frame) => Some(frame),
            Observation::Vector(_) => None,
        }
    }
}

/// Labels of the feature vector, in order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "bird_y",
    "bird_velocity",
    "pipe0_dx",
    "pipe0_gap_offset",
    "pipe1_dx",
    "pipe1_gap_offset",
    "pipe2_dx",
    "pipe2_gap_offset",
];

pub fn build(state: &GameState, config: &EnvConfig) -> Observation {
    match config.observation {
        ObservationMode::Features => Observation::Vector(features(state, config)),
        ObservationMode::Lidar => Observation::Vector(lidar(state, config)),
        ObservationMode::Pixels => Observation::Image(pixels::draw(state, config)),
    }
}

/// Bird height and velocity, then for each of the nearest pipes the
/// horizontal distance to its left edge and the vertical offset from the
/// bird's center to the gap center (positive = gap is below).
pub fn features(state: &GameState, config: &EnvConfig) -> Vec<f32> {
    let width = config.screen_width as f64;
    let height = config.screen_height as f64;
    let bird = &state.bird;

    let mut raw = Vec::with_capacity(FEATURE_COUNT);
    raw.push(bird.y);
    raw.push(bird.velocity);
    let mut observed = 0;
    for pipe in state.pipes.upcoming(bird.left()).take(OBSERVED_PIPES) {
        raw.push(pipe.x - bird.x);
        raw.push(pipe.gap_center - bird.center_y());
        observed += 1;
    }
    for _ in observed..OBSERVED_PIPES {
        raw.push(width);
        raw.push(0.0);
    }

    if !config.normalize_obs {
        return raw.into_iter().map(|v| v as f32).collect();
    }
    raw.iter()
        .enumerate()
        .map(|(i, v)| {
            let scale = match i {
                0 => height,
                1 => config.physics.max_fall_speed,
                i if i % 2 == 0 => width,
                _ => height,
            };
            (v / scale) as f32
        })
        .collect()
}

/// Distances along `LIDAR_RAYS` rays fanned from straight up to straight
/// down, cast from the bird's beak.
pub fn lidar(state: &GameState, config: &EnvConfig) -> Vec<f32> {
    let range = config.lidar_range();
    let origin = (state.bird.right(), state.bird.center_y());

    (0..LIDAR_RAYS)
        .map(|i| {
            let angle = -PI / 2.0 + PI * i as f64 / (LIDAR_RAYS - 1) as f64;
            let dir = (angle.cos(), angle.sin());
            let distance = cast_ray(state, origin, dir).min(range);
            if config.normalize_obs {
                (distance / range) as f32
            } else {
                distance as f32
            }
        })
        .collect()
}

/// Distance to the first solid thing along the ray, or infinity.
fn cast_ray(state: &GameState, origin: (f64, f64), dir: (f64, f64)) -> f64 {
    let oy = origin.1;
    let dy = dir.1;
    let mut nearest = f64::INFINITY;

    if dy < -EPSILON {
        nearest = nearest.min(-oy / dy);
    } else if dy > EPSILON {
        nearest = nearest.min((state.ground_y - oy) / dy);
    }

    for pipe in state.pipes.iter() {
        let (left, right) = (pipe.left(), pipe.right());
        let upper = ray_box(origin, dir, (left, right), (f64::NEG_INFINITY, pipe.gap_top()));
        let lower = ray_box(origin, dir, (left, right), (pipe.gap_bottom(), state.ground_y));
        for hit in [upper, lower].into_iter().flatten() {
            nearest = nearest.min(hit);
        }
    }
    nearest
}

const EPSILON: f64 = 1e-9;

/// Slab test: entry distance of the ray into an axis-aligned box, if it
/// hits at a non-negative distance.
fn ray_box(origin: (f64, f64), dir: (f64, f64), xs: (f64, f64), ys: (f64, f64)) -> Option<f64> {
    let mut t_enter = 0.0_f64;
    let mut t_exit = f64::INFINITY;
    for (o, d, (lo, hi)) in [(origin.0, dir.0, xs), (origin.1, dir.1, ys)] {
        if d.abs() < EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let (a, b) = ((lo - o) / d, (hi - o) / d);
        t_enter = t_enter.max(a.min(b));
        t_exit = t_exit.min(a.max(b));
        if t_enter > t_exit {
            return None;
        }
    }
    Some(t_enter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BIRD_HEIGHT, BIRD_WIDTH};
    use crate::game::{Bird, Pipe, PipeLayout, PipeQueue};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn state_with_pipes(config: &EnvConfig) -> GameState {
        let layout = PipeLayout {
            spawn_threshold: config.screen_width as f64,
            spacing: config.pipe_spacing(),
            gap_height: config.pipe_gap,
            gap_top_base: config.gap_top_base(),
        };
        let mut pipes = PipeQueue::new();
        pipes.spawn_initial(&layout, &mut ChaCha8Rng::seed_from_u64(2));
        GameState::new(
            Bird::new(config.bird_x(), config.bird_start_y()),
            pipes,
            config.ground_y(),
        )
    }

    fn empty_state(config: &EnvConfig) -> GameState {
        GameState::new(
            Bird::new(config.bird_x(), config.bird_start_y()),
            PipeQueue::new(),
            config.ground_y(),
        )
    }

    #[test]
    fn test_feature_layout_raw() {
        let config = EnvConfig {
            normalize_obs: false,
            ..Default::default()
        };
        let state = state_with_pipes(&config);
        let obs = features(&state, &config);
        assert_eq!(obs.len(), FEATURE_COUNT);
        assert_eq!(obs[0], 244.0);
        assert_eq!(obs[1], 0.0);
        // Two real pipes, one padded slot.
        assert_eq!(obs[2], (288.0 - 57.0) as f32);
        assert_eq!(obs[4], (432.0 - 57.0) as f32);
        assert_eq!(obs[6], 288.0);
        assert_eq!(obs[7], 0.0);

        let gap = state.pipes.get(0).unwrap().gap_center;
        assert_eq!(obs[3], (gap - (244.0 + BIRD_HEIGHT / 2.0)) as f32);
    }

    #[test]
    fn test_features_normalized() {
        let config = EnvConfig::default();
        let state = state_with_pipes(&config);
        let obs = features(&state, &config);
        assert_eq!(obs[0], (244.0 / 512.0) as f32);
        assert_eq!(obs[2], ((288.0 - 57.0) / 288.0) as f32);
        assert_eq!(obs[6], 1.0);
        assert!(obs.iter().all(|v| v.abs() <= 2.0));
    }

    #[test]
    fn test_build_dispatches_on_mode() {
        let state = state_with_pipes(&EnvConfig::default());
        assert_eq!(
            build(&state, &EnvConfig::default()).as_vector().map(<[f32]>::len),
            Some(FEATURE_COUNT)
        );
        assert_eq!(
            build(&state, &EnvConfig::lidar()).as_vector().map(<[f32]>::len),
            Some(LIDAR_RAYS)
        );
        let image = build(&state, &EnvConfig::pixels());
        assert_eq!(image.as_image().map(RgbFrame::shape), Some(vec![512, 288, 3]));
    }

    #[test]
    fn test_lidar_open_sky() {
        let config = EnvConfig {
            normalize_obs: false,
            ..EnvConfig::lidar()
        };
        let mut state = empty_state(&config);
        // Both ceiling and ground within range of the beak.
        state.bird.y = 180.0;
        let obs = lidar(&state, &config);
        assert_eq!(obs.len(), LIDAR_RAYS);

        let beak_y = state.bird.center_y();
        // Straight up hits the ceiling, straight down hits the ground.
        assert!((obs[0] as f64 - beak_y).abs() < 1e-3);
        assert!((obs[LIDAR_RAYS - 1] as f64 - (404.0 - beak_y)).abs() < 1e-3);
        // Near-horizontal rays see nothing within range.
        let range = config.lidar_range() as f32;
        assert_eq!(obs[LIDAR_RAYS / 2], range);
    }

    #[test]
    fn test_lidar_sees_pipe_ahead() {
        let config = EnvConfig {
            normalize_obs: false,
            ..EnvConfig::lidar()
        };
        let mut state = empty_state(&config);
        let beak_x = state.bird.right();
        // Gap well above the bird so the horizontal ray hits the lower pipe.
        state.pipes = PipeQueue::new();
        let mut layout_rng = ChaCha8Rng::seed_from_u64(0);
        state.pipes.spawn_initial(
            &PipeLayout {
                spawn_threshold: beak_x + 40.0,
                spacing: 500.0,
                gap_height: 100.0,
                gap_top_base: 0.0,
            },
            &mut layout_rng,
        );
        for pipe in state.pipes.iter_mut() {
            pipe.gap_center = 60.0;
        }
        let obs = lidar(&state, &config);
        // Ray 89 points just above horizontal; it enters the pipe face 40px away.
        let ray = obs[LIDAR_RAYS / 2 - 1] as f64;
        assert!((ray - 40.0).abs() < 0.1, "got {ray}");
    }

    #[test]
    fn test_lidar_normalized_bounds() {
        let config = EnvConfig::lidar();
        let state = state_with_pipes(&config);
        let obs = lidar(&state, &config);
        assert!(obs.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_ray_box_behind_origin_misses() {
        let hit = ray_box((100.0, 50.0), (1.0, 0.0), (0.0, 50.0), (0.0, 100.0));
        assert_eq!(hit, None);
        let hit = ray_box((0.0, 50.0), (1.0, 0.0), (20.0, 20.0 + BIRD_WIDTH), (0.0, 100.0));
        assert_eq!(hit, Some(20.0));
    }

    #[test]
    fn test_pipe_behind_bird_not_observed() {
        let config = EnvConfig {
            normalize_obs: false,
            ..Default::default()
        };
        let mut state = state_with_pipes(&config);
        state.pipes.scroll(288.0);
        let obs = features(&state, &config);
        let next: &Pipe = state.pipes.get(1).unwrap();
        assert_eq!(obs[2], (next.x - 57.0) as f32);
    }
}
