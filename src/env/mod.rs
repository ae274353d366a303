//! The steppable environment.
//!
//! [`GameSimulator`] owns one episode's [`GameState`] and its random
//! generator. Each `step` advances the world one tick and reports reward,
//! termination and diagnostics the way RL trainers expect.

pub mod info;
pub mod observation;
pub mod spaces;

pub use info::{StepInfo, StepResult};
pub use observation::{Observation, FEATURE_NAMES};
pub use spaces::{ActionSpec, Dtype, ObservationSpec};

use crate::config::{EnvConfig, ObservationMode, RenderMode};
use crate::constants::{FEATURE_COUNT, LIDAR_RAYS};
use crate::error::EnvError;
use crate::game::{collision, Action, Bird, EndCause, EpisodeStatus, GameState, PipeLayout, PipeQueue};
use crate::render::{pixels, text, Frame, TerminalSurface};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The capability set every environment offers a trainer.
pub trait Environment {
    fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, StepInfo), EnvError>;
    fn step(&mut self, action: Action) -> Result<StepResult, EnvError>;
    fn render(&mut self) -> Result<Frame, EnvError>;
    fn close(&mut self) -> Result<(), EnvError>;
    fn observation_spec(&self) -> ObservationSpec;
    fn action_spec(&self) -> ActionSpec;
}

pub struct GameSimulator {
    config: EnvConfig,
    layout: PipeLayout,
    rng: ChaCha8Rng,
    state: Option<GameState>,
    surface: Option<TerminalSurface>,
}

impl GameSimulator {
    pub fn new(config: EnvConfig) -> Result<Self, EnvError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let layout = PipeLayout {
            spawn_threshold: config.screen_width as f64,
            spacing: config.pipe_spacing(),
            gap_height: config.pipe_gap,
            gap_top_base: config.gap_top_base(),
        };
        Ok(Self {
            config,
            layout,
            rng,
            state: None,
            surface: None,
        })
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Current world, or `None` before the first reset.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Start a new episode. A seed reseeds the generator; without one the
    /// generator continues from where the last episode left it.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, StepInfo), EnvError> {
        if let Some(seed) = seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }
        let mut pipes = PipeQueue::new();
        pipes.spawn_initial(&self.layout, &mut self.rng);
        let bird = Bird::new(self.config.bird_x(), self.config.bird_start_y());
        let state = GameState::new(bird, pipes, self.config.ground_y());
        tracing::debug!(?seed, "episode reset");

        let observation = observation::build(&state, &self.config);
        let info = StepInfo::from_state(&state, 0);
        self.state = Some(state);
        Ok((observation, info))
    }

    /// Advance one tick.
    pub fn step(&mut self, action: Action) -> Result<StepResult, EnvError> {
        let state = self.state.as_mut().ok_or(EnvError::NotReset)?;
        if state.status.is_over() {
            return Err(EnvError::EpisodeOver {
                status: state.status,
            });
        }
        let config = &self.config;

        state.tick += 1;
        if action.is_flap() {
            state.stats.flaps += 1;
        }
        state.bird.apply_action(action, &config.physics);
        state.bird.integrate(state.ground_y);
        state.pipes.scroll(config.physics.scroll_speed);
        state.pipes.spawn_if_due(&self.layout, &mut self.rng);

        let hit = collision::detect(&state.bird, &state.pipes, state.ground_y);
        let scored = match hit {
            Some(_) => 0,
            None => state.pipes.mark_passed(state.bird.center_x()),
        };
        state.score += scored;
        state.pipes.remove_offscreen();

        let reward = match hit {
            Some(kind) => {
                state.finish(EndCause::Collision(kind));
                config.rewards.collision
            }
            None => config.rewards.survive + config.rewards.pass_pipe * scored as f64,
        };
        if !state.status.is_over() {
            if config.score_limit.is_some_and(|limit| state.score >= limit) {
                state.finish(EndCause::ScoreLimit);
            } else if config.max_steps.is_some_and(|limit| state.tick >= limit) {
                state.finish(EndCause::StepLimit);
            }
        }
        state.stats.episode_return += reward;

        if let Some(cause) = state.end_cause {
            tracing::debug!(
                %cause,
                score = state.score,
                ticks = state.tick,
                episode_return = state.stats.episode_return,
                "episode ended"
            );
        }

        Ok(StepResult {
            observation: observation::build(state, config),
            reward,
            terminated: state.status == EpisodeStatus::Terminated,
            truncated: state.status == EpisodeStatus::Truncated,
            info: StepInfo::from_state(state, scored),
        })
    }

    /// Step with a discrete action index (0 = noop, 1 = flap).
    pub fn step_index(&mut self, index: usize) -> Result<StepResult, EnvError> {
        let action = Action::from_index(index)?;
        self.step(action)
    }

    /// Observation of the current state without advancing it.
    pub fn observation(&self) -> Result<Observation, EnvError> {
        let state = self.state.as_ref().ok_or(EnvError::NotReset)?;
        Ok(observation::build(state, &self.config))
    }

    /// Produce a frame in the configured render mode. Never changes the
    /// game state.
    pub fn render(&mut self) -> Result<Frame, EnvError> {
        let mode = self.config.render_mode.ok_or(EnvError::RenderModeUnset)?;
        let state = self.state.as_ref().ok_or(EnvError::NotReset)?;
        match mode {
            RenderMode::RgbArray => Ok(Frame::Rgb(pixels::draw(state, &self.config))),
            RenderMode::Ansi => Ok(Frame::Text(text::draw(state, &self.config))),
            RenderMode::Human => {
                let surface = match self.surface.take() {
                    Some(surface) => surface,
                    None => TerminalSurface::open()?,
                };
                let surface = self.surface.insert(surface);
                surface.draw(state, &self.config)?;
                Ok(Frame::Presented)
            }
        }
    }

    /// Release the terminal surface, if one was opened. Safe to call twice.
    pub fn close(&mut self) -> Result<(), EnvError> {
        if let Some(mut surface) = self.surface.take() {
            surface.close()?;
        }
        Ok(())
    }

    pub fn observation_spec(&self) -> ObservationSpec {
        let width = self.config.screen_width as usize;
        let height = self.config.screen_height as usize;
        let normalize = self.config.normalize_obs;
        match self.config.observation {
            ObservationMode::Features => ObservationSpec {
                shape: vec![FEATURE_COUNT],
                dtype: Dtype::F32,
                low: f32::NEG_INFINITY,
                high: f32::INFINITY,
            },
            ObservationMode::Lidar => ObservationSpec {
                shape: vec![LIDAR_RAYS],
                dtype: Dtype::F32,
                low: 0.0,
                high: if normalize {
                    1.0
                } else {
                    self.config.lidar_range() as f32
                },
            },
            ObservationMode::Pixels => ObservationSpec {
                shape: vec![height, width, 3],
                dtype: Dtype::U8,
                low: 0.0,
                high: 255.0,
            },
        }
    }

    pub fn action_spec(&self) -> ActionSpec {
        ActionSpec::default()
    }
}

impl Environment for GameSimulator {
    fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, StepInfo), EnvError> {
        GameSimulator::reset(self, seed)
    }

    fn step(&mut self, action: Action) -> Result<StepResult, EnvError> {
        GameSimulator::step(self, action)
    }

    fn render(&mut self) -> Result<Frame, EnvError> {
        GameSimulator::render(self)
    }

    fn close(&mut self) -> Result<(), EnvError> {
        GameSimulator::close(self)
    }

    fn observation_spec(&self) -> ObservationSpec {
        GameSimulator::observation_spec(self)
    }

    fn action_spec(&self) -> ActionSpec {
        GameSimulator::action_spec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::game::CollisionKind;

    fn simulator(config: EnvConfig) -> GameSimulator {
        let mut sim = GameSimulator::new(config).unwrap();
        sim.reset(Some(42)).unwrap();
        sim
    }

    /// Pin every pipe's gap to one height so a simple controller can fly
    /// through indefinitely.
    fn hold_gap(sim: &mut GameSimulator, gap_center: f64) {
        if let Some(state) = sim.state.as_mut() {
            for pipe in state.pipes.iter_mut() {
                pipe.gap_center = gap_center;
            }
        }
    }

    fn follow(sim: &GameSimulator, gap_center: f64) -> Action {
        let bird = &sim.state().unwrap().bird;
        Action::from(bird.center_y() > gap_center + 15.0)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EnvConfig {
            pipe_gap: 0.0,
            ..Default::default()
        };
        let err = GameSimulator::new(config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_step_before_reset() {
        let mut sim = GameSimulator::new(EnvConfig::default()).unwrap();
        assert_eq!(sim.step(Action::Noop).unwrap_err(), EnvError::NotReset);
        assert!(sim.state().is_none());
    }

    #[test]
    fn test_specs_before_reset() {
        let sim = GameSimulator::new(EnvConfig::default()).unwrap();
        assert_eq!(sim.observation_spec().shape, vec![FEATURE_COUNT]);
        assert_eq!(sim.action_spec().n(), 2);

        let sim = GameSimulator::new(EnvConfig::pixels()).unwrap();
        assert_eq!(sim.observation_spec().shape, vec![512, 288, 3]);
        assert_eq!(sim.observation_spec().dtype, Dtype::U8);
    }

    #[test]
    fn test_reset_state() {
        let mut sim = GameSimulator::new(EnvConfig::default()).unwrap();
        let (obs, info) = sim.reset(Some(1)).unwrap();
        assert!(sim.observation_spec().contains(&obs));
        assert_eq!(info.score, 0);
        assert_eq!(info.tick, 0);
        assert_eq!(info.status, EpisodeStatus::Running);

        let state = sim.state().unwrap();
        assert_eq!(state.bird.y, 244.0);
        assert_eq!(state.bird.velocity, 0.0);
        assert_eq!(state.pipes.len(), 2);
        assert_eq!(state.pipes.get(0).unwrap().x, 288.0);
        assert_eq!(state.pipes.get(1).unwrap().x, 432.0);
    }

    #[test]
    fn test_flap_on_first_tick() {
        let mut sim = simulator(EnvConfig::default());
        let result = sim.step(Action::Flap).unwrap();
        let bird = &sim.state().unwrap().bird;
        assert_eq!(bird.velocity, -9.0);
        assert_eq!(bird.y, 244.0 - 9.0);
        assert_eq!(result.reward, 0.1);
        assert_eq!(result.info.flaps, 1);
    }

    #[test]
    fn test_invalid_action_index_does_not_mutate() {
        let mut sim = simulator(EnvConfig::default());
        let before = sim.state().cloned();
        let err = sim.step_index(2).unwrap_err();
        assert_eq!(err, EnvError::InvalidAction { index: 2 });
        assert_eq!(err.kind(), ErrorKind::ContractViolation);
        assert_eq!(sim.state().cloned(), before);

        assert!(sim.step_index(1).is_ok());
        assert_eq!(sim.state().unwrap().bird.velocity, -9.0);
    }

    #[test]
    fn test_noop_hits_ground() {
        let mut sim = simulator(EnvConfig::default());
        let mut last = None;
        for _ in 0..100 {
            let result = sim.step(Action::Noop).unwrap();
            let done = result.done();
            last = Some(result);
            if done {
                break;
            }
        }
        let result = last.unwrap();
        // 136px to fall: 55px over ticks 1-10, then 10px a tick at max fall speed.
        assert_eq!(result.info.tick, 19);
        assert!(result.terminated);
        assert!(!result.truncated);
        assert_eq!(result.reward, -2.0);
        assert_eq!(result.info.collision(), Some(CollisionKind::Ground));
        assert!(!sim.state().unwrap().bird.alive);
    }

    #[test]
    fn test_episode_over_fails_fast() {
        let mut sim = simulator(EnvConfig::default());
        while !sim.step(Action::Noop).unwrap().done() {}
        let before = sim.state().cloned();

        let err = sim.step(Action::Flap).unwrap_err();
        assert_eq!(
            err,
            EnvError::EpisodeOver {
                status: EpisodeStatus::Terminated
            }
        );
        assert_eq!(sim.state().cloned(), before);

        sim.reset(None).unwrap();
        assert!(sim.step(Action::Flap).is_ok());
    }

    #[test]
    fn test_truncated_episode_fails_fast() {
        let config = EnvConfig {
            max_steps: Some(3),
            ..Default::default()
        };
        let mut sim = simulator(config);
        while !sim.step(Action::Noop).unwrap().done() {}
        let before = sim.state().cloned();
        assert_eq!(
            before.as_ref().map(|s| s.status),
            Some(EpisodeStatus::Truncated)
        );

        for action in Action::ALL {
            assert_eq!(
                sim.step(action).unwrap_err(),
                EnvError::EpisodeOver {
                    status: EpisodeStatus::Truncated
                }
            );
            assert_eq!(sim.state().cloned(), before);
        }
        assert!(matches!(
            sim.step_index(0),
            Err(EnvError::EpisodeOver { .. })
        ));
        assert_eq!(sim.state().cloned(), before);
    }

    #[test]
    fn test_pipe_collision_on_exact_tick() {
        let mut sim = simulator(EnvConfig::default());
        {
            let state = sim.state.as_mut().unwrap();
            let bird_x = state.bird.x;
            let pipe = state.pipes.iter_mut().next().unwrap();
            // After this tick's scroll the pipe sits right on the bird.
            pipe.x = bird_x + 4.0;
            pipe.gap_center = 60.0;
        }
        let result = sim.step(Action::Noop).unwrap();
        assert!(result.terminated);
        assert_eq!(result.info.tick, 1);
        assert_eq!(result.reward, sim.config().rewards.collision);
        assert_eq!(result.info.collision(), Some(CollisionKind::Pipe));
        assert_eq!(result.info.scored, 0);
    }

    #[test]
    fn test_score_limit_truncates() {
        let gap = 256.0;
        let mut sim = simulator(EnvConfig::default().with_score_limit(3));
        hold_gap(&mut sim, gap);

        let mut score = 0;
        let mut first_pipe_x = vec![288.0];
        let result = loop {
            let result = sim.step(follow(&sim, gap)).unwrap();
            hold_gap(&mut sim, gap);

            assert!(result.info.score <= score + 1, "score jumped");
            score = result.info.score;

            let state = sim.state().unwrap();
            if let Some(pipe) = state.pipes.iter().find(|p| p.id == 0) {
                first_pipe_x.push(pipe.x);
            }
            if result.done() {
                break result;
            }
        };

        assert!(result.truncated);
        assert!(!result.terminated);
        assert_eq!(result.info.score, 3);
        assert_eq!(result.info.end_cause, Some(EndCause::ScoreLimit));
        assert_eq!(result.reward, 0.1 + 1.0);
        assert_eq!(result.info.tick, 132);

        // The first pipe moved left every tick and left the queue once.
        assert!(first_pipe_x.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(first_pipe_x.len(), 86);
        assert!(sim.state().unwrap().pipes.iter().all(|p| p.id != 0));
    }

    #[test]
    fn test_passed_pipe_scores_once() {
        let gap = 256.0;
        let mut sim = simulator(EnvConfig::default());
        hold_gap(&mut sim, gap);
        let mut scored_ticks = Vec::new();
        for _ in 0..100 {
            let result = sim.step(follow(&sim, gap)).unwrap();
            hold_gap(&mut sim, gap);
            if result.info.scored > 0 {
                scored_ticks.push(result.info.tick);
            }
        }
        // Pipe 0's center reaches the bird's center at tick 60, pipe 1 at 96.
        assert_eq!(scored_ticks, vec![60, 96]);
        assert_eq!(sim.state().unwrap().score, 2);
    }

    #[test]
    fn test_max_steps_truncates() {
        let config = EnvConfig {
            max_steps: Some(5),
            ..Default::default()
        };
        let mut sim = simulator(config);
        for _ in 0..4 {
            assert!(!sim.step(Action::Noop).unwrap().done());
        }
        let result = sim.step(Action::Noop).unwrap();
        assert!(result.truncated);
        assert!(!result.terminated);
        assert_eq!(result.reward, 0.1);
        assert_eq!(result.info.end_cause, Some(EndCause::StepLimit));
    }

    #[test]
    fn test_seeded_runs_match() {
        let actions: Vec<usize> = (0..400).map(|i| usize::from(i % 7 < 2)).collect();
        let play = |sim: &mut GameSimulator, seed: u64| {
            let (first, _) = sim.reset(Some(seed)).unwrap();
            let mut out = vec![(first, 0.0, false, false)];
            for &a in &actions {
                let result = sim.step_index(a).unwrap();
                let done = result.done();
                out.push((
                    result.observation,
                    result.reward,
                    result.terminated,
                    result.truncated,
                ));
                if done {
                    break;
                }
            }
            out
        };
        let mut a = GameSimulator::new(EnvConfig::default()).unwrap();
        let mut b = GameSimulator::new(EnvConfig::default()).unwrap();
        let first = play(&mut a, 9);
        assert!(first.len() > 1);
        assert_eq!(first, play(&mut b, 9));

        // Reseeding the same instance replays the episode exactly.
        assert_eq!(play(&mut a, 9), first);
    }

    #[test]
    fn test_return_accumulates() {
        let mut sim = simulator(EnvConfig::default());
        let mut total = 0.0;
        loop {
            let result = sim.step(Action::Noop).unwrap();
            total += result.reward;
            if result.done() {
                assert!((result.info.episode_return - total).abs() < 1e-9);
                break;
            }
        }
    }

    #[test]
    fn test_render_requires_mode() {
        let mut sim = simulator(EnvConfig::default());
        assert_eq!(sim.render().unwrap_err(), EnvError::RenderModeUnset);

        let mut sim = GameSimulator::new(EnvConfig::pixels()).unwrap();
        assert_eq!(sim.render().unwrap_err(), EnvError::NotReset);
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut sim = simulator(EnvConfig::pixels());
        sim.step(Action::Noop).unwrap();
        let before = sim.state().cloned();
        let first = sim.render().unwrap();
        let second = sim.render().unwrap();
        assert_eq!(first, second);
        assert_eq!(sim.state().cloned(), before);
        match first {
            Frame::Rgb(frame) => assert_eq!(frame.shape(), vec![512, 288, 3]),
            other => panic!("expected rgb frame, got {other:?}"),
        }
    }

    #[test]
    fn test_render_ansi() {
        let config = EnvConfig::default().with_render_mode(RenderMode::Ansi);
        let mut sim = simulator(config);
        match sim.render().unwrap() {
            Frame::Text(text) => assert!(text.contains("score 0")),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[test]
    fn test_close_without_surface() {
        let mut sim = simulator(EnvConfig::default());
        assert!(sim.close().is_ok());
        assert!(sim.close().is_ok());
    }

    #[test]
    fn test_pixel_observation_matches_spec() {
        let mut sim = simulator(EnvConfig::pixels());
        let result = sim.step(Action::Flap).unwrap();
        assert!(sim.observation_spec().contains(&result.observation));
        assert_eq!(sim.observation().unwrap(), result.observation);
    }

    #[test]
    fn test_simulator_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<GameSimulator>();
    }
}
