//! Observation and action space descriptions.
//!
//! Both are fixed by the configuration, so a trainer can size its networks
//! before the first reset.

use super::observation::Observation;
use crate::game::Action;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dtype {
    F32,
    U8,
}

/// Shape, element type and bounds of every observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationSpec {
    pub shape: Vec<usize>,
    pub dtype: Dtype,
    pub low: f32,
    pub high: f32,
}

impl ObservationSpec {
    /// Number of scalar elements in one observation.
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    /// Whether `observation` has this shape and type, with every element in bounds.
    pub fn contains(&self, observation: &Observation) -> bool {
        match (observation, self.dtype) {
            (Observation::Vector(values), Dtype::F32) => {
                self.shape == [values.len()]
                    && values
                        .iter()
                        .all(|v| !v.is_nan() && *v >= self.low && *v <= self.high)
            }
            (Observation::Image(frame), Dtype::U8) => self.shape == frame.shape(),
            _ => false,
        }
    }
}

/// Discrete action space. Always `Action::COUNT` wide, so never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionSpec {
    n: usize,
}

impl ActionSpec {
    /// Number of discrete actions.
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.n
    }

    /// Uniformly random action.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Action {
        Action::ALL[rng.gen_range(0..self.n)]
    }
}

impl Default for ActionSpec {
    fn default() -> Self {
        Self { n: Action::COUNT }
    }
}
