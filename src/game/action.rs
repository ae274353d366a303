use crate::error::EnvError;
use serde::{Deserialize, Serialize};

/// Action the agent can take on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Let gravity act
    Noop,
    /// Set the bird's velocity to the flap impulse
    Flap,
}

impl Action {
    /// Size of the discrete action space
    pub const COUNT: usize = 2;

    pub const ALL: [Action; Action::COUNT] = [Action::Noop, Action::Flap];

    /// Convert a discrete action index, rejecting anything outside `0..COUNT`
    pub fn from_index(index: usize) -> Result<Self, EnvError> {
        match index {
            0 => Ok(Action::Noop),
            1 => Ok(Action::Flap),
            _ => Err(EnvError::InvalidAction { index }),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Action::Noop => 0,
            Action::Flap => 1,
        }
    }

    pub fn is_flap(self) -> bool {
        self == Action::Flap
    }
}

impl TryFrom<usize> for Action {
    type Error = EnvError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Action::from_index(index)
    }
}

impl From<bool> for Action {
    fn from(flap: bool) -> Self {
        if flap {
            Action::Flap
        } else {
            Action::Noop
        }
    }
}
