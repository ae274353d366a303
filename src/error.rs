use std::fmt;
use std::io;

use crate::game::EpisodeStatus;

/// Broad category of an [`EnvError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller broke the reset/step protocol or passed an invalid action.
    ContractViolation,
    /// The environment could not be constructed from the given settings.
    Configuration,
    /// A frame could not be produced or presented.
    Render,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EnvError {
    NotReset,
    EpisodeOver { status: EpisodeStatus },
    InvalidAction { index: usize },
    InvalidConfig { field: &'static str, reason: String },
    ConfigParse(String),
    ConfigIo(String),
    RenderModeUnset,
    Surface(String),
}

impl EnvError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotReset | Self::EpisodeOver { .. } | Self::InvalidAction { .. } => {
                ErrorKind::ContractViolation
            }
            Self::InvalidConfig { .. } | Self::ConfigParse(_) | Self::ConfigIo(_) => {
                ErrorKind::Configuration
            }
            Self::RenderModeUnset | Self::Surface(_) => ErrorKind::Render,
        }
    }

    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReset => write!(f, "step called before reset"),
            Self::EpisodeOver { status } => {
                write!(f, "episode is {status}; call reset before stepping again")
            }
            Self::InvalidAction { index } => {
                write!(f, "invalid action index {index} (expected 0 = noop or 1 = flap)")
            }
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid config `{field}`: {reason}")
            }
            Self::ConfigParse(msg) => write!(f, "could not parse config: {msg}"),
            Self::ConfigIo(msg) => write!(f, "could not read config: {msg}"),
            Self::RenderModeUnset => write!(f, "render called but no render_mode is configured"),
            Self::Surface(msg) => write!(f, "terminal surface error: {msg}"),
        }
    }
}

impl std::error::Error for EnvError {}

impl From<serde_json::Error> for EnvError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}

impl From<io::Error> for EnvError {
    fn from(err: io::Error) -> Self {
        Self::Surface(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(EnvError::NotReset.kind(), ErrorKind::ContractViolation);
        assert_eq!(
            EnvError::InvalidAction { index: 7 }.kind(),
            ErrorKind::ContractViolation
        );
        assert_eq!(
            EnvError::EpisodeOver {
                status: EpisodeStatus::Terminated
            }
            .kind(),
            ErrorKind::ContractViolation
        );
        assert_eq!(
            EnvError::invalid_config("pipe_gap", "must be positive").kind(),
            ErrorKind::Configuration
        );
        assert_eq!(EnvError::RenderModeUnset.kind(), ErrorKind::Render);
    }

    #[test]
    fn test_display_messages() {
        let err = EnvError::InvalidAction { index: 3 };
        assert!(err.to_string().contains("invalid action index 3"));

        let err = EnvError::EpisodeOver {
            status: EpisodeStatus::Truncated,
        };
        assert!(err.to_string().contains("truncated"));

        let err = EnvError::invalid_config("pipe_gap", "must be positive");
        assert_eq!(err.to_string(), "invalid config `pipe_gap`: must be positive");
    }

    #[test]
    fn test_json_error_maps_to_configuration() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: EnvError = parse.unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
