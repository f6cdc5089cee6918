//! Error types for ptzctl

use ptzkit_config::ConfigError;
use ptzkit_gimbal_link::LinkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gimbal unreachable: {0}")]
    GimbalUnreachable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Gimbal link error: {0}")]
    Link(LinkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::GimbalUnreachable(_) => 3,
            Self::InvalidInput(_) => 4,
            Self::Link(_) | Self::Io(_) | Self::Json(_) => 1,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::GimbalUnreachable(_) => "gimbal_unreachable",
            Self::InvalidInput(_) => "invalid_input",
            Self::Link(_) => "link",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }

    /// Classify a link failure talking to `endpoint`.
    pub fn from_link(error: LinkError, endpoint: impl std::fmt::Display) -> Self {
        match error {
            LinkError::Io(e) => Self::GimbalUnreachable(format!("{endpoint}: {e}")),
            LinkError::InvalidAngle { yaw, pitch } => {
                Self::InvalidInput(format!("angles must be finite, got yaw {yaw}, pitch {pitch}"))
            }
            other => Self::Link(other),
        }
    }
}
