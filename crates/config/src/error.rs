use std::io;
use std::path::PathBuf;

use ptzkit_siyi_protocol::ProtocolError;
use ptzkit_virtual_ptz::PtzError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("gimbal.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("gimbal.limits: {0}")]
    Limits(#[from] ProtocolError),

    #[error("ptz: {0}")]
    Ptz(#[from] PtzError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
