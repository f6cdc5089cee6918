//! Gimbal link error types.
//!
//! Only resource failures and caller mistakes are errors. A missing or
//! garbled attitude reply is reported as `Ok(None)` by
//! [`crate::GimbalLink::request_attitude`].

use ptzkit_siyi_protocol::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Invalid angle command: yaw {yaw}, pitch {pitch}")]
    InvalidAngle { yaw: f32, pitch: f32 },
}

pub type LinkResult<T> = Result<T, LinkError>;
