//! SIYI protocol error types.
//!
//! Malformed inbound frames are not errors; [`crate::frame::decode`] returns
//! `None` for them. These variants cover caller mistakes on the encode side.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Payload too large: {len} bytes exceeds the {max} byte length field")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Invalid {axis} limits: min {min} is greater than max {max}")]
    InvalidLimits {
        axis: &'static str,
        min: f32,
        max: f32,
    },

    #[error("Non-finite {axis} limit")]
    NonFiniteLimit { axis: &'static str },
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
