use thiserror::Error;

use crate::config::AspectRatio;
use crate::types::FrameSize;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PtzError {
    #[error("{what} size {size} has a zero dimension")]
    EmptyFrame { what: &'static str, size: FrameSize },

    #[error("aspect ratio {0} has a zero component")]
    InvalidAspect(AspectRatio),

    #[error("max zoom must be finite and at least 1.0, got {0}")]
    InvalidMaxZoom(f64),

    #[error("zoom step must be finite and positive, got {0}")]
    InvalidZoomStep(f64),

    #[error("target fill must be in (0, 1], got {0}")]
    InvalidTargetFill(f64),
}

pub type PtzResult<T> = Result<T, PtzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PtzError::EmptyFrame {
            what: "output",
            size: FrameSize::new(0, 720),
        };
        assert_eq!(err.to_string(), "output size 0x720 has a zero dimension");
        assert_eq!(
            PtzError::InvalidMaxZoom(0.5).to_string(),
            "max zoom must be finite and at least 1.0, got 0.5"
        );
    }
}
