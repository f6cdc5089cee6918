//! Framing parameters for the engine.

use serde::{Deserialize, Serialize};

use crate::error::{PtzError, PtzResult};
use crate::types::FrameSize;

pub const DEFAULT_MAX_ZOOM: f64 = 6.0;
pub const DEFAULT_ZOOM_STEP: f64 = 0.2;
/// Fraction of the output height a resolved target should fill.
pub const DEFAULT_TARGET_FILL: f64 = 0.8;
pub const DEFAULT_FRAME: FrameSize = FrameSize::new(1920, 1080);

/// Crop aspect ratio as `width:height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Portrait 9:16, sized for a standing person.
    pub const PORTRAIT: Self = Self::new(9, 16);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::PORTRAIT
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PtzConfig {
    /// Full sensor frame the crop is cut from.
    pub frame: FrameSize,
    /// Rendered output size; crop height is `output.height / zoom`.
    pub output: FrameSize,
    pub max_zoom: f64,
    /// Manual zoom change per up/down event.
    pub zoom_step: f64,
    pub target_fill: f64,
    pub aspect: AspectRatio,
}

impl PtzConfig {
    /// Defaults for a frame of `frame`, rendering at the same size.
    pub fn for_frame(frame: FrameSize) -> Self {
        Self {
            frame,
            output: frame,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_step: DEFAULT_ZOOM_STEP,
            target_fill: DEFAULT_TARGET_FILL,
            aspect: AspectRatio::PORTRAIT,
        }
    }

    pub fn with_output(mut self, output: FrameSize) -> Self {
        self.output = output;
        self
    }

    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_zoom_step(mut self, zoom_step: f64) -> Self {
        self.zoom_step = zoom_step;
        self
    }

    pub fn with_target_fill(mut self, target_fill: f64) -> Self {
        self.target_fill = target_fill;
        self
    }

    pub fn with_aspect(mut self, aspect: AspectRatio) -> Self {
        self.aspect = aspect;
        self
    }

    /// # Errors
    ///
    /// Returns the first violated constraint: empty frame or output,
    /// zero aspect component, `max_zoom` below 1, non-positive zoom step, or
    /// target fill outside `(0, 1]`.
    pub fn validate(&self) -> PtzResult<()> {
        if self.frame.is_empty() {
            return Err(PtzError::EmptyFrame {
                what: "frame",
                size: self.frame,
            });
        }
        if self.output.is_empty() {
            return Err(PtzError::EmptyFrame {
                what: "output",
                size: self.output,
            });
        }
        if self.aspect.width == 0 || self.aspect.height == 0 {
            return Err(PtzError::InvalidAspect(self.aspect));
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= 1.0) {
            return Err(PtzError::InvalidMaxZoom(self.max_zoom));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return Err(PtzError::InvalidZoomStep(self.zoom_step));
        }
        if !(self.target_fill > 0.0 && self.target_fill <= 1.0) {
            return Err(PtzError::InvalidTargetFill(self.target_fill));
        }
        Ok(())
    }
}

impl Default for PtzConfig {
    fn default() -> Self {
        Self::for_frame(DEFAULT_FRAME)
    }
}
