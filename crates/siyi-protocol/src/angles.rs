//! Gimbal angles: attitude readings, safety limits and 0.1° fixed point.

use crate::error::{ProtocolError, ProtocolResult};

/// Default A8 Mini yaw travel (degrees).
pub const DEFAULT_YAW_MIN: f32 = -135.0;
pub const DEFAULT_YAW_MAX: f32 = 135.0;

/// Default A8 Mini pitch travel (degrees).
pub const DEFAULT_PITCH_MIN: f32 = -90.0;
pub const DEFAULT_PITCH_MAX: f32 = 45.0;

/// Gimbal orientation as reported by the attitude response.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attitude {
    pub yaw_deg: f32,
    pub pitch_deg: f32,
    pub roll_deg: f32,
}

impl Attitude {
    /// Build an attitude from wire values in 0.1° units.
    pub fn from_deci(yaw: i16, pitch: i16, roll: i16) -> Self {
        Self {
            yaw_deg: deci_to_degrees(yaw),
            pitch_deg: deci_to_degrees(pitch),
            roll_deg: deci_to_degrees(roll),
        }
    }
}

/// Safety envelope applied to every outbound angle command.
///
/// Inbound attitude readings are never clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleLimits {
    yaw_min: f32,
    yaw_max: f32,
    pitch_min: f32,
    pitch_max: f32,
}

impl AngleLimits {
    /// # Errors
    ///
    /// Returns an error if any bound is not finite or if `min > max` on
    /// either axis.
    pub fn new(yaw_min: f32, yaw_max: f32, pitch_min: f32, pitch_max: f32) -> ProtocolResult<Self> {
        check_axis("yaw", yaw_min, yaw_max)?;
        check_axis("pitch", pitch_min, pitch_max)?;
        Ok(Self {
            yaw_min,
            yaw_max,
            pitch_min,
            pitch_max,
        })
    }

    pub fn yaw_range(&self) -> (f32, f32) {
        (self.yaw_min, self.yaw_max)
    }

    pub fn pitch_range(&self) -> (f32, f32) {
        (self.pitch_min, self.pitch_max)
    }

    pub fn clamp_yaw(&self, yaw_deg: f32) -> f32 {
        yaw_deg.clamp(self.yaw_min, self.yaw_max)
    }

    pub fn clamp_pitch(&self, pitch_deg: f32) -> f32 {
        pitch_deg.clamp(self.pitch_min, self.pitch_max)
    }

    /// Clamp a `(yaw, pitch)` pair into the envelope.
    pub fn clamp(&self, yaw_deg: f32, pitch_deg: f32) -> (f32, f32) {
        (self.clamp_yaw(yaw_deg), self.clamp_pitch(pitch_deg))
    }
}

impl Default for AngleLimits {
    fn default() -> Self {
        Self {
            yaw_min: DEFAULT_YAW_MIN,
            yaw_max: DEFAULT_YAW_MAX,
            pitch_min: DEFAULT_PITCH_MIN,
            pitch_max: DEFAULT_PITCH_MAX,
        }
    }
}

fn check_axis(axis: &'static str, min: f32, max: f32) -> ProtocolResult<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ProtocolError::NonFiniteLimit { axis });
    }
    if min > max {
        return Err(ProtocolError::InvalidLimits { axis, min, max });
    }
    Ok(())
}

/// Convert degrees to 0.1° units, rounding half away from zero.
///
/// Values outside the i16 range saturate; NaN maps to zero.
#[inline]
pub fn degrees_to_deci(degrees: f32) -> i16 {
    // `as` saturates and maps NaN to 0.
    (degrees * 10.0).round() as i16
}

#[inline]
pub fn deci_to_degrees(deci: i16) -> f32 {
    f32::from(deci) / 10.0
}
