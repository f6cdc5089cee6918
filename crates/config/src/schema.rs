//! Configuration document schema.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ptzkit_gimbal_link::{AngleLimits, LinkConfig};
use ptzkit_siyi_protocol::{DEFAULT_PITCH_MAX, DEFAULT_PITCH_MIN, DEFAULT_YAW_MAX, DEFAULT_YAW_MIN};
use ptzkit_virtual_ptz::{
    AspectRatio, DEFAULT_FRAME, DEFAULT_MAX_ZOOM, DEFAULT_TARGET_FILL, DEFAULT_ZOOM_STEP,
    FrameSize, PtzConfig,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Root of a ptzkit configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PtzkitConfig {
    pub gimbal: GimbalSection,
    pub ptz: PtzSection,
    pub video: VideoSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GimbalSection {
    pub address: IpAddr,
    pub port: u16,
    pub timeout_ms: u64,
    pub limits: LimitsSection,
}

impl Default for GimbalSection {
    fn default() -> Self {
        let link = LinkConfig::default();
        Self {
            address: link.endpoint.ip(),
            port: link.endpoint.port(),
            timeout_ms: u64::try_from(link.timeout.as_millis()).unwrap_or(u64::MAX),
            limits: LimitsSection::default(),
        }
    }
}

/// Angle envelope in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsSection {
    pub yaw_min: f32,
    pub yaw_max: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            yaw_min: DEFAULT_YAW_MIN,
            yaw_max: DEFAULT_YAW_MAX,
            pitch_min: DEFAULT_PITCH_MIN,
            pitch_max: DEFAULT_PITCH_MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PtzSection {
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub target_fill: f64,
    pub aspect: AspectRatio,
}

impl Default for PtzSection {
    fn default() -> Self {
        Self {
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_step: DEFAULT_ZOOM_STEP,
            target_fill: DEFAULT_TARGET_FILL,
            aspect: AspectRatio::PORTRAIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoSection {
    pub resolution: FrameSize,
    /// Defaults to `resolution` when absent.
    pub output: Option<FrameSize>,
}

impl Default for VideoSection {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_FRAME,
            output: None,
        }
    }
}

impl PtzkitConfig {
    /// Check every section, returning the first problem found.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`], [`ConfigError::Limits`] or
    /// [`ConfigError::Ptz`] describing the offending value.
    pub fn validate(&self) -> ConfigResult<()> {
        self.link_config()?;
        self.engine_config()?;
        Ok(())
    }

    pub fn endpoint(&self) -> SocketAddr {
        SocketAddr::new(self.gimbal.address, self.gimbal.port)
    }

    /// Gimbal link settings.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero timeout or inverted/non-finite limits.
    pub fn link_config(&self) -> ConfigResult<LinkConfig> {
        if self.gimbal.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        let l = self.gimbal.limits;
        Ok(LinkConfig {
            endpoint: self.endpoint(),
            timeout: Duration::from_millis(self.gimbal.timeout_ms),
            limits: AngleLimits::new(l.yaw_min, l.yaw_max, l.pitch_min, l.pitch_max)?,
        })
    }

    /// Virtual PTZ engine settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Ptz`] if the framing values are out of range.
    pub fn engine_config(&self) -> ConfigResult<PtzConfig> {
        let video = self.video;
        let config = PtzConfig::for_frame(video.resolution)
            .with_output(video.output.unwrap_or(video.resolution))
            .with_max_zoom(self.ptz.max_zoom)
            .with_zoom_step(self.ptz.zoom_step)
            .with_target_fill(self.ptz.target_fill)
            .with_aspect(self.ptz.aspect);
        config.validate()?;
        Ok(config)
    }
}
