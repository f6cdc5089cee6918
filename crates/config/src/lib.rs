//! Configuration for ptzkit.
//!
//! One YAML document configures both the gimbal link and the virtual PTZ
//! engine. The documented defaults live in [`DEFAULT_CONFIG_YAML`]; any key
//! left out of a user file takes the value shown there.

#![deny(static_mut_refs)]

pub mod error;
pub mod load;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use load::{DEFAULT_CONFIG_YAML, from_yaml_str, load_default, load_from_path, to_yaml_string};
pub use schema::{GimbalSection, LimitsSection, PtzSection, PtzkitConfig, VideoSection};
