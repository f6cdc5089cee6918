//! Loading configuration documents.

use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::schema::PtzkitConfig;

/// The documented default configuration.
pub const DEFAULT_CONFIG_YAML: &str = include_str!("default_config.yaml");

/// Parse the embedded default document.
///
/// # Errors
///
/// Only fails if the embedded document is broken, which the tests rule out.
pub fn load_default() -> ConfigResult<PtzkitConfig> {
    from_yaml_str(DEFAULT_CONFIG_YAML)
}

/// Parse and validate a YAML document. Missing keys take their defaults.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed YAML or unknown keys, or a
/// validation error for out-of-range values.
pub fn from_yaml_str(yaml: &str) -> ConfigResult<PtzkitConfig> {
    // A document with no content deserialises as unit, not as a mapping.
    let config: PtzkitConfig = if is_blank(yaml) {
        PtzkitConfig::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    config.validate()?;
    Ok(config)
}

fn is_blank(yaml: &str) -> bool {
    yaml.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

/// Read, parse and validate the file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file cannot be read, otherwise as
/// [`from_yaml_str`].
pub fn load_from_path(path: impl AsRef<Path>) -> ConfigResult<PtzkitConfig> {
    let path = path.as_ref();
    let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = from_yaml_str(&yaml)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Serialise `config` back to YAML.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if serialisation fails.
pub fn to_yaml_string(config: &PtzkitConfig) -> ConfigResult<String> {
    Ok(serde_yaml::to_string(config)?)
}
