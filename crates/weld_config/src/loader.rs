//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{BundleKind, WeldConfig};
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE: &str = "weld.toml";

/// Loads and validates a `weld.toml` configuration from a project directory.
///
/// Reads `<project_dir>/weld.toml`, parses it, and validates bundle names.
pub fn load_config(project_dir: &Path) -> Result<WeldConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    tracing::debug!(path = %config_path.display(), "loading configuration");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `weld.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<WeldConfig, ConfigError> {
    let config: WeldConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Bundle names must be unique across kinds, and every bundle needs files
/// or remote files.
fn validate_config(config: &WeldConfig) -> Result<(), ConfigError> {
    if let Some(name) = config.css.keys().find(|name| config.js.contains_key(*name)) {
        return Err(ConfigError::DuplicateBundle(name.clone()));
    }
    for kind in BundleKind::ALL {
        for (name, bundle) in config.bundles(kind) {
            if bundle.files.is_empty() && bundle.remote_files.is_empty() {
                return Err(ConfigError::MissingField(format!("{kind}.{name}.files")));
            }
        }
    }
    Ok(())
}
