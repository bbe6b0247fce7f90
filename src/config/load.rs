use std::path::{Path, PathBuf};

use tracing::debug;

use crate::app_dirs;

use super::CONFIG_FILE_NAME;
use super::errors::ConfigError;
use super::types::Settings;

/// Resolve the default configuration file path inside the app directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir()?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load settings from the default location, returning defaults if missing.
pub fn load_or_default() -> Result<Settings, ConfigError> {
    load_settings_from(&config_path()?)
}

/// Load and validate settings from `path`, returning defaults if the file is absent.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(Settings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: Settings = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    settings
        .analysis
        .frame_config()
        .validate()
        .map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
    debug!(path = %path.display(), "Loaded config");
    Ok(settings.normalized())
}
