//! Config directory resolution.
//!
//! `POLYREAD_CONFIG_DIR` overrides the platform config directory, which is
//! handy for tests and portable installs.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "POLYREAD_CONFIG_DIR";

/// Settings file name inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the system config directory.
    #[error("Cannot determine system config directory")]
    NoConfigDir,

    /// An empty override was provided.
    #[error("POLYREAD_CONFIG_DIR is set but empty")]
    EmptyOverride,
}

/// Directory holding polyread configuration.
pub fn config_root() -> Result<PathBuf, PathError> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        if dir.trim().is_empty() {
            return Err(PathError::EmptyOverride);
        }
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join("polyread"))
        .ok_or(PathError::NoConfigDir)
}

/// Default location of the settings file.
pub fn default_settings_path() -> Result<PathBuf, PathError> {
    Ok(config_root()?.join(SETTINGS_FILE_NAME))
}
