use std::path::PathBuf;

use thiserror::Error;

use crate::app_dirs::AppDirError;

/// Errors that may occur while loading configuration or applying its policy.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// A parsed value is outside its accepted range.
    #[error("Invalid config at {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
    /// No usable config directory found.
    #[error("No suitable config directory found: {0}")]
    AppDir(#[from] AppDirError),
}

/// An input file rejected by the intake policy before decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Unsupported file type for {path}: allowed extensions are {allowed}")]
    Extension { path: PathBuf, allowed: String },
    #[error("File {path} is {size} bytes, above the {limit} byte limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}
