//! TOML configuration for analysis framing, parallelism and the intake policy.

mod defaults;
mod errors;
mod load;
mod types;

/// File name of the settings file inside the app directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub use errors::{ConfigError, IntakeError};
pub use load::{config_path, load_or_default, load_settings_from};
pub use types::{AnalysisSettings, IntakeSettings, Settings};
