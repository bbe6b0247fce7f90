//! Real-versus-synthetic audio detection built on a fixed acoustic feature vector.
/// Audio loading and feature extraction.
pub mod analysis;
/// Application directory helpers.
pub mod app_dirs;
/// TOML configuration.
pub mod config;
/// End-to-end detection orchestration.
pub mod detect;
/// Tracing setup.
pub mod logging;
/// Predictor capability and bundled model families.
pub mod ml;
