use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::FrameConfig;

use super::defaults::{
    clamp_workers, default_allowed_extensions, default_frame_length, default_hop_length,
    default_max_file_bytes, default_mel_bands, default_workers,
};
use super::errors::IntakeError;

/// Settings persisted in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Classifier used when no `--model` is given.
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub intake: IntakeSettings,
}

impl Settings {
    pub(super) fn normalized(mut self) -> Self {
        self.analysis.workers = clamp_workers(self.analysis.workers);
        self.intake.allowed_extensions = self
            .intake
            .allowed_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }
}

/// Frame layout and parallelism for feature extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_frame_length")]
    pub frame_length: usize,
    #[serde(default = "default_hop_length")]
    pub hop_length: usize,
    #[serde(default = "default_mel_bands")]
    pub mel_bands: usize,
    /// Parallel files in batch mode; 0 uses every available CPU.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            frame_length: default_frame_length(),
            hop_length: default_hop_length(),
            mel_bands: default_mel_bands(),
            workers: default_workers(),
        }
    }
}

impl AnalysisSettings {
    pub fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            frame_length: self.frame_length,
            hop_length: self.hop_length,
            mel_bands: self.mel_bands,
        }
    }
}

/// Which files are accepted for analysis at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeSettings {
    /// Upper bound on input size in bytes; 0 disables the check.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    /// Lowercase extensions without the leading dot.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

impl IntakeSettings {
    /// Reject files by extension or size before any decoding happens.
    ///
    /// Files whose size cannot be read pass through so the loader can report them.
    pub fn check(&self, path: &Path) -> Result<(), IntakeError> {
        let allowed = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.allowed_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            });
        if !allowed {
            return Err(IntakeError::Extension {
                path: path.to_path_buf(),
                allowed: self.allowed_extensions.join(", "),
            });
        }
        if self.max_file_bytes > 0 {
            if let Ok(metadata) = std::fs::metadata(path) {
                if metadata.len() > self.max_file_bytes {
                    return Err(IntakeError::TooLarge {
                        path: path.to_path_buf(),
                        size: metadata.len(),
                        limit: self.max_file_bytes,
                    });
                }
            }
        }
        Ok(())
    }
}
