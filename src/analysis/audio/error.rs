use std::path::PathBuf;

use symphonia::core::errors::Error as SymphoniaError;
use thiserror::Error;

/// Failure to turn a path into an analysis waveform.
#[derive(Debug, Error)]
pub enum AudioLoadError {
    /// Nothing (or something other than a regular file) exists at the path.
    #[error("Audio file not found: {}", path.display())]
    NotFound { path: PathBuf },
    /// The file exists but holds zero bytes.
    #[error("Audio file is empty: {}", path.display())]
    EmptyFile { path: PathBuf },
    /// File metadata could not be read for a reason other than absence.
    #[error("Failed to read metadata for {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The content could not be parsed as audio.
    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: DecodeError,
    },
    /// Sample-rate conversion failed.
    #[error("Failed to resample {} from {from_rate} Hz to {to_rate} Hz: {reason}", path.display())]
    Resample {
        path: PathBuf,
        from_rate: u32,
        to_rate: u32,
        reason: String,
    },
}

impl AudioLoadError {
    /// Path the failure refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound { path }
            | Self::EmptyFile { path }
            | Self::Metadata { path, .. }
            | Self::Decode { path, .. }
            | Self::Resample { path, .. } => path,
        }
    }
}

/// Underlying reason a file's content could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot open file: {0}")]
    Open(std::io::Error),
    #[error("unrecognized or corrupt container: {0}")]
    Probe(SymphoniaError),
    #[error("WAV header is invalid: {0}")]
    Wav(hound::Error),
    #[error("no decodable audio track")]
    NoAudioTrack,
    #[error("track does not declare a sample rate")]
    MissingSampleRate,
    #[error("unsupported codec: {0}")]
    UnsupportedCodec(SymphoniaError),
    #[error("stream read failed: {0}")]
    Packet(SymphoniaError),
    #[error("stream contained no audio samples")]
    NoSamples,
}
