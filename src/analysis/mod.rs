//! Audio loading and acoustic feature extraction.

pub mod audio;
pub mod features;
mod frames;
mod frequency_domain;
mod time_domain;
pub mod vector;

/// Fixed sample rate every waveform is resampled to before extraction.
pub const ANALYSIS_SAMPLE_RATE: u32 = 22_050;

pub use audio::{AudioLoadError, AudioProbe, DecodeError, load, probe_metadata, validate};
pub use features::{ExtractedFeatures, ExtractionError, FeatureExtractor, FeatureStage, extract};
pub use frames::FrameConfig;
pub use vector::{FEATURE_VECTOR_LEN, FEATURE_VERSION, FeatureVector};

/// Mono time-domain signal paired with its sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Mono samples, nominally in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Waveform {
    /// Wrap mono samples recorded at `sample_rate`.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds (`0.0` for a zero sample rate).
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        (self.samples.len() as f64 / self.sample_rate as f64) as f32
    }
}
