use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::Waveform;
use super::frames::FrameConfig;
use super::frequency_domain::summarize_spectrum;
use super::time_domain::summarize_time_domain;
use super::vector::{FEATURE_VECTOR_LEN, FeatureVector};

/// Descriptor class being computed when extraction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStage {
    /// Frame layout or input validation.
    Framing,
    Mfcc,
    Rms,
    SpectralCentroid,
    SpectralBandwidth,
    SpectralRolloff,
    ZeroCrossingRate,
}

impl fmt::Display for FeatureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Framing => "framing",
            Self::Mfcc => "MFCC",
            Self::Rms => "RMS energy",
            Self::SpectralCentroid => "spectral centroid",
            Self::SpectralBandwidth => "spectral bandwidth",
            Self::SpectralRolloff => "spectral rolloff",
            Self::ZeroCrossingRate => "zero-crossing rate",
        };
        f.write_str(name)
    }
}

/// A descriptor could not be computed for reasons other than a short input.
#[derive(Debug, Error)]
#[error("Feature extraction failed during {stage}: {reason}")]
pub struct ExtractionError {
    /// Stage that failed.
    pub stage: FeatureStage,
    /// Human-readable cause.
    pub reason: String,
}

impl ExtractionError {
    fn new(stage: FeatureStage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

/// Feature vector plus the statistics reported alongside a verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFeatures {
    pub vector: FeatureVector,
    pub duration_seconds: f32,
    pub sample_rate: u32,
}

impl ExtractedFeatures {
    /// Always [`FEATURE_VECTOR_LEN`].
    pub fn feature_count(&self) -> usize {
        self.vector.len()
    }
}

/// Computes the fixed 26-value descriptor vector with one framing scheme.
///
/// Extraction is pure: the same waveform always yields bit-identical output.
/// Inputs shorter than a frame are zero-padded rather than rejected, so every
/// call on a valid configuration returns a full vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureExtractor {
    config: FrameConfig,
}

impl FeatureExtractor {
    /// Build an extractor after validating the frame layout.
    pub fn new(config: FrameConfig) -> Result<Self, ExtractionError> {
        config
            .validate()
            .map_err(|reason| ExtractionError::new(FeatureStage::Framing, reason))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    pub fn extract(&self, waveform: &Waveform) -> Result<ExtractedFeatures, ExtractionError> {
        if waveform.sample_rate == 0 {
            return Err(ExtractionError::new(
                FeatureStage::Framing,
                "sample rate must be positive",
            ));
        }
        let samples = waveform.samples.as_slice();
        let spectral = summarize_spectrum(samples, waveform.sample_rate, &self.config);
        let temporal = summarize_time_domain(samples, &self.config);

        if let Some(index) = spectral.mfcc.iter().position(|v| !v.is_finite()) {
            return Err(ExtractionError::new(
                FeatureStage::Mfcc,
                format!("coefficient {} is not finite", index + 1),
            ));
        }
        ensure_finite(FeatureStage::Rms, temporal.rms)?;
        ensure_finite(FeatureStage::SpectralCentroid, spectral.centroid_hz)?;
        ensure_finite(FeatureStage::SpectralBandwidth, spectral.bandwidth_hz)?;
        ensure_finite(FeatureStage::SpectralRolloff, spectral.rolloff_hz)?;
        ensure_finite(FeatureStage::ZeroCrossingRate, temporal.zero_crossing_rate)?;

        let vector = FeatureVector::from_parts(
            &spectral.mfcc,
            temporal.rms,
            spectral.centroid_hz,
            spectral.bandwidth_hz,
            spectral.rolloff_hz,
            temporal.zero_crossing_rate,
        );
        debug_assert_eq!(vector.len(), FEATURE_VECTOR_LEN);
        debug!(
            samples = samples.len(),
            frames = self.config.frame_count(samples.len()),
            "Extracted feature vector"
        );
        Ok(ExtractedFeatures {
            vector,
            duration_seconds: waveform.duration_seconds(),
            sample_rate: waveform.sample_rate,
        })
    }
}

fn ensure_finite(stage: FeatureStage, value: f32) -> Result<(), ExtractionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ExtractionError::new(stage, format!("time-average is {value}")))
    }
}

/// Extract with the default frame layout.
pub fn extract(waveform: &Waveform) -> Result<ExtractedFeatures, ExtractionError> {
    FeatureExtractor::default().extract(waveform)
}
