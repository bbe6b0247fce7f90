//! Load, extract and classify: the end-to-end real/fake verdict for one file.

mod batch;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::{
    self, AudioLoadError, ExtractedFeatures, ExtractionError, FEATURE_VECTOR_LEN,
    FeatureExtractor,
};
use crate::ml::{PredictError, Predictor};

pub use batch::analyze_batch;

/// Classifier label 1.
pub const FAKE_LABEL: usize = 1;
/// Classifier label 0.
pub const REAL_LABEL: usize = 0;

/// Binary authenticity verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Real,
    Fake,
}

impl Verdict {
    /// Map a raw classifier label; anything other than 0 or 1 is rejected.
    pub fn from_label(label: usize) -> Result<Self, PredictError> {
        match label {
            REAL_LABEL => Ok(Self::Real),
            FAKE_LABEL => Ok(Self::Fake),
            label => Err(PredictError::UnexpectedLabel { label }),
        }
    }

    pub fn is_fake(self) -> bool {
        self == Self::Fake
    }
}

/// Statistics of the analyzed signal reported next to the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioStats {
    /// Seconds of audio after resampling.
    pub duration: f32,
    pub sample_rate: u32,
    pub features_count: usize,
}

/// Verdict for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub prediction: Verdict,
    pub is_fake: bool,
    /// Percentage in `[0, 100]`, absent when the model gives no distribution.
    pub confidence: Option<f32>,
    pub audio_stats: AudioStats,
}

/// Failure of one pipeline step for one file.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Audio load failed for {path}: {0}", path = .0.path().display())]
    Load(#[from] AudioLoadError),
    #[error("Feature extraction failed for {}: {source}", path.display())]
    Extract {
        path: PathBuf,
        source: ExtractionError,
    },
    #[error("Prediction failed for {}: {source}", path.display())]
    Predict { path: PathBuf, source: PredictError },
}

impl AnalysisError {
    /// Pipeline step that failed: `load`, `extract` or `predict`.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::Extract { .. } => "extract",
            Self::Predict { .. } => "predict",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Load(err) => err.path(),
            Self::Extract { path, .. } | Self::Predict { path, .. } => path,
        }
    }
}

/// Runs the pipeline with one fixed extractor configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detector {
    extractor: FeatureExtractor,
}

impl Detector {
    pub fn new(extractor: FeatureExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Load and extract without classifying.
    pub fn features(&self, path: &Path) -> Result<ExtractedFeatures, AnalysisError> {
        let waveform = analysis::load(path)?;
        self.extractor
            .extract(&waveform)
            .map_err(|source| AnalysisError::Extract {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Classify the audio at `path`.
    ///
    /// Load failures return before the predictor is consulted.
    pub fn analyze<P>(&self, path: &Path, predictor: &P) -> Result<AnalysisResult, AnalysisError>
    where
        P: Predictor + ?Sized,
    {
        let features = self.features(path)?;
        let prediction_error = |source| AnalysisError::Predict {
            path: path.to_path_buf(),
            source,
        };
        let label = predictor
            .predict(&features.vector)
            .map_err(prediction_error)?;
        let verdict = Verdict::from_label(label).map_err(prediction_error)?;
        let confidence = confidence_percent(predictor.predict_proba(&features.vector), path);
        debug_assert_eq!(features.feature_count(), FEATURE_VECTOR_LEN);
        info!(
            path = %path.display(),
            verdict = ?verdict,
            confidence = ?confidence,
            duration = features.duration_seconds,
            "Analyzed audio"
        );
        Ok(AnalysisResult {
            prediction: verdict,
            is_fake: verdict.is_fake(),
            confidence,
            audio_stats: AudioStats {
                duration: features.duration_seconds,
                sample_rate: features.sample_rate,
                features_count: features.feature_count(),
            },
        })
    }
}

/// Classify `path` with the default frame layout.
pub fn analyze<P>(path: &Path, predictor: &P) -> Result<AnalysisResult, AnalysisError>
where
    P: Predictor + ?Sized,
{
    Detector::default().analyze(path, predictor)
}

fn confidence_percent(distribution: Option<Vec<f32>>, path: &Path) -> Option<f32> {
    let Some(distribution) = distribution else {
        debug!(path = %path.display(), "Predictor gave no probabilities");
        return None;
    };
    if distribution.is_empty() || distribution.iter().any(|p| !p.is_finite()) {
        warn!(
            path = %path.display(),
            len = distribution.len(),
            "Ignoring unusable probability distribution"
        );
        return None;
    }
    let max = distribution
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    Some(max * 100.0)
}
