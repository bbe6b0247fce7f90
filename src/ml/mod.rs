//! Classifiers that map a feature vector to a real/fake label.
//!
//! Models are plain JSON files tagged by `"kind"`; both families validate their
//! layout against the extractor's feature vector before they are used.

pub mod gbdt_stump;
pub mod logreg;
mod model_file;

use thiserror::Error;

use crate::analysis::FeatureVector;

pub use model_file::{ClassifierModel, ModelLoadError, load_model};

/// Anything that can label a feature vector.
///
/// Labels are class indices; the detector maps `1` to fake and `0` to real.
pub trait Predictor {
    /// Predict the class index for `features`.
    fn predict(&self, features: &FeatureVector) -> Result<usize, PredictError>;

    /// Class probability distribution, when the model can provide one.
    fn predict_proba(&self, _features: &FeatureVector) -> Option<Vec<f32>> {
        None
    }
}

/// A predictor failed to produce a usable label.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
    #[error("model produced non-finite scores")]
    NonFinite,
    #[error("model produced no scores")]
    EmptyOutput,
    #[error("model returned label {label}, expected 0 (real) or 1 (fake)")]
    UnexpectedLabel { label: usize },
    #[error("model evaluation failed: {0}")]
    Model(String),
}

/// Index of the largest finite score.
pub(crate) fn argmax(values: &[f32]) -> Result<usize, PredictError> {
    if values.is_empty() {
        return Err(PredictError::EmptyOutput);
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(PredictError::NonFinite);
    }
    let mut best_idx = 0usize;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    Ok(best_idx)
}
