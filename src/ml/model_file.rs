use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::analysis::FeatureVector;
use crate::ml::gbdt_stump::GbdtStumpModel;
use crate::ml::logreg::LogRegModel;
use crate::ml::{PredictError, Predictor};

/// A persisted classifier, tagged by `"kind"` in its JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierModel {
    GbdtStump(GbdtStumpModel),
    Logreg(LogRegModel),
}

impl ClassifierModel {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::GbdtStump(model) => model.validate(),
            Self::Logreg(model) => model.validate(),
        }
    }

    /// Short family name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GbdtStump(_) => "gbdt_stump",
            Self::Logreg(_) => "logreg",
        }
    }
}

impl Predictor for ClassifierModel {
    fn predict(&self, features: &FeatureVector) -> Result<usize, PredictError> {
        match self {
            Self::GbdtStump(model) => model.predict(features),
            Self::Logreg(model) => model.predict(features),
        }
    }

    fn predict_proba(&self, features: &FeatureVector) -> Option<Vec<f32>> {
        match self {
            Self::GbdtStump(model) => model.predict_proba(features),
            Self::Logreg(model) => model.predict_proba(features),
        }
    }
}

/// Errors raised while loading a classifier from disk.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Failed to read model {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid model JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Model {} is incompatible: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Load and validate a classifier JSON file.
pub fn load_model(path: &Path) -> Result<ClassifierModel, ModelLoadError> {
    let bytes = std::fs::read(path).map_err(|source| ModelLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let model: ClassifierModel =
        serde_json::from_slice(&bytes).map_err(|source| ModelLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    model.validate().map_err(|reason| ModelLoadError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;
    info!(path = %path.display(), kind = model.kind(), "Loaded classifier");
    Ok(model)
}
