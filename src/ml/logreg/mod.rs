//! Logistic regression classifier for acoustic feature vectors.

use serde::{Deserialize, Serialize};

use crate::analysis::{FEATURE_VECTOR_LEN, FEATURE_VERSION, FeatureVector};
use crate::ml::gbdt_stump::softmax;
use crate::ml::{PredictError, Predictor, argmax};

/// Versioned logistic regression model with optional input standardization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRegModel {
    #[serde(default)]
    pub model_id: Option<String>,
    pub model_version: i64,
    pub feat_version: i64,
    pub feature_len_f32: usize,
    /// Class names, index 0 = real, index 1 = fake.
    pub classes: Vec<String>,
    /// Row-major `[classes][feature_len_f32]`.
    pub weights: Vec<f32>,
    pub bias: Vec<f32>,
    pub temperature: f32,
    /// Per-feature offsets subtracted before weighting.
    #[serde(default)]
    pub mean: Option<Vec<f32>>,
    /// Per-feature divisors applied after `mean`.
    #[serde(default)]
    pub scale: Option<Vec<f32>>,
    #[serde(default = "default_probabilities")]
    pub probabilities: bool,
}

fn default_probabilities() -> bool {
    true
}

impl LogRegModel {
    /// Validate the model dimensions and feature layout compatibility.
    pub fn validate(&self) -> Result<(), String> {
        if self.feat_version != FEATURE_VERSION {
            return Err(format!(
                "Unsupported feat_version {} (expected {FEATURE_VERSION})",
                self.feat_version
            ));
        }
        if self.feature_len_f32 != FEATURE_VECTOR_LEN {
            return Err(format!(
                "Unsupported feature_len_f32 {} (expected {FEATURE_VECTOR_LEN})",
                self.feature_len_f32
            ));
        }
        let classes = self.classes.len();
        if classes != 2 {
            return Err(format!("Model must contain exactly 2 classes, found {classes}"));
        }
        if self.weights.len() != classes * self.feature_len_f32 {
            return Err("weights length mismatch".to_string());
        }
        if self.bias.len() != classes {
            return Err("bias length mismatch".to_string());
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err("temperature must be > 0".to_string());
        }
        if let Some(mean) = &self.mean {
            if mean.len() != self.feature_len_f32 {
                return Err("mean length mismatch".to_string());
            }
        }
        if let Some(scale) = &self.scale {
            if scale.len() != self.feature_len_f32 {
                return Err("scale length mismatch".to_string());
            }
            if scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
                return Err("scale entries must be finite and non-zero".to_string());
            }
        }
        Ok(())
    }

    /// Temperature-scaled logits for one feature vector.
    pub fn logits(&self, features: &[f32]) -> Vec<f32> {
        let dim = self.feature_len_f32;
        let input: Vec<f32> = features
            .iter()
            .take(dim)
            .enumerate()
            .map(|(i, &x)| {
                let centered = x - self.mean.as_ref().map_or(0.0, |mean| mean[i]);
                centered / self.scale.as_ref().map_or(1.0, |scale| scale[i])
            })
            .collect();
        let temp = self.temperature.max(1e-6);
        (0..self.classes.len())
            .map(|c| {
                let row = &self.weights[c * dim..(c + 1) * dim];
                let sum: f32 = row.iter().zip(&input).map(|(w, x)| w * x).sum();
                (sum + self.bias[c]) / temp
            })
            .collect()
    }
}

impl Predictor for LogRegModel {
    fn predict(&self, features: &FeatureVector) -> Result<usize, PredictError> {
        argmax(&self.logits(features.as_slice()))
    }

    fn predict_proba(&self, features: &FeatureVector) -> Option<Vec<f32>> {
        self.probabilities
            .then(|| softmax(&self.logits(features.as_slice())))
    }
}
