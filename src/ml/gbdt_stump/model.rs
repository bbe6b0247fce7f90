use serde::{Deserialize, Serialize};

use crate::analysis::{FEATURE_VECTOR_LEN, FEATURE_VERSION, FeatureVector};
use crate::ml::{PredictError, Predictor, argmax};

/// Single-node decision tree used as a weak learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stump {
    /// Feature index used for the split.
    pub feature_index: u16,
    /// Threshold in feature units.
    pub threshold: f32,
    /// Prediction for `feature <= threshold`.
    pub left_value: f32,
    /// Prediction for `feature > threshold`.
    pub right_value: f32,
}

impl Stump {
    pub fn predict(&self, features: &[f32]) -> f32 {
        let idx = self.feature_index as usize;
        let value = features.get(idx).copied().unwrap_or(0.0);
        if value <= self.threshold {
            self.left_value
        } else {
            self.right_value
        }
    }
}

/// Gradient-boosted decision stump model with two classes (real, fake).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbdtStumpModel {
    /// Model format version.
    pub model_version: i64,
    /// Feature vector version expected by this model.
    pub feat_version: i64,
    /// Number of `f32` values per feature vector.
    pub feature_len_f32: usize,
    /// Class names, index 0 = real, index 1 = fake.
    pub classes: Vec<String>,
    pub learning_rate: f32,
    /// Initial raw logits before boosting rounds.
    pub init_raw: Vec<f32>,
    /// Shape: `[n_rounds][n_classes]`.
    pub stumps: Vec<Vec<Stump>>,
    /// When false the model only reports labels.
    #[serde(default = "default_probabilities")]
    pub probabilities: bool,
}

fn default_probabilities() -> bool {
    true
}

impl GbdtStumpModel {
    /// Validate structural invariants and feature layout compatibility.
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
        if self.classes.len() != 2 {
            return Err(format!(
                "Model must contain exactly 2 classes, found {}",
                self.classes.len()
            ));
        }
        if self.init_raw.len() != self.classes.len() {
            return Err("init_raw length must match classes length".to_string());
        }
        if !self.learning_rate.is_finite() {
            return Err("learning_rate must be finite".to_string());
        }
        for (round_idx, round) in self.stumps.iter().enumerate() {
            if round.len() != self.classes.len() {
                return Err(format!(
                    "Round {round_idx} has {} stumps but expected {}",
                    round.len(),
                    self.classes.len()
                ));
            }
            if let Some(stump) = round
                .iter()
                .find(|stump| stump.feature_index as usize >= self.feature_len_f32)
            {
                return Err(format!(
                    "Round {round_idx} splits on feature {} outside the vector",
                    stump.feature_index
                ));
            }
        }
        Ok(())
    }

    /// Raw logits for a feature vector.
    pub fn predict_raw(&self, features: &[f32]) -> Vec<f32> {
        let mut raw = self.init_raw.clone();
        for round in &self.stumps {
            for (class_idx, stump) in round.iter().enumerate() {
                raw[class_idx] += self.learning_rate * stump.predict(features);
            }
        }
        raw
    }
}

impl Predictor for GbdtStumpModel {
    fn predict(&self, features: &FeatureVector) -> Result<usize, PredictError> {
        argmax(&self.predict_raw(features.as_slice()))
    }

    fn predict_proba(&self, features: &FeatureVector) -> Option<Vec<f32>> {
        self.probabilities
            .then(|| softmax(&self.predict_raw(features.as_slice())))
    }
}

/// Compute a numerically-stable softmax for a set of logits.
pub fn softmax(raw: &[f32]) -> Vec<f32> {
    if raw.is_empty() {
        return Vec::new();
    }
    let max = raw
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, |a, b| a.max(b));
    let mut exps = Vec::with_capacity(raw.len());
    let mut sum = 0.0f32;
    for &v in raw {
        let e = (v - max).exp();
        exps.push(e);
        sum += e;
    }
    if sum == 0.0 {
        return vec![1.0 / raw.len() as f32; raw.len()];
    }
    for v in &mut exps {
        *v /= sum;
    }
    exps
}
