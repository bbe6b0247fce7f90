//! Deterministic gradient-boosted decision-stump classifier.
//!
//! Binary softmax boosting over the 26-value feature vector, persisted as JSON.

mod model;

pub use model::{GbdtStumpModel, Stump, softmax};
