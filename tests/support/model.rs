use std::path::Path;

use audioverdict::analysis::{FEATURE_VECTOR_LEN, FEATURE_VERSION};

/// Logistic regression that ignores its input and always leans `fake` (p = 0.731).
pub fn write_constant_fake_model(path: &Path) {
    let model = serde_json::json!({
        "kind": "logreg",
        "model_version": 1,
        "feat_version": FEATURE_VERSION,
        "feature_len_f32": FEATURE_VECTOR_LEN,
        "classes": ["real", "fake"],
        "weights": vec![0.0f32; 2 * FEATURE_VECTOR_LEN],
        "bias": [0.0, 1.0],
        "temperature": 1.0
    });
    std::fs::write(path, model.to_string()).expect("write model json");
}

/// Stump model that calls anything brighter than `threshold_hz` fake.
pub fn write_centroid_stump_model(path: &Path, threshold_hz: f32) {
    let stump = |left: f32, right: f32| {
        serde_json::json!({
            "feature_index": 22,
            "threshold": threshold_hz,
            "left_value": left,
            "right_value": right
        })
    };
    let model = serde_json::json!({
        "kind": "gbdt_stump",
        "model_version": 1,
        "feat_version": FEATURE_VERSION,
        "feature_len_f32": FEATURE_VECTOR_LEN,
        "classes": ["real", "fake"],
        "learning_rate": 1.0,
        "init_raw": [0.0, 0.0],
        "stumps": [[stump(1.0, -1.0), stump(-1.0, 1.0)]]
    });
    std::fs::write(path, model.to_string()).expect("write model json");
}
