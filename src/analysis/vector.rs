use serde::{Deserialize, Serialize};

/// Layout version of [`FeatureVector`]; persisted models declare the version they were trained on.
pub const FEATURE_VERSION: i64 = 1;
/// Number of cepstral coefficients at the head of the vector.
pub const MFCC_COUNT: usize = 21;
/// Number of `f32` values in a feature vector.
pub const FEATURE_VECTOR_LEN: usize = MFCC_COUNT + 5;

pub const RMS_INDEX: usize = MFCC_COUNT;
pub const CENTROID_INDEX: usize = MFCC_COUNT + 1;
pub const BANDWIDTH_INDEX: usize = MFCC_COUNT + 2;
pub const ROLLOFF_INDEX: usize = MFCC_COUNT + 3;
pub const ZERO_CROSSING_RATE_INDEX: usize = MFCC_COUNT + 4;

/// Column names in vector order, for exported feature tables.
pub const FEATURE_NAMES: [&str; FEATURE_VECTOR_LEN] = [
    "mfcc_01",
    "mfcc_02",
    "mfcc_03",
    "mfcc_04",
    "mfcc_05",
    "mfcc_06",
    "mfcc_07",
    "mfcc_08",
    "mfcc_09",
    "mfcc_10",
    "mfcc_11",
    "mfcc_12",
    "mfcc_13",
    "mfcc_14",
    "mfcc_15",
    "mfcc_16",
    "mfcc_17",
    "mfcc_18",
    "mfcc_19",
    "mfcc_20",
    "mfcc_21",
    "rms",
    "spectral_centroid",
    "spectral_bandwidth",
    "spectral_rolloff",
    "zero_crossing_rate",
];

/// Fixed-order acoustic descriptor vector: 21 MFCC means, then RMS, centroid,
/// bandwidth, rolloff and zero-crossing-rate means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector([f32; FEATURE_VECTOR_LEN]);

impl FeatureVector {
    pub(crate) fn from_parts(
        mfcc: &[f32; MFCC_COUNT],
        rms: f32,
        centroid_hz: f32,
        bandwidth_hz: f32,
        rolloff_hz: f32,
        zero_crossing_rate: f32,
    ) -> Self {
        let mut values = [0.0_f32; FEATURE_VECTOR_LEN];
        values[..MFCC_COUNT].copy_from_slice(mfcc);
        values[RMS_INDEX] = rms;
        values[CENTROID_INDEX] = centroid_hz;
        values[BANDWIDTH_INDEX] = bandwidth_hz;
        values[ROLLOFF_INDEX] = rolloff_hz;
        values[ZERO_CROSSING_RATE_INDEX] = zero_crossing_rate;
        Self(values)
    }

    /// Build a vector from raw values in layout order.
    pub fn from_array(values: [f32; FEATURE_VECTOR_LEN]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_VECTOR_LEN
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn mfcc(&self) -> &[f32] {
        &self.0[..MFCC_COUNT]
    }

    pub fn rms(&self) -> f32 {
        self.0[RMS_INDEX]
    }

    pub fn spectral_centroid(&self) -> f32 {
        self.0[CENTROID_INDEX]
    }

    pub fn spectral_bandwidth(&self) -> f32 {
        self.0[BANDWIDTH_INDEX]
    }

    pub fn spectral_rolloff(&self) -> f32 {
        self.0[ROLLOFF_INDEX]
    }

    pub fn zero_crossing_rate(&self) -> f32 {
        self.0[ZERO_CROSSING_RATE_INDEX]
    }

    /// True when every value is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}
