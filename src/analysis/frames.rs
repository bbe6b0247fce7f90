//! Shared framing scheme for every per-frame descriptor.
//!
//! Frames are centered: the signal is padded by half a frame on both sides and
//! frame `t` starts at `t * hop_length` in the padded signal. A model trained on
//! vectors from one framing is only valid for vectors from the same framing.

use serde::{Deserialize, Serialize};

/// Window and hop sizes used for all framed descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Samples per analysis frame, also the FFT size. Must be a power of two.
    pub frame_length: usize,
    /// Samples between the starts of consecutive frames.
    pub hop_length: usize,
    /// Number of mel bands feeding the cepstral transform.
    pub mel_bands: usize,
}

pub(crate) const MIN_FRAME_LENGTH: usize = 64;

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_length: 2048,
            hop_length: 512,
            mel_bands: 128,
        }
    }
}

impl FrameConfig {
    /// Check structural constraints, returning a description of the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_length < MIN_FRAME_LENGTH || !self.frame_length.is_power_of_two() {
            return Err(format!(
                "frame_length must be a power of two >= {MIN_FRAME_LENGTH}, got {}",
                self.frame_length
            ));
        }
        if self.hop_length == 0 || self.hop_length > self.frame_length {
            return Err(format!(
                "hop_length must be in 1..={}, got {}",
                self.frame_length, self.hop_length
            ));
        }
        if self.mel_bands < super::vector::MFCC_COUNT {
            return Err(format!(
                "mel_bands must be >= {}, got {}",
                super::vector::MFCC_COUNT,
                self.mel_bands
            ));
        }
        Ok(())
    }

    /// Number of centered frames covering `sample_count` samples (always at least one).
    pub fn frame_count(&self, sample_count: usize) -> usize {
        1 + sample_count / self.hop_length.max(1)
    }
}

/// How samples outside the signal are filled when a frame overhangs an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgePadding {
    Zero,
    /// Repeat the first/last sample.
    Edge,
}

/// Copy centered frame `index` into `out` (`out.len()` is the frame length).
pub(crate) fn fill_centered_frame(
    samples: &[f32],
    index: usize,
    hop_length: usize,
    padding: EdgePadding,
    out: &mut [f32],
) {
    let half = (out.len() / 2) as isize;
    let start = (index * hop_length) as isize - half;
    let first = samples.first().copied().map(sanitize).unwrap_or(0.0);
    let last = samples.last().copied().map(sanitize).unwrap_or(0.0);
    for (offset, cell) in out.iter_mut().enumerate() {
        let pos = start + offset as isize;
        *cell = if pos < 0 {
            match padding {
                EdgePadding::Zero => 0.0,
                EdgePadding::Edge => first,
            }
        } else if let Some(&sample) = samples.get(pos as usize) {
            sanitize(sample)
        } else {
            match padding {
                EdgePadding::Zero => 0.0,
                EdgePadding::Edge => last,
            }
        };
    }
}

/// Non-finite samples contribute silence.
pub(crate) fn sanitize(sample: f32) -> f32 {
    if sample.is_finite() { sample } else { 0.0 }
}

/// Arithmetic mean accumulated in `f64`; `0.0` for an empty slice.
pub(crate) fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|&v| v as f64).sum();
    (sum / values.len() as f64) as f32
}
