//! Frequency-domain descriptors (STFT, spectral shape, MFCC).

mod mel;
mod spectral;
mod stft;

use mel::{DctBasis, MelBank};
use spectral::spectral_frame;
use stft::Stft;

use super::frames::{FrameConfig, mean};
use super::vector::MFCC_COUNT;

/// Power floor applied before converting to decibels.
const POWER_FLOOR: f64 = 1e-10;
/// Dynamic range kept below the loudest mel cell of the whole spectrogram.
const TOP_DB: f32 = 80.0;

/// Time-averaged frequency-domain descriptors.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpectralSummary {
    pub(crate) mfcc: [f32; MFCC_COUNT],
    pub(crate) centroid_hz: f32,
    pub(crate) bandwidth_hz: f32,
    pub(crate) rolloff_hz: f32,
}

/// Run the STFT once and average every spectral descriptor over its frames.
pub(crate) fn summarize_spectrum(
    samples: &[f32],
    sample_rate: u32,
    config: &FrameConfig,
) -> SpectralSummary {
    let mel = MelBank::slaney(sample_rate, config.frame_length, config.mel_bands);
    let bands = mel.band_count();
    let mut stft = Stft::new(samples, config);
    let frames = stft.frame_count();

    let mut centroid = Vec::with_capacity(frames);
    let mut bandwidth = Vec::with_capacity(frames);
    let mut rolloff = Vec::with_capacity(frames);
    let mut mel_db = Vec::with_capacity(frames * bands);
    let mut power = vec![0.0_f32; config.frame_length / 2 + 1];
    let mut mel_row = Vec::with_capacity(bands);

    while let Some(magnitude) = stft.next_magnitude() {
        let shape = spectral_frame(magnitude, sample_rate, config.frame_length);
        centroid.push(shape.centroid_hz);
        bandwidth.push(shape.bandwidth_hz);
        rolloff.push(shape.rolloff_hz);
        for (p, &m) in power.iter_mut().zip(magnitude) {
            *p = m * m;
        }
        mel.apply(&power, &mut mel_row);
        mel_db.extend(mel_row.iter().map(|&energy| power_to_db(energy)));
    }

    SpectralSummary {
        mfcc: mfcc_means(&mut mel_db, bands),
        centroid_hz: mean(&centroid),
        bandwidth_hz: mean(&bandwidth),
        rolloff_hz: mean(&rolloff),
    }
}

fn power_to_db(power: f32) -> f32 {
    (10.0 * (power as f64).max(POWER_FLOOR).log10()) as f32
}

/// Clip the dB spectrogram to `TOP_DB` below its peak, then average the DCT of each frame.
fn mfcc_means(mel_db: &mut [f32], bands: usize) -> [f32; MFCC_COUNT] {
    let mut out = [0.0_f32; MFCC_COUNT];
    if bands == 0 || mel_db.len() < bands {
        return out;
    }
    let peak = mel_db.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let floor = peak - TOP_DB;
    for value in mel_db.iter_mut() {
        *value = value.max(floor);
    }

    let dct = DctBasis::new(bands, MFCC_COUNT);
    let mut sums = [0.0_f64; MFCC_COUNT];
    let mut coeffs = [0.0_f64; MFCC_COUNT];
    let mut rows = 0usize;
    for row in mel_db.chunks_exact(bands) {
        dct.transform(row, &mut coeffs);
        for (sum, &c) in sums.iter_mut().zip(&coeffs) {
            *sum += c;
        }
        rows += 1;
    }
    for (cell, sum) in out.iter_mut().zip(sums) {
        *cell = (sum / rows as f64) as f32;
    }
    out
}
