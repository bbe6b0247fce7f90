use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex32};

use crate::analysis::frames::{EdgePadding, FrameConfig, fill_centered_frame};

/// Streams magnitude spectra of zero-padded, Hann-windowed centered frames.
pub(super) struct Stft<'a> {
    samples: &'a [f32],
    hop_length: usize,
    frame_count: usize,
    next: usize,
    window: Vec<f32>,
    frame: Vec<f32>,
    buffer: Vec<Complex32>,
    scratch: Vec<Complex32>,
    magnitude: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
}

impl<'a> Stft<'a> {
    pub(super) fn new(samples: &'a [f32], config: &FrameConfig) -> Self {
        let frame_length = config.frame_length;
        let fft = FftPlanner::<f32>::new().plan_fft_forward(frame_length);
        let scratch = vec![Complex32::default(); fft.get_inplace_scratch_len()];
        Self {
            samples,
            hop_length: config.hop_length,
            frame_count: config.frame_count(samples.len()),
            next: 0,
            window: periodic_hann(frame_length),
            frame: vec![0.0; frame_length],
            buffer: vec![Complex32::default(); frame_length],
            scratch,
            magnitude: vec![0.0; frame_length / 2 + 1],
            fft,
        }
    }

    pub(super) fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Magnitude spectrum (`frame_length / 2 + 1` bins) of the next frame.
    pub(super) fn next_magnitude(&mut self) -> Option<&[f32]> {
        if self.next >= self.frame_count {
            return None;
        }
        fill_centered_frame(
            self.samples,
            self.next,
            self.hop_length,
            EdgePadding::Zero,
            &mut self.frame,
        );
        for ((cell, &sample), &win) in self.buffer.iter_mut().zip(&self.frame).zip(&self.window) {
            *cell = Complex32::new(sample * win, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);
        for (mag, bin) in self.magnitude.iter_mut().zip(&self.buffer) {
            *mag = bin.norm();
        }
        self.next += 1;
        Some(&self.magnitude)
    }
}

/// Hann window for spectral analysis (`N` rather than `N - 1` in the denominator).
pub(super) fn periodic_hann(length: usize) -> Vec<f32> {
    if length <= 1 {
        return vec![1.0_f32; length.max(1)];
    }
    (0..length)
        .map(|n| {
            let phase = 2.0 * std::f64::consts::PI * n as f64 / length as f64;
            (0.5 - 0.5 * phase.cos()) as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periodic_hann_starts_at_zero_and_peaks_mid_frame() {
        let w = periodic_hann(8);
        assert!(w[0].abs() < 1e-7);
        assert!((w[4] - 1.0).abs() < 1e-7);
        assert!((w[1] - w[7]).abs() < 1e-6);
    }

    #[test]
    fn yields_one_spectrum_per_centered_frame() {
        let config = FrameConfig {
            frame_length: 64,
            hop_length: 16,
            mel_bands: 32,
        };
        let samples = vec![0.25_f32; 100];
        let mut stft = Stft::new(&samples, &config);
        assert_eq!(stft.frame_count(), 7);
        let mut seen = 0;
        while let Some(spectrum) = stft.next_magnitude() {
            assert_eq!(spectrum.len(), 33);
            seen += 1;
        }
        assert_eq!(seen, 7);
    }

    #[test]
    fn sine_peaks_at_its_bin() {
        let config = FrameConfig {
            frame_length: 256,
            hop_length: 64,
            mel_bands: 32,
        };
        let samples: Vec<f32> = (0..1024)
            .map(|i| (2.0 * std::f32::consts::PI * 16.0 * i as f32 / 256.0).sin())
            .collect();
        let mut stft = Stft::new(&samples, &config);
        let _ = stft.next_magnitude();
        let _ = stft.next_magnitude();
        let spectrum = stft.next_magnitude().unwrap().to_vec();
        let peak = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, _)| idx)
            .unwrap();
        assert_eq!(peak, 16);
    }
}
