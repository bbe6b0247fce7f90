/// Triangular mel filterbank on the Slaney scale with area normalization.
pub(super) struct MelBank {
    filters: Vec<Vec<(usize, f32)>>,
}

impl MelBank {
    /// Bands span 0 Hz to Nyquist over an `fft_len`-point spectrum.
    pub(super) fn slaney(sample_rate: u32, fft_len: usize, mel_bands: usize) -> Self {
        let sr = sample_rate.max(1) as f64;
        let bins = fft_len / 2 + 1;
        let fft_freqs: Vec<f64> = (0..bins).map(|bin| bin as f64 * sr / fft_len as f64).collect();
        let mel_max = hz_to_mel(sr / 2.0);
        let mel_points: Vec<f64> = (0..mel_bands + 2)
            .map(|i| mel_to_hz(mel_max * i as f64 / (mel_bands + 1) as f64))
            .collect();

        let mut filters = Vec::with_capacity(mel_bands);
        for band in 0..mel_bands {
            let (left, center, right) = (mel_points[band], mel_points[band + 1], mel_points[band + 2]);
            let rise = center - left;
            let fall = right - center;
            let norm = if right > left { 2.0 / (right - left) } else { 0.0 };
            let mut weights = Vec::new();
            for (bin, &freq) in fft_freqs.iter().enumerate() {
                let lower = if rise > 0.0 { (freq - left) / rise } else { 0.0 };
                let upper = if fall > 0.0 { (right - freq) / fall } else { 0.0 };
                let weight = lower.min(upper).max(0.0) * norm;
                if weight > 0.0 {
                    weights.push((bin, weight as f32));
                }
            }
            filters.push(weights);
        }
        Self { filters }
    }

    pub(super) fn band_count(&self) -> usize {
        self.filters.len()
    }

    /// Project a power spectrum onto the mel bands.
    pub(super) fn apply(&self, power: &[f32], out: &mut Vec<f32>) {
        out.clear();
        for filter in &self.filters {
            let mut sum = 0.0_f64;
            for &(bin, weight) in filter {
                let p = power.get(bin).copied().unwrap_or(0.0).max(0.0) as f64;
                sum += p * weight as f64;
            }
            out.push(sum as f32);
        }
    }
}

/// Orthonormal DCT-II truncated to the first `count` coefficients.
pub(super) struct DctBasis {
    rows: Vec<Vec<f64>>,
}

impl DctBasis {
    pub(super) fn new(input_len: usize, count: usize) -> Self {
        let n = input_len.max(1) as f64;
        let rows = (0..count)
            .map(|k| {
                let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
                (0..input_len)
                    .map(|m| {
                        let angle = std::f64::consts::PI * k as f64 * (2.0 * m as f64 + 1.0) / (2.0 * n);
                        scale * angle.cos()
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub(super) fn transform(&self, values: &[f32], out: &mut [f64]) {
        for (row, cell) in self.rows.iter().zip(out.iter_mut()) {
            *cell = row
                .iter()
                .zip(values)
                .map(|(&basis, &v)| basis * v as f64)
                .sum();
        }
    }
}

const LINEAR_MEL_STEP_HZ: f64 = 200.0 / 3.0;
const LOG_REGION_HZ: f64 = 1000.0;

fn log_step() -> f64 {
    6.4_f64.ln() / 27.0
}

/// Linear below 1 kHz, logarithmic above.
fn hz_to_mel(hz: f64) -> f64 {
    if hz < LOG_REGION_HZ {
        hz / LINEAR_MEL_STEP_HZ
    } else {
        LOG_REGION_HZ / LINEAR_MEL_STEP_HZ + (hz / LOG_REGION_HZ).ln() / log_step()
    }
}

fn mel_to_hz(mel: f64) -> f64 {
    let log_region_mel = LOG_REGION_HZ / LINEAR_MEL_STEP_HZ;
    if mel < log_region_mel {
        mel * LINEAR_MEL_STEP_HZ
    } else {
        LOG_REGION_HZ * (log_step() * (mel - log_region_mel)).exp()
    }
}
