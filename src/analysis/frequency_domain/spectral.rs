/// Fraction of total spectral magnitude that defines the rolloff frequency.
pub(super) const ROLLOFF_FRACTION: f64 = 0.85;

/// Per-frame spectral shape statistics, all in Hz.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(super) struct SpectralFrame {
    pub(super) centroid_hz: f32,
    pub(super) bandwidth_hz: f32,
    pub(super) rolloff_hz: f32,
}

/// Statistics of one magnitude spectrum. A frame with no energy yields zeros.
pub(super) fn spectral_frame(magnitude: &[f32], sample_rate: u32, fft_len: usize) -> SpectralFrame {
    let bin_hz = sample_rate.max(1) as f64 / fft_len.max(1) as f64;
    let total: f64 = magnitude.iter().map(|&m| m.max(0.0) as f64).sum();
    if total <= 0.0 {
        return SpectralFrame::default();
    }
    let centroid = centroid(magnitude, bin_hz, total);
    SpectralFrame {
        centroid_hz: centroid as f32,
        bandwidth_hz: bandwidth(magnitude, bin_hz, total, centroid) as f32,
        rolloff_hz: rolloff(magnitude, bin_hz, total) as f32,
    }
}

fn centroid(magnitude: &[f32], bin_hz: f64, total: f64) -> f64 {
    let weighted: f64 = magnitude
        .iter()
        .enumerate()
        .map(|(bin, &m)| m.max(0.0) as f64 * bin as f64 * bin_hz)
        .sum();
    weighted / total
}

fn bandwidth(magnitude: &[f32], bin_hz: f64, total: f64, centroid: f64) -> f64 {
    let spread: f64 = magnitude
        .iter()
        .enumerate()
        .map(|(bin, &m)| {
            let deviation = bin as f64 * bin_hz - centroid;
            (m.max(0.0) as f64 / total) * deviation * deviation
        })
        .sum();
    spread.max(0.0).sqrt()
}

fn rolloff(magnitude: &[f32], bin_hz: f64, total: f64) -> f64 {
    let target = total * ROLLOFF_FRACTION;
    let mut cumulative = 0.0_f64;
    for (bin, &m) in magnitude.iter().enumerate() {
        cumulative += m.max(0.0) as f64;
        if cumulative >= target {
            return bin as f64 * bin_hz;
        }
    }
    magnitude.len().saturating_sub(1) as f64 * bin_hz
}
