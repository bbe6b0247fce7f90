use super::frames::{EdgePadding, FrameConfig, fill_centered_frame, mean};

/// Samples at or below this magnitude count as zero when detecting sign changes.
const ZERO_CROSSING_THRESHOLD: f32 = 1e-10;

/// Time-averaged time-domain descriptors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TimeDomainSummary {
    pub(crate) rms: f32,
    pub(crate) zero_crossing_rate: f32,
}

pub(crate) fn summarize_time_domain(samples: &[f32], config: &FrameConfig) -> TimeDomainSummary {
    TimeDomainSummary {
        rms: mean(&rms_per_frame(samples, config)),
        zero_crossing_rate: mean(&zero_crossing_rate_per_frame(samples, config)),
    }
}

/// Root-mean-square energy of each zero-padded centered frame.
pub(crate) fn rms_per_frame(samples: &[f32], config: &FrameConfig) -> Vec<f32> {
    let frames = config.frame_count(samples.len());
    let mut frame = vec![0.0_f32; config.frame_length];
    let mut out = Vec::with_capacity(frames);
    for index in 0..frames {
        fill_centered_frame(samples, index, config.hop_length, EdgePadding::Zero, &mut frame);
        out.push(rms(&frame));
    }
    out
}

/// Fraction of sign changes in each edge-padded centered frame.
pub(crate) fn zero_crossing_rate_per_frame(samples: &[f32], config: &FrameConfig) -> Vec<f32> {
    let frames = config.frame_count(samples.len());
    let mut frame = vec![0.0_f32; config.frame_length];
    let mut out = Vec::with_capacity(frames);
    for index in 0..frames {
        fill_centered_frame(samples, index, config.hop_length, EdgePadding::Edge, &mut frame);
        out.push(zero_crossing_rate(&frame));
    }
    out
}

fn rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum: f64 = frame.iter().map(|&v| (v as f64) * (v as f64)).sum();
    (sum / frame.len() as f64).max(0.0).sqrt() as f32
}

fn zero_crossing_rate(frame: &[f32]) -> f32 {
    if frame.len() < 2 {
        return 0.0;
    }
    let mut crossings = 0u32;
    let mut prev_negative = is_negative(frame[0]);
    for &sample in &frame[1..] {
        let negative = is_negative(sample);
        if negative != prev_negative {
            crossings += 1;
        }
        prev_negative = negative;
    }
    crossings as f32 / frame.len() as f32
}

/// Near-zero samples are treated as positive.
fn is_negative(sample: f32) -> bool {
    sample < -ZERO_CROSSING_THRESHOLD
}
