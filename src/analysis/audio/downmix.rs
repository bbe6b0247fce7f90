use crate::analysis::frames::sanitize;

/// Append the per-frame channel average of interleaved `samples` to `out`.
pub(super) fn append_mono(out: &mut Vec<f32>, samples: &[f32], channels: usize) {
    let channels = channels.max(1);
    if channels == 1 {
        out.extend(samples.iter().copied().map(sanitize));
        return;
    }
    let frames = samples.len() / channels;
    out.reserve(frames);
    for frame in samples.chunks_exact(channels) {
        let sum: f32 = frame.iter().copied().map(sanitize).sum();
        out.push(sum / channels as f32);
    }
}
