use crate::analysis::frames::sanitize;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

const SINC_LEN: usize = 256;

/// Band-limited conversion of mono `samples` from `input_rate` to `output_rate`.
///
/// The output holds `round(len * output_rate / input_rate)` samples and starts at
/// the same instant as the input. `SincFixedIn` already emits time-aligned frames,
/// so nothing is skipped from the front.
pub(super) fn resample_mono(
    samples: &[f32],
    input_rate: u32,
    output_rate: u32,
) -> Result<Vec<f32>, String> {
    if input_rate == 0 || output_rate == 0 {
        return Err(format!(
            "sample rates must be positive (got {input_rate} -> {output_rate})"
        ));
    }
    if input_rate == output_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    let ratio = output_rate as f64 / input_rate as f64;
    let expected = (samples.len() as f64 * ratio).round() as usize;

    // Trailing zeros flush the filter so the last input frames reach the output.
    let tail = SINC_LEN + (SINC_LEN as f64 / ratio).ceil() as usize;
    let mut input = Vec::with_capacity(samples.len() + tail);
    input.extend_from_slice(samples);
    input.resize(samples.len() + tail, 0.0);

    let params = SincInterpolationParameters {
        sinc_len: SINC_LEN,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, input.len(), 1)
        .map_err(|err| err.to_string())?;
    let mut output = resampler
        .process(&[input], None)
        .map_err(|err| err.to_string())?;
    let channel = output.pop().ok_or_else(|| "resampler produced no channels".to_string())?;

    let mut resampled: Vec<f32> = channel
        .into_iter()
        .take(expected)
        .map(sanitize)
        .collect();
    resampled.resize(expected, 0.0);
    Ok(resampled)
}
