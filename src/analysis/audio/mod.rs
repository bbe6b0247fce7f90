mod decode;
mod downmix;
mod error;
mod probe;
mod resample;

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use super::{ANALYSIS_SAMPLE_RATE, Waveform};

pub use error::{AudioLoadError, DecodeError};
pub use probe::AudioProbe;

/// Check that `path` names a non-empty regular file.
pub fn validate(path: &Path) -> Result<(), AudioLoadError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(AudioLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(AudioLoadError::Metadata {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if !metadata.is_file() {
        return Err(AudioLoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    if metadata.len() == 0 {
        return Err(AudioLoadError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Decode `path` and return it as mono audio at [`ANALYSIS_SAMPLE_RATE`].
///
/// Multi-channel sources are averaged to one channel before resampling.
pub fn load(path: &Path) -> Result<Waveform, AudioLoadError> {
    validate(path)?;
    let decoded = decode::decode_mono(path).map_err(|source| AudioLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        native_rate = decoded.sample_rate,
        channels = decoded.channels,
        frames = decoded.mono.len(),
        "Decoded audio"
    );
    let samples = resample::resample_mono(&decoded.mono, decoded.sample_rate, ANALYSIS_SAMPLE_RATE)
        .map_err(|reason| AudioLoadError::Resample {
            path: path.to_path_buf(),
            from_rate: decoded.sample_rate,
            to_rate: ANALYSIS_SAMPLE_RATE,
            reason,
        })?;
    Ok(Waveform::new(samples, ANALYSIS_SAMPLE_RATE))
}

/// Read duration, rate and channel count from the container header.
pub fn probe_metadata(path: &Path) -> Result<AudioProbe, AudioLoadError> {
    validate(path)?;
    probe::probe_container(path).map_err(|source| AudioLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use tempfile::tempdir;

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, frames: &[f32]) {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for sample in frames {
            for _ in 0..channels {
                writer.write_sample(*sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    fn sine(rate: u32, seconds: f32) -> Vec<f32> {
        let len = (rate as f32 * seconds) as usize;
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / rate as f32).sin() * 0.5)
            .collect()
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = tempdir().unwrap();
        let err = load(&dir.path().join("absent.wav")).unwrap_err();
        assert!(matches!(err, AudioLoadError::NotFound { .. }));
    }

    #[test]
    fn directory_is_not_found() {
        let dir = tempdir().unwrap();
        let err = validate(dir.path()).unwrap_err();
        assert!(matches!(err, AudioLoadError::NotFound { .. }));
    }

    #[test]
    fn zero_byte_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        std::fs::write(&path, b"").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, AudioLoadError::EmptyFile { .. }));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("noise.wav");
        std::fs::write(&path, b"definitely not a riff header").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, AudioLoadError::Decode { .. }), "{err}");
    }

    #[test]
    fn native_rate_input_passes_through() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("native.wav");
        let input = sine(ANALYSIS_SAMPLE_RATE, 0.5);
        write_wav(&path, ANALYSIS_SAMPLE_RATE, 1, &input);
        let waveform = load(&path).unwrap();
        assert_eq!(waveform.sample_rate, ANALYSIS_SAMPLE_RATE);
        assert_eq!(waveform.len(), input.len());
        assert!((waveform.samples[100] - input[100]).abs() < 1e-6);
    }

    #[test]
    fn other_rates_are_converted() {
        let dir = tempdir().unwrap();
        for rate in [8_000u32, 44_100, 48_000] {
            let path = dir.path().join(format!("tone_{rate}.wav"));
            write_wav(&path, rate, 1, &sine(rate, 1.0));
            let waveform = load(&path).unwrap();
            assert_eq!(waveform.sample_rate, ANALYSIS_SAMPLE_RATE);
            assert_eq!(waveform.len(), ANALYSIS_SAMPLE_RATE as usize, "rate {rate}");
            assert!((waveform.duration_seconds() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn stereo_is_averaged_to_mono() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let input = sine(ANALYSIS_SAMPLE_RATE, 0.25);
        write_wav(&path, ANALYSIS_SAMPLE_RATE, 2, &input);
        let waveform = load(&path).unwrap();
        assert_eq!(waveform.len(), input.len());
        assert!((waveform.samples[200] - input[200]).abs() < 1e-6);
    }

    #[test]
    fn probe_reads_wav_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("probe.wav");
        write_wav(&path, 48_000, 2, &sine(48_000, 0.5));
        let probe = probe_metadata(&path).unwrap();
        assert_eq!(probe.sample_rate, Some(48_000));
        assert_eq!(probe.channels, Some(2));
        assert!((probe.duration_seconds.unwrap() - 0.5).abs() < 1e-3);
    }
}
