use std::path::Path;

/// Write mono `f32` samples as a float WAV at `sample_rate`.
pub fn write_test_wav(path: &Path, sample_rate: u32, samples: &[f32]) {
    write_wav(path, sample_rate, 1, samples);
}

/// Write a 0.5-amplitude sine, duplicated across `channels`.
pub fn write_sine_wav(path: &Path, sample_rate: u32, channels: u16, freq_hz: f32, seconds: f32) {
    let len = (sample_rate as f32 * seconds).round() as usize;
    let samples: Vec<f32> = (0..len)
        .map(|i| (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32).sin() * 0.5)
        .collect();
    write_wav(path, sample_rate, channels, &samples);
}

/// Linear 100 Hz to 3100 Hz sweep at amplitude 0.5, sampled at `sample_rate`.
pub fn chirp_samples(sample_rate: u32, seconds: f32) -> Vec<f32> {
    let len = (sample_rate as f32 * seconds).round() as usize;
    let sweep = 3_000.0 / seconds;
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * (100.0 * t + 0.5 * sweep * t * t)).sin() * 0.5
        })
        .collect()
}

/// Write [`chirp_samples`], duplicated across `channels`.
pub fn write_chirp_wav(path: &Path, sample_rate: u32, channels: u16, seconds: f32) {
    write_wav(path, sample_rate, channels, &chirp_samples(sample_rate, seconds));
}

fn write_wav(path: &Path, sample_rate: u32, channels: u16, frames: &[f32]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create wav parent dirs");
    }
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav writer");
    for &sample in frames {
        for _ in 0..channels {
            writer.write_sample(sample).expect("write wav sample");
        }
    }
    writer.finalize().expect("finalize wav");
}
