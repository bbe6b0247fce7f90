mod support;

use audioverdict::analysis::{self, ANALYSIS_SAMPLE_RATE, AudioLoadError, FeatureExtractor, FrameConfig};
use audioverdict::detect::{AnalysisError, Detector, Verdict, analyze, analyze_batch};
use audioverdict::ml::load_model;
use support::model::{write_centroid_stump_model, write_constant_fake_model};
use support::wav::{chirp_samples, write_chirp_wav, write_sine_wav, write_test_wav};
use tempfile::tempdir;

/// Deterministic broadband noise from a xorshift generator.
fn noise(len: usize) -> Vec<f32> {
    let mut state = 0x2545_f491_u32;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state as f32 / u32::MAX as f32 - 0.5) * 0.8
        })
        .collect()
}

#[test]
fn load_resamples_common_rates_to_analysis_rate() {
    let dir = tempdir().unwrap();
    for rate in [8_000u32, 16_000, 44_100, 48_000] {
        let path = dir.path().join(format!("tone_{rate}.wav"));
        write_sine_wav(&path, rate, 2, 440.0, 2.0);
        let waveform = analysis::load(&path).unwrap();
        assert_eq!(waveform.sample_rate, ANALYSIS_SAMPLE_RATE);
        assert_eq!(waveform.len(), 2 * ANALYSIS_SAMPLE_RATE as usize, "rate {rate}");
        let peak = waveform.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!(peak > 0.4 && peak < 0.6, "rate {rate} peak {peak}");
    }
}

#[test]
fn resampled_sweep_lines_up_with_native_sweep() {
    let dir = tempdir().unwrap();
    let reference = chirp_samples(ANALYSIS_SAMPLE_RATE, 1.0);
    for rate in [8_000u32, 16_000, 44_100, 48_000] {
        let path = dir.path().join(format!("sweep_{rate}.wav"));
        write_chirp_wav(&path, rate, 2, 1.0);
        let waveform = analysis::load(&path).unwrap();
        assert_eq!(waveform.len(), reference.len(), "rate {rate}");
        // Skip the edges where the filter sees the zero padding.
        let deviation = waveform.samples[500..21_500]
            .iter()
            .zip(&reference[500..21_500])
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(deviation < 0.05, "rate {rate}: max deviation {deviation}");
    }
}

#[test]
fn loader_errors_are_typed() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("gone.mp3");
    assert!(matches!(
        analysis::load(&missing),
        Err(AudioLoadError::NotFound { .. })
    ));

    let empty = dir.path().join("empty.ogg");
    std::fs::write(&empty, b"").unwrap();
    assert!(matches!(
        analysis::load(&empty),
        Err(AudioLoadError::EmptyFile { .. })
    ));

    let corrupt = dir.path().join("corrupt.mp3");
    std::fs::write(&corrupt, vec![0x5a_u8; 4096]).unwrap();
    let err = analysis::load(&corrupt).unwrap_err();
    assert!(matches!(err, AudioLoadError::Decode { .. }), "{err}");
}

#[test]
fn stump_model_separates_tone_from_noise() {
    let dir = tempdir().unwrap();
    let model_path = dir.path().join("stump.json");
    write_centroid_stump_model(&model_path, 3_000.0);
    let model = load_model(&model_path).unwrap();

    let tone = dir.path().join("tone.wav");
    write_sine_wav(&tone, ANALYSIS_SAMPLE_RATE, 1, 440.0, 1.0);
    let hiss = dir.path().join("hiss.wav");
    write_test_wav(&hiss, ANALYSIS_SAMPLE_RATE, &noise(ANALYSIS_SAMPLE_RATE as usize));

    let tone_result = analyze(&tone, &model).unwrap();
    assert_eq!(tone_result.prediction, Verdict::Real);
    assert!(tone_result.confidence.unwrap() > 50.0);

    let hiss_result = analyze(&hiss, &model).unwrap();
    assert_eq!(hiss_result.prediction, Verdict::Fake);
    assert!(hiss_result.is_fake);
}

#[test]
fn features_are_stable_across_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    write_sine_wav(&path, 44_100, 1, 1_000.0, 1.5);
    let detector = Detector::default();
    let first = detector.features(&path).unwrap();
    let second = detector.features(&path).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.feature_count(), 26);
    assert!((first.duration_seconds - 1.5).abs() < 1e-3);
    let centroid = first.vector.spectral_centroid();
    assert!(centroid > 800.0 && centroid < 1_500.0, "centroid {centroid}");
    let bandwidth = first.vector.spectral_bandwidth();
    assert!(bandwidth.is_finite() && bandwidth > 0.0, "bandwidth {bandwidth}");
    let rolloff = first.vector.spectral_rolloff();
    assert!(rolloff > 500.0 && rolloff < 2_000.0, "rolloff {rolloff}");
}

#[test]
fn custom_framing_flows_through_detector() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    write_sine_wav(&path, ANALYSIS_SAMPLE_RATE, 1, 440.0, 0.5);
    let framing = FrameConfig {
        frame_length: 1024,
        hop_length: 256,
        mel_bands: 64,
    };
    let detector = Detector::new(FeatureExtractor::new(framing).unwrap());
    assert_eq!(detector.extractor().config(), &framing);
    let custom = detector.features(&path).unwrap();
    let default = Detector::default().features(&path).unwrap();
    assert_ne!(custom.vector, default.vector);
    assert_eq!(custom.feature_count(), default.feature_count());
}

#[test]
fn batch_reports_each_file_independently() {
    let dir = tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    write_constant_fake_model(&model_path);
    let model = load_model(&model_path).unwrap();

    let good = dir.path().join("good.wav");
    write_sine_wav(&good, 16_000, 1, 300.0, 0.5);
    let empty = dir.path().join("empty.wav");
    std::fs::write(&empty, b"").unwrap();
    let paths = vec![good.clone(), empty.clone(), good];

    let results = analyze_batch(&Detector::default(), &paths, &model, 0);

    assert_eq!(results.len(), 3);
    let first = results[0].as_ref().unwrap();
    assert_eq!(first.prediction, Verdict::Fake);
    let confidence = first.confidence.unwrap();
    assert!((confidence - 73.105_86).abs() < 1e-3, "confidence {confidence}");
    match &results[1] {
        Err(err @ AnalysisError::Load(AudioLoadError::EmptyFile { .. })) => {
            assert_eq!(err.stage(), "load");
            assert_eq!(err.path(), empty.as_path());
            assert!(err.to_string().starts_with("Audio load failed for "), "{err}");
        }
        other => panic!("expected empty-file error, got {other:?}"),
    }
    assert_eq!(results[0].as_ref().unwrap(), results[2].as_ref().unwrap());
}
