//! Command-line entry point: classify audio files as real or synthetic.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use audioverdict::analysis::vector::FEATURE_NAMES;
use audioverdict::analysis::{AudioProbe, FeatureExtractor, FeatureVector, probe_metadata};
use audioverdict::config::{self, ConfigError, Settings};
use audioverdict::detect::{AnalysisError, AnalysisResult, AudioStats, Detector, analyze_batch};
use audioverdict::logging;
use audioverdict::ml::load_model;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            print_error(&err);
            std::process::exit(1);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct CliOptions {
    model_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    workers: Option<usize>,
    features_only: bool,
    inputs: Vec<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeatureReport<'a> {
    path: &'a Path,
    features: &'a FeatureVector,
    feature_names: &'static [&'static str],
    audio_stats: AudioStats,
    source: Option<AudioProbe>,
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    error: &'a str,
}

/// Returns whether every input succeeded.
fn run() -> Result<bool, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        println!("{}", help_text());
        return Ok(true);
    }
    let options = parse_args(args)?;
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    let settings = resolve_settings(options.config_path.as_deref(), config::load_or_default)?;
    let extractor = FeatureExtractor::new(settings.analysis.frame_config())
        .map_err(|err| err.to_string())?;
    let detector = Detector::new(extractor);

    let mut outcomes: Vec<Option<Result<String, String>>> = options
        .inputs
        .iter()
        .map(|path| {
            settings
                .intake
                .check(path)
                .err()
                .map(|err| Err(err.to_string()))
        })
        .collect();
    let accepted: Vec<(usize, PathBuf)> = options
        .inputs
        .iter()
        .enumerate()
        .filter(|(idx, _)| outcomes[*idx].is_none())
        .map(|(idx, path)| (idx, path.clone()))
        .collect();

    if options.features_only {
        for (idx, path) in &accepted {
            outcomes[*idx] = Some(feature_report(&detector, path));
        }
    } else {
        let model_path = options
            .model_path
            .clone()
            .or_else(|| settings.model_path.clone())
            .ok_or_else(|| {
                "No model given: pass --model <path> or set model_path in config.toml".to_string()
            })?;
        let model = load_model(&model_path).map_err(|err| err.to_string())?;
        let workers = options.workers.unwrap_or(settings.analysis.workers);
        let paths: Vec<PathBuf> = accepted.iter().map(|(_, path)| path.clone()).collect();
        let results = analyze_batch(&detector, &paths, &model, workers);
        for ((idx, _), result) in accepted.iter().zip(results) {
            outcomes[*idx] = Some(render_result(result));
        }
    }

    let mut all_ok = true;
    for outcome in outcomes.into_iter().flatten() {
        match outcome {
            Ok(json) => println!("{json}"),
            Err(message) => {
                all_ok = false;
                print_error(&message);
            }
        }
    }
    Ok(all_ok)
}

/// Settings from `--config`, else from the app directory.
///
/// An unusable app directory falls back to defaults; a broken settings file does not.
fn resolve_settings(
    config_path: Option<&Path>,
    load_default: impl FnOnce() -> Result<Settings, ConfigError>,
) -> Result<Settings, String> {
    match config_path {
        Some(path) => config::load_settings_from(path).map_err(|err| err.to_string()),
        None => match load_default() {
            Err(ConfigError::AppDir(err)) => {
                warn!("Using default settings: {err}");
                Ok(Settings::default())
            }
            other => other.map_err(|err| err.to_string()),
        },
    }
}

fn render_result(result: Result<AnalysisResult, AnalysisError>) -> Result<String, String> {
    match result {
        Ok(result) => serde_json::to_string(&result).map_err(|err| err.to_string()),
        Err(err) => {
            warn!(stage = err.stage(), path = %err.path().display(), "Analysis failed");
            Err(err.to_string())
        }
    }
}

fn feature_report(detector: &Detector, path: &Path) -> Result<String, String> {
    let features = detector.features(path).map_err(|err| err.to_string())?;
    let source = probe_metadata(path)
        .inspect_err(|err| warn!(path = %path.display(), "Header probe failed: {err}"))
        .ok();
    let report = FeatureReport {
        path,
        features: &features.vector,
        feature_names: &FEATURE_NAMES,
        audio_stats: AudioStats {
            duration: features.duration_seconds,
            sample_rate: features.sample_rate,
            features_count: features.feature_count(),
        },
        source,
    };
    serde_json::to_string(&report).map_err(|err| err.to_string())
}

fn print_error(message: &str) {
    let payload = ErrorPayload { error: message };
    match serde_json::to_string(&payload) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!("{message}"),
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut positional = Vec::new();

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--model" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--model requires a value".to_string())?;
                options.model_path = Some(PathBuf::from(value));
            }
            "--config" => {
                idx += 1;
                let value =
                    args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--workers" => {
                idx += 1;
                let value =
                    args.get(idx).ok_or_else(|| "--workers requires a value".to_string())?;
                let workers = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --workers value: {value}"))?;
                options.workers = Some(workers);
            }
            "--features" => options.features_only = true,
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            value => positional.push(PathBuf::from(value)),
        }
        idx += 1;
    }

    // `audioverdict <audio> <model.json>` keeps working without `--model`.
    if options.model_path.is_none() && !options.features_only && positional.len() == 2 {
        if positional[1]
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            options.model_path = positional.pop();
        }
    }
    if positional.is_empty() {
        return Err(format!("No audio files given\n\n{}", help_text()));
    }
    options.inputs = positional;
    Ok(options)
}

fn help_text() -> String {
    [
        "audioverdict",
        "",
        "Classifies audio files as real or synthetic speech.",
        "",
        "Usage:",
        "  audioverdict [options] <audio>...",
        "  audioverdict <audio> <model.json>",
        "",
        "Options:",
        "  --model <path>    Classifier JSON (default: model_path from config.toml).",
        "  --config <path>   Settings file (default: <config dir>/.audioverdict/config.toml).",
        "  --workers <n>     Files analyzed in parallel, 0 = all CPUs (default: from config).",
        "  --features        Print the feature vector and stats instead of a verdict.",
        "  -h, --help        Show this help.",
        "",
        "Each input prints one JSON document on stdout; failures print {\"error\": ...} on stderr.",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use audioverdict::app_dirs::AppDirError;
    use tempfile::tempdir;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn positional_model_form_is_recognized() {
        let options = parse_args(args(&["clip.wav", "model.json"])).unwrap();
        assert_eq!(options.inputs, vec![PathBuf::from("clip.wav")]);
        assert_eq!(options.model_path, Some(PathBuf::from("model.json")));
    }

    #[test]
    fn flags_and_many_inputs() {
        let options = parse_args(args(&[
            "--model", "m.json", "--workers", "4", "a.wav", "b.mp3", "c.ogg",
        ]))
        .unwrap();
        assert_eq!(options.workers, Some(4));
        assert_eq!(options.inputs.len(), 3);
        assert!(!options.features_only);
    }

    #[test]
    fn features_mode_keeps_json_inputs_as_audio() {
        let options = parse_args(args(&["--features", "a.wav", "b.json"])).unwrap();
        assert!(options.model_path.is_none());
        assert_eq!(options.inputs.len(), 2);
    }

    #[test]
    fn unusable_app_dir_falls_back_to_default_settings() {
        let settings = resolve_settings(None, || {
            Err(ConfigError::AppDir(AppDirError::NoBaseDir))
        })
        .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn broken_settings_are_still_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "analysis = [").unwrap();
        let from_flag = resolve_settings(Some(&path), || unreachable!("flag wins"));
        assert!(from_flag.is_err());
        let from_default = resolve_settings(None, || config::load_settings_from(&path));
        assert!(from_default.is_err());
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert!(parse_args(args(&[])).unwrap_err().contains("No audio files"));
        assert!(parse_args(args(&["--workers", "many", "a.wav"])).is_err());
        assert!(parse_args(args(&["--bogus"])).unwrap_err().contains("Unknown argument"));
        assert!(parse_args(args(&["--model"])).is_err());
    }
}
