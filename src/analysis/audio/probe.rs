use std::fs::File;
use std::path::Path;

use serde::Serialize;
use symphonia::core::{
    formats::FormatOptions, io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};

use super::error::DecodeError;

/// Container-level facts about a file, read without decoding its audio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioProbe {
    pub duration_seconds: Option<f32>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
}

pub(super) fn probe_container(path: &Path) -> Result<AudioProbe, DecodeError> {
    if is_wav(path) {
        return probe_wav(path);
    }
    let file = File::open(path).map_err(DecodeError::Open)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }
    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(DecodeError::Probe)?;
    let track = probed
        .format
        .default_track()
        .ok_or(DecodeError::NoAudioTrack)?;
    let params = &track.codec_params;
    let sample_rate = params.sample_rate.filter(|rate| *rate > 0);
    let duration_seconds = match (params.n_frames, sample_rate) {
        (Some(frames), Some(rate)) => Some((frames as f64 / rate as f64) as f32),
        _ => None,
    };
    Ok(AudioProbe {
        duration_seconds,
        sample_rate,
        channels: params.channels.map(|channels| channels.count() as u16),
    })
}

fn probe_wav(path: &Path) -> Result<AudioProbe, DecodeError> {
    let reader = hound::WavReader::open(path).map_err(DecodeError::Wav)?;
    let spec = reader.spec();
    let sample_rate = spec.sample_rate.max(1);
    // `duration` already counts frames, not interleaved samples.
    let duration_seconds = reader.duration() as f64 / sample_rate as f64;
    Ok(AudioProbe {
        duration_seconds: Some(duration_seconds as f32),
        sample_rate: Some(sample_rate),
        channels: Some(spec.channels.max(1)),
    })
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}
