use std::fs::File;
use std::path::Path;

use symphonia::core::{
    audio::SampleBuffer,
    codecs::{CODEC_TYPE_NULL, DecoderOptions},
    errors::Error,
    formats::{FormatOptions, Track},
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};
use tracing::debug;

use super::downmix::append_mono;
use super::error::DecodeError;

/// Decoded audio already folded down to one channel.
pub(super) struct DecodedAudio {
    pub(super) mono: Vec<f32>,
    pub(super) sample_rate: u32,
    pub(super) channels: usize,
}

/// Decode the default audio track of `path` to mono `f32` at its native rate.
pub(super) fn decode_mono(path: &Path) -> Result<DecodedAudio, DecodeError> {
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
    let mut format = probed.format;
    let track = audio_track(format.default_track(), format.tracks())
        .ok_or(DecodeError::NoAudioTrack)?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let sample_rate = codec_params
        .sample_rate
        .filter(|rate| *rate > 0)
        .ok_or(DecodeError::MissingSampleRate)?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(DecodeError::UnsupportedCodec)?;

    let mut mono = Vec::new();
    let mut channels = 0usize;
    let mut skipped_packets = 0usize;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(Error::IoError(err)) if err.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(DecodeError::Packet(err)),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let audio_buf = match decoder.decode(&packet) {
            Ok(audio_buf) => audio_buf,
            Err(Error::DecodeError(reason)) => {
                skipped_packets += 1;
                debug!(path = %path.display(), reason, "Skipping undecodable packet");
                continue;
            }
            Err(err) => return Err(DecodeError::Packet(err)),
        };
        let spec = *audio_buf.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        channels = spec.channels.count().max(1);
        append_mono(&mut mono, sample_buf.samples(), channels);
    }

    if skipped_packets > 0 {
        debug!(
            path = %path.display(),
            skipped_packets,
            "Decoded with recoverable packet errors"
        );
    }
    if mono.is_empty() {
        return Err(DecodeError::NoSamples);
    }
    Ok(DecodedAudio {
        mono,
        sample_rate,
        channels,
    })
}

/// Prefer the container's default track; fall back to the first track with a real codec.
fn audio_track<'a>(default: Option<&'a Track>, tracks: &'a [Track]) -> Option<&'a Track> {
    default
        .filter(|track| track.codec_params.codec != CODEC_TYPE_NULL)
        .or_else(|| {
            tracks
                .iter()
                .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
        })
}
