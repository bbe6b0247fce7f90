pub(super) const MAX_WORKER_COUNT: usize = 64;

pub(super) fn default_frame_length() -> usize {
    2048
}

pub(super) fn default_hop_length() -> usize {
    512
}

pub(super) fn default_mel_bands() -> usize {
    128
}

pub(super) fn default_workers() -> usize {
    0
}

pub(super) fn default_max_file_bytes() -> u64 {
    10 * 1024 * 1024
}

pub(super) fn default_allowed_extensions() -> Vec<String> {
    ["wav", "mp3", "webm", "ogg", "m4a"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub(super) fn clamp_workers(value: usize) -> usize {
    value.min(MAX_WORKER_COUNT)
}
