//! Diagnostics for `audioverdict` runs.
//!
//! Verdicts and feature reports own stdout, so every log line goes to stderr
//! and to `<app dir>/logs/audioverdict_<timestamp>.log`. Only the newest
//! [`KEPT_RUN_LOGS`] run logs survive a launch.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs::{self, AppDirError};

/// Run logs kept in the logs directory after pruning.
pub const KEPT_RUN_LOGS: usize = 10;
const RUN_LOG_PREFIX: &str = "audioverdict";
const DEFAULT_DIRECTIVE: &str = "info";

// Flushes the file writer when the process exits.
static FILE_FLUSH: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Cannot place run logs: {0}")]
    LogDir(#[from] AppDirError),
    #[error("Cannot open run log {path}: {source}")]
    OpenRunLog {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot prune old run logs in {path}: {source}")]
    Prune {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot timestamp run log name: {0}")]
    Timestamp(time::error::Format),
    /// Another subscriber was installed first.
    #[error("Tracing subscriber already installed: {0}")]
    Install(tracing::subscriber::SetGlobalDefaultError),
}

/// Start logging for this run. A second call does nothing.
///
/// The CLI reports the error and carries on unlogged.
pub fn init() -> Result<(), LoggingError> {
    if FILE_FLUSH.get().is_some() {
        return Ok(());
    }

    let dir = app_dirs::logs_dir()?;
    let name = run_log_name(now_local_or_utc())?;
    let run_log = dir.join(&name);
    touch(&run_log)?;
    prune_run_logs(&dir, KEPT_RUN_LOGS)?;

    let (file_writer, flush) = tracing_appender::non_blocking(rolling::never(&dir, name));
    let timer = local_timer();
    let subscriber = Registry::default()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_timer(timer.clone())
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::Install)?;
    let _ = FILE_FLUSH.set(flush);

    tracing::debug!(run_log = %run_log.display(), "Logging started");
    Ok(())
}

fn touch(path: &Path) -> Result<(), LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(drop)
        .map_err(|source| LoggingError::OpenRunLog {
            path: path.to_path_buf(),
            source,
        })
}

/// Delete the oldest `*.log` files in `dir` until at most `keep` remain.
fn prune_run_logs(dir: &Path, keep: usize) -> Result<(), LoggingError> {
    let prune_err = |source: std::io::Error| LoggingError::Prune {
        path: dir.to_path_buf(),
        source,
    };
    let mut logs: Vec<(SystemTime, PathBuf)> = fs::read_dir(dir)
        .map_err(prune_err)?
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_file()))
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .collect();

    logs.sort_by_key(|(modified, _)| *modified);
    let surplus = logs.len().saturating_sub(keep);
    for (_, path) in logs.into_iter().take(surplus) {
        fs::remove_file(&path).map_err(prune_err)?;
    }
    Ok(())
}

fn run_log_name(started: OffsetDateTime) -> Result<String, LoggingError> {
    const STAMP: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    let stamp = started.format(STAMP).map_err(LoggingError::Timestamp)?;
    Ok(format!("{RUN_LOG_PREFIX}_{stamp}.log"))
}

fn local_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const LINE_STAMP: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, LINE_STAMP.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

// `RUST_LOG` wins; otherwise info and above.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{thread, time::Duration};
    use tempfile::tempdir;

    #[test]
    fn run_log_name_is_prefixed_and_stamped() {
        let started = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(
            run_log_name(started).unwrap(),
            "audioverdict_2023-11-14_22-13-20.log"
        );
    }

    #[test]
    fn pruning_keeps_newest_logs_and_ignores_other_files() {
        let dir = tempdir().unwrap();
        for idx in 0..12 {
            touch(&dir.path().join(format!("audioverdict_{idx}.log"))).unwrap();
            thread::sleep(Duration::from_millis(10));
        }
        fs::write(dir.path().join("notes.txt"), b"keep").unwrap();

        prune_run_logs(dir.path(), KEPT_RUN_LOGS).unwrap();

        let logs = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) == Some("log"))
            .count();
        assert_eq!(logs, KEPT_RUN_LOGS);
        assert!(!dir.path().join("audioverdict_0.log").exists());
        assert!(!dir.path().join("audioverdict_1.log").exists());
        assert!(dir.path().join("audioverdict_11.log").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn unwritable_log_path_is_reported() {
        let dir = tempdir().unwrap();
        let err = touch(&dir.path().join("missing").join("run.log")).unwrap_err();
        assert!(matches!(err, LoggingError::OpenRunLog { .. }), "{err}");
    }
}
