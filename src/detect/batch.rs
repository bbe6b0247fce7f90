use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::channel;

use tracing::debug;

use super::{AnalysisError, AnalysisResult, Detector};
use crate::ml::Predictor;

/// Analyze many files in parallel, returning results in input order.
///
/// `workers == 0` uses one worker per available CPU. The worker count never
/// exceeds the number of paths.
pub fn analyze_batch<P>(
    detector: &Detector,
    paths: &[PathBuf],
    predictor: &P,
    workers: usize,
) -> Vec<Result<AnalysisResult, AnalysisError>>
where
    P: Predictor + Sync + ?Sized,
{
    if paths.is_empty() {
        return Vec::new();
    }
    let worker_count = resolve_workers(workers, paths.len());
    debug!(files = paths.len(), worker_count, "Starting batch analysis");
    if worker_count == 1 {
        return paths
            .iter()
            .map(|path| detector.analyze(path, predictor))
            .collect();
    }

    let next = AtomicUsize::new(0);
    let (tx, rx) = channel();
    std::thread::scope(|scope| {
        for _ in 0..worker_count {
            let tx = tx.clone();
            let next = &next;
            scope.spawn(move || {
                loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(path) = paths.get(index) else {
                        break;
                    };
                    if tx.send((index, detector.analyze(path, predictor))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(tx);

    let mut slots: Vec<Option<Result<AnalysisResult, AnalysisError>>> =
        (0..paths.len()).map(|_| None).collect();
    for (index, result) in rx {
        slots[index] = Some(result);
    }
    slots.into_iter().flatten().collect()
}

fn resolve_workers(requested: usize, jobs: usize) -> usize {
    let requested = if requested == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    } else {
        requested
    };
    requested.min(jobs).max(1)
}
