//! Bounded worker pool for opaque handler invocations.
//!
//! One submission spawns one task that waits for a pool permit, runs the
//! handler on the blocking thread pool, and resolves a oneshot channel with
//! the result. When the pool is saturated, submissions queue behind the
//! semaphore rather than failing; there is no admission control beyond the
//! fixed capacity.
//!
//! Handler panics are caught at the blocking-task join and converted into
//! `Failure(Internal)` results. No request may bring down the serving
//! process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{oneshot, Semaphore};
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::error::ServiceError;
use crate::execution::types::{Job, JobHandler, JobResult, SharedJobHandler};

/// Executor for running job handlers on a bounded worker pool.
#[derive(Clone)]
pub struct JobExecutor {
    /// Controls how many handler bodies run concurrently.
    semaphore: Arc<Semaphore>,
    max_workers: usize,
    stats: Arc<Mutex<StatsInner>>,
}

#[derive(Debug, Default)]
struct StatsInner {
    submitted: u64,
    completed: u64,
    panicked: u64,
    skipped: u64,
}

/// Point-in-time snapshot of executor activity.
#[derive(Debug, Clone)]
pub struct ExecutorStats {
    pub max_workers: usize,
    pub available_capacity: usize,
    pub submitted_jobs: u64,
    pub completed_jobs: u64,
    pub panicked_jobs: u64,
    /// Jobs stopped while still queued, before their handler ever ran.
    pub skipped_jobs: u64,
}

/// Handle to one in-flight submission.
///
/// The receiving half of the executor's completion channel plus the
/// cooperative stop flag. Dropping the handle abandons the job: the handler
/// finishes in the background and its result is discarded.
pub struct SubmittedJob {
    rx: oneshot::Receiver<JobResult>,
    stop: Arc<AtomicBool>,
    submitted_at: Instant,
    /// Wall-clock submission time, for metrics/log records.
    pub submitted_at_utc: chrono::DateTime<chrono::Utc>,
}

impl SubmittedJob {
    /// Non-blocking completion check.
    ///
    /// Returns `Some` exactly once when the handler has resolved. A closed
    /// channel without a value means the worker task was torn down without
    /// reporting, which is folded into an internal failure rather than
    /// propagated as a fault.
    pub fn poll_result(&mut self) -> Option<JobResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(JobResult::Failure(
                ServiceError::Internal("worker dropped the job without a result".to_string()),
            )),
        }
    }

    /// Best-effort stop signal.
    ///
    /// A job still waiting for a pool permit is skipped entirely; a running
    /// handler is *not* interrupted (it has no cancellation point); it
    /// completes in the background and its result is discarded.
    pub fn signal_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Time since submission.
    pub fn elapsed(&self) -> std::time::Duration {
        self.submitted_at.elapsed()
    }
}

impl JobExecutor {
    /// Create an executor with a fixed worker-pool capacity.
    pub fn new(max_workers: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_workers)),
            max_workers,
            stats: Arc::new(Mutex::new(StatsInner::default())),
        }
    }

    /// Submit one handler invocation for background execution.
    ///
    /// Returns immediately; the caller observes completion through
    /// [`SubmittedJob::poll_result`]. Must be called from within a tokio
    /// runtime.
    pub fn submit(&self, handler: SharedJobHandler, job: Job) -> SubmittedJob {
        let (tx, rx) = oneshot::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let semaphore = Arc::clone(&self.semaphore);
        let stats = Arc::clone(&self.stats);
        let stop_flag = Arc::clone(&stop);
        let function = job.function.clone();

        self.stats.lock().submitted += 1;

        tokio::spawn(async move {
            // Queue behind the pool when saturated. The semaphore is never
            // closed, so acquire only fails if the executor itself is gone.
            let permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    let _ = tx.send(JobResult::Failure(ServiceError::Internal(
                        "executor shut down before the job could run".to_string(),
                    )));
                    return;
                }
            };

            // The caller abandoned this job while it was still queued; its
            // handler never ran, so there is nothing to report.
            if stop_flag.load(Ordering::Relaxed) {
                debug!(function = %function, "Skipping queued job: caller stopped waiting");
                stats.lock().skipped += 1;
                drop(permit);
                return;
            }

            let join_result = tokio::task::spawn_blocking(move || handler.call(&job)).await;
            drop(permit);

            let result = match join_result {
                Ok(result) => {
                    stats.lock().completed += 1;
                    result
                }
                Err(join_err) => {
                    stats.lock().panicked += 1;
                    error!(function = %function, error = %join_err, "Handler panicked during execution");
                    JobResult::Failure(ServiceError::Internal(format!(
                        "handler '{function}' panicked: {join_err}"
                    )))
                }
            };

            // The receiver may already be gone (timeout or disconnect); the
            // orphaned result is simply discarded.
            if tx.send(result).is_err() {
                warn!(function = %function, "Discarding result: caller stopped waiting");
            }
        });

        SubmittedJob {
            rx,
            stop,
            submitted_at: Instant::now(),
            submitted_at_utc: chrono::Utc::now(),
        }
    }

    /// Current executor statistics.
    pub fn stats(&self) -> ExecutorStats {
        let inner = self.stats.lock();
        ExecutorStats {
            max_workers: self.max_workers,
            available_capacity: self.semaphore.available_permits(),
            submitted_jobs: inner.submitted,
            completed_jobs: inner.completed,
            panicked_jobs: inner.panicked,
            skipped_jobs: inner.skipped,
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }
}
