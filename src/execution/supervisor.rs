//! Deadline supervision: races job completion against a wall-clock deadline
//! and a caller-liveness probe.
//!
//! The wait is a bounded-interval polling loop rather than a single blocking
//! await because caller liveness is a sampled condition, not an awaitable
//! event. The quantum is kept small so the timeout overshoot stays within
//! roughly one polling interval.
//!
//! Cancellation is cooperative abandonment, not preemption: a handler body
//! has no cancellation point, so on timeout or disconnect the supervisor
//! stops *waiting*, signals a best-effort stop, and lets the orphaned
//! computation finish in the background with its result discarded.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::execution::executor::SubmittedJob;
use crate::execution::types::JobOutcome;

/// How often the supervisor samples completion and caller liveness.
pub const DEFAULT_POLL_QUANTUM: Duration = Duration::from_millis(10);

/// Supervises one submission until completion, deadline expiry, or caller
/// disconnect, whichever wins.
#[derive(Debug, Clone)]
pub struct DeadlineSupervisor {
    quantum: Duration,
}

impl DeadlineSupervisor {
    pub fn new() -> Self {
        Self {
            quantum: DEFAULT_POLL_QUANTUM,
        }
    }

    /// Override the polling quantum (primarily for tests).
    pub fn with_quantum(quantum: Duration) -> Self {
        Self { quantum }
    }

    /// Race the submitted job against `deadline` and the liveness probe.
    ///
    /// Checks, in order, on every iteration: caller liveness, then
    /// completion. Both disconnect and timeout signal a stop to the in-flight
    /// job before returning.
    pub async fn await_outcome<F>(
        &self,
        mut job: SubmittedJob,
        deadline: Duration,
        caller_alive: F,
    ) -> JobOutcome
    where
        F: Fn() -> bool,
    {
        let started = Instant::now();

        while started.elapsed() < deadline {
            if !caller_alive() {
                debug!("Client disconnected before completion");
                job.signal_stop();
                return JobOutcome::CallerGone;
            }

            if let Some(result) = job.poll_result() {
                return JobOutcome::Completed(result);
            }

            tokio::time::sleep(self.quantum).await;
        }

        job.signal_stop();
        JobOutcome::TimedOut
    }
}

impl Default for DeadlineSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::executor::JobExecutor;
    use crate::execution::types::{Job, JobResult, ResponseFields, SharedJobHandler};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn sleeping_handler(sleep: Duration) -> SharedJobHandler {
        Arc::new(move |_job: &Job| -> JobResult {
            std::thread::sleep(sleep);
            JobResult::Success(ResponseFields::new())
        })
    }

    #[tokio::test]
    async fn test_completion_wins_before_deadline() {
        let executor = JobExecutor::new(2);
        let supervisor = DeadlineSupervisor::new();

        let submitted = executor.submit(
            sleeping_handler(Duration::from_millis(30)),
            Job::new("fast", vec![]),
        );
        let outcome = supervisor
            .await_outcome(submitted, Duration::from_secs(5), || true)
            .await;

        assert!(matches!(
            outcome,
            JobOutcome::Completed(JobResult::Success(_))
        ));
    }

    #[tokio::test]
    async fn test_deadline_wins_over_slow_handler() {
        let executor = JobExecutor::new(2);
        let supervisor = DeadlineSupervisor::new();

        let submitted = executor.submit(
            sleeping_handler(Duration::from_millis(500)),
            Job::new("slow", vec![]),
        );

        let started = std::time::Instant::now();
        let outcome = supervisor
            .await_outcome(submitted, Duration::from_millis(100), || true)
            .await;
        let waited = started.elapsed();

        assert_eq!(outcome, JobOutcome::TimedOut);
        // Overshoot stays within a few polling quanta, never the handler's
        // full runtime.
        assert!(waited >= Duration::from_millis(100));
        assert!(waited < Duration::from_millis(250), "waited {waited:?}");
    }

    #[tokio::test]
    async fn test_disconnect_returns_promptly() {
        let executor = JobExecutor::new(2);
        let supervisor = DeadlineSupervisor::new();

        let submitted = executor.submit(
            sleeping_handler(Duration::from_millis(500)),
            Job::new("abandoned", vec![]),
        );

        // Caller drops off after the third liveness sample.
        let samples = Arc::new(AtomicUsize::new(0));
        let probe_samples = Arc::clone(&samples);
        let started = std::time::Instant::now();
        let outcome = supervisor
            .await_outcome(submitted, Duration::from_secs(5), move || {
                probe_samples.fetch_add(1, Ordering::Relaxed) < 3
            })
            .await;
        let waited = started.elapsed();

        assert_eq!(outcome, JobOutcome::CallerGone);
        assert!(waited < Duration::from_millis(200), "waited {waited:?}");
    }

    #[tokio::test]
    async fn test_zero_elapsed_deadline_checks_liveness_first() {
        let executor = JobExecutor::new(1);
        let supervisor = DeadlineSupervisor::with_quantum(Duration::from_millis(1));

        let submitted = executor.submit(
            sleeping_handler(Duration::from_millis(50)),
            Job::new("gone", vec![]),
        );
        let outcome = supervisor
            .await_outcome(submitted, Duration::from_secs(1), || false)
            .await;

        assert_eq!(outcome, JobOutcome::CallerGone);
    }
}
