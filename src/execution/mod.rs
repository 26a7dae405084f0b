//! Asynchronous job execution: the worker pool and the deadline race.
//!
//! [`JobExecutor`] runs opaque handler bodies on a bounded pool;
//! [`DeadlineSupervisor`] races each submission against a wall-clock deadline
//! and a caller-liveness probe. Together they give the service façade a
//! synchronous-looking `execute` over fully asynchronous execution.

pub mod executor;
pub mod supervisor;
pub mod types;

pub use executor::{ExecutorStats, JobExecutor, SubmittedJob};
pub use supervisor::{DeadlineSupervisor, DEFAULT_POLL_QUANTUM};
pub use types::{Job, JobHandler, JobOutcome, JobResult, ResponseFields};
