//! # Service Façade
//!
//! The single RPC-facing entry point. Wires handler resolution through the
//! [`HandlerTable`], background execution through the [`JobExecutor`], and
//! deadline/liveness racing through the [`DeadlineSupervisor`], then converts
//! the outcome into a [`ServiceResponse`].
//!
//! The transport layer (gRPC server, protobuf codec) lives outside this
//! crate; it supplies a [`CallerContext`] per inbound call and maps
//! [`ServiceResponse`] onto its wire types.

pub mod descriptor;

pub use descriptor::{
    FieldType, FunctionDescriptor, ParameterDef, ReturnFieldDef, ServiceDescriptor,
};

use std::time::Duration;

use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::execution::{
    DeadlineSupervisor, ExecutorStats, Job, JobExecutor, JobOutcome, JobResult, ResponseFields,
};
use crate::logging::log_execute_outcome;
use crate::registry::HandlerTable;

/// What the transport layer must expose about the caller of one request.
pub trait CallerContext: Sync {
    /// Identity of the caller, for diagnostics only.
    fn peer(&self) -> &str;
    /// Sampled liveness: false once the caller has disconnected.
    fn is_active(&self) -> bool;
}

/// Caller that never disconnects; for embedding and tests.
#[derive(Debug, Clone)]
pub struct StaticCaller {
    peer: String,
}

impl StaticCaller {
    pub fn new(peer: impl Into<String>) -> Self {
        Self { peer: peer.into() }
    }
}

impl CallerContext for StaticCaller {
    fn peer(&self) -> &str {
        &self.peer
    }

    fn is_active(&self) -> bool {
        true
    }
}

/// Terminal result of one `execute` call, mapped from the three-way race
/// outcome. Deadline expiry is distinguishable from handler-level failure;
/// a disconnected caller yields a discarded response carrying nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResponse {
    /// Handler succeeded; response populated with its return fields.
    Completed { fields: ResponseFields },
    /// Handler (or dispatch) reported a failure.
    Error { error: ServiceError },
    /// The per-request deadline elapsed before the handler resolved.
    DeadlineExceeded { timeout: Duration },
    /// The caller disconnected mid-flight; no one is listening.
    Discarded,
}

impl ServiceResponse {
    pub fn is_completed(&self) -> bool {
        matches!(self, ServiceResponse::Completed { .. })
    }
}

/// The assembled request execution engine.
pub struct StegService {
    handlers: HandlerTable,
    executor: JobExecutor,
    supervisor: DeadlineSupervisor,
    descriptor: ServiceDescriptor,
    max_timeout: Duration,
}

impl StegService {
    /// Assemble the service from its parts. The handler table must be fully
    /// registered before this point; it is immutable afterward.
    pub fn new(
        config: &ServiceConfig,
        handlers: HandlerTable,
        descriptor: ServiceDescriptor,
    ) -> Self {
        Self {
            handlers,
            executor: JobExecutor::new(config.max_workers),
            supervisor: DeadlineSupervisor::new(),
            descriptor,
            max_timeout: config.max_timeout,
        }
    }

    /// Execute one job on behalf of `caller`.
    ///
    /// The calling task never blocks longer than the resolved timeout plus
    /// one polling quantum, regardless of how long the handler runs.
    pub async fn execute(&self, job: Job, caller: &dyn CallerContext) -> ServiceResponse {
        let function = job.function.clone();
        let peer = caller.peer().to_string();

        debug!(peer = %peer, function = %function, "Received execute request");

        let timeout = if job.requested_timeout.is_zero() {
            self.max_timeout
        } else {
            job.requested_timeout
        };

        let handler = match self.handlers.resolve(&function) {
            Ok(handler) => handler,
            Err(error) => {
                log_execute_outcome(
                    &peer,
                    &function,
                    "unsupported_function",
                    None,
                    Some(&error.to_string()),
                );
                return ServiceResponse::Error { error };
            }
        };

        let submitted = self.executor.submit(handler, job);
        let started = std::time::Instant::now();
        let outcome = self
            .supervisor
            .await_outcome(submitted, timeout, || caller.is_active())
            .await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            JobOutcome::Completed(JobResult::Success(fields)) => {
                log_execute_outcome(&peer, &function, "completed", Some(duration_ms), None);
                ServiceResponse::Completed { fields }
            }
            JobOutcome::Completed(JobResult::Failure(error)) => {
                log_execute_outcome(
                    &peer,
                    &function,
                    "failed",
                    Some(duration_ms),
                    Some(&error.to_string()),
                );
                ServiceResponse::Error { error }
            }
            JobOutcome::TimedOut => {
                log_execute_outcome(
                    &peer,
                    &function,
                    "deadline_exceeded",
                    Some(duration_ms),
                    Some(&format!("timeout after {}s", timeout.as_secs_f64())),
                );
                ServiceResponse::DeadlineExceeded { timeout }
            }
            JobOutcome::CallerGone => {
                log_execute_outcome(&peer, &function, "caller_gone", Some(duration_ms), None);
                ServiceResponse::Discarded
            }
        }
    }

    /// The service advertisement for client-side discovery.
    pub fn describe(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    /// Snapshot of worker-pool activity.
    pub fn executor_stats(&self) -> ExecutorStats {
        self.executor.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::types::JobResult;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Caller whose liveness flips off on demand.
    struct FlakyCaller {
        active: Arc<AtomicBool>,
    }

    impl CallerContext for FlakyCaller {
        fn peer(&self) -> &str {
            "ipv4:127.0.0.1:50000"
        }

        fn is_active(&self) -> bool {
            self.active.load(Ordering::Relaxed)
        }
    }

    fn test_config() -> ServiceConfig {
        ServiceConfig {
            max_workers: 4,
            max_timeout: Duration::from_millis(200),
            ..ServiceConfig::default()
        }
    }

    fn service_with(handlers: HandlerTable) -> StegService {
        StegService::new(
            &test_config(),
            handlers,
            ServiceDescriptor::new("aletheia-test", "test instance"),
        )
    }

    #[tokio::test]
    async fn test_unsupported_function_returns_error_without_invocation() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invocations);

        let mut handlers = HandlerTable::new();
        handlers.register("auto", move |_job: &Job| -> JobResult {
            counter.fetch_add(1, Ordering::SeqCst);
            JobResult::Success(ResponseFields::new())
        });
        let service = service_with(handlers);

        let response = service
            .execute(Job::new("does_not_exist", vec![]), &StaticCaller::new("t"))
            .await;

        assert_eq!(
            response,
            ServiceResponse::Error {
                error: ServiceError::UnsupportedFunction {
                    function: "does_not_exist".to_string()
                }
            }
        );
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_success_fields_pass_through_unchanged() {
        let mut handlers = HandlerTable::new();
        handlers.register("auto", |_job: &Job| -> JobResult {
            let mut fields = ResponseFields::new();
            fields.insert("lsbr_pred".to_string(), serde_json::json!(0.93));
            JobResult::Success(fields)
        });
        let service = service_with(handlers);

        let response = service
            .execute(Job::new("auto", vec![1, 2, 3]), &StaticCaller::new("t"))
            .await;

        match response {
            ServiceResponse::Completed { fields } => {
                assert_eq!(fields.get("lsbr_pred"), Some(&serde_json::json!(0.93)));
            }
            other => panic!("expected completed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handler_failure_maps_to_error_response() {
        let mut handlers = HandlerTable::new();
        handlers.register("auto", |_job: &Job| -> JobResult {
            JobResult::Failure(ServiceError::InvalidParameter {
                name: "model_name".to_string(),
                reason: "parameter is required".to_string(),
            })
        });
        let service = service_with(handlers);

        let response = service
            .execute(Job::new("auto", vec![]), &StaticCaller::new("t"))
            .await;

        assert!(matches!(
            response,
            ServiceResponse::Error {
                error: ServiceError::InvalidParameter { .. }
            }
        ));
    }

    #[tokio::test]
    async fn test_zero_requested_timeout_uses_default() {
        let mut handlers = HandlerTable::new();
        handlers.register("auto", |_job: &Job| -> JobResult {
            std::thread::sleep(Duration::from_millis(50));
            JobResult::Success(ResponseFields::new())
        });
        let service = service_with(handlers);

        // Default is 200ms; a 50ms handler with requested_timeout == 0 must
        // complete, not time out immediately.
        let response = service
            .execute(Job::new("auto", vec![]), &StaticCaller::new("t"))
            .await;
        assert!(response.is_completed());
    }

    #[tokio::test]
    async fn test_deadline_exceeded_is_distinguishable() {
        let mut handlers = HandlerTable::new();
        handlers.register("auto", |_job: &Job| -> JobResult {
            std::thread::sleep(Duration::from_millis(500));
            JobResult::Success(ResponseFields::new())
        });
        let service = service_with(handlers);

        let job = Job::new("auto", vec![]).with_timeout(Duration::from_millis(80));
        let response = service.execute(job, &StaticCaller::new("t")).await;

        assert_eq!(
            response,
            ServiceResponse::DeadlineExceeded {
                timeout: Duration::from_millis(80)
            }
        );
    }

    #[tokio::test]
    async fn test_disconnected_caller_discards_response() {
        let mut handlers = HandlerTable::new();
        handlers.register("auto", |_job: &Job| -> JobResult {
            std::thread::sleep(Duration::from_millis(300));
            JobResult::Success(ResponseFields::new())
        });
        let service = service_with(handlers);

        let active = Arc::new(AtomicBool::new(true));
        let caller = FlakyCaller {
            active: Arc::clone(&active),
        };

        let flipper = Arc::clone(&active);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            flipper.store(false, Ordering::Relaxed);
        });

        let job = Job::new("auto", vec![]).with_timeout(Duration::from_secs(5));
        let started = std::time::Instant::now();
        let response = service.execute(job, &caller).await;

        assert_eq!(response, ServiceResponse::Discarded);
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_describe_exposes_descriptor() {
        let service = service_with(HandlerTable::new());
        assert_eq!(service.describe().name, "aletheia-test");
    }
}
