//! Core job, result, and outcome types shared across the execution engine.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ServiceError;

/// Named fields returned by a successful job, keyed by return-field name.
pub type ResponseFields = HashMap<String, serde_json::Value>;

/// One unit of requested work.
///
/// Immutable for the duration of the call; owned by the service façade and
/// handed to exactly one handler invocation.
#[derive(Debug, Clone)]
pub struct Job {
    /// Name of the registered function to invoke.
    pub function: String,
    /// Opaque input blob (e.g. the image under analysis).
    pub payload: Vec<u8>,
    /// Free-form string parameters declared by the function.
    pub parameters: HashMap<String, String>,
    /// Per-request deadline; zero means "use the service default".
    pub requested_timeout: Duration,
}

impl Job {
    pub fn new(function: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            function: function.into(),
            payload,
            parameters: HashMap::new(),
            requested_timeout: Duration::ZERO,
        }
    }

    /// Builder-style parameter attachment.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.requested_timeout = timeout;
        self
    }

    /// Look up a declared parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// A required parameter; absence is a user error.
    pub fn required_parameter(&self, name: &str) -> Result<&str, ServiceError> {
        self.parameter(name)
            .ok_or_else(|| ServiceError::InvalidParameter {
                name: name.to_string(),
                reason: "parameter is required".to_string(),
            })
    }
}

/// What one handler invocation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum JobResult {
    /// Handler completed and produced named return fields.
    Success(ResponseFields),
    /// Handler reported a failure; the error carries kind and message.
    Failure(ServiceError),
}

impl JobResult {
    pub fn is_success(&self) -> bool {
        matches!(self, JobResult::Success(_))
    }
}

impl From<Result<ResponseFields, ServiceError>> for JobResult {
    fn from(result: Result<ResponseFields, ServiceError>) -> Self {
        match result {
            Ok(fields) => JobResult::Success(fields),
            Err(err) => JobResult::Failure(err),
        }
    }
}

/// Three-way result of racing execution against deadline and caller liveness.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// The handler resolved before the deadline with the caller still live.
    Completed(JobResult),
    /// The deadline elapsed first; the orphaned handler keeps running and its
    /// result is discarded.
    TimedOut,
    /// The caller disappeared mid-flight; nobody is listening for a response.
    CallerGone,
}

/// The function implementing one job function name.
///
/// Handlers are registered once before serving begins and shared read-only
/// across all concurrent calls. Bodies run on the blocking worker pool, so a
/// handler may block internally (model construction, long computation)
/// without stalling the async runtime.
pub trait JobHandler: Send + Sync {
    fn call(&self, job: &Job) -> JobResult;
}

impl<F> JobHandler for F
where
    F: Fn(&Job) -> JobResult + Send + Sync,
{
    fn call(&self, job: &Job) -> JobResult {
        self(job)
    }
}

impl std::fmt::Debug for dyn JobHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JobHandler")
    }
}

/// Shared handle to a registered handler.
pub type SharedJobHandler = Arc<dyn JobHandler>;
