//! Structured error taxonomy for the request execution engine.
//!
//! Every handler-level fault is converted into one of these variants at the
//! executor boundary and travels back to the caller inside a
//! [`JobResult::Failure`](crate::execution::JobResult). Deadline and
//! disconnect conditions are *outcomes*, not errors, and are modeled on
//! [`ServiceResponse`](crate::service::ServiceResponse) instead.

/// Errors surfaced to callers as response-level failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// No handler is registered under the requested function name.
    #[error("unsupported function: {function}")]
    UnsupportedFunction { function: String },

    /// A required parameter is missing or malformed for a known function.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The requested model name is absent from the registry's known set.
    #[error("model not found: {name}")]
    ModelNotFound { name: String },

    /// Construction of a known model failed; the failure is permanent for
    /// this process.
    #[error("failed to load model '{name}': {reason}")]
    ModelLoadError { name: String, reason: String },

    /// Malformed configuration input.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Any uncaught fault inside a handler.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
