#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Aletheia Core
//!
//! Request execution engine and lazy model registry for the Aletheia DFIR
//! Steg-Hub service.
//!
//! ## Overview
//!
//! Aletheia Core is the transport-neutral heart of a steganalysis front end:
//! it accepts named, parameterized jobs, executes each on a bounded worker
//! pool, enforces a per-request deadline independent of the job's own
//! runtime, detects client disconnection mid-flight, and materializes
//! expensive backing models on first use rather than at startup.
//!
//! The RPC surface (gRPC server, protobuf codec, port binding) and the
//! analysis algorithms themselves live outside this crate; the engine sees
//! handlers as opaque `(job) -> result` functions and models as opaque
//! blobs.
//!
//! ## Architecture
//!
//! ```text
//! inbound job
//!   └─> StegService (façade)
//!         ├─> HandlerTable   (function name -> handler, static)
//!         ├─> JobExecutor    (bounded pool, panic containment)
//!         │     └─> handler may pull from ModelRegistry (lazy, once per name)
//!         └─> DeadlineSupervisor (completion vs deadline vs caller liveness)
//! ```
//!
//! Timeout and disconnect handling are cooperative abandonment: the
//! supervisor stops waiting and the orphaned handler finishes in the
//! background with its result discarded.
//!
//! ## Module Organization
//!
//! - [`execution`] - Job types, the worker-pool executor, and the deadline
//!   supervisor
//! - [`registry`] - Handler table and lazy model registry
//! - [`service`] - The RPC-facing façade and service descriptor
//! - [`handlers`] - Built-in steganalysis functions behind injection seams
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Structured error taxonomy
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use aletheia_core::config::ServiceConfig;
//! use aletheia_core::execution::{Job, JobResult, ResponseFields};
//! use aletheia_core::registry::{HandlerTable, ModelRegistry};
//! use aletheia_core::service::{ServiceDescriptor, StaticCaller, StegService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServiceConfig::from_env()?;
//! let registry = Arc::new(ModelRegistry::from_directory(
//!     &config.models_path,
//!     config.load_models_lazy,
//! )?);
//!
//! let mut handlers = HandlerTable::new();
//! handlers.register("echo", |job: &Job| -> JobResult {
//!     let mut fields = ResponseFields::new();
//!     fields.insert("function".to_string(), serde_json::json!(job.function));
//!     JobResult::Success(fields)
//! });
//!
//! let service = StegService::new(
//!     &config,
//!     handlers,
//!     ServiceDescriptor::new("aletheia", "Steganalysis service"),
//! );
//!
//! let response = service
//!     .execute(Job::new("echo", vec![]), &StaticCaller::new("local"))
//!     .await;
//! println!("{response:?}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod handlers;
pub mod logging;
pub mod registry;
pub mod service;

pub use config::ServiceConfig;
pub use error::{Result, ServiceError};
pub use execution::{
    DeadlineSupervisor, ExecutorStats, Job, JobExecutor, JobHandler, JobOutcome, JobResult,
    ResponseFields, SubmittedJob,
};
pub use registry::{FileModelLoader, HandlerTable, Model, ModelLoader, ModelRegistry};
pub use service::{CallerContext, ServiceDescriptor, ServiceResponse, StaticCaller, StegService};
