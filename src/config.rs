use crate::error::{Result, ServiceError};
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration consumed by the execution engine.
///
/// Supplied by the bootstrap layer through environment variables; every field
/// has a serving-ready default so a bare environment still yields a working
/// service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Capacity of the job worker pool.
    pub max_workers: usize,
    /// Default per-request deadline, used when a job requests no timeout.
    pub max_timeout: Duration,
    /// Directory scanned for model files at registry construction.
    pub models_path: PathBuf,
    /// Construct models on first use rather than at startup.
    pub load_models_lazy: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_workers: 20,
            max_timeout: Duration::from_secs(5),
            models_path: PathBuf::from("aletheia-models"),
            load_models_lazy: true,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(max_workers) = std::env::var("max_workers") {
            config.max_workers = max_workers.parse().map_err(|e| {
                ServiceError::Configuration(format!("Invalid max_workers: {e}"))
            })?;
        }

        if let Ok(max_timeout) = std::env::var("max_timeout") {
            let secs: u64 = max_timeout.parse().map_err(|e| {
                ServiceError::Configuration(format!("Invalid max_timeout: {e}"))
            })?;
            config.max_timeout = Duration::from_secs(secs);
        }

        if let Ok(models_path) = std::env::var("models_path") {
            config.models_path = PathBuf::from(models_path);
        }

        // Lazy loading is on unless explicitly disabled.
        if let Ok(lazy) = std::env::var("load_models_lazy") {
            config.load_models_lazy = lazy.to_lowercase() != "false";
        }

        Ok(config)
    }
}
