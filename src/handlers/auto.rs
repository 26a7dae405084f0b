//! The `auto` function: runs a battery of steganalysis methods against the
//! payload and reports one probability per method.
//!
//! The detection algorithms themselves live behind [`AutoAnalyzer`]; this
//! handler owns only the job-facing shape (field names and error mapping).

use std::sync::Arc;

use crate::error::Result;
use crate::execution::types::{Job, JobHandler, JobResult, ResponseFields};

/// Per-method predictions produced by one automatic analysis pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AutoPredictions {
    pub outguess_pred: f64,
    pub steghide_pred: f64,
    pub nsf5_pred: f64,
    pub juniward_pred: f64,
    pub lsbr_pred: f64,
    pub lsbm_pred: f64,
    pub steganogan_pred: f64,
    pub uniward_pred: f64,
}

impl AutoPredictions {
    /// Response fields keyed by the names the service descriptor declares.
    pub fn into_fields(self) -> ResponseFields {
        let mut fields = ResponseFields::new();
        fields.insert("outguess_pred".to_string(), serde_json::json!(self.outguess_pred));
        fields.insert("steghide_pred".to_string(), serde_json::json!(self.steghide_pred));
        fields.insert("nsf5_pred".to_string(), serde_json::json!(self.nsf5_pred));
        fields.insert("juniward_pred".to_string(), serde_json::json!(self.juniward_pred));
        fields.insert("lsbr_pred".to_string(), serde_json::json!(self.lsbr_pred));
        fields.insert("lsbm_pred".to_string(), serde_json::json!(self.lsbm_pred));
        fields.insert("steganogan_pred".to_string(), serde_json::json!(self.steganogan_pred));
        fields.insert("uniward_pred".to_string(), serde_json::json!(self.uniward_pred));
        fields
    }
}

/// The battery of steganalysis heuristics behind the `auto` function.
///
/// Implementations may block; handler bodies run on the worker pool.
pub trait AutoAnalyzer: Send + Sync {
    fn analyze(&self, payload: &[u8]) -> Result<AutoPredictions>;
}

/// Handler wiring an [`AutoAnalyzer`] into the job contract.
pub struct AutoHandler {
    analyzer: Arc<dyn AutoAnalyzer>,
}

impl AutoHandler {
    pub fn new(analyzer: Arc<dyn AutoAnalyzer>) -> Self {
        Self { analyzer }
    }
}

impl JobHandler for AutoHandler {
    fn call(&self, job: &Job) -> JobResult {
        self.analyzer
            .analyze(&job.payload)
            .map(AutoPredictions::into_fields)
            .into()
    }
}
