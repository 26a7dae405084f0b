//! The `effnetb0_predict` function: runs a named pre-trained model against
//! the payload and returns a single stego probability.
//!
//! Model selection and registry access happen here; the network inference
//! itself lives behind [`ModelInference`]. Registry failures (unknown name,
//! failed load) surface as ordinary handler failures.

use std::sync::Arc;

use crate::error::Result;
use crate::execution::types::{Job, JobHandler, JobResult, ResponseFields};
use crate::registry::{Model, ModelRegistry};

/// Inference backend for a loaded model blob.
pub trait ModelInference: Send + Sync {
    fn predict(&self, model: &Model, payload: &[u8]) -> Result<f64>;
}

/// Handler for prediction on a pre-trained effnetb0 model.
pub struct EffnetB0Handler {
    registry: Arc<ModelRegistry>,
    inference: Arc<dyn ModelInference>,
}

impl EffnetB0Handler {
    pub fn new(registry: Arc<ModelRegistry>, inference: Arc<dyn ModelInference>) -> Self {
        Self {
            registry,
            inference,
        }
    }

    fn predict(&self, job: &Job) -> Result<ResponseFields> {
        let model_name = job.required_parameter("model_name")?;
        let model = self.registry.get(model_name)?;
        let pred = self.inference.predict(&model, &job.payload)?;

        let mut fields = ResponseFields::new();
        fields.insert("pred".to_string(), serde_json::json!(pred));
        Ok(fields)
    }
}

impl JobHandler for EffnetB0Handler {
    fn call(&self, job: &Job) -> JobResult {
        self.predict(job).into()
    }
}
