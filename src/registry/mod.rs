//! # Registry Infrastructure
//!
//! The two lookup tables behind the execution engine.
//!
//! ## Overview
//!
//! - **HandlerTable**: static mapping from job-function name to handler,
//!   built once before serving begins; pure dispatch, no state.
//! - **ModelRegistry**: mapping from model name to lazily constructed model
//!   instance; thread-safe get-or-create with at-most-once construction per
//!   name.
//!
//! ## Architecture
//!
//! ```text
//! Registry Infrastructure
//! ├── HandlerTable     (function name -> JobHandler, immutable)
//! └── ModelRegistry    (model name -> lazy Arc<Model>, once per name)
//! ```

pub mod handler_table;
pub mod model_registry;

// Re-export main types for easy access
pub use handler_table::HandlerTable;
pub use model_registry::{
    FileModelLoader, Model, ModelLoader, ModelRegistry, MODEL_FILE_EXTENSION,
};
