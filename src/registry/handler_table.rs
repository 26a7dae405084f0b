//! Static dispatch table from job-function name to handler.
//!
//! Registration happens once at startup before serving begins; the table is
//! never mutated afterward, so concurrent resolution needs no
//! synchronization.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::error::{Result, ServiceError};
use crate::execution::types::{JobHandler, SharedJobHandler};

/// Immutable name-to-handler mapping.
#[derive(Default)]
pub struct HandlerTable {
    handlers: HashMap<String, SharedJobHandler>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a function name.
    ///
    /// Takes `&mut self`: registration is only possible before the table is
    /// handed to the service façade. A duplicate name replaces the previous
    /// handler.
    pub fn register(&mut self, function: impl Into<String>, handler: impl JobHandler + 'static) {
        let function = function.into();
        info!("Registered handler for function '{}'", function);
        self.handlers.insert(function, Arc::new(handler));
    }

    /// Resolve the handler for a function name.
    pub fn resolve(&self, function: &str) -> Result<SharedJobHandler> {
        self.handlers
            .get(function)
            .cloned()
            .ok_or_else(|| ServiceError::UnsupportedFunction {
                function: function.to_string(),
            })
    }

    /// All registered function names, for service discovery.
    pub fn function_names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
