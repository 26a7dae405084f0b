//! Service-metadata types advertised through the discovery operation.
//!
//! Enumerates the supported function names, their declared return fields,
//! accepted parameters, and supported file types. Consumed by clients for
//! discovery; the execution engine itself never reads these.

use serde::{Deserialize, Serialize};

/// Wire-level type of a return field or parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Float,
    Int,
    String,
    Bool,
}

/// One named field a function promises to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnFieldDef {
    pub name: String,
    /// Human-readable label for client UIs.
    pub label: String,
    pub field_type: FieldType,
    pub description: String,
}

/// One parameter a function accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDef {
    pub name: String,
    pub description: String,
    pub optional: bool,
    pub param_type: FieldType,
}

/// Declared surface of one job function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub description: String,
    pub return_fields: Vec<ReturnFieldDef>,
    pub parameters: Vec<ParameterDef>,
    pub supported_file_types: Vec<String>,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            return_fields: Vec::new(),
            parameters: Vec::new(),
            supported_file_types: Vec::new(),
        }
    }

    pub fn with_return_field(
        mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        field_type: FieldType,
        description: impl Into<String>,
    ) -> Self {
        self.return_fields.push(ReturnFieldDef {
            name: name.into(),
            label: label.into(),
            field_type,
            description: description.into(),
        });
        self
    }

    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        optional: bool,
        param_type: FieldType,
    ) -> Self {
        self.parameters.push(ParameterDef {
            name: name.into(),
            description: description.into(),
            optional,
            param_type,
        });
        self
    }

    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.supported_file_types.push(file_type.into());
        self
    }
}

/// Full service advertisement: name, description, and function surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub description: String,
    pub functions: Vec<FunctionDescriptor>,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            functions: Vec::new(),
        }
    }

    pub fn with_function(mut self, function: FunctionDescriptor) -> Self {
        self.functions.push(function);
        self
    }

    /// Look up one function's declared surface.
    pub fn function(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn function_names(&self) -> Vec<&str> {
        self.functions.iter().map(|f| f.name.as_str()).collect()
    }
}
