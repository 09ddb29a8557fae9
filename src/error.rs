//! Error types for the object model runtime

use thiserror::Error;

/// Main error type for the runtime.
///
/// Every fallible object-model operation returns one of these; the external
/// statement evaluator maps them onto script-level exception handling. The
/// total conversions (`to_boolean`, `to_number`, `to_js_string`) never
/// produce them.
#[derive(Debug, Error)]
pub enum JsError {
    #[error("TypeError: {message}")]
    TypeError { message: String },

    #[error("RangeError: {message}")]
    RangeError { message: String },

    #[error("ReferenceError: {name} is not defined")]
    ReferenceError { name: String },

    #[error("{kind}: {message}")]
    RuntimeError { kind: String, message: String },
}

impl JsError {
    pub fn type_error(message: impl Into<String>) -> Self {
        JsError::TypeError {
            message: message.into(),
        }
    }

    pub fn range_error(message: impl Into<String>) -> Self {
        JsError::RangeError {
            message: message.into(),
        }
    }

    pub fn reference_error(name: impl Into<String>) -> Self {
        JsError::ReferenceError { name: name.into() }
    }

    pub fn runtime_error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        JsError::RuntimeError {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// The error-class name exposed to scripts ("TypeError", "RangeError", ...).
    pub fn kind(&self) -> &str {
        match self {
            JsError::TypeError { .. } => "TypeError",
            JsError::RangeError { .. } => "RangeError",
            JsError::ReferenceError { .. } => "ReferenceError",
            JsError::RuntimeError { kind, .. } => kind,
        }
    }
}
