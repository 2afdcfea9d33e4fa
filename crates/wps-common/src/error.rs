//! Error types for the NAME WPS services.

use thiserror::Error;

/// Primary error type for WPS process operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WpsError {
    // === Input Validation Errors ===
    /// A structured field (range list, domain) failed shape or parse validation.
    #[error("{expected}")]
    InvalidInput { value: String, expected: String },

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Protocol Errors ===
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Operation not supported: {0}")]
    OperationNotSupported(String),

    // === Collaborator Errors ===
    /// The input-file generator or the model runner failed.
    #[error("Process failed: {0}")]
    CollaboratorFailure(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl WpsError {
    /// Build an `InvalidInput` error for an offending raw value.
    pub fn invalid_input(value: impl Into<String>, expected: impl Into<String>) -> Self {
        WpsError::InvalidInput {
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Build an `InvalidParameter` error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        WpsError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Get the OGC WPS exception code for this error.
    pub fn wps_exception_code(&self) -> &'static str {
        match self {
            WpsError::InvalidInput { .. } | WpsError::InvalidParameter { .. } => {
                "InvalidParameterValue"
            }
            WpsError::MissingParameter(_) => "MissingParameterValue",
            WpsError::ProcessNotFound(_) => "InvalidParameterValue",
            WpsError::OperationNotSupported(_) => "OperationNotSupported",
            _ => "NoApplicableCode",
        }
    }

    /// Get the exception locator (the offending parameter or value), if any.
    pub fn locator(&self) -> Option<&str> {
        match self {
            WpsError::InvalidInput { value, .. } => Some(value),
            WpsError::InvalidParameter { param, .. } => Some(param),
            WpsError::MissingParameter(param) => Some(param),
            WpsError::ProcessNotFound(_) => Some("identifier"),
            WpsError::OperationNotSupported(op) => Some(op),
            _ => None,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            WpsError::InvalidInput { .. }
            | WpsError::MissingParameter(_)
            | WpsError::InvalidParameter { .. } => 400,

            WpsError::ProcessNotFound(_) => 404,

            WpsError::OperationNotSupported(_) => 501,

            _ => 500,
        }
    }

    /// True for errors raised before any collaborator was invoked.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            WpsError::InvalidInput { .. }
                | WpsError::MissingParameter(_)
                | WpsError::InvalidParameter { .. }
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for WpsError {
    fn from(err: std::io::Error) -> Self {
        WpsError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for WpsError {
    fn from(err: serde_json::Error) -> Self {
        WpsError::InternalError(format!("JSON error: {}", err))
    }
}
