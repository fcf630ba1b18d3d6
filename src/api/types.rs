//! API response types.

use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::dispatch::DispatchError;

/// `kind` reported when the payload fails validation.
pub const INVALID_REQUEST: &str = "invalid_request";

/// Error response body for 4xx errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error category.
    pub kind: String,
}

impl From<&DispatchError> for ErrorResponse {
    fn from(e: &DispatchError) -> Self {
        Self {
            error: e.to_string(),
            kind: e.kind().to_string(),
        }
    }
}

impl From<&[ConfigError]> for ErrorResponse {
    fn from(errors: &[ConfigError]) -> Self {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        Self {
            error: messages.join("; "),
            kind: INVALID_REQUEST.to_string(),
        }
    }
}

impl From<&JsonRejection> for ErrorResponse {
    fn from(rejection: &JsonRejection) -> Self {
        Self {
            error: rejection.body_text(),
            kind: INVALID_REQUEST.to_string(),
        }
    }
}
