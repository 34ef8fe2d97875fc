//! Uniform response envelope.
//!
//! Every endpoint, success or failure, answers with the same
//! `{success, message, data, errors}` shape so clients inspect one contract.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wire envelope wrapping every API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable outcome summary.
    pub message: String,
    /// Payload on success; `null` otherwise.
    pub data: Option<T>,
    /// Caller-facing error strings; empty on success.
    pub errors: Vec<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope carrying a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// Successful envelope without a payload (delete confirmations).
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            errors: Vec::new(),
        }
    }

    /// Failed envelope with caller-facing error strings.
    pub fn failure(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors,
        }
    }
}
