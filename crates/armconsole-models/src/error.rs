//! Resource Manager error bodies.
//!
//! Failed ARM calls answer with `{"error": {"code": ..., "message": ...}}`.

use serde::{Deserialize, Serialize};

/// Error code for a create against an existing group.
pub const CODE_RESOURCE_GROUP_EXISTS: &str = "ResourceGroupAlreadyExists";
/// Error code for an operation on a missing group.
pub const CODE_RESOURCE_GROUP_NOT_FOUND: &str = "ResourceGroupNotFound";
/// Error code for a rejected deployment.
pub const CODE_INVALID_TEMPLATE: &str = "InvalidTemplate";

/// Top-level ARM error response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    /// The error payload.
    pub error: ErrorDetail,
}

/// Code and message of an ARM error.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Machine-readable code (e.g. `ResourceGroupNotFound`).
    pub code: String,
    /// Human-readable explanation.
    pub message: String,
}

impl ErrorResponse {
    /// Build an error body.
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }
}
