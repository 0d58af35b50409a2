//! Error responses of the mock service.
//!
//! [`MockError`] renders as a Resource Manager error body so clients see
//! the same shape the real service sends.

use armconsole_models::{
    ErrorResponse, CODE_INVALID_TEMPLATE, CODE_RESOURCE_GROUP_NOT_FOUND,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// A failed mock call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockError {
    /// HTTP status to answer with.
    pub status: StatusCode,
    /// ARM error body.
    pub body: ErrorResponse,
}

impl MockError {
    /// Error with an arbitrary status and code.
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse::new(code, message),
        }
    }

    /// Missing or unknown bearer token.
    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "AuthenticationFailed",
            "Authentication failed. The 'Authorization' header is missing or invalid.",
        )
    }

    /// Unknown subscription.
    pub fn subscription_not_found(subscription: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "SubscriptionNotFound",
            format!("The subscription '{subscription}' could not be found."),
        )
    }

    /// Unknown resource group.
    pub fn resource_group_not_found(name: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            CODE_RESOURCE_GROUP_NOT_FOUND,
            format!("Resource group '{name}' could not be found."),
        )
    }

    /// Template rejected.
    pub fn invalid_template(reason: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            CODE_INVALID_TEMPLATE,
            format!("Deployment template validation failed: '{reason}'."),
        )
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        tracing::warn!(status = %self.status, code = %self.body.error.code, "request failed");
        (self.status, Json(self.body)).into_response()
    }
}
