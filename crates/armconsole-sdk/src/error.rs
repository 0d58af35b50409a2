//! SDK error types.
//!
//! [`SdkError`] is the single error type returned by every fallible
//! operation in the SDK. It wraps transport and serialization errors and
//! classifies the Resource Manager failures the console reports.

/// Error type for all SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Invalid configuration (e.g. an endpoint that is not a URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// The identity authority rejected the service principal.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// No subscription is visible to the authenticated principal.
    #[error("no subscription is available to this service principal")]
    SubscriptionNotFound,

    /// A resource group with this name already exists.
    #[error("the resource group '{0}' already exists")]
    ResourceGroupAlreadyExists(String),

    /// The named resource group does not exist.
    #[error("resource group '{0}' could not be found")]
    ResourceGroupNotFound(String),

    /// Resource Manager refused or could not start the deployment.
    #[error("deployment failed: {0}")]
    Deployment(String),

    /// Any other Resource Manager error response.
    #[error("resource manager returned {status} {code}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// ARM error code, empty when the body was not an ARM error.
        code: String,
        /// Error message or raw body.
        message: String,
    },

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization / deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SdkError {
    /// Whether this error came from the identity authority.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_already_exists() {
        let err = SdkError::ResourceGroupAlreadyExists("rg-demo".into());
        assert_eq!(err.to_string(), "the resource group 'rg-demo' already exists");
    }

    #[test]
    fn display_api_error() {
        let err = SdkError::Api {
            status: 403,
            code: "AuthorizationFailed".into(),
            message: "no access".into(),
        };
        assert_eq!(
            err.to_string(),
            "resource manager returned 403 AuthorizationFailed: no access"
        );
    }

    #[test]
    fn authentication_predicate() {
        assert!(SdkError::Authentication("bad secret".into()).is_authentication());
        assert!(!SdkError::SubscriptionNotFound.is_authentication());
    }
}
