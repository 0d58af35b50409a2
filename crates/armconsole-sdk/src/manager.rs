//! The resource-management operations the console drives.

use armconsole_models::{Deployment, ResourceGroup};
use serde_json::Value;

use crate::error::SdkError;

/// Resource-group lifecycle and template deployment within one subscription.
///
/// Implemented by [`ArmClient`](crate::ArmClient) for the live service;
/// callers take it as a generic parameter so tests can pass a fake.
#[allow(async_fn_in_trait)]
pub trait ResourceManager {
    /// Every resource group in the subscription.
    async fn list_resource_groups(&self) -> Result<Vec<ResourceGroup>, SdkError>;

    /// Create `name` in `region`.
    ///
    /// Fails with [`SdkError::ResourceGroupAlreadyExists`] if the group
    /// exists.
    async fn create_resource_group(&self, name: &str, region: &str) -> Result<ResourceGroup, SdkError>;

    /// Start an incremental deployment of `template_json` into
    /// `resource_group` and return its state right after submission.
    ///
    /// Fails with [`SdkError::Deployment`] if the template is not JSON or
    /// the service rejects it.
    async fn deploy_template(
        &self,
        resource_group: &str,
        template_json: &str,
        parameters: &Value,
    ) -> Result<Deployment, SdkError>;

    /// Delete `name` and wait until the service reports completion.
    ///
    /// Fails with [`SdkError::ResourceGroupNotFound`] if it does not exist.
    async fn delete_resource_group(&self, name: &str) -> Result<(), SdkError>;
}
