//! Canonical Resource Manager URLs.
//!
//! Every URL the SDK calls is built here, so the REST layout of the
//! service is visible in one place:
//!
//! ```text
//! {rm}/subscriptions?api-version=2020-01-01
//! {rm}/subscriptions/{s}/resourcegroups?api-version=2021-04-01
//! {rm}/subscriptions/{s}/resourcegroups/{rg}?api-version=2021-04-01
//! {rm}/subscriptions/{s}/resourcegroups/{rg}/providers/Microsoft.Resources/deployments/{d}?api-version=2021-04-01
//! ```
//!
//! Names are appended as path segments, so characters such as spaces or
//! `#` are percent-encoded rather than interpreted.

use armconsole_models::SubscriptionId;
use reqwest::Url;

use crate::error::SdkError;

/// API version for subscription listing.
pub const SUBSCRIPTIONS_API_VERSION: &str = "2020-01-01";
/// API version for resource groups and deployments.
pub const RESOURCES_API_VERSION: &str = "2021-04-01";

/// URL builder rooted at a cloud's Resource Manager endpoint.
#[derive(Debug, Clone)]
pub struct ArmPaths {
    base: Url,
}

impl ArmPaths {
    /// Parse the Resource Manager base URL.
    pub fn new(resource_manager: &str) -> Result<Self, SdkError> {
        let base = Url::parse(resource_manager)
            .map_err(|e| SdkError::Config(format!("invalid resource manager URL {resource_manager:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(SdkError::Config(format!(
                "resource manager URL {resource_manager:?} cannot carry a path"
            )));
        }
        Ok(Self { base })
    }

    // -- subscriptions ------------------------------------------------------

    /// `GET` target listing all visible subscriptions.
    pub fn subscriptions(&self) -> Url {
        self.build(&["subscriptions"], SUBSCRIPTIONS_API_VERSION)
    }

    // -- resource groups ----------------------------------------------------

    /// `GET` target listing resource groups of a subscription.
    pub fn resource_groups(&self, subscription: &SubscriptionId) -> Url {
        self.build(
            &["subscriptions", subscription.as_str(), "resourcegroups"],
            RESOURCES_API_VERSION,
        )
    }

    /// `HEAD` / `PUT` / `DELETE` target of a single resource group.
    pub fn resource_group(&self, subscription: &SubscriptionId, name: &str) -> Url {
        self.build(
            &["subscriptions", subscription.as_str(), "resourcegroups", name],
            RESOURCES_API_VERSION,
        )
    }

    // -- deployments --------------------------------------------------------

    /// `PUT` / `GET` target of a deployment within a resource group.
    pub fn deployment(&self, subscription: &SubscriptionId, resource_group: &str, name: &str) -> Url {
        self.build(
            &[
                "subscriptions",
                subscription.as_str(),
                "resourcegroups",
                resource_group,
                "providers",
                "Microsoft.Resources",
                "deployments",
                name,
            ],
            RESOURCES_API_VERSION,
        )
    }

    fn build(&self, segments: &[&str], api_version: &str) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut().append_pair("api-version", api_version);
        url
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
