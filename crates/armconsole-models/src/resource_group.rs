//! Resource groups and paged list responses.

use serde::{Deserialize, Serialize};

/// Provisioning state reported when the service omits one.
pub const UNKNOWN_STATE: &str = "Unknown";

// ---------------------------------------------------------------------------
// ResourceGroup
// ---------------------------------------------------------------------------

/// A resource group as returned by Resource Manager.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroup {
    /// Fully qualified id (`/subscriptions/{s}/resourceGroups/{name}`).
    pub id: String,
    /// Resource group name.
    pub name: String,
    /// Region the group metadata lives in.
    pub location: String,
    /// Service-side properties.
    #[serde(default)]
    pub properties: ResourceGroupProperties,
}

/// The `properties` object of a [`ResourceGroup`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupProperties {
    /// `Succeeded`, `Deleting`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

impl ResourceGroup {
    /// Provisioning state, or [`UNKNOWN_STATE`] when the service sent none.
    pub fn provisioning_state(&self) -> &str {
        self.properties
            .provisioning_state
            .as_deref()
            .unwrap_or(UNKNOWN_STATE)
    }
}

/// Body of a resource group `PUT`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateResourceGroupRequest {
    /// Target region (e.g. `westeurope`).
    pub location: String,
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// One page of a Resource Manager list response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    /// Absolute URL of the next page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}
