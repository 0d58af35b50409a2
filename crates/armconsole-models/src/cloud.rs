//! Cloud environments.
//!
//! A [`CloudEnvironment`] names one of the Azure clouds the console can
//! talk to. Each cloud has its own identity authority and Resource Manager
//! endpoint, bundled together as [`CloudEndpoints`].

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CloudEnvironment
// ---------------------------------------------------------------------------

/// The Azure cloud to authenticate against.
///
/// # Examples
///
/// ```
/// use armconsole_models::CloudEnvironment;
///
/// assert_eq!(CloudEnvironment::from_selector("german"), CloudEnvironment::German);
/// assert_eq!(CloudEnvironment::from_selector(""), CloudEnvironment::Global);
/// ```
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CloudEnvironment {
    /// The global (public) Azure cloud.
    #[default]
    Global,
    /// The German sovereign cloud.
    German,
}

impl CloudEnvironment {
    /// Map the operator's selector string to a cloud.
    ///
    /// Only the exact string `"german"` selects [`German`](Self::German);
    /// anything else, including an empty answer, selects the global cloud.
    pub fn from_selector(selector: &str) -> Self {
        selector.trim().parse().unwrap_or_default()
    }

    /// Default endpoints of this cloud.
    pub fn endpoints(self) -> CloudEndpoints {
        match self {
            Self::Global => CloudEndpoints {
                authority_host: "https://login.microsoftonline.com".into(),
                resource_manager: "https://management.azure.com/".into(),
            },
            Self::German => CloudEndpoints {
                authority_host: "https://login.microsoftonline.de".into(),
                resource_manager: "https://management.microsoftazure.de/".into(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// CloudEndpoints
// ---------------------------------------------------------------------------

/// Identity and Resource Manager endpoints of one cloud.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CloudEndpoints {
    /// Base URL of the identity authority (e.g. `https://login.microsoftonline.com`).
    pub authority_host: String,
    /// Base URL of Resource Manager; also the token audience.
    pub resource_manager: String,
}

impl CloudEndpoints {
    /// Replace either endpoint when an override is given.
    #[must_use]
    pub fn with_overrides(
        mut self,
        authority_host: Option<String>,
        resource_manager: Option<String>,
    ) -> Self {
        if let Some(authority_host) = authority_host {
            self.authority_host = authority_host;
        }
        if let Some(resource_manager) = resource_manager {
            self.resource_manager = resource_manager;
        }
        self
    }

    /// Token endpoint for `tenant_id`.
    pub fn token_url(&self, tenant_id: &str) -> String {
        format!(
            "{}/{}/oauth2/token",
            self.authority_host.trim_end_matches('/'),
            tenant_id
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
