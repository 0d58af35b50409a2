//! Template deployments.
//!
//! A deployment submits an ARM template plus a parameter object to a
//! resource group. The console only ever deploys in
//! [`DeploymentMode::Incremental`] and supplies VM admin credentials as
//! parameters ([`VmParameters`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use zeroize::{Zeroize, Zeroizing};

use crate::resource_group::UNKNOWN_STATE;

/// Prefix of generated deployment names.
pub const DEPLOYMENT_NAME_PREFIX: &str = "Deployment-";

// ---------------------------------------------------------------------------
// DeploymentMode
// ---------------------------------------------------------------------------

/// How Resource Manager reconciles the template with existing resources.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
pub enum DeploymentMode {
    /// Add or update the template's resources, leave others alone.
    #[default]
    Incremental,
    /// Delete resources that are not in the template.
    Complete,
}

// ---------------------------------------------------------------------------
// Deployment
// ---------------------------------------------------------------------------

/// A deployment as returned by Resource Manager.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Deployment {
    /// Fully qualified deployment id.
    pub id: String,
    /// Deployment name.
    pub name: String,
    /// Service-side properties.
    #[serde(default)]
    pub properties: DeploymentProperties,
}

/// The `properties` object of a [`Deployment`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentProperties {
    /// `Accepted`, `Running`, `Succeeded`, `Failed`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
    /// Mode the deployment was submitted with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<DeploymentMode>,
    /// Last state change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Deployment {
    /// Provisioning state, or `"Unknown"` when the service sent none.
    pub fn provisioning_state(&self) -> &str {
        self.properties
            .provisioning_state
            .as_deref()
            .unwrap_or(UNKNOWN_STATE)
    }
}

/// Body of a deployment `PUT`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DeploymentRequest {
    /// Template, parameters and mode.
    pub properties: DeploymentRequestProperties,
}

/// The `properties` object of a [`DeploymentRequest`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DeploymentRequestProperties {
    /// Reconciliation mode.
    pub mode: DeploymentMode,
    /// The template document.
    pub template: Value,
    /// Parameter values in ARM form (`{"name": {"value": ...}}`).
    pub parameters: Value,
}

impl DeploymentRequest {
    /// Incremental deployment of `template` with `parameters`.
    pub fn incremental(template: Value, parameters: Value) -> Self {
        Self {
            properties: DeploymentRequestProperties {
                mode: DeploymentMode::Incremental,
                template,
                parameters,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// VmParameters
// ---------------------------------------------------------------------------

/// Admin credentials handed to a VM template.
pub struct VmParameters {
    /// Value of the template's `adminUsername` parameter.
    pub admin_username: String,
    /// Value of the template's `adminPassword` parameter.
    pub admin_password: Zeroizing<String>,
}

impl VmParameters {
    /// Create the parameter set.
    pub fn new(admin_username: &str, admin_password: Zeroizing<String>) -> Self {
        Self {
            admin_username: admin_username.to_string(),
            admin_password,
        }
    }

    /// Render as an ARM parameter object.
    pub fn to_arm_parameters(&self) -> ArmParameters {
        ArmParameters(json!({
            "adminUsername": { "value": self.admin_username },
            "adminPassword": { "value": self.admin_password.as_str() },
        }))
    }
}

/// An ARM parameter object holding secrets. Its strings are wiped on drop.
#[derive(Debug)]
pub struct ArmParameters(Value);

impl std::ops::Deref for ArmParameters {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.0
    }
}

impl Drop for ArmParameters {
    fn drop(&mut self) {
        scrub_strings(&mut self.0);
    }
}

/// Zero every string in `value`, in place. Keys are left alone.
pub fn scrub_strings(value: &mut Value) {
    match value {
        Value::String(s) => s.zeroize(),
        Value::Array(items) => items.iter_mut().for_each(scrub_strings),
        Value::Object(map) => map.values_mut().for_each(scrub_strings),
        _ => {}
    }
}
