//! In-memory [`ResourceManager`] for the console tests.

use std::cell::RefCell;

use armconsole_models::{Deployment, DeploymentProperties, ResourceGroup, ResourceGroupProperties};
use armconsole_sdk::{ResourceManager, SdkError};
use serde_json::Value;

pub(crate) const SUB: &str = "00000000-0000-0000-0000-000000000000";

/// Records every call and keeps groups in a `Vec`.
#[derive(Default)]
pub(crate) struct FakeManager {
    pub groups: RefCell<Vec<ResourceGroup>>,
    pub calls: RefCell<Vec<String>>,
    pub parameters: RefCell<Option<Value>>,
    /// Make every call fail with an API error.
    pub offline: bool,
}

impl FakeManager {
    pub fn with_groups(names: &[&str]) -> Self {
        let fake = Self::default();
        for name in names {
            fake.groups.borrow_mut().push(group(name, "westeurope"));
        }
        fake
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<(), SdkError> {
        self.calls.borrow_mut().push(call);
        if self.offline {
            return Err(SdkError::Api {
                status: 503,
                code: "ServiceUnavailable".into(),
                message: "try again later".into(),
            });
        }
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.groups
            .borrow()
            .iter()
            .position(|g| g.name.eq_ignore_ascii_case(name))
    }
}

pub(crate) fn group(name: &str, location: &str) -> ResourceGroup {
    ResourceGroup {
        id: format!("/subscriptions/{SUB}/resourceGroups/{name}"),
        name: name.to_string(),
        location: location.to_string(),
        properties: ResourceGroupProperties {
            provisioning_state: Some("Succeeded".into()),
        },
    }
}

impl ResourceManager for FakeManager {
    async fn list_resource_groups(&self) -> Result<Vec<ResourceGroup>, SdkError> {
        self.record("list".into())?;
        Ok(self.groups.borrow().clone())
    }

    async fn create_resource_group(&self, name: &str, region: &str) -> Result<ResourceGroup, SdkError> {
        self.record(format!("create {name} {region}"))?;
        if self.position(name).is_some() {
            return Err(SdkError::ResourceGroupAlreadyExists(name.to_string()));
        }
        let created = group(name, region);
        self.groups.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn deploy_template(
        &self,
        resource_group: &str,
        template_json: &str,
        parameters: &Value,
    ) -> Result<Deployment, SdkError> {
        self.record(format!("deploy {resource_group}"))?;
        serde_json::from_str::<Value>(template_json)
            .map_err(|e| SdkError::Deployment(format!("template is not valid JSON: {e}")))?;
        if self.position(resource_group).is_none() {
            return Err(SdkError::Deployment(format!(
                "ResourceGroupNotFound: Resource group '{resource_group}' could not be found."
            )));
        }
        *self.parameters.borrow_mut() = Some(parameters.clone());
        Ok(Deployment {
            id: format!("/subscriptions/{SUB}/resourceGroups/{resource_group}/providers/Microsoft.Resources/deployments/Deployment-1"),
            name: "Deployment-1".into(),
            properties: DeploymentProperties {
                provisioning_state: Some("Accepted".into()),
                ..DeploymentProperties::default()
            },
        })
    }

    async fn delete_resource_group(&self, name: &str) -> Result<(), SdkError> {
        self.record(format!("delete {name}"))?;
        let index = self
            .position(name)
            .ok_or_else(|| SdkError::ResourceGroupNotFound(name.to_string()))?;
        self.groups.borrow_mut().remove(index);
        Ok(())
    }
}
