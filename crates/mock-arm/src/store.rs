//! In-memory resource state.
//!
//! Resource-group names are case-insensitive in Resource Manager, so every
//! lookup key is lower-cased while the stored group keeps its original
//! spelling.

use std::collections::{BTreeMap, HashMap};

use armconsole_models::{
    Deployment, DeploymentMode, DeploymentProperties, ResourceGroup, ResourceGroupProperties,
    Subscription,
};
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::config::MockConfig;
use crate::error::MockError;

type GroupKey = (String, String);
type DeploymentKey = (String, String, String);

struct Operation {
    group: GroupKey,
    remaining_polls: u32,
}

/// Mutable state behind the mock endpoints.
pub struct Store {
    config: MockConfig,
    groups: BTreeMap<GroupKey, ResourceGroup>,
    deployments: HashMap<DeploymentKey, Deployment>,
    operations: HashMap<String, Operation>,
}

fn group_key(subscription: &str, name: &str) -> GroupKey {
    (subscription.to_string(), name.to_lowercase())
}

impl Store {
    /// Empty store.
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            groups: BTreeMap::new(),
            deployments: HashMap::new(),
            operations: HashMap::new(),
        }
    }

    /// The configuration this store was built with.
    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    // -- subscriptions ------------------------------------------------------

    /// Visible subscriptions.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.config
            .subscriptions
            .iter()
            .enumerate()
            .map(|(i, id)| Subscription {
                id: format!("/subscriptions/{id}"),
                subscription_id: id.clone(),
                display_name: format!("Mock Subscription {}", i + 1),
                state: "Enabled".to_string(),
            })
            .collect()
    }

    /// Fail unless `subscription` is configured.
    pub fn require_subscription(&self, subscription: &str) -> Result<(), MockError> {
        if self.config.subscriptions.iter().any(|s| s.as_str() == subscription) {
            Ok(())
        } else {
            Err(MockError::subscription_not_found(subscription))
        }
    }

    // -- resource groups ----------------------------------------------------

    /// Resource groups of a subscription, ordered by lower-cased name.
    pub fn groups(&self, subscription: &str) -> Vec<ResourceGroup> {
        self.groups
            .iter()
            .filter(|((sub, _), _)| sub == subscription)
            .map(|(_, group)| group.clone())
            .collect()
    }

    /// Whether the group exists.
    pub fn group_exists(&self, subscription: &str, name: &str) -> bool {
        self.groups.contains_key(&group_key(subscription, name))
    }

    /// Create or update a group. Returns the group and whether it was new.
    pub fn put_group(&mut self, subscription: &str, name: &str, location: &str) -> (ResourceGroup, bool) {
        let key = group_key(subscription, name);
        if let Some(existing) = self.groups.get_mut(&key) {
            existing.location = location.to_string();
            return (existing.clone(), false);
        }
        let group = ResourceGroup {
            id: format!("/subscriptions/{subscription}/resourceGroups/{name}"),
            name: name.to_string(),
            location: location.to_string(),
            properties: ResourceGroupProperties {
                provisioning_state: Some("Succeeded".to_string()),
            },
        };
        self.groups.insert(key, group.clone());
        (group, true)
    }

    /// Mark a group as deleting and register the operation tracking it.
    pub fn begin_delete(&mut self, subscription: &str, name: &str) -> Result<String, MockError> {
        let key = group_key(subscription, name);
        let group = self
            .groups
            .get_mut(&key)
            .ok_or_else(|| MockError::resource_group_not_found(name))?;
        group.properties.provisioning_state = Some("Deleting".to_string());

        let operation_id = Uuid::new_v4().to_string();
        self.operations.insert(
            operation_id.clone(),
            Operation {
                group: key,
                remaining_polls: self.config.polls_before_done,
            },
        );
        Ok(operation_id)
    }

    /// Advance an operation by one poll.
    ///
    /// Returns `Some(false)` while running, `Some(true)` once done (the
    /// group and its deployments are gone), `None` for unknown ids.
    pub fn poll_operation(&mut self, operation_id: &str) -> Option<bool> {
        let operation = self.operations.get_mut(operation_id)?;
        if operation.remaining_polls > 0 {
            operation.remaining_polls -= 1;
            return Some(false);
        }
        let operation = self.operations.remove(operation_id)?;
        self.groups.remove(&operation.group);
        let (subscription, group) = operation.group;
        self.deployments
            .retain(|(sub, rg, _), _| !(sub == &subscription && rg == &group));
        Some(true)
    }

    // -- deployments --------------------------------------------------------

    /// Accept a deployment into an existing group.
    pub fn put_deployment(
        &mut self,
        subscription: &str,
        resource_group: &str,
        name: &str,
        template: &Value,
        mode: DeploymentMode,
    ) -> Result<Deployment, MockError> {
        let key = group_key(subscription, resource_group);
        let group = self
            .groups
            .get(&key)
            .ok_or_else(|| MockError::resource_group_not_found(resource_group))?;
        if !template["resources"].is_array() {
            return Err(MockError::invalid_template("template must contain a 'resources' array"));
        }

        let deployment = Deployment {
            id: format!(
                "/subscriptions/{subscription}/resourceGroups/{}/providers/Microsoft.Resources/deployments/{name}",
                group.name
            ),
            name: name.to_string(),
            properties: DeploymentProperties {
                provisioning_state: Some("Accepted".to_string()),
                mode: Some(mode),
                timestamp: Some(Utc::now()),
            },
        };
        self.deployments
            .insert((key.0, key.1, name.to_string()), deployment.clone());
        Ok(deployment)
    }

    /// Look up a deployment.
    pub fn deployment(&self, subscription: &str, resource_group: &str, name: &str) -> Option<&Deployment> {
        let (sub, rg) = group_key(subscription, resource_group);
        self.deployments.get(&(sub, rg, name.to_string()))
    }
}
