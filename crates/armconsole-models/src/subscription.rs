//! Subscriptions.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SubscriptionId
// ---------------------------------------------------------------------------

/// Identifier of an Azure subscription (a GUID string).
///
/// # Examples
///
/// ```
/// use armconsole_models::SubscriptionId;
///
/// let id = SubscriptionId::new("00000000-0000-0000-0000-000000000001");
/// assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000001");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    /// Create a new `SubscriptionId` from a string slice.
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Return the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubscriptionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SubscriptionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// A subscription visible to the authenticated principal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Fully qualified id (`/subscriptions/{id}`).
    pub id: String,
    /// Bare subscription id.
    pub subscription_id: SubscriptionId,
    /// Human readable name.
    #[serde(default)]
    pub display_name: String,
    /// Subscription state (`Enabled`, `Disabled`, ...).
    #[serde(default)]
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_id_display_and_equality() {
        let a = SubscriptionId::new("abc");
        let b: SubscriptionId = "abc".into();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "abc");
    }

    #[test]
    fn subscription_from_arm_json() {
        let json = r#"{
            "id": "/subscriptions/sub-1",
            "subscriptionId": "sub-1",
            "displayName": "Pay-As-You-Go",
            "state": "Enabled",
            "tenantId": "ignored"
        }"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub.subscription_id, SubscriptionId::new("sub-1"));
        assert_eq!(sub.display_name, "Pay-As-You-Go");
    }
}
