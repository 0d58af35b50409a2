//! Service-principal credential set.
//!
//! The values are passed through to the identity authority untouched. The
//! client secret lives in a [`Zeroizing`] buffer and never shows up in
//! `Debug` output.

use std::fmt;

use zeroize::Zeroizing;

use crate::cloud::CloudEnvironment;
use crate::subscription::SubscriptionId;

/// Credentials of an Azure AD app registration (service principal).
#[derive(Clone)]
pub struct Credentials {
    /// Application (client) id of the app registration.
    pub client_id: String,
    /// Client secret of the app registration.
    pub client_secret: Zeroizing<String>,
    /// Directory (tenant) id.
    pub tenant_id: String,
    /// Subscription to work in; `None` selects the default subscription.
    pub subscription_id: Option<SubscriptionId>,
    /// Cloud to authenticate against.
    pub cloud: CloudEnvironment,
}

impl Credentials {
    /// Build a credential set from raw operator answers.
    ///
    /// A blank subscription answer becomes `None`.
    pub fn new(
        client_id: &str,
        client_secret: Zeroizing<String>,
        tenant_id: &str,
        subscription_id: &str,
        cloud: CloudEnvironment,
    ) -> Self {
        let subscription_id = subscription_id.trim();
        Self {
            client_id: client_id.trim().to_string(),
            client_secret,
            tenant_id: tenant_id.trim().to_string(),
            subscription_id: (!subscription_id.is_empty()).then(|| SubscriptionId::new(subscription_id)),
            cloud,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .field("subscription_id", &self.subscription_id)
            .field("cloud", &self.cloud)
            .finish()
    }
}
