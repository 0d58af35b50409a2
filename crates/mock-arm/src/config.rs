//! Mock service configuration.

use armconsole_models::SubscriptionId;

/// Settings of one mock instance.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Port to listen on (default `4010`).
    pub listen_port: u16,
    /// The only client secret the token endpoint accepts.
    pub client_secret: String,
    /// Subscriptions visible to every principal, default first.
    pub subscriptions: Vec<SubscriptionId>,
    /// Resource groups per list page.
    pub page_size: usize,
    /// Operation polls answered with `202` before a delete completes.
    pub polls_before_done: u32,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            listen_port: 4010,
            client_secret: "mock-secret".to_string(),
            subscriptions: vec![SubscriptionId::new("00000000-0000-0000-0000-000000000000")],
            page_size: 50,
            polls_before_done: 1,
        }
    }
}

impl MockConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable                 | Default                                | Description                |
    /// |--------------------------|----------------------------------------|----------------------------|
    /// | `MOCK_ARM_PORT`          | `4010`                                 | HTTP listen port           |
    /// | `MOCK_ARM_CLIENT_SECRET` | `mock-secret`                          | Accepted client secret     |
    /// | `MOCK_ARM_SUBSCRIPTION`  | `00000000-0000-0000-0000-000000000000` | Default subscription id    |
    /// | `MOCK_ARM_PAGE_SIZE`     | `50`                                   | Resource groups per page   |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let listen_port = std::env::var("MOCK_ARM_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.listen_port);
        let client_secret = std::env::var("MOCK_ARM_CLIENT_SECRET").unwrap_or(defaults.client_secret);
        let subscriptions = std::env::var("MOCK_ARM_SUBSCRIPTION")
            .map(|id| vec![SubscriptionId::from(id)])
            .unwrap_or(defaults.subscriptions);
        let page_size = std::env::var("MOCK_ARM_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|size| *size > 0)
            .unwrap_or(defaults.page_size);

        Self {
            listen_port,
            client_secret,
            subscriptions,
            page_size,
            polls_before_done: defaults.polls_before_done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listen_port() {
        assert_eq!(MockConfig::default().listen_port, 4010);
    }

    #[test]
    fn default_has_one_subscription() {
        let cfg = MockConfig::default();
        assert_eq!(cfg.subscriptions.len(), 1);
        assert!(cfg.page_size > 0);
    }
}
