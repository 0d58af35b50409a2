//! Service-principal authentication.
//!
//! Exchanges client credentials for a Resource Manager access token
//! (OAuth2 client-credentials grant) and selects the subscription to work
//! in.

use std::time::{Duration, Instant};

use armconsole_models::{CloudEndpoints, Credentials, Page, Subscription, SubscriptionId};
use serde_json::Value;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::client::{ArmClient, ClientOptions, Transport};
use crate::error::SdkError;

/// Lifetime assumed when the authority omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Tokens this close to expiry are refreshed before use.
const EXPIRY_SKEW: Duration = Duration::from_secs(300);

// ---------------------------------------------------------------------------
// AccessToken
// ---------------------------------------------------------------------------

/// A bearer token for Resource Manager.
pub struct AccessToken {
    secret: Zeroizing<String>,
    expires_at: Instant,
}

impl AccessToken {
    /// Wrap a token valid for `lifetime` from now.
    pub fn new(secret: String, lifetime: Duration) -> Self {
        Self {
            secret: Zeroizing::new(secret),
            expires_at: Instant::now() + lifetime,
        }
    }

    /// The raw bearer value.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Whether the token should be replaced before the next call.
    pub fn needs_refresh(&self) -> bool {
        Instant::now() + EXPIRY_SKEW >= self.expires_at
    }
}

/// Request a Resource Manager token for `credentials`.
///
/// Sends the client-credentials grant to the tenant's token endpoint with
/// the Resource Manager URL as `resource`.
pub async fn acquire_token(
    http: &reqwest::Client,
    credentials: &Credentials,
    endpoints: &CloudEndpoints,
) -> Result<AccessToken, SdkError> {
    let token_url = endpoints.token_url(&credentials.tenant_id);
    debug!(%token_url, client_id = %credentials.client_id, "requesting access token");

    let res = http
        .post(&token_url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("resource", endpoints.resource_manager.as_str()),
        ])
        .send()
        .await?;

    if !res.status().is_success() {
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        return Err(SdkError::Authentication(describe_token_error(status, &text)));
    }

    let body: Value = res.json().await?;
    let access_token = body["access_token"]
        .as_str()
        .ok_or_else(|| SdkError::Authentication("missing `access_token` in token response".into()))?
        .to_string();

    let lifetime = parse_expires_in(&body["expires_in"]).unwrap_or(DEFAULT_TOKEN_LIFETIME);
    Ok(AccessToken::new(access_token, lifetime))
}

/// `expires_in` is a number on v2 endpoints and a numeric string on v1.
fn parse_expires_in(value: &Value) -> Option<Duration> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
    .map(Duration::from_secs)
}

/// Prefer the authority's `error_description`, fall back to the raw body.
fn describe_token_error(status: reqwest::StatusCode, text: &str) -> String {
    let description = serde_json::from_str::<Value>(text).ok().and_then(|body| {
        body["error_description"]
            .as_str()
            .or_else(|| body["error"].as_str())
            .map(String::from)
    });
    match description {
        Some(description) => format!("{status}: {description}"),
        None if text.is_empty() => status.to_string(),
        None => format!("{status}: {text}"),
    }
}

// ---------------------------------------------------------------------------
// ArmSession
// ---------------------------------------------------------------------------

/// A service principal authenticated against one cloud, not yet bound to a
/// subscription.
pub struct ArmSession {
    transport: Transport,
}

impl ArmSession {
    /// Authenticate `credentials` against `endpoints`.
    ///
    /// Fails with [`SdkError::Authentication`] when the authority rejects
    /// the client id / secret / tenant combination.
    pub async fn authenticate(
        credentials: &Credentials,
        endpoints: &CloudEndpoints,
        options: &ClientOptions,
    ) -> Result<Self, SdkError> {
        let transport = Transport::connect(credentials.clone(), endpoints.clone(), options.clone()).await?;
        info!(
            tenant = %credentials.tenant_id,
            cloud = %credentials.cloud,
            "service principal authenticated"
        );
        Ok(Self { transport })
    }

    /// All subscriptions visible to the principal.
    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>, SdkError> {
        let url = self.transport.paths().subscriptions();
        let mut subscriptions = Vec::new();
        let mut next = Some(url);
        while let Some(url) = next {
            let page: Page<Subscription> = self.transport.get_json(url).await?;
            subscriptions.extend(page.value);
            next = self.transport.next_link(page.next_link)?;
        }
        Ok(subscriptions)
    }

    /// Bind the session to a subscription.
    ///
    /// With `None` the first subscription the principal can see is used,
    /// failing with [`SdkError::SubscriptionNotFound`] if there is none.
    pub async fn with_subscription(
        self,
        subscription: Option<&SubscriptionId>,
    ) -> Result<ArmClient, SdkError> {
        let subscription = match subscription {
            Some(id) => id.clone(),
            None => {
                let default = self
                    .list_subscriptions()
                    .await?
                    .into_iter()
                    .next()
                    .ok_or(SdkError::SubscriptionNotFound)?;
                info!(
                    subscription = %default.subscription_id,
                    name = %default.display_name,
                    "using default subscription"
                );
                default.subscription_id
            }
        };
        Ok(ArmClient::new(self.transport, subscription))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expires_in_number_or_string() {
        assert_eq!(parse_expires_in(&json!(3599)), Some(Duration::from_secs(3599)));
        assert_eq!(parse_expires_in(&json!("3599")), Some(Duration::from_secs(3599)));
        assert_eq!(parse_expires_in(&json!("soon")), None);
        assert_eq!(parse_expires_in(&Value::Null), None);
    }

    #[test]
    fn token_error_prefers_description() {
        let body = r#"{"error":"invalid_client","error_description":"AADSTS7000215: Invalid client secret provided."}"#;
        let msg = describe_token_error(reqwest::StatusCode::UNAUTHORIZED, body);
        assert_eq!(msg, "401 Unauthorized: AADSTS7000215: Invalid client secret provided.");
    }

    #[test]
    fn token_error_falls_back_to_body() {
        let msg = describe_token_error(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(msg, "502 Bad Gateway: upstream down");
        let msg = describe_token_error(reqwest::StatusCode::BAD_GATEWAY, "");
        assert_eq!(msg, "502 Bad Gateway");
    }

    #[test]
    fn fresh_token_does_not_need_refresh() {
        let token = AccessToken::new("t".into(), Duration::from_secs(3600));
        assert!(!token.needs_refresh());
        assert_eq!(token.secret(), "t");
    }

    #[test]
    fn token_inside_skew_needs_refresh() {
        let token = AccessToken::new("t".into(), Duration::from_secs(60));
        assert!(token.needs_refresh());
    }
}
