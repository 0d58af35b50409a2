//! Subscription-scoped Resource Manager client.
//!
//! [`ArmClient`] is obtained from
//! [`ArmSession::with_subscription`](crate::ArmSession::with_subscription)
//! and implements [`ResourceManager`] against the live service.
//!
//! All calls are issued one at a time; the bearer token is refreshed
//! transparently when it is about to expire.

use std::time::Duration;

use armconsole_models::{
    CloudEndpoints, CreateResourceGroupRequest, Credentials, Deployment, DeploymentRequest,
    ErrorResponse, Page, ResourceGroup, SubscriptionId, CODE_RESOURCE_GROUP_EXISTS,
    CODE_RESOURCE_GROUP_NOT_FOUND, DEPLOYMENT_NAME_PREFIX, scrub_strings,
};
use reqwest::header::{HeaderMap, LOCATION, RETRY_AFTER};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::{acquire_token, AccessToken};
use crate::error::SdkError;
use crate::manager::ResourceManager;
use crate::paths::ArmPaths;

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("armconsole/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// ClientOptions
// ---------------------------------------------------------------------------

/// Tunables for the HTTP layer.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Delay between polls of a long-running operation when the service
    /// sends no `Retry-After`.
    pub poll_interval: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(100),
            poll_interval: Duration::from_secs(5),
        }
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Authenticated HTTP plumbing shared by session and client.
pub(crate) struct Transport {
    http: reqwest::Client,
    credentials: Credentials,
    endpoints: CloudEndpoints,
    options: ClientOptions,
    paths: ArmPaths,
    token: Mutex<AccessToken>,
}

impl Transport {
    /// Build the HTTP client and fetch the first token.
    pub(crate) async fn connect(
        credentials: Credentials,
        endpoints: CloudEndpoints,
        options: ClientOptions,
    ) -> Result<Self, SdkError> {
        let paths = ArmPaths::new(&endpoints.resource_manager)?;
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        let token = acquire_token(&http, &credentials, &endpoints).await?;

        Ok(Self {
            http,
            credentials,
            endpoints,
            options,
            paths,
            token: Mutex::new(token),
        })
    }

    pub(crate) fn paths(&self) -> &ArmPaths {
        &self.paths
    }

    /// Start an authenticated request.
    pub(crate) async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, SdkError> {
        let mut token = self.token.lock().await;
        if token.needs_refresh() {
            debug!("access token about to expire, refreshing");
            *token = acquire_token(&self.http, &self.credentials, &self.endpoints).await?;
        }
        debug!(%method, %url, "resource manager request");
        Ok(self.http.request(method, url).bearer_auth(token.secret()))
    }

    /// `GET` and decode a JSON body, mapping failures to [`SdkError::Api`].
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SdkError> {
        let res = self.request(Method::GET, url).await?.send().await?;
        if !res.status().is_success() {
            return Err(api_error(res).await);
        }
        Ok(res.json().await?)
    }

    /// Parse a `nextLink`; empty links end paging.
    pub(crate) fn next_link(&self, link: Option<String>) -> Result<Option<Url>, SdkError> {
        link.filter(|l| !l.is_empty())
            .map(|l| Url::parse(&l).map_err(|e| SdkError::Config(format!("invalid nextLink {l:?}: {e}"))))
            .transpose()
    }
}

/// Turn a failed response into [`SdkError::Api`].
pub(crate) async fn api_error(res: Response) -> SdkError {
    let status = res.status().as_u16();
    let text = res.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(body) => SdkError::Api {
            status,
            code: body.error.code,
            message: body.error.message,
        },
        Err(_) => SdkError::Api {
            status,
            code: String::new(),
            message: text,
        },
    }
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
        .map(Duration::from_secs)
}

fn location(headers: &HeaderMap) -> Result<Option<Url>, SdkError> {
    headers
        .get(LOCATION)
        .map(|value| {
            let value = value
                .to_str()
                .map_err(|e| SdkError::Config(format!("unreadable Location header: {e}")))?;
            Url::parse(value).map_err(|e| SdkError::Config(format!("invalid Location header {value:?}: {e}")))
        })
        .transpose()
}

// ---------------------------------------------------------------------------
// ArmClient
// ---------------------------------------------------------------------------

/// An authenticated session bound to one subscription.
pub struct ArmClient {
    transport: Transport,
    subscription: SubscriptionId,
}

impl ArmClient {
    pub(crate) fn new(transport: Transport, subscription: SubscriptionId) -> Self {
        Self {
            transport,
            subscription,
        }
    }

    /// The subscription every call is scoped to.
    pub fn subscription(&self) -> &SubscriptionId {
        &self.subscription
    }

    /// Poll a long-running operation until it stops answering `202`.
    async fn wait_for_operation(&self, headers: &HeaderMap) -> Result<(), SdkError> {
        let Some(mut url) = location(headers)? else {
            return Ok(());
        };
        let mut delay = retry_after(headers).unwrap_or(self.transport.options.poll_interval);

        loop {
            tokio::time::sleep(delay).await;
            let res = self.transport.request(Method::GET, url.clone()).await?.send().await?;
            match res.status() {
                StatusCode::ACCEPTED => {
                    debug!(%url, "operation still running");
                    delay = retry_after(res.headers()).unwrap_or(self.transport.options.poll_interval);
                    if let Some(next) = location(res.headers())? {
                        url = next;
                    }
                }
                status if status.is_success() => return Ok(()),
                _ => return Err(api_error(res).await),
            }
        }
    }
}

impl ResourceManager for ArmClient {
    async fn list_resource_groups(&self) -> Result<Vec<ResourceGroup>, SdkError> {
        let mut groups = Vec::new();
        let mut next = Some(self.transport.paths().resource_groups(&self.subscription));
        while let Some(url) = next {
            let page: Page<ResourceGroup> = self.transport.get_json(url).await?;
            groups.extend(page.value);
            next = self.transport.next_link(page.next_link)?;
        }
        debug!(count = groups.len(), "listed resource groups");
        Ok(groups)
    }

    async fn create_resource_group(&self, name: &str, region: &str) -> Result<ResourceGroup, SdkError> {
        let url = self.transport.paths().resource_group(&self.subscription, name);

        let res = self.transport.request(Method::HEAD, url.clone()).await?.send().await?;
        match res.status() {
            StatusCode::NOT_FOUND => {}
            status if status.is_success() => {
                return Err(SdkError::ResourceGroupAlreadyExists(name.to_string()));
            }
            _ => return Err(api_error(res).await),
        }

        let res = self
            .transport
            .request(Method::PUT, url)
            .await?
            .json(&CreateResourceGroupRequest {
                location: region.to_string(),
            })
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(match api_error(res).await {
                SdkError::Api { code, .. } if code == CODE_RESOURCE_GROUP_EXISTS => {
                    SdkError::ResourceGroupAlreadyExists(name.to_string())
                }
                other => other,
            });
        }

        let group: ResourceGroup = res.json().await?;
        info!(resource_group = %group.name, location = %group.location, "resource group created");
        Ok(group)
    }

    async fn deploy_template(
        &self,
        resource_group: &str,
        template_json: &str,
        parameters: &Value,
    ) -> Result<Deployment, SdkError> {
        let template: Value = serde_json::from_str(template_json)
            .map_err(|e| SdkError::Deployment(format!("template is not valid JSON: {e}")))?;

        let name = format!("{DEPLOYMENT_NAME_PREFIX}{}", Uuid::new_v4());
        let url = self
            .transport
            .paths()
            .deployment(&self.subscription, resource_group, &name);

        let mut request = DeploymentRequest::incremental(template, parameters.clone());
        let builder = self
            .transport
            .request(Method::PUT, url.clone())
            .await?
            .json(&request);
        scrub_strings(&mut request.properties.parameters);
        let res = builder.send().await?;
        if !res.status().is_success() {
            return Err(match api_error(res).await {
                SdkError::Api { code, message, .. } if code.is_empty() => SdkError::Deployment(message),
                SdkError::Api { code, message, .. } => SdkError::Deployment(format!("{code}: {message}")),
                other => other,
            });
        }
        info!(deployment = %name, %resource_group, "deployment submitted");

        self.transport.get_json(url).await
    }

    async fn delete_resource_group(&self, name: &str) -> Result<(), SdkError> {
        let url = self.transport.paths().resource_group(&self.subscription, name);
        let res = self.transport.request(Method::DELETE, url).await?.send().await?;

        match res.status() {
            StatusCode::NOT_FOUND => Err(SdkError::ResourceGroupNotFound(name.to_string())),
            StatusCode::ACCEPTED => {
                debug!(resource_group = %name, "delete accepted, waiting for completion");
                self.wait_for_operation(res.headers()).await?;
                info!(resource_group = %name, "resource group deleted");
                Ok(())
            }
            status if status.is_success() => {
                info!(resource_group = %name, "resource group deleted");
                Ok(())
            }
            _ => Err(match api_error(res).await {
                SdkError::Api { code, .. } if code == CODE_RESOURCE_GROUP_NOT_FOUND => {
                    SdkError::ResourceGroupNotFound(name.to_string())
                }
                other => other,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn default_options() {
        let options = ClientOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(100));
        assert_eq!(options.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("armconsole/"));
    }

    #[test]
    fn retry_after_seconds() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("15"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(15)));
        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after(&headers), None);
    }

    #[test]
    fn location_header_parsing() {
        let mut headers = HeaderMap::new();
        assert!(location(&headers).unwrap().is_none());
        headers.insert(
            LOCATION,
            HeaderValue::from_static("https://management.azure.com/subscriptions/s/operationresults/op1"),
        );
        let url = location(&headers).unwrap().unwrap();
        assert_eq!(url.path(), "/subscriptions/s/operationresults/op1");
        headers.insert(LOCATION, HeaderValue::from_static("/relative"));
        assert!(matches!(location(&headers), Err(SdkError::Config(_))));
    }
}
