//! Mock Azure identity + Resource Manager service.
//!
//! Serves just enough of the token endpoint and the Resource Manager REST
//! API for the console to run end to end without a real tenant:
//!
//! | Route | Behaviour |
//! |-------|-----------|
//! | `POST /{tenant}/oauth2/token` | client-credentials grant, checks the secret |
//! | `GET /subscriptions` | configured subscriptions |
//! | `GET /subscriptions/{s}/resourcegroups` | paged list (`$skiptoken`) |
//! | `HEAD/PUT/DELETE /subscriptions/{s}/resourcegroups/{rg}` | existence, create, async delete |
//! | `GET /subscriptions/{s}/operationresults/{op}` | delete progress (`202` → `200`) |
//! | `PUT/GET …/providers/Microsoft.Resources/deployments/{d}` | deployments |

pub mod config;
pub mod error;
pub mod store;

use std::sync::{Arc, Mutex, MutexGuard};

use armconsole_models::{CreateResourceGroupRequest, Deployment, DeploymentRequest, Page, ResourceGroup, Subscription};
use axum::extract::{Form, Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, head, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

pub use crate::config::MockConfig;
pub use crate::error::MockError;
pub use crate::store::Store;

/// Prefix of every token the mock issues.
pub const TOKEN_PREFIX: &str = "mock_";

/// Shared handler state.
pub type SharedStore = Arc<Mutex<Store>>;

/// Build the mock router over a fresh store.
pub fn router(config: MockConfig) -> Router {
    router_with_store(Arc::new(Mutex::new(Store::new(config))))
}

/// Build the mock router over an existing store (tests inspect it).
pub fn router_with_store(store: SharedStore) -> Router {
    Router::new()
        .route("/{tenant}/oauth2/token", post(token))
        .route("/subscriptions", get(list_subscriptions))
        .route("/subscriptions/{subscription}/resourcegroups", get(list_groups))
        .route(
            "/subscriptions/{subscription}/resourcegroups/{name}",
            head(check_group).put(create_group).delete(delete_group),
        )
        .route(
            "/subscriptions/{subscription}/operationresults/{operation}",
            get(operation_status),
        )
        .route(
            "/subscriptions/{subscription}/resourcegroups/{group}/providers/Microsoft.Resources/deployments/{deployment}",
            get(get_deployment).put(put_deployment),
        )
        .with_state(store)
}

fn lock(store: &SharedStore) -> MutexGuard<'_, Store> {
    store.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn authorize(headers: &HeaderMap) -> Result<(), MockError> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match bearer {
        Some(token) if token.starts_with(TOKEN_PREFIX) => Ok(()),
        _ => Err(MockError::unauthorized()),
    }
}

/// `http://{host}` of the incoming request, for absolute links.
fn origin(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}")
}

// ---------------------------------------------------------------------------
// Token endpoint
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TokenRequest {
    grant_type: String,
    client_id: String,
    client_secret: String,
    #[serde(default)]
    resource: String,
}

/// `POST /{tenant}/oauth2/token`: client-credentials grant.
async fn token(
    State(store): State<SharedStore>,
    Path(tenant): Path<String>,
    Form(req): Form<TokenRequest>,
) -> Response {
    info!(%tenant, client_id = %req.client_id, resource = %req.resource, "token request");

    if req.grant_type != "client_credentials" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "unsupported_grant_type",
                "error_description": format!("AADSTS70003: grant type '{}' is not supported.", req.grant_type),
            })),
        )
            .into_response();
    }
    if req.client_secret != lock(&store).config().client_secret {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid_client",
                "error_description": "AADSTS7000215: Invalid client secret provided.",
            })),
        )
            .into_response();
    }

    // v1 endpoints send expires_in as a string.
    Json(json!({
        "token_type": "Bearer",
        "expires_in": "3599",
        "resource": req.resource,
        "access_token": format!("{TOKEN_PREFIX}{}", req.client_id),
    }))
    .into_response()
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

/// `GET /subscriptions`
async fn list_subscriptions(
    State(store): State<SharedStore>,
    headers: HeaderMap,
) -> Result<Json<Page<Subscription>>, MockError> {
    authorize(&headers)?;
    Ok(Json(Page {
        value: lock(&store).subscriptions(),
        next_link: None,
    }))
}

// ---------------------------------------------------------------------------
// Resource groups
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ListParams {
    #[serde(rename = "$skiptoken")]
    skip: Option<usize>,
}

/// `GET /subscriptions/{s}/resourcegroups`
async fn list_groups(
    State(store): State<SharedStore>,
    Path(subscription): Path<String>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Result<Json<Page<ResourceGroup>>, MockError> {
    authorize(&headers)?;
    let store = lock(&store);
    store.require_subscription(&subscription)?;

    let all = store.groups(&subscription);
    let skip = params.skip.unwrap_or(0);
    let page_size = store.config().page_size;
    let value: Vec<_> = all.iter().skip(skip).take(page_size).cloned().collect();
    let next_link = (skip + page_size < all.len()).then(|| {
        format!(
            "{}/subscriptions/{subscription}/resourcegroups?api-version=2021-04-01&$skiptoken={}",
            origin(&headers),
            skip + page_size
        )
    });

    Ok(Json(Page { value, next_link }))
}

/// `HEAD /subscriptions/{s}/resourcegroups/{rg}`: `204` if it exists.
async fn check_group(
    State(store): State<SharedStore>,
    Path((subscription, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, MockError> {
    authorize(&headers)?;
    let store = lock(&store);
    store.require_subscription(&subscription)?;
    if store.group_exists(&subscription, &name) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

/// `PUT /subscriptions/{s}/resourcegroups/{rg}`
async fn create_group(
    State(store): State<SharedStore>,
    Path((subscription, name)): Path<(String, String)>,
    headers: HeaderMap,
    Json(req): Json<CreateResourceGroupRequest>,
) -> Result<(StatusCode, Json<ResourceGroup>), MockError> {
    authorize(&headers)?;
    let mut store = lock(&store);
    store.require_subscription(&subscription)?;
    if req.location.trim().is_empty() {
        return Err(MockError::new(
            StatusCode::BAD_REQUEST,
            "LocationRequired",
            "The location property is required for this definition.",
        ));
    }

    let (group, created) = store.put_group(&subscription, &name, &req.location);
    info!(resource_group = %group.name, created, "resource group written");
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(group)))
}

/// `DELETE /subscriptions/{s}/resourcegroups/{rg}`: `202` + `Location`.
async fn delete_group(
    State(store): State<SharedStore>,
    Path((subscription, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, MockError> {
    authorize(&headers)?;
    let mut store = lock(&store);
    store.require_subscription(&subscription)?;
    let operation = store.begin_delete(&subscription, &name)?;
    info!(resource_group = %name, %operation, "delete accepted");

    let location = format!(
        "{}/subscriptions/{subscription}/operationresults/{operation}?api-version=2021-04-01",
        origin(&headers)
    );
    let mut response = StatusCode::ACCEPTED.into_response();
    let response_headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&location) {
        response_headers.insert(header::LOCATION, value);
    }
    response_headers.insert(header::RETRY_AFTER, HeaderValue::from_static("0"));
    Ok(response)
}

/// `GET /subscriptions/{s}/operationresults/{op}`
async fn operation_status(
    State(store): State<SharedStore>,
    Path((_subscription, operation)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, MockError> {
    authorize(&headers)?;
    match lock(&store).poll_operation(&operation) {
        Some(true) => Ok(StatusCode::OK.into_response()),
        Some(false) => {
            let mut response = StatusCode::ACCEPTED.into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("0"));
            Ok(response)
        }
        None => Err(MockError::new(
            StatusCode::NOT_FOUND,
            "OperationNotFound",
            format!("Operation '{operation}' could not be found."),
        )),
    }
}

// ---------------------------------------------------------------------------
// Deployments
// ---------------------------------------------------------------------------

/// `PUT …/deployments/{d}`
async fn put_deployment(
    State(store): State<SharedStore>,
    Path((subscription, group, deployment)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(req): Json<DeploymentRequest>,
) -> Result<(StatusCode, Json<Deployment>), MockError> {
    authorize(&headers)?;
    let mut store = lock(&store);
    store.require_subscription(&subscription)?;
    let created = store.put_deployment(
        &subscription,
        &group,
        &deployment,
        &req.properties.template,
        req.properties.mode,
    )?;
    info!(%deployment, resource_group = %group, "deployment accepted");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET …/deployments/{d}`
async fn get_deployment(
    State(store): State<SharedStore>,
    Path((subscription, group, deployment)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Json<Deployment>, MockError> {
    authorize(&headers)?;
    let store = lock(&store);
    store.require_subscription(&subscription)?;
    store
        .deployment(&subscription, &group, &deployment)
        .cloned()
        .map(Json)
        .ok_or_else(|| {
            MockError::new(
                StatusCode::NOT_FOUND,
                "DeploymentNotFound",
                format!("Deployment '{deployment}' could not be found."),
            )
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
