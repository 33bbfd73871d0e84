//! Gateway HTTP Routes
//!
//! Every route resolves the principal, hands the request to the gateway on
//! the blocking pool and turns the envelope into a response whose status
//! follows the outcome category.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::acl::ANONYMOUS;
use crate::gateway::{Body, ContractError, ContractResult, Envelope, Gateway, ReadOptions, Target};
use crate::observability::{log_event_with_fields, Event};
use crate::taxonomy::OutcomeCategory;

/// Header naming the key column for point operations
pub const PRIMARY_KEY_HEADER: &str = "Primary-Key";

/// Shared state of the gateway routes
#[derive(Clone)]
pub struct GatewayState {
    gateway: Arc<Gateway>,
    decoding_key: Option<DecodingKey>,
}

impl GatewayState {
    pub fn new(gateway: Arc<Gateway>, jwt_secret: Option<&str>) -> Self {
        Self {
            gateway,
            decoding_key: jwt_secret.map(|s| DecodingKey::from_secret(s.as_bytes())),
        }
    }

    /// Principal named by the bearer token, or anonymous. A token that does
    /// not validate is treated as no token.
    fn principal(&self, headers: &HeaderMap) -> String {
        let (Some(key), Some(token)) = (&self.decoding_key, bearer_token(headers)) else {
            return ANONYMOUS.to_string();
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        match decode::<Claims>(token, key, &validation) {
            Ok(data) if !data.claims.sub.trim().is_empty() => data.claims.sub,
            _ => ANONYMOUS.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Gateway routes, to be nested under the configured root
pub fn gateway_routes(state: GatewayState) -> Router {
    Router::new()
        .route("/:alias", get(metadata_handler))
        .route(
            "/:alias/:resource",
            get(list_handler)
                .head(resource_status_handler)
                .post(create_handler),
        )
        .route("/:alias/:resource/meta", get(resource_metadata_handler))
        .route(
            "/:alias/:resource/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route("/:alias/:resource/dynamic/:finder", get(finder_handler))
        .route("/:alias/:resource/:column/:value", get(column_handler))
        .route("/:alias/call/:routine", post(call_handler))
        .with_state(state)
}

// ==================
// Response Mapping
// ==================

fn status_of(category: OutcomeCategory) -> StatusCode {
    StatusCode::from_u16(category.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn contract_status(err: &ContractError) -> StatusCode {
    match err {
        ContractError::UnknownAlias(_) => StatusCode::NOT_FOUND,
        ContractError::MissingArguments => StatusCode::BAD_REQUEST,
    }
}

/// Runs one gateway call on the blocking pool and logs its outcome
async fn respond<F>(method: Method, operation: &'static str, head_only: bool, call: F) -> Response
where
    F: FnOnce() -> ContractResult<Envelope> + Send + 'static,
{
    let request_id = Uuid::new_v4().to_string();
    let started = Instant::now();

    let (status, response) = match tokio::task::spawn_blocking(call).await {
        Ok(Ok(envelope)) => {
            let status = status_of(envelope.category);
            let response = if head_only || envelope.category == OutcomeCategory::NoContent {
                status.into_response()
            } else {
                (status, Json(envelope)).into_response()
            };
            (status, response)
        }
        Ok(Err(err)) => {
            let status = contract_status(&err);
            let message = err.to_string();
            log_event_with_fields(
                Event::RequestRejected,
                &[("request_id", request_id.as_str()), ("error", message.as_str())],
            );
            let body = json!({ "success": false, "message": message });
            (status, (status, Json(body)).into_response())
        }
        Err(join) => {
            let reason = join.to_string();
            log_event_with_fields(
                Event::ExecutionFailed,
                &[("request_id", request_id.as_str()), ("error", reason.as_str())],
            );
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            (status, status.into_response())
        }
    };

    let code = status.as_u16().to_string();
    let elapsed = started.elapsed().as_millis().to_string();
    log_event_with_fields(
        Event::RequestComplete,
        &[
            ("request_id", request_id.as_str()),
            ("method", method.as_str()),
            ("operation", operation),
            ("status", code.as_str()),
            ("elapsed_ms", elapsed.as_str()),
        ],
    );
    response
}

// ==================
// Request Parsing
// ==================

fn read_options(query: &[(String, String)]) -> ReadOptions {
    let value = |name: &str| {
        query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    };
    ReadOptions {
        limit: value("limit"),
        offset: value("offset"),
        sort: value("sort"),
        dir: value("dir"),
        columns: value("cols"),
    }
}

/// Every non-empty `args` value in order; `None` when `args` is absent.
/// A bare `?args=` is an empty argument list.
fn finder_arguments(query: &[(String, String)]) -> Option<Vec<String>> {
    if !query.iter().any(|(k, _)| k == "args") {
        return None;
    }
    let args = query
        .iter()
        .filter(|(k, v)| k == "args" && !v.is_empty())
        .map(|(_, v)| v.clone())
        .collect();
    Some(args)
}

fn key_column(headers: &HeaderMap) -> Option<String> {
    headers
        .get(PRIMARY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Owned request body: raw form bytes for url-encoded requests, JSON otherwise
enum OwnedBody {
    Json(String),
    Form(Bytes),
}

impl OwnedBody {
    fn read(headers: &HeaderMap, bytes: Bytes) -> Self {
        let is_form = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            OwnedBody::Form(bytes)
        } else {
            OwnedBody::Json(String::from_utf8_lossy(&bytes).into_owned())
        }
    }

    fn as_body(&self) -> Body<'_> {
        match self {
            OwnedBody::Json(text) => Body::Json(text),
            OwnedBody::Form(bytes) => Body::Form(&bytes[..]),
        }
    }
}

// ==================
// Handlers
// ==================

async fn metadata_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(alias): Path<String>,
) -> Response {
    let principal = state.principal(&headers);
    respond(Method::GET, "metadata", false, move || {
        state.gateway.metadata(&alias, &principal)
    })
    .await
}

async fn resource_status_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((alias, resource)): Path<(String, String)>,
) -> Response {
    let principal = state.principal(&headers);
    respond(Method::HEAD, "resource_metadata", true, move || {
        state
            .gateway
            .resource_metadata(Target::new(&alias, &resource, &principal))
    })
    .await
}

async fn resource_metadata_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((alias, resource)): Path<(String, String)>,
) -> Response {
    let principal = state.principal(&headers);
    respond(Method::GET, "resource_metadata", false, move || {
        state
            .gateway
            .resource_metadata(Target::new(&alias, &resource, &principal))
    })
    .await
}

async fn list_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((alias, resource)): Path<(String, String)>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let principal = state.principal(&headers);
    let options = read_options(&query);
    respond(Method::GET, "list", false, move || {
        state
            .gateway
            .list(Target::new(&alias, &resource, &principal), &options)
    })
    .await
}

async fn get_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((alias, resource, id)): Path<(String, String, String)>,
) -> Response {
    let principal = state.principal(&headers);
    let key = key_column(&headers);
    respond(Method::GET, "get", false, move || {
        state.gateway.get(
            Target::new(&alias, &resource, &principal),
            key.as_deref(),
            &id,
        )
    })
    .await
}

async fn column_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((alias, resource, column, value)): Path<(String, String, String, String)>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let principal = state.principal(&headers);
    let options = read_options(&query);
    respond(Method::GET, "find_by_column", false, move || {
        state.gateway.find_by_column(
            Target::new(&alias, &resource, &principal),
            &column,
            &value,
            &options,
        )
    })
    .await
}

async fn finder_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((alias, resource, finder)): Path<(String, String, String)>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let principal = state.principal(&headers);
    let options = read_options(&query);
    let arguments = finder_arguments(&query);
    respond(Method::GET, "find", false, move || {
        state.gateway.find(
            Target::new(&alias, &resource, &principal),
            &finder,
            arguments.as_deref(),
            &options,
        )
    })
    .await
}

async fn create_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((alias, resource)): Path<(String, String)>,
    bytes: Bytes,
) -> Response {
    let principal = state.principal(&headers);
    let body = OwnedBody::read(&headers, bytes);
    respond(Method::POST, "create", false, move || {
        state
            .gateway
            .create(Target::new(&alias, &resource, &principal), &body.as_body())
    })
    .await
}

async fn update_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((alias, resource, id)): Path<(String, String, String)>,
    bytes: Bytes,
) -> Response {
    let principal = state.principal(&headers);
    let key = key_column(&headers);
    let body = OwnedBody::read(&headers, bytes);
    respond(Method::PUT, "update", false, move || {
        state.gateway.update(
            Target::new(&alias, &resource, &principal),
            key.as_deref(),
            &id,
            &body.as_body(),
        )
    })
    .await
}

async fn delete_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((alias, resource, id)): Path<(String, String, String)>,
) -> Response {
    let principal = state.principal(&headers);
    let key = key_column(&headers);
    respond(Method::DELETE, "delete", false, move || {
        state.gateway.delete(
            Target::new(&alias, &resource, &principal),
            key.as_deref(),
            &id,
        )
    })
    .await
}

async fn call_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path((alias, routine)): Path<(String, String)>,
    bytes: Bytes,
) -> Response {
    let principal = state.principal(&headers);
    let parameters = String::from_utf8_lossy(&bytes).into_owned();
    respond(Method::POST, "call", false, move || {
        state
            .gateway
            .call(Target::new(&alias, &routine, &principal), &parameters)
    })
    .await
}
