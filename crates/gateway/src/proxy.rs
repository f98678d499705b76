//! Transparent reverse proxy.
//!
//! Requests under `/users`, `/items` and `/orders` are forwarded to the
//! matching backend with the path prefix stripped, the `Host` header
//! removed and the service credential injected. No other request
//! transformation, no retry and no breaker at this layer: the backend's
//! status, body and content-type come back verbatim.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{CONTENT_TYPE, HOST};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::{debug, Level};

use crate::config::GatewayConfig;
use crate::errors::ProxyError;
use common::auth::ServiceAuth;
use common::types::Health;

#[derive(Clone)]
pub struct GatewayState {
    pub http: reqwest::Client,
    pub auth: ServiceAuth,
    pub config: Arc<GatewayConfig>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn users(State(state): State<GatewayState>, req: Request) -> Result<Response, ProxyError> {
    let base = state.config.users_url.clone();
    forward(&state, &base, "/users", req).await
}

async fn items(State(state): State<GatewayState>, req: Request) -> Result<Response, ProxyError> {
    let base = state.config.items_url.clone();
    forward(&state, &base, "/items", req).await
}

async fn orders(State(state): State<GatewayState>, req: Request) -> Result<Response, ProxyError> {
    let base = state.config.orders_url.clone();
    forward(&state, &base, "/orders", req).await
}

/// Forward one request to `base` with the routing prefix stripped and the
/// response relayed unchanged.
async fn forward(
    state: &GatewayState,
    base: &str,
    prefix: &str,
    req: Request,
) -> Result<Response, ProxyError> {
    let (parts, body) = req.into_parts();

    let rest = parts.uri.path().strip_prefix(prefix).unwrap_or("");
    let mut url = format!("{}{}", base, if rest.is_empty() { "/" } else { rest });
    if let Some(query) = parts.uri.query() {
        url = format!("{url}?{query}");
    }

    // pass headers through untouched apart from Host removal and the
    // injected service credential
    let mut headers = parts.headers.clone();
    headers.remove(HOST);
    let headers = state.auth.attach(&headers);

    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| ProxyError(e.to_string()))?;

    debug!(method = %parts.method, %url, "forwarding request");
    let upstream = state
        .http
        .request(parts.method.clone(), url)
        .headers(headers)
        .body(bytes)
        .send()
        .await
        .map_err(|e| ProxyError(e.to_string()))?;

    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let body = upstream
        .bytes()
        .await
        .map_err(|e| ProxyError(e.to_string()))?;

    let mut response = (status, body).into_response();
    match content_type {
        Some(ct) => {
            response.headers_mut().insert(CONTENT_TYPE, ct);
        }
        None => {
            response.headers_mut().remove(CONTENT_TYPE);
        }
    }
    Ok(response)
}

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health))
        // the wildcard needs a non-empty remainder, so the bare and
        // trailing-slash forms are routed explicitly
        .route("/users", any(users))
        .route("/users/", any(users))
        .route("/users/*path", any(users))
        .route("/items", any(items))
        .route("/items/", any(items))
        .route("/items/*path", any(items))
        .route("/orders", any(orders))
        .route("/orders/", any(orders))
        .route("/orders/*path", any(orders))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
