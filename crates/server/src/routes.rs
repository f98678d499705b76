use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use common::auth::{self, ServiceAuth};
use common::types::Health;
use service::order_service::OrderOrchestrator;

pub mod items;
pub mod orders;
pub mod users;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[derive(Clone)]
pub struct UsersState {
    pub db: DatabaseConnection,
}

#[derive(Clone)]
pub struct ItemsState {
    pub db: DatabaseConnection,
    pub auth: ServiceAuth,
}

#[derive(Clone)]
pub struct OrdersState {
    pub db: DatabaseConnection,
    pub auth: ServiceAuth,
    pub orchestrator: Arc<OrderOrchestrator>,
}

fn observed(router: Router) -> Router {
    router.layer(CorsLayer::very_permissive()).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}

pub fn users_router(state: UsersState) -> Router {
    let app = Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/health", get(health))
        .route("/:id", get(users::get))
        .with_state(state);
    observed(app)
}

pub fn items_router(state: ItemsState) -> Router {
    // stock reservation is only for other internal services
    let privileged = Router::new()
        .route("/reserve", post(items::reserve))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth::require_service_token,
        ));

    let app = Router::new()
        .route("/", get(items::list).post(items::create))
        .route("/health", get(health))
        .route("/:id", get(items::get))
        .merge(privileged)
        .with_state(state);
    observed(app)
}

pub fn orders_router(state: OrdersState) -> Router {
    // creation is only for other internal services, listing stays open
    let create = post(orders::create).route_layer(middleware::from_fn_with_state(
        state.auth.clone(),
        auth::require_service_token,
    ));

    let app = Router::new()
        .route("/", get(orders::list).merge(create))
        .route("/health", get(health))
        .route("/:id", get(orders::get))
        .with_state(state);
    observed(app)
}
