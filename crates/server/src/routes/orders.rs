use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::errors::{ApiError, OrderApiError};
use crate::routes::OrdersState;
use models::order;
use service::order_service;

fn default_qty() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct OrderIn {
    pub user_id: i32,
    pub item_sku: String,
    #[serde(default = "default_qty")]
    pub qty: i32,
}

pub async fn list(State(state): State<OrdersState>) -> Result<Json<Vec<order::Model>>, ApiError> {
    let orders = order_service::list_orders(&state.db).await?;
    Ok(Json(orders))
}

pub async fn get(
    State(state): State<OrdersState>,
    Path(id): Path<i32>,
) -> Result<Json<order::Model>, ApiError> {
    match order_service::get_order(&state.db, id).await? {
        Some(found) => Ok(Json(found)),
        None => Err(service::errors::ServiceError::not_found("order").into()),
    }
}

/// Privileged: runs the order-creation saga.
pub async fn create(
    State(state): State<OrdersState>,
    Json(input): Json<OrderIn>,
) -> Result<(StatusCode, Json<order::Model>), OrderApiError> {
    let created = state
        .orchestrator
        .place_order(&state.db, input.user_id, &input.item_sku, input.qty)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
