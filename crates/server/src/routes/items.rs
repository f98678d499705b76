use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::errors::ApiError;
use crate::routes::ItemsState;
use models::item;
use service::item_service;

#[derive(Debug, Deserialize)]
pub struct ItemIn {
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub stock: i32,
}

#[derive(Debug, Deserialize)]
pub struct ReserveIn {
    pub sku: String,
    pub qty: i32,
}

pub async fn list(State(state): State<ItemsState>) -> Result<Json<Vec<item::Model>>, ApiError> {
    let items = item_service::list_items(&state.db).await?;
    Ok(Json(items))
}

pub async fn create(
    State(state): State<ItemsState>,
    Json(input): Json<ItemIn>,
) -> Result<(StatusCode, Json<item::Model>), ApiError> {
    let created = item_service::create_item(&state.db, &input.name, &input.sku, input.stock).await?;
    info!(id = created.id, sku = %created.sku, stock = created.stock, "created item");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<ItemsState>,
    Path(id): Path<i32>,
) -> Result<Json<item::Model>, ApiError> {
    match item_service::get_item(&state.db, id).await? {
        Some(found) => Ok(Json(found)),
        None => Err(service::errors::ServiceError::not_found("item").into()),
    }
}

/// Privileged: decrement stock on behalf of the order saga.
pub async fn reserve(
    State(state): State<ItemsState>,
    Json(input): Json<ReserveIn>,
) -> Result<Json<item::Model>, ApiError> {
    let updated = item_service::reserve_stock(&state.db, &input.sku, input.qty).await?;
    Ok(Json(updated))
}
