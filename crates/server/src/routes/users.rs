use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::errors::ApiError;
use crate::routes::UsersState;
use models::user;
use service::user_service;

#[derive(Debug, Deserialize)]
pub struct UserIn {
    pub name: String,
    pub email: String,
}

pub async fn list(State(state): State<UsersState>) -> Result<Json<Vec<user::Model>>, ApiError> {
    let users = user_service::list_users(&state.db).await?;
    Ok(Json(users))
}

pub async fn create(
    State(state): State<UsersState>,
    Json(input): Json<UserIn>,
) -> Result<(StatusCode, Json<user::Model>), ApiError> {
    let created = user_service::create_user(&state.db, &input.name, &input.email).await?;
    info!(id = created.id, email = %created.email, "created user");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<UsersState>,
    Path(id): Path<i32>,
) -> Result<Json<user::Model>, ApiError> {
    match user_service::get_user(&state.db, id).await? {
        Some(found) => Ok(Json(found)),
        None => Err(service::errors::ServiceError::not_found("user").into()),
    }
}
