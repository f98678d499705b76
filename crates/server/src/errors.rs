use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;
use service::order_service::OrderError;

/// CRUD-layer error mapped onto an HTTP status with an `{"error": ...}`
/// JSON body.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let msg = self.0.to_string();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %msg, "request failed");
        }
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}

/// Saga outcome mapped onto the caller-facing status.
#[derive(Debug)]
pub struct OrderApiError(pub OrderError);

impl From<OrderError> for OrderApiError {
    fn from(e: OrderError) -> Self {
        Self(e)
    }
}

impl IntoResponse for OrderApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            OrderError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            OrderError::NotFound(_) => StatusCode::NOT_FOUND,
            OrderError::Conflict(_) => StatusCode::CONFLICT,
            OrderError::Invalid(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(serde_json::json!({"error": self.0.to_string()}))).into_response()
    }
}
