use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Transport failure talking to a backend; surfaces as 502 at the gateway
/// boundary.
#[derive(Debug)]
pub struct ProxyError(pub String);

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let msg = self.0;
        let status = StatusCode::BAD_GATEWAY;
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}
