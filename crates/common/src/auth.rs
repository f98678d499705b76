//! Service-to-service authentication.
//!
//! Internal services trust each other through a single shared secret carried
//! in the `X-Service-Token` header. The gateway injects it on every forwarded
//! request; privileged endpoints (stock reservation, order creation) verify
//! it before handling the request.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::warn;

/// Header carrying the shared service secret on privileged calls.
pub const SERVICE_TOKEN_HEADER: &str = "x-service-token";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid service token")]
    InvalidToken,
}

/// Shared-secret credential for service-to-service calls.
///
/// The secret comes from `SERVICE_SECRET`; the default placeholder must be
/// overridden in any real deployment.
#[derive(Clone)]
pub struct ServiceAuth {
    secret: Arc<str>,
}

impl ServiceAuth {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into().into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var("SERVICE_SECRET").unwrap_or_else(|_| "dev-secret".to_string()))
    }

    /// Return a copy of `headers` with the service token set. Pure; the
    /// input map is left untouched.
    pub fn attach(&self, headers: &HeaderMap) -> HeaderMap {
        let mut out = headers.clone();
        if let Ok(value) = HeaderValue::from_str(&self.secret) {
            out.insert(HeaderName::from_static(SERVICE_TOKEN_HEADER), value);
        }
        out
    }

    /// Exact-match comparison of a presented token against the shared secret.
    pub fn verify(&self, presented: Option<&str>) -> Result<(), AuthError> {
        match presented {
            Some(token) if token == &*self.secret => Ok(()),
            _ => Err(AuthError::InvalidToken),
        }
    }
}

/// Middleware guard for privileged endpoints. Rejects requests whose
/// `X-Service-Token` header does not match the shared secret.
pub async fn require_service_token(
    State(auth): State<ServiceAuth>,
    req: Request,
    next: Next,
) -> Response {
    let presented = req
        .headers()
        .get(SERVICE_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    match auth.verify(presented) {
        Ok(()) => next.run(req).await,
        Err(e) => {
            warn!(path = %req.uri().path(), "rejected request with missing or invalid service token");
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_sets_token_and_keeps_input_intact() {
        let auth = ServiceAuth::new("s3cret");
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("abc"));

        let out = auth.attach(&headers);
        assert_eq!(out.get(SERVICE_TOKEN_HEADER).unwrap(), "s3cret");
        assert_eq!(out.get("x-request-id").unwrap(), "abc");
        assert!(headers.get(SERVICE_TOKEN_HEADER).is_none());
    }

    #[test]
    fn verify_requires_exact_match() {
        let auth = ServiceAuth::new("s3cret");
        assert!(auth.verify(Some("s3cret")).is_ok());
        assert!(auth.verify(Some("S3CRET")).is_err());
        assert!(auth.verify(Some("")).is_err());
        assert!(auth.verify(None).is_err());
    }
}
