use serde::Serialize;

/// Health probe payload shared by all services.
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}
