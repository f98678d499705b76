//! Order creation saga.
//!
//! Creating an order chains two remote calls and a local write without a
//! distributed transaction: verify the user exists on the users service,
//! reserve stock on the items service, then persist the order locally. The
//! steps are strictly sequential and no intermediate state is persisted.
//!
//! Known gap, kept for compatibility: when the local write fails after the
//! stock was already decremented, no compensating "release reservation"
//! call is made.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use sea_orm::{DatabaseConnection, EntityTrait};
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::ServiceError;
use client::ResilientClient;
use common::auth::ServiceAuth;
use models::order;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0} service unavailable")]
    Unavailable(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Invalid(String),
}

/// Coordinates the order-creation saga against the users and items
/// services. Holds the resilient client and the service credential; both
/// remote calls carry the injected `X-Service-Token`.
#[derive(Clone)]
pub struct OrderOrchestrator {
    client: ResilientClient,
    auth: ServiceAuth,
    users_base: String,
    items_base: String,
}

impl OrderOrchestrator {
    pub fn new(
        client: ResilientClient,
        auth: ServiceAuth,
        users_base: impl Into<String>,
        items_base: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth,
            users_base: users_base.into(),
            items_base: items_base.into(),
        }
    }

    /// Run the saga. An order row is written only after the user was
    /// confirmed to exist and the item's stock was decremented by `qty`.
    pub async fn place_order(
        &self,
        db: &DatabaseConnection,
        user_id: i32,
        item_sku: &str,
        qty: i32,
    ) -> Result<order::Model, OrderError> {
        order::validate_new(user_id, item_sku, qty).map_err(|e| OrderError::Invalid(e.to_string()))?;
        let headers = self.auth.attach(&HeaderMap::new());

        // step 1: verify the user exists
        let url = format!("{}/{}", self.users_base, user_id);
        let resp = self.client.get(&url, headers.clone()).await.map_err(|e| {
            warn!(error = %e, "users service unreachable");
            OrderError::Unavailable("users")
        })?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(OrderError::NotFound("user"));
        }
        // any other non-2xx from a reachable peer is not treated as a veto

        // step 2: reserve stock
        let url = format!("{}/reserve", self.items_base);
        let body = serde_json::json!({"sku": item_sku, "qty": qty});
        let resp = self
            .client
            .post_json(&url, headers, &body)
            .await
            .map_err(|e| {
                warn!(error = %e, "items service unreachable");
                OrderError::Unavailable("items")
            })?;
        match resp.status() {
            StatusCode::NOT_FOUND => return Err(OrderError::NotFound("item")),
            StatusCode::CONFLICT => return Err(OrderError::Conflict("insufficient stock".into())),
            _ => {}
        }

        // step 3: persist the order; the reserved stock is not restored if
        // this write fails
        let created = order::create(db, user_id, item_sku, qty)
            .await
            .map_err(|e| OrderError::Invalid(e.to_string()))?;
        info!(order_id = created.id, user_id, sku = %item_sku, qty, "order created");
        Ok(created)
    }
}

/// List all orders.
pub async fn list_orders(db: &DatabaseConnection) -> Result<Vec<order::Model>, ServiceError> {
    let orders = order::list(db).await?;
    Ok(orders)
}

/// Get an order by id.
pub async fn get_order(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<order::Model>, ServiceError> {
    let found = order::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}
