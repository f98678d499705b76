use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::{self, ItemsState, OrdersState, UsersState};
use client::{ClientConfig, ResilientClient};
use common::auth::ServiceAuth;
use common::env::{ensure_data_dir, var_or};
use models::{db, item, order, user};
use service::order_service::OrderOrchestrator;

fn load_bind_addr(host_key: &str, port_key: &str, default_port: u16) -> anyhow::Result<SocketAddr> {
    let host = var_or(host_key, "127.0.0.1");
    let port = std::env::var(port_key)
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(default_port);
    Ok(format!("{}:{}", host, port).parse()?)
}

async fn serve(service_name: &str, app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    info!(service = service_name, %addr, "starting service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Users backend: CRUD over the users table.
pub async fn run_users() -> anyhow::Result<()> {
    ensure_data_dir("data").await?;
    let db = db::connect(&var_or("USERS_DATABASE_URL", "sqlite://data/users.db?mode=rwc")).await?;
    db::create_table(&db, user::Entity).await?;

    let app = routes::users_router(UsersState { db });
    let addr = load_bind_addr("USERS_SERVICE_HOST", "USERS_SERVICE_PORT", 8001)?;
    serve("users", app, addr).await
}

/// Items backend: CRUD over the items table plus privileged stock
/// reservation.
pub async fn run_items() -> anyhow::Result<()> {
    ensure_data_dir("data").await?;
    let db = db::connect(&var_or("ITEMS_DATABASE_URL", "sqlite://data/items.db?mode=rwc")).await?;
    db::create_table(&db, item::Entity).await?;

    let app = routes::items_router(ItemsState {
        db,
        auth: ServiceAuth::from_env(),
    });
    let addr = load_bind_addr("ITEMS_SERVICE_HOST", "ITEMS_SERVICE_PORT", 8002)?;
    serve("items", app, addr).await
}

/// Orders backend: order listing plus the privileged order-creation saga
/// against the users and items services.
pub async fn run_orders() -> anyhow::Result<()> {
    ensure_data_dir("data").await?;
    let db = db::connect(&var_or("ORDERS_DATABASE_URL", "sqlite://data/orders.db?mode=rwc")).await?;
    db::create_table(&db, order::Entity).await?;

    let auth = ServiceAuth::from_env();
    let client = ResilientClient::new(ClientConfig::default())?;
    let orchestrator = OrderOrchestrator::new(
        client,
        auth.clone(),
        var_or("USERS_SERVICE_URL", "http://127.0.0.1:8001"),
        var_or("ITEMS_SERVICE_URL", "http://127.0.0.1:8002"),
    );

    let app = routes::orders_router(OrdersState {
        db,
        auth,
        orchestrator: Arc::new(orchestrator),
    });
    let addr = load_bind_addr("ORDERS_SERVICE_HOST", "ORDERS_SERVICE_PORT", 8003)?;
    serve("orders", app, addr).await
}
