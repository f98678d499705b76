use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::GatewayConfig;
use crate::proxy::{self, GatewayState};
use common::auth::ServiceAuth;

/// Build the proxy router from environment config and serve it.
pub async fn run() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env();
    info!(?config, "loaded gateway configuration");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let state = GatewayState {
        http,
        auth: ServiceAuth::from_env(),
        config: Arc::new(config.clone()),
    };

    let app = proxy::build_router(state);
    let addr = config.bind_addr()?;
    info!(%addr, "gateway listening");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
