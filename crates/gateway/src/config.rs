use std::net::SocketAddr;

use common::env::var_or;

/// Gateway settings: where to bind and the base URLs of the three
/// backends. Environment-configured with loopback defaults.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub users_url: String,
    pub items_url: String,
    pub orders_url: String,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            host: var_or("GATEWAY_HOST", "127.0.0.1"),
            port: std::env::var("GATEWAY_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8000),
            users_url: var_or("USERS_SERVICE_URL", "http://127.0.0.1:8001"),
            items_url: var_or("ITEMS_SERVICE_URL", "http://127.0.0.1:8002"),
            orders_url: var_or("ORDERS_SERVICE_URL", "http://127.0.0.1:8003"),
        }
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}
