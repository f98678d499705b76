use dotenvy::dotenv;
use tracing::info;

use common::utils::logging::init_logging_json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_json();
    info!(
        service = "gateway",
        event = "start",
        version = env!("CARGO_PKG_VERSION"),
        "gateway starting"
    );
    gateway::bootstrap::run().await
}
