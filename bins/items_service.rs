use dotenvy::dotenv;
use tracing::info;

use common::utils::logging::init_logging_json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_json();
    info!(
        service = "items",
        event = "start",
        version = env!("CARGO_PKG_VERSION"),
        "items service starting"
    );
    server::startup::run_items().await
}
