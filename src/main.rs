use anyhow::Result;
use catalog::config::AppConfig;
use catalog::server::ServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;

    tracing::info!(
        "Starting catalog API on {} ({} bootstrap user(s))",
        config.server.bind_address(),
        config.bootstrap_users.len()
    );

    ServerBuilder::new(config)
        .with_catalog_entities()
        .serve()
        .await
}
