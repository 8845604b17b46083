//! Proxy server binary.
//!
//! Reads configuration from the environment (optionally via a `.env`
//! file), initializes logging, and serves the relay until SIGTERM/SIGINT.

use marketing_relay::{Config, api};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    if config.upstream.base_url.is_none() {
        tracing::warn!(
            "UPSTREAM_BASE_URL is not set; submissions will fail closed until it is configured"
        );
    }

    api::start_api_server(Arc::new(config)).await?;
    Ok(())
}
