use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderValue;
use clap::Parser;
use taskintel_agent::model::gemini::GeminiClient;
use tokio::net::TcpListener;
use tracing::{info, warn};

use taskintel_server::config::{load_env_file, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // A local env file supplies agent credentials in development.
    load_env_file(Path::new(".env"));

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();

    let client = GeminiClient::new(
        &config.gemini_base_url,
        config.gemini_api_key.clone(),
        config.turn_timeout(),
    )?;
    if !client.has_api_key() {
        warn!("GEMINI_API_KEY is not set; every breakdown will return the fallback plan");
    }

    let addr = SocketAddr::new(config.bind.parse()?, config.port);
    let listener = TcpListener::bind(addr).await?;
    info!("taskintel-server listening on http://{addr}");
    info!("allowed origin: {}", config.allowed_origin);

    let origin = HeaderValue::from_str(&config.allowed_origin)?;
    taskintel_server::serve(listener, Arc::new(client), config.turn_timeout(), origin).await?;

    Ok(())
}
