use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use xplor_services::config::Config;
use xplor_services::engine::cloud::CloudPipelineClient;
use xplor_services::engine::offline::ArgosCli;
use xplor_services::server::{self, AppState};
use xplor_services::translation::Orchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("xplor_services=info".parse()?),
        )
        .init();

    info!("Starting Xplor translation and recommendation service");

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .build()
        .context("Failed to create HTTP client")?;

    let argos = Arc::new(ArgosCli::new(&config));
    let cloud = Arc::new(CloudPipelineClient::new(http, &config));
    let orchestrator = Orchestrator::new(
        argos.clone(),
        argos,
        cloud,
        config.translation_cache_capacity,
    );

    if config.api_key.is_none() {
        info!("API_KEY not set, POST endpoints are open");
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;

    let state = AppState::new(orchestrator, config.api_key.clone());
    server::serve(state, addr).await
}
