use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flora_bridge::{
    app_state::AppState,
    clients::{AzureLanguageClient, AzureSpeechClient, AzureVisionClient},
    config::Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignored silently if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flora_bridge=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    config.validate().context("Invalid configuration")?;

    // Build a shared HTTP client with a connection pool and a timeout that
    // covers the slowest upstream we talk to (speech synthesis of a full
    // summary stays well under 60 s).
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .context("Failed to build HTTP client")?;

    let addr: SocketAddr = config.addr().parse().context("Invalid bind address")?;

    let state = Arc::new(AppState {
        vision: Arc::new(AzureVisionClient::new(
            http_client.clone(),
            &config.vision_endpoint,
            &config.vision_key,
        )),
        language: Arc::new(AzureLanguageClient::new(
            http_client.clone(),
            &config.openai_endpoint,
            &config.openai_key,
            &config.openai_deployment,
        )),
        speech: Arc::new(AzureSpeechClient::new(
            http_client,
            &config.speech_key,
            &config.speech_region,
        )),
        config,
    });

    let app = flora_bridge::build_router(state);

    tracing::info!("flora-bridge listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received — stopping");
}
