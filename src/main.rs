use anyhow::{Context, Result};
use tracing::info;

use multilang_cms::{api, config, service::TranslationService, store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("multilang_cms=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!("Starting translation service");

    // Load configuration from environment
    let config = config::Config::from_env()?;

    let store = store::connect(&config).await?;
    let service = TranslationService::new(store);
    let app = api::app(service, &config.api_prefix);

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;

    info!(
        "Server listening on {} (API prefix '{}')",
        addr, config.api_prefix
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
