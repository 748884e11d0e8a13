use anyhow::Context;

use supplyhub_api::app::{build_app, Collaborators};
use supplyhub_api::config::{ConfigLoader, CONFIG_PATH_ENV};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new()
        .load()
        .context("failed to load configuration")?;
    supplyhub_observability::tracing::init(config.log.format);
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        tracing::info!(path = %path.to_string_lossy(), "configuration file loaded");
    }

    let app = build_app(&config, Collaborators::in_memory(&config))
        .await
        .context("failed to build application")?;

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
