mod api_doc;
mod bootstrap;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Context;
use bootstrap::StoreSupervisor;
use config::Config;
use state::AppState;
use std::sync::Arc;
use store::RedisGateway;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("redis-kv-gateway starting");
    match dotenv {
        Ok(path) => tracing::info!("Loaded environment variables from {}", path.display()),
        Err(_) => tracing::info!("No .env file found, using system environment variables"),
    }

    let config = Config::from_env()?;
    config.log_startup();

    if config.store_autostart {
        StoreSupervisor::from_config(&config)
            .ensure_store_running()
            .await?;
    }

    let gateway = RedisGateway::connect(&config.store_url)
        .await
        .context("Store is unreachable after bootstrap")?;

    let app = routes::build_router(AppState::new(Arc::new(gateway)));

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Starting server on {}...", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
