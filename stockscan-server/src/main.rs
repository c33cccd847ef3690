//! StockScan Server - REST API for stock-provider attribution
//!
//! Exposes stockscan-core functionality via HTTP endpoints:
//! - POST /api/v1/scan - Scan one batch of unflagged assets
//! - POST /api/v1/flags - Flag assets as safe
//! - GET /api/v1/safe - List flagged assets
//! - GET /api/v1/providers - List provider rules in match order

use std::net::SocketAddr;

use stockscan_server::{create_router_with_config, AppState, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stockscan_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    let state = match AppState::from_config(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize server state");
            std::process::exit(1);
        }
    };

    tracing::info!(
        store = state.store_backend(),
        batch_size = state.controller.config().batch_size,
        "StockScan server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let app = create_router_with_config(&config, state);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on http://{}", addr);
    tracing::info!("API docs at http://{}/docs", addr);

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
