// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use tokio::net::TcpListener;
use vending_machine_server::{
    api::router,
    auth::TokenService,
    config::AppConfig,
    logging::init_logging,
    state::AppState,
    storage::VendingDatabase,
};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("Invalid configuration");
    init_logging(config.log_format);

    let db = VendingDatabase::open(&config.database_path).expect("Failed to open database");
    tracing::info!(path = %config.database_path.display(), "Database opened");

    let tokens = TokenService::new(&config.jwt_secret);
    let app = router(AppState::new(db, tokens));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(%addr, "Vending machine server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");

    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
