// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! Edge gateway binary.
//!
//! Terminates Auth0 bearer tokens and proxies verified requests to the
//! internal audits API with trusted identity headers injected.

use std::net::SocketAddr;

use storecheck_gateway::config::{init_tracing, GatewayConfig};
use storecheck_gateway::gateway::{router, GatewayState};

#[tokio::main]
async fn main() {
    init_tracing();

    // Configuration errors are startup errors; nothing is served until
    // every required variable is present and valid.
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid gateway configuration");
            std::process::exit(1);
        }
    };

    let state = GatewayState::from_config(&config);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind gateway address");

    tracing::info!(
        %addr,
        upstream = %config.audits_api_url,
        "gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Gateway server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install shutdown signal handler");
    tracing::info!("shutdown signal received");
}
