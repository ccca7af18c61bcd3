// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! Internal audits API binary.
//!
//! Sits behind the gateway and trusts only the `x-user-id` family of
//! headers for identity. Must never be reachable from the public network.

use std::net::SocketAddr;

use storecheck_gateway::api::router;
use storecheck_gateway::config::{init_tracing, AuditsApiConfig};
use storecheck_gateway::state::AppState;
use storecheck_gateway::storage::{JsonStore, StoragePaths};
use storecheck_gateway::trust::ProvisionPolicy;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match AuditsApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid audits API configuration");
            std::process::exit(1);
        }
    };

    let mut store = JsonStore::new(StoragePaths::new(&config.data_dir));
    if let Err(e) = store.initialize() {
        tracing::error!(error = %e, data_dir = %config.data_dir, "failed to initialize user store");
        std::process::exit(1);
    }

    let state = AppState::new(store, ProvisionPolicy::from(&config));
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind audits API address");

    tracing::info!(
        %addr,
        data_dir = %config.data_dir,
        auto_provision = config.auto_provision,
        "audits API listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Audits API server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install shutdown signal handler");
    tracing::info!("shutdown signal received");
}
