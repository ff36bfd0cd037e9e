// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sofia-Tracker server
//!
//! Ingests a single athlete's Strava activities, keeps the ones ending in
//! the Sofia region, and serves the derived waypoints for map rendering.

use sofia_tracker::{
    config::Config,
    services::{AuthSession, StravaClient, SyncService},
    storage::BlobStore,
    AppState,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Sofia-Tracker");

    // Open the blob store
    let store = BlobStore::open(&config.storage_root);
    tracing::info!(root = %config.storage_root.display(), "Blob store opened");

    // One OAuth session for the process
    let session = AuthSession::new(&config);

    let sync = SyncService::new(StravaClient::new(), store.clone(), config.bounds);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        sync,
        session: Mutex::new(session),
        athlete_id: Mutex::new(None),
    });

    // Build router
    let app = sofia_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sofia_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
