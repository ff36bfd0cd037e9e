// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: a fake Strava API served on an ephemeral port, and
//! builders for services wired against it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use sofia_tracker::models::BoundingBox;
use sofia_tracker::services::{StravaClient, SyncService};
use sofia_tracker::storage::BlobStore;
use std::collections::HashSet;
use std::sync::Arc;

/// Fixture behavior knobs.
#[derive(Clone, Default)]
pub struct FakeStrava {
    /// Activity ids whose stream endpoints answer 500.
    pub failing_streams: Arc<HashSet<u64>>,
    /// Make the token endpoint reject every exchange.
    pub reject_token: bool,
}

/// Serve `router` on an ephemeral local port, returning its base URL.
#[allow(dead_code)]
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A sync service over an in-memory store, pointed at the fake API.
#[allow(dead_code)]
pub fn test_sync(base_url: &str) -> (SyncService, BlobStore) {
    let store = BlobStore::in_memory();
    let client = StravaClient::with_base_url(&format!("{}/api/v3", base_url));
    let sync = SyncService::new(client, store.clone(), BoundingBox::default());
    (sync, store)
}

/// Fake Strava API routes.
#[allow(dead_code)]
pub fn fake_strava_router(fake: FakeStrava) -> Router {
    Router::new()
        .route("/oauth/token", post(token))
        .route("/api/v3/athlete", get(athlete))
        .route("/api/v3/athlete/activities", get(activities))
        .route("/api/v3/activities/{id}/streams", get(streams))
        .with_state(fake)
}

async fn token(State(fake): State<FakeStrava>) -> Result<Json<Value>, StatusCode> {
    if fake.reject_token {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(json!({
        "token_type": "Bearer",
        "access_token": "fake-access-token",
        "refresh_token": "fake-refresh-token",
        "expires_at": chrono::Utc::now().timestamp() + 21600,
    })))
}

async fn athlete() -> Json<Value> {
    Json(json!({
        "id": 4242,
        "firstname": "Ivo",
        "lastname": "Tester",
        "sex": "M",
        "profile_medium": "https://cdn.example/ivo.jpg",
    }))
}

/// Bare array, like the real list endpoint. Activities 1-3 end inside the
/// Sofia box, activity 4 ends in Plovdiv.
async fn activities() -> Json<Value> {
    Json(json!([
        {"id": 1, "name": "Vitosha Loop",
         "start_latlng": [42.65, 23.25], "end_latlng": [42.70, 23.30]},
        {"id": 2, "name": "Pancharevo Lake",
         "start_latlng": [42.68, 23.35], "end_latlng": [42.72, 23.40]},
        {"id": 3, "name": "Borisova Gradina",
         "start_latlng": [42.68, 23.32], "end_latlng": [42.69, 23.33]},
        {"id": 4, "name": "Plovdiv Trip",
         "start_latlng": [42.70, 23.32], "end_latlng": [42.15, 24.75]},
    ]))
}

/// Bare single-element array per requested key, like the real streams
/// endpoint. Three samples, the middle one stopped.
async fn streams(
    State(fake): State<FakeStrava>,
    Path(id): Path<u64>,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    if fake.failing_streams.contains(&id) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let body = match params.get("keys").map(String::as_str) {
        Some("moving") => json!([
            {"type": "moving", "resolution": "high", "original_size": 3,
             "data": [true, false, true]}
        ]),
        Some("latlng") => json!([
            {"type": "latlng", "resolution": "high", "original_size": 3,
             "data": [[42.70, 23.30], [42.705, 23.305], [42.71, 23.31]]}
        ]),
        _ => return Err(StatusCode::BAD_REQUEST),
    };
    Ok(Json(body))
}
